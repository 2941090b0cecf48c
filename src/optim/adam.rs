//! Adam optimizer

use super::Optimizer;
use crate::model::Parameter;
use ndarray::Array1;

/// Adam optimizer (Adaptive Moment Estimation) with coupled L2 weight decay.
///
/// Weight decay is folded into the gradient (`g + λθ`), matching classic
/// Adam-with-L2 rather than the decoupled AdamW variant.
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    weight_decay: f32,
    t: u64,
    m: Vec<Option<Array1<f32>>>, // First moment
    v: Vec<Option<Array1<f32>>>, // Second moment
}

impl Adam {
    /// Create a new Adam optimizer.
    pub fn new(lr: f32, beta1: f32, beta2: f32, epsilon: f32, weight_decay: f32) -> Self {
        Self {
            lr,
            beta1,
            beta2,
            epsilon,
            weight_decay,
            t: 0,
            m: Vec::new(),
            v: Vec::new(),
        }
    }

    /// Create Adam with the standard moment defaults (β1 0.9, β2 0.999, ε 1e-8).
    pub fn with_defaults(lr: f32, weight_decay: f32) -> Self {
        Self::new(lr, 0.9, 0.999, 1e-8, weight_decay)
    }

    /// Initialize moment buffers if needed.
    fn ensure_moments(&mut self, n_params: usize) {
        if self.m.len() != n_params {
            self.m = (0..n_params).map(|_| None).collect();
            self.v = (0..n_params).map(|_| None).collect();
        }
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut [&mut Parameter]) {
        self.ensure_moments(params.len());
        self.t += 1;

        // Bias correction factors
        let lr_t = self.lr
            * ((1.0 - self.beta2.powi(self.t as i32)).sqrt()
                / (1.0 - self.beta1.powi(self.t as i32)));

        for (i, param) in params.iter_mut().enumerate() {
            let grad = match param.grad() {
                Some(g) => g.clone(),
                None => continue,
            };

            // L2 regularization: g' = g + λθ
            let grad = if self.weight_decay != 0.0 {
                grad + param.value() * self.weight_decay
            } else {
                grad
            };

            // m_t = β1 * m_{t-1} + (1 - β1) * g
            let m_t = match &self.m[i] {
                Some(m) => m * self.beta1 + &grad * (1.0 - self.beta1),
                None => &grad * (1.0 - self.beta1),
            };

            // v_t = β2 * v_{t-1} + (1 - β2) * g²
            let grad_sq = &grad * &grad;
            let v_t = match &self.v[i] {
                Some(v) => v * self.beta2 + &grad_sq * (1.0 - self.beta2),
                None => &grad_sq * (1.0 - self.beta2),
            };

            // θ_t = θ_{t-1} - lr_t * m_t / (√v_t + ε)
            let update = &m_t / &(v_t.mapv(f32::sqrt) + self.epsilon) * lr_t;
            param.value_mut().scaled_add(-1.0, &update);

            self.m[i] = Some(m_t);
            self.v[i] = Some(v_t);
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }

    fn set_lr(&mut self, lr: f32) {
        self.lr = lr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adam_quadratic_convergence() {
        // Test convergence on f(x) = x²
        let mut param = Parameter::from_vec(vec![5.0, -3.0, 2.0]);
        let mut optimizer = Adam::with_defaults(0.1, 0.0);

        for _ in 0..100 {
            // ∇(x²) = 2x
            let grad = param.value().mapv(|x| 2.0 * x);
            param.set_grad(grad);

            optimizer.step(&mut [&mut param]);
        }

        for &val in param.value().iter() {
            assert!(val.abs() < 0.5, "Value {} did not converge", val);
        }
    }

    #[test]
    fn test_adam_skips_params_without_grad() {
        let mut param = Parameter::from_vec(vec![1.0, 2.0]);
        let before = param.value().clone();

        let mut optimizer = Adam::with_defaults(0.1, 0.0);
        optimizer.step(&mut [&mut param]);

        assert_eq!(param.value(), &before);
    }

    #[test]
    fn test_weight_decay_shrinks_params() {
        // Zero gradient + L2 decay still pulls the parameter toward zero
        let mut param = Parameter::from_vec(vec![10.0]);
        param.set_grad(Array1::zeros(1));

        let mut optimizer = Adam::with_defaults(0.1, 0.1);
        for _ in 0..10 {
            param.set_grad(Array1::zeros(1));
            optimizer.step(&mut [&mut param]);
        }

        assert!(param.value()[0] < 10.0);
    }

    #[test]
    fn test_zero_grad_clears_all() {
        let mut a = Parameter::from_vec(vec![1.0]);
        let mut b = Parameter::from_vec(vec![2.0]);
        a.set_grad(Array1::ones(1));
        b.set_grad(Array1::ones(1));

        let mut optimizer = Adam::with_defaults(0.1, 0.0);
        optimizer.zero_grad(&mut [&mut a, &mut b]);

        assert!(a.grad().is_none());
        assert!(b.grad().is_none());
    }

    #[test]
    fn test_set_lr() {
        let mut optimizer = Adam::with_defaults(0.001, 0.0);
        assert_eq!(optimizer.lr(), 0.001);
        optimizer.set_lr(0.01);
        assert_eq!(optimizer.lr(), 0.01);
    }
}
