//! Optimizer trait

use crate::model::Parameter;

/// Trait for optimization algorithms.
///
/// The training loop binds an optimizer to the model's parameter set and
/// drives it once per batch: zero gradients, backward, step.
pub trait Optimizer {
    /// Perform a single in-place optimization step.
    fn step(&mut self, params: &mut [&mut Parameter]);

    /// Zero out all gradients.
    fn zero_grad(&mut self, params: &mut [&mut Parameter]) {
        for param in params.iter_mut() {
            param.zero_grad();
        }
    }

    /// Get learning rate.
    fn lr(&self) -> f32;

    /// Set learning rate.
    fn set_lr(&mut self, lr: f32);
}
