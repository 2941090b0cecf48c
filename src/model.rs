//! Model collaborator interface
//!
//! The training loop never computes gradients itself. It drives an external
//! model through the [`Model`] trait: one forward pass per batch producing a
//! scalar loss plus diagnostic [`LossComponents`], one backward pass filling
//! parameter gradients, and an enumerable parameter set for optimizer binding.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Result;

/// A trainable parameter: a flat value vector plus an optional gradient.
///
/// Gradients are written by the model's backward pass, consumed by the
/// optimizer step, and cleared by [`zero_grad`](Parameter::zero_grad).
#[derive(Clone, Debug)]
pub struct Parameter {
    value: Array1<f32>,
    grad: Option<Array1<f32>>,
}

impl Parameter {
    /// Create a parameter from an initial value.
    pub fn new(value: Array1<f32>) -> Self {
        Self { value, grad: None }
    }

    /// Create a parameter from a vector.
    pub fn from_vec(value: Vec<f32>) -> Self {
        Self::new(Array1::from(value))
    }

    /// Create a zero-initialized parameter.
    pub fn zeros(len: usize) -> Self {
        Self::new(Array1::zeros(len))
    }

    /// Current value.
    pub fn value(&self) -> &Array1<f32> {
        &self.value
    }

    /// Mutable value, for in-place optimizer updates.
    pub fn value_mut(&mut self) -> &mut Array1<f32> {
        &mut self.value
    }

    /// Gradient of the last backward pass, if any.
    pub fn grad(&self) -> Option<&Array1<f32>> {
        self.grad.as_ref()
    }

    /// Overwrite the gradient.
    pub fn set_grad(&mut self, grad: Array1<f32>) {
        self.grad = Some(grad);
    }

    /// Add to the gradient, initializing it if absent.
    pub fn accumulate_grad(&mut self, grad: Array1<f32>) {
        match self.grad.as_mut() {
            Some(existing) => *existing += &grad,
            None => self.grad = Some(grad),
        }
    }

    /// Clear the gradient.
    pub fn zero_grad(&mut self) {
        self.grad = None;
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Whether the parameter holds no elements.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Named sub-terms of the scalar loss, useful for diagnostics
/// (e.g. reconstruction vs. regularization terms).
///
/// # Example
///
/// ```
/// use lazo::LossComponents;
///
/// let mut components = LossComponents::new();
/// components.set("reconstruction", 0.82);
/// components.set("topological", 0.05);
/// assert_eq!(components.get("reconstruction"), Some(0.82));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LossComponents(BTreeMap<String, f32>);

impl LossComponents {
    /// Create an empty component map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a named component.
    pub fn set(&mut self, name: impl Into<String>, value: f32) {
        self.0.insert(name.into(), value);
    }

    /// Look up a component by name.
    pub fn get(&self, name: &str) -> Option<f32> {
        self.0.get(name).copied()
    }

    /// Iterate components in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no components were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialize to a JSON object string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }
}

impl FromIterator<(String, f32)> for LossComponents {
    fn from_iter<I: IntoIterator<Item = (String, f32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Result of one forward pass: the scalar loss and its diagnostic sub-terms.
#[derive(Clone, Debug)]
pub struct ModelOutput {
    /// Scalar training objective for the batch.
    pub loss: f32,
    /// Auxiliary sub-terms of the loss.
    pub components: LossComponents,
}

/// External model collaborator driven by the training loop.
///
/// Implementations own their architecture and autograd machinery; the loop
/// only sees this narrow surface. `forward` must not mutate parameter values
/// (validation passes rely on that), and `backward` must populate gradients
/// for the most recent forward.
pub trait Model {
    /// Forward pass over a batch of inputs (rows = samples), returning the
    /// scalar loss and its components.
    fn forward(&mut self, inputs: &Array2<f32>) -> Result<ModelOutput>;

    /// Backpropagate the most recent forward's loss into parameter gradients.
    fn backward(&mut self);

    /// Trainable parameters, in a stable order.
    fn parameters(&self) -> Vec<&Parameter>;

    /// Trainable parameters for optimizer binding, in the same order as
    /// [`parameters`](Model::parameters).
    fn parameters_mut(&mut self) -> Vec<&mut Parameter>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_from_vec() {
        let p = Parameter::from_vec(vec![1.0, 2.0, 3.0]);
        assert_eq!(p.len(), 3);
        assert!(p.grad().is_none());
    }

    #[test]
    fn test_parameter_grad_lifecycle() {
        let mut p = Parameter::zeros(2);

        p.set_grad(Array1::from(vec![1.0, -1.0]));
        assert!(p.grad().is_some());

        p.accumulate_grad(Array1::from(vec![0.5, 0.5]));
        let grad = p.grad().unwrap();
        assert!((grad[0] - 1.5).abs() < 1e-6);
        assert!((grad[1] + 0.5).abs() < 1e-6);

        p.zero_grad();
        assert!(p.grad().is_none());
    }

    #[test]
    fn test_parameter_accumulate_initializes() {
        let mut p = Parameter::zeros(2);
        p.accumulate_grad(Array1::from(vec![2.0, 4.0]));
        assert_eq!(p.grad().unwrap()[1], 4.0);
    }

    #[test]
    fn test_loss_components_ordering() {
        let mut components = LossComponents::new();
        components.set("reg", 0.1);
        components.set("recon", 0.9);

        let names: Vec<&str> = components.iter().map(|(k, _)| k).collect();
        // BTreeMap iteration is name-ordered
        assert_eq!(names, vec!["recon", "reg"]);
    }

    #[test]
    fn test_loss_components_json() {
        let mut components = LossComponents::new();
        components.set("recon", 0.5);
        let json = components.to_json().unwrap();
        assert!(json.contains("recon"));
    }

    #[test]
    fn test_loss_components_from_iter() {
        let components: LossComponents =
            vec![("a".to_string(), 1.0), ("b".to_string(), 2.0)]
                .into_iter()
                .collect();
        assert_eq!(components.len(), 2);
        assert_eq!(components.get("b"), Some(2.0));
    }
}
