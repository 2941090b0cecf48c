//! Training configuration and metrics

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Hyperparameters of a training run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Number of epochs to train.
    pub n_epochs: usize,

    /// Samples per batch.
    pub batch_size: usize,

    /// Optimizer learning rate.
    pub learning_rate: f32,

    /// L2 weight-decay coefficient.
    pub weight_decay: f32,

    /// Fraction of the dataset reserved for validation (and for test).
    pub val_size: f32,

    /// Validation passes per epoch, expressed as an interval over training
    /// batches: validation runs every `floor(n_batches / val_frequency)`
    /// batches. Must not exceed the number of training batches.
    pub val_frequency: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            n_epochs: 10,
            batch_size: 32,
            learning_rate: 1e-3,
            weight_decay: 1e-5,
            val_size: 0.15,
            val_frequency: 1,
        }
    }
}

impl TrainConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the epoch count.
    pub fn with_epochs(mut self, n_epochs: usize) -> Self {
        self.n_epochs = n_epochs;
        self
    }

    /// Set the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the L2 weight-decay coefficient.
    pub fn with_weight_decay(mut self, weight_decay: f32) -> Self {
        self.weight_decay = weight_decay;
        self
    }

    /// Set the validation fraction.
    pub fn with_val_size(mut self, val_size: f32) -> Self {
        self.val_size = val_size;
        self
    }

    /// Set the number of validation passes per epoch.
    pub fn with_val_frequency(mut self, val_frequency: usize) -> Self {
        self.val_frequency = val_frequency;
        self
    }

    /// Check hyperparameter ranges. Called by the loop before splitting;
    /// the batch-count-dependent interval check happens after the split.
    pub fn validate(&self) -> Result<()> {
        if self.n_epochs == 0 {
            return Err(Error::Config("n_epochs must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".into()));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::Config(format!(
                "learning_rate must be finite and positive, got {}",
                self.learning_rate
            )));
        }
        if !self.weight_decay.is_finite() || self.weight_decay < 0.0 {
            return Err(Error::Config(format!(
                "weight_decay must be finite and non-negative, got {}",
                self.weight_decay
            )));
        }
        if !(self.val_size > 0.0 && self.val_size < 1.0) {
            return Err(Error::Config(format!(
                "val_size must lie strictly between 0 and 1, got {}",
                self.val_size
            )));
        }
        if self.val_frequency == 0 {
            return Err(Error::Config("val_frequency must be at least 1".into()));
        }
        Ok(())
    }
}

/// Tracks losses over one training run. Reset at the start of each run.
#[derive(Clone, Debug, Default)]
pub struct MetricsTracker {
    /// Mean training loss per epoch.
    pub losses: Vec<f32>,

    /// Mean validation loss per validation interval.
    pub val_losses: Vec<f32>,

    /// Learning rate per epoch.
    pub learning_rates: Vec<f32>,

    /// Optimizer steps taken.
    pub steps: usize,

    /// Epochs completed.
    pub epoch: usize,
}

impl MetricsTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all recorded state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record an epoch's mean training loss.
    pub fn record_epoch(&mut self, loss: f32, lr: f32) {
        self.losses.push(loss);
        self.learning_rates.push(lr);
        self.epoch += 1;
    }

    /// Record one validation interval's mean loss.
    pub fn record_val_loss(&mut self, val_loss: f32) {
        self.val_losses.push(val_loss);
    }

    /// Increment the step counter.
    pub fn increment_step(&mut self) {
        self.steps += 1;
    }

    /// Best (minimum) training loss.
    pub fn best_loss(&self) -> Option<f32> {
        self.losses
            .iter()
            .copied()
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Best (minimum) validation loss.
    pub fn best_val_loss(&self) -> Option<f32> {
        self.val_losses
            .iter()
            .copied()
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Mean training loss over the last `n` epochs.
    pub fn avg_loss(&self, n: usize) -> f32 {
        if self.losses.is_empty() {
            return 0.0;
        }
        let start = self.losses.len().saturating_sub(n);
        let window = &self.losses[start..];
        window.iter().sum::<f32>() / window.len() as f32
    }
}
