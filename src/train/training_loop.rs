//! The training loop itself

use super::callback::{Callback, CallbackList, HookContext};
use super::config::{MetricsTracker, TrainConfig};
use crate::data::{BatchLoader, Dataset, FractionSplit, Splitter};
use crate::model::{Model, ModelOutput};
use crate::optim::{Adam, Optimizer};
use crate::{Error, Result};

/// Trains a model over a dataset with lifecycle callbacks.
///
/// Construction wires up the collaborators; [`run`](TrainingLoop::run)
/// executes training synchronously to completion. The dataset is split once
/// into train/validation/test partitions, an adaptive-gradient optimizer is
/// bound to the model's parameters, and nested epoch/batch loops drive
/// forward, hooks, backward, and the optimizer step, with a validation pass
/// every `floor(n_batches / val_frequency)` training batches.
///
/// Calling `run` twice restarts cleanly: metrics are reset, while model and
/// optimizer state carry over as mutated in place.
pub struct TrainingLoop<M: Model> {
    model: M,
    dataset: Box<dyn Dataset>,
    splitter: Box<dyn Splitter>,
    optimizer: Option<Box<dyn Optimizer>>,
    config: TrainConfig,
    callbacks: CallbackList,
    metrics: MetricsTracker,
}

impl<M: Model> TrainingLoop<M> {
    /// Create a loop over `model` and `dataset` with the given
    /// hyperparameters, a contiguous [`FractionSplit`], and no callbacks.
    pub fn new(model: M, dataset: impl Dataset + 'static, config: TrainConfig) -> Self {
        Self {
            model,
            dataset: Box::new(dataset),
            splitter: Box::new(FractionSplit),
            optimizer: None,
            config,
            callbacks: CallbackList::new(),
            metrics: MetricsTracker::new(),
        }
    }

    /// Replace the dataset splitter.
    pub fn with_splitter(mut self, splitter: impl Splitter + 'static) -> Self {
        self.splitter = Box::new(splitter);
        self
    }

    /// Replace the default optimizer (Adam built from the config's learning
    /// rate and weight decay) with an external implementation.
    pub fn with_optimizer(mut self, optimizer: impl Optimizer + 'static) -> Self {
        self.optimizer = Some(Box::new(optimizer));
        self
    }

    /// Register a callback. Callbacks fire in registration order.
    pub fn add_callback<C: Callback + 'static>(&mut self, callback: C) {
        self.callbacks.add(callback);
    }

    /// The model being trained.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the model, e.g. for inference after training.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Hyperparameters of this loop.
    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Metrics of the most recent run.
    pub fn metrics(&self) -> &MetricsTracker {
        &self.metrics
    }

    /// Execute training to completion.
    ///
    /// Returns the first error raised by the configuration checks, the model,
    /// the optimizer, or a callback; nothing is caught or retried internally.
    pub fn run(&mut self) -> Result<()> {
        self.config.validate()?;
        self.metrics.reset();

        let split =
            self.splitter
                .split(self.dataset.as_ref(), self.config.val_size, self.config.batch_size)?;
        let n_batches = split.train.len();
        if n_batches == 0 {
            return Err(Error::Config("training partition yields no batches".into()));
        }
        if split.validation.is_empty() {
            return Err(Error::Config(
                "validation partition yields no batches".into(),
            ));
        }

        // Fail fast on a zero validation interval instead of letting the
        // modulo below fault mid-epoch.
        let eval_interval = n_batches / self.config.val_frequency;
        if eval_interval == 0 {
            return Err(Error::Config(format!(
                "val_frequency {} exceeds the {} training batches per epoch",
                self.config.val_frequency, n_batches
            )));
        }

        let mut default_optimizer;
        let optimizer: &mut dyn Optimizer = match self.optimizer.as_deref_mut() {
            Some(optimizer) => optimizer,
            None => {
                default_optimizer =
                    Adam::with_defaults(self.config.learning_rate, self.config.weight_decay);
                &mut default_optimizer
            }
        };

        for epoch in 1..=self.config.n_epochs {
            let mut epoch_loss = 0.0;
            let mut last: Option<ModelOutput> = None;

            for (batch, data) in split.train.iter().enumerate() {
                // Labels are discarded: pure reconstruction objective
                let out = self.model.forward(&data.inputs)?;

                // Hooks fire before the step so they observe the pre-update
                // loss; epoch begin coincides with the first batch.
                {
                    let ctx = HookContext {
                        epoch,
                        n_epochs: self.config.n_epochs,
                        batch,
                        n_batches,
                        loss: out.loss,
                        loss_components: &out.components,
                        model: &self.model,
                        optimizer: &*optimizer,
                    };
                    if batch == 0 {
                        self.callbacks.on_epoch_begin(&ctx)?;
                    }
                    self.callbacks.on_batch_begin(&ctx)?;
                }

                optimizer.zero_grad(&mut self.model.parameters_mut());
                self.model.backward();
                optimizer.step(&mut self.model.parameters_mut());
                self.metrics.increment_step();

                // Fresh context: same scalar loss, post-update model
                {
                    let ctx = HookContext {
                        epoch,
                        n_epochs: self.config.n_epochs,
                        batch,
                        n_batches,
                        loss: out.loss,
                        loss_components: &out.components,
                        model: &self.model,
                        optimizer: &*optimizer,
                    };
                    self.callbacks.on_batch_end(&ctx)?;
                }

                if (batch + 1) % eval_interval == 0 {
                    let val_loss = Self::validation_pass(&mut self.model, &split.validation)?;
                    println!(
                        "Epoch {}, batch {}: validation loss={:.4}",
                        epoch,
                        batch + 1,
                        val_loss
                    );
                    self.metrics.record_val_loss(val_loss);
                }

                epoch_loss += out.loss;
                last = Some(out);
            }

            if let Some(out) = last {
                let ctx = HookContext {
                    epoch,
                    n_epochs: self.config.n_epochs,
                    batch: n_batches - 1,
                    n_batches,
                    loss: out.loss,
                    loss_components: &out.components,
                    model: &self.model,
                    optimizer: &*optimizer,
                };
                self.callbacks.on_epoch_end(&ctx)?;
            }

            self.metrics
                .record_epoch(epoch_loss / n_batches as f32, optimizer.lr());
        }

        Ok(())
    }

    /// Forward the validation partition's own batches, no backward pass and
    /// no optimizer step, and return the mean loss.
    fn validation_pass(model: &mut M, validation: &BatchLoader) -> Result<f32> {
        let mut total = 0.0;
        for val_data in validation.iter() {
            let out = model.forward(&val_data.inputs)?;
            total += out.loss;
        }
        Ok(total / validation.len() as f32)
    }
}
