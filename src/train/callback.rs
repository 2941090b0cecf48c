//! Callback system for training lifecycle events
//!
//! Provides extensible hooks for the four lifecycle moments:
//! - `on_epoch_begin` / `on_epoch_end`
//! - `on_batch_begin` / `on_batch_end`
//!
//! Each hook receives an explicit [`HookContext`] snapshot and returns a
//! `Result`: an `Err` propagates synchronously through the loop and aborts
//! training, which is also how deliberate early stopping is signaled
//! ([`Error::Stopped`]).
//!
//! # Example
//!
//! ```rust
//! use lazo::{Callback, HookContext};
//!
//! struct PrintCallback;
//!
//! impl Callback for PrintCallback {
//!     fn on_epoch_end(&mut self, ctx: &HookContext<'_>) -> lazo::Result<()> {
//!         println!("Epoch {} finished with loss {:.4}", ctx.epoch, ctx.loss);
//!         Ok(())
//!     }
//! }
//! ```

use crate::model::{LossComponents, Model};
use crate::optim::Optimizer;
use crate::{Error, Result};

/// Snapshot of the loop's state passed to each hook.
///
/// An explicit structure containing only the values hooks are contractually
/// allowed to observe; the loop itself is never part of the context.
pub struct HookContext<'a> {
    /// Current epoch (1-indexed).
    pub epoch: usize,
    /// Total epochs planned.
    pub n_epochs: usize,
    /// Current batch within the epoch (0-indexed).
    pub batch: usize,
    /// Training batches per epoch.
    pub n_batches: usize,
    /// Loss of the current batch. For `on_batch_begin` this is the
    /// pre-update loss; `on_batch_end` carries the same scalar but a
    /// post-update model.
    pub loss: f32,
    /// Diagnostic sub-terms of the loss.
    pub loss_components: &'a LossComponents,
    /// The model being trained.
    pub model: &'a dyn Model,
    /// The optimizer bound to the model's parameters.
    pub optimizer: &'a dyn Optimizer,
}

/// Trait for training callbacks.
///
/// All hooks default to no-ops, so implementations only write the events
/// they care about. Hooks fire in registration order; the first `Err`
/// aborts the run.
pub trait Callback {
    /// Called at the first batch of each epoch, before the optimizer step.
    fn on_epoch_begin(&mut self, _ctx: &HookContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called after the last batch of each epoch.
    fn on_epoch_end(&mut self, _ctx: &HookContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called before each optimizer step, observing the pre-update loss.
    fn on_batch_begin(&mut self, _ctx: &HookContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called after each optimizer step, observing post-update state.
    fn on_batch_end(&mut self, _ctx: &HookContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Callback name for logging.
    fn name(&self) -> &str {
        "Callback"
    }
}

// =============================================================================
// Callback List
// =============================================================================

/// Ordered list of callbacks with in-order dispatch.
#[derive(Default)]
pub struct CallbackList {
    callbacks: Vec<Box<dyn Callback>>,
}

impl CallbackList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a callback.
    pub fn add<C: Callback + 'static>(&mut self, callback: C) {
        self.callbacks.push(Box::new(callback));
    }

    /// Whether no callbacks are registered.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Fire epoch begin on every callback, in order.
    pub fn on_epoch_begin(&mut self, ctx: &HookContext<'_>) -> Result<()> {
        for cb in &mut self.callbacks {
            cb.on_epoch_begin(ctx)?;
        }
        Ok(())
    }

    /// Fire epoch end on every callback, in order.
    pub fn on_epoch_end(&mut self, ctx: &HookContext<'_>) -> Result<()> {
        for cb in &mut self.callbacks {
            cb.on_epoch_end(ctx)?;
        }
        Ok(())
    }

    /// Fire batch begin on every callback, in order.
    pub fn on_batch_begin(&mut self, ctx: &HookContext<'_>) -> Result<()> {
        for cb in &mut self.callbacks {
            cb.on_batch_begin(ctx)?;
        }
        Ok(())
    }

    /// Fire batch end on every callback, in order.
    pub fn on_batch_end(&mut self, ctx: &HookContext<'_>) -> Result<()> {
        for cb in &mut self.callbacks {
            cb.on_batch_end(ctx)?;
        }
        Ok(())
    }
}

// =============================================================================
// Early Stopping Callback
// =============================================================================

/// Halts training when the epoch-end loss plateaus.
///
/// Signals the stop by returning [`Error::Stopped`], which propagates out of
/// the run for the caller to catch.
///
/// # Example
///
/// ```rust
/// use lazo::EarlyStopping;
///
/// // Stop if no improvement for 5 epochs, min improvement 0.001
/// let early_stop = EarlyStopping::new(5, 0.001);
/// ```
#[derive(Clone, Debug)]
pub struct EarlyStopping {
    /// Epochs to wait for improvement.
    patience: usize,
    /// Minimum improvement to reset patience.
    min_delta: f32,
    /// Best loss seen so far.
    best_loss: f32,
    /// Epochs without improvement.
    epochs_without_improvement: usize,
}

impl EarlyStopping {
    /// Create a new early stopping callback.
    pub fn new(patience: usize, min_delta: f32) -> Self {
        Self {
            patience,
            min_delta,
            best_loss: f32::INFINITY,
            epochs_without_improvement: 0,
        }
    }

    /// Reset internal state.
    pub fn reset(&mut self) {
        self.best_loss = f32::INFINITY;
        self.epochs_without_improvement = 0;
    }

    fn check_improvement(&mut self, loss: f32) -> bool {
        if loss < self.best_loss - self.min_delta {
            self.best_loss = loss;
            self.epochs_without_improvement = 0;
            true
        } else {
            self.epochs_without_improvement += 1;
            false
        }
    }
}

impl Callback for EarlyStopping {
    fn on_epoch_end(&mut self, ctx: &HookContext<'_>) -> Result<()> {
        self.check_improvement(ctx.loss);

        if self.epochs_without_improvement >= self.patience {
            return Err(Error::Stopped(format!(
                "no improvement for {} epochs (best loss: {:.4})",
                self.patience, self.best_loss
            )));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "EarlyStopping"
    }
}

// =============================================================================
// Progress Callback
// =============================================================================

/// Logs training progress to stdout.
#[derive(Clone, Debug)]
pub struct ProgressCallback {
    /// Log every N batches.
    log_interval: usize,
}

impl ProgressCallback {
    /// Create a progress callback.
    pub fn new(log_interval: usize) -> Self {
        Self {
            log_interval: log_interval.max(1),
        }
    }
}

impl Default for ProgressCallback {
    fn default() -> Self {
        Self { log_interval: 10 }
    }
}

impl Callback for ProgressCallback {
    fn on_epoch_begin(&mut self, ctx: &HookContext<'_>) -> Result<()> {
        println!(
            "Epoch {}/{} starting (lr: {:.2e})",
            ctx.epoch,
            ctx.n_epochs,
            ctx.optimizer.lr()
        );
        Ok(())
    }

    fn on_epoch_end(&mut self, ctx: &HookContext<'_>) -> Result<()> {
        println!("Epoch {}/{}: loss={:.4}", ctx.epoch, ctx.n_epochs, ctx.loss);
        Ok(())
    }

    fn on_batch_end(&mut self, ctx: &HookContext<'_>) -> Result<()> {
        if (ctx.batch + 1) % self.log_interval == 0 {
            println!(
                "  Batch {}/{}: loss={:.4}",
                ctx.batch + 1,
                ctx.n_batches,
                ctx.loss
            );
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "ProgressCallback"
    }
}

// =============================================================================
// Loss History Callback
// =============================================================================

/// Records per-batch and per-epoch loss values for later inspection.
#[derive(Clone, Debug, Default)]
pub struct LossHistory {
    batch_losses: Vec<f32>,
    epoch_losses: Vec<f32>,
}

impl LossHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Losses observed at each `on_batch_end`.
    pub fn batch_losses(&self) -> &[f32] {
        &self.batch_losses
    }

    /// Losses observed at each `on_epoch_end`.
    pub fn epoch_losses(&self) -> &[f32] {
        &self.epoch_losses
    }
}

impl Callback for LossHistory {
    fn on_batch_end(&mut self, ctx: &HookContext<'_>) -> Result<()> {
        self.batch_losses.push(ctx.loss);
        Ok(())
    }

    fn on_epoch_end(&mut self, ctx: &HookContext<'_>) -> Result<()> {
        self.epoch_losses.push(ctx.loss);
        Ok(())
    }

    fn name(&self) -> &str {
        "LossHistory"
    }
}

// =============================================================================
// Tests
// =============================================================================



#[cfg(test)]
mod proptests {
    use super::test_support::CtxParts;
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    proptest! {
        /// Early stopping always stops after patience epochs without improvement
        #[test]
        fn early_stopping_respects_patience(
            patience in 1usize..10,
            min_delta in 0.0001f32..0.1,
            initial_loss in 0.1f32..10.0,
        ) {
            let parts = CtxParts::new();
            let mut es = EarlyStopping::new(patience, min_delta);

            // First epoch establishes the baseline
            es.on_epoch_end(&parts.ctx(1, 0, initial_loss)).unwrap();

            for epoch in 1..=patience {
                let result = es.on_epoch_end(&parts.ctx(epoch + 1, 0, initial_loss));
                if epoch < patience {
                    prop_assert!(result.is_ok());
                } else {
                    prop_assert!(matches!(result, Err(Error::Stopped(_))));
                }
            }
        }

        /// Every registered callback fires exactly once per dispatch
        #[test]
        fn all_callbacks_fire_once(num_callbacks in 1usize..5) {
            struct CounterCallback {
                counter: Arc<AtomicUsize>,
            }

            impl Callback for CounterCallback {
                fn on_batch_begin(&mut self, _: &HookContext<'_>) -> Result<()> {
                    self.counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }

            let parts = CtxParts::new();
            let counter = Arc::new(AtomicUsize::new(0));
            let mut list = CallbackList::new();
            for _ in 0..num_callbacks {
                list.add(CounterCallback { counter: counter.clone() });
            }

            list.on_batch_begin(&parts.ctx(1, 0, 0.0)).unwrap();
            prop_assert_eq!(counter.load(Ordering::SeqCst), num_callbacks);
        }

        /// An erroring callback stops dispatch at its position in the list
        #[test]
        fn error_propagates_from_list_position(position in 0usize..4) {
            struct FailAt;
            impl Callback for FailAt {
                fn on_epoch_end(&mut self, _: &HookContext<'_>) -> Result<()> {
                    Err(Error::Stopped("stop".into()))
                }
            }

            struct CounterCallback {
                counter: Arc<AtomicUsize>,
            }
            impl Callback for CounterCallback {
                fn on_epoch_end(&mut self, _: &HookContext<'_>) -> Result<()> {
                    self.counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }

            let parts = CtxParts::new();
            let counter = Arc::new(AtomicUsize::new(0));
            let mut list = CallbackList::new();
            for i in 0..4 {
                if i == position {
                    list.add(FailAt);
                } else {
                    list.add(CounterCallback { counter: counter.clone() });
                }
            }

            prop_assert!(list.on_epoch_end(&parts.ctx(1, 0, 0.0)).is_err());
            // Only the callbacks before the failing one ran
            prop_assert_eq!(counter.load(Ordering::SeqCst), position);
        }
    }
}
