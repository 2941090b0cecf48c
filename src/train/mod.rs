//! The training loop and its callback lifecycle
//!
//! This module provides:
//! - [`TrainConfig`] — hyperparameters with validation
//! - [`Callback`] / [`HookContext`] — lifecycle extension points
//! - [`TrainingLoop`] — epoch/batch orchestration with periodic validation
//! - [`MetricsTracker`] — per-run loss bookkeeping
//!
//! # Example
//!
//! ```no_run
//! use lazo::{TrainConfig, TrainingLoop, ProgressCallback};
//! # fn demo(model: impl lazo::Model, dataset: lazo::InMemoryDataset) -> lazo::Result<()> {
//! let config = TrainConfig::new()
//!     .with_epochs(20)
//!     .with_batch_size(64)
//!     .with_learning_rate(1e-3);
//!
//! let mut training = TrainingLoop::new(model, dataset, config);
//! training.add_callback(ProgressCallback::default());
//! training.run()?;
//! # Ok(())
//! # }
//! ```

pub mod callback;
mod config;
mod training_loop;

pub use callback::{
    Callback, CallbackList, EarlyStopping, HookContext, LossHistory, ProgressCallback,
};
pub use config::{MetricsTracker, TrainConfig};
pub use training_loop::TrainingLoop;
