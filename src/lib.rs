//! # Lazo: Minimal Training-Loop Driver
//!
//! Lazo drives gradient-descent training of autoencoder-style models over a
//! dataset, with an ordered list of lifecycle callbacks as the extension
//! mechanism. The numerically hard parts (forward pass, backpropagation,
//! gradient computation) belong to external collaborators reached through
//! narrow traits; this crate owns the orchestration: dataset splitting,
//! batch iteration, optimizer stepping, hook dispatch, and periodic
//! validation.
//!
//! ## Architecture
//!
//! - **model**: `Model` trait, `Parameter`, and loss diagnostics
//! - **data**: datasets, batching, and train/validation/test splitting
//! - **optim**: `Optimizer` trait and the default Adam implementation
//! - **train**: `TrainingLoop`, configuration, callbacks, metrics

pub mod data;
pub mod model;
pub mod optim;
pub mod train;

pub mod error;

// Re-export commonly used types
pub use data::{
    Batch, BatchLoader, DataSplit, Dataset, FractionSplit, InMemoryDataset, Sample, Splitter,
};
pub use error::{Error, Result};
pub use model::{LossComponents, Model, ModelOutput, Parameter};
pub use optim::{Adam, Optimizer};
pub use train::{
    Callback, CallbackList, EarlyStopping, HookContext, LossHistory, MetricsTracker,
    ProgressCallback, TrainConfig, TrainingLoop,
};
