//! Dataset, batching, and partitioning collaborators
//!
//! The loop treats data as an indexed collection of [`Sample`]s, split once
//! by a [`Splitter`] into train/validation/test [`BatchLoader`]s. Splitting
//! strategy is collaborator territory; the provided [`FractionSplit`] is a
//! deterministic contiguous split, and the loop never re-shuffles after it.

mod batch;
mod dataset;
mod split;

pub use batch::{Batch, BatchLoader};
pub use dataset::{Dataset, InMemoryDataset, Sample};
pub use split::{DataSplit, FractionSplit, Splitter};
