//! Error types for lazo

use thiserror::Error;

/// Errors surfaced by the training loop and its collaborators.
///
/// Nothing is caught or retried internally: configuration errors are raised
/// before the first epoch, collaborator and callback failures propagate out
/// of [`run`](crate::train::TrainingLoop::run) as soon as they occur.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid hyperparameters or partition setup.
    #[error("configuration error: {0}")]
    Config(String),

    /// Inconsistent or unusable data handed to batching.
    #[error("data error: {0}")]
    Data(String),

    /// Failure raised by the model collaborator during forward or backward.
    #[error("model error: {0}")]
    Model(String),

    /// Deliberate stop signal raised by a callback (e.g. early stopping).
    #[error("training stopped: {0}")]
    Stopped(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
