//! Optimizer collaborator interface and the loop's default optimizer

mod adam;
mod optimizer;

pub use adam::Adam;
pub use optimizer::Optimizer;
