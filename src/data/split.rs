//! Train/validation/test partitioning

use super::{BatchLoader, Dataset};
use crate::{Error, Result};

/// The three partitions produced by a [`Splitter`], each wrapped in a
/// batch-iterable loader.
#[derive(Clone, Debug)]
pub struct DataSplit {
    /// Training partition.
    pub train: BatchLoader,
    /// Validation partition.
    pub validation: BatchLoader,
    /// Held-out test partition, untouched by the loop.
    pub test: BatchLoader,
}

/// Collaborator that partitions a dataset into train/validation/test loaders.
pub trait Splitter {
    /// Split `dataset`, reserving a `val_size` fraction for validation, and
    /// wrap each partition in batches of `batch_size`.
    fn split(&self, dataset: &dyn Dataset, val_size: f32, batch_size: usize)
        -> Result<DataSplit>;
}

/// Deterministic contiguous split: the first samples train, then a
/// `floor(n * val_size)`-sample validation slice, then an equally sized test
/// slice at the end. No shuffling.
#[derive(Clone, Copy, Debug, Default)]
pub struct FractionSplit;

impl Splitter for FractionSplit {
    fn split(
        &self,
        dataset: &dyn Dataset,
        val_size: f32,
        batch_size: usize,
    ) -> Result<DataSplit> {
        let n = dataset.len();
        let n_val = (n as f32 * val_size).floor() as usize;
        if n_val == 0 {
            return Err(Error::Config(format!(
                "val_size {} leaves an empty validation partition over {} samples",
                val_size, n
            )));
        }
        if 2 * n_val >= n {
            return Err(Error::Config(format!(
                "val_size {} leaves no training samples over {} samples",
                val_size, n
            )));
        }
        let n_train = n - 2 * n_val;

        Ok(DataSplit {
            train: BatchLoader::from_range(dataset, 0..n_train, batch_size)?,
            validation: BatchLoader::from_range(dataset, n_train..n_train + n_val, batch_size)?,
            test: BatchLoader::from_range(dataset, n_train + n_val..n, batch_size)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{InMemoryDataset, Sample};
    use ndarray::Array1;

    fn dataset(n: usize) -> InMemoryDataset {
        InMemoryDataset::new(
            (0..n)
                .map(|i| Sample::unlabeled(Array1::from_elem(2, i as f32)))
                .collect(),
        )
    }

    #[test]
    fn test_fraction_split_sizes() {
        let ds = dataset(40);
        let split = FractionSplit.split(&ds, 0.25, 1).unwrap();

        assert_eq!(split.train.len(), 20);
        assert_eq!(split.validation.len(), 10);
        assert_eq!(split.test.len(), 10);
    }

    #[test]
    fn test_fraction_split_is_contiguous() {
        let ds = dataset(40);
        let split = FractionSplit.split(&ds, 0.25, 1).unwrap();

        // Train samples come first, then validation, then test
        let last_train = split.train.iter().last().unwrap().inputs[[0, 0]];
        let first_val = split.validation.iter().next().unwrap().inputs[[0, 0]];
        let first_test = split.test.iter().next().unwrap().inputs[[0, 0]];
        assert_eq!(last_train, 19.0);
        assert_eq!(first_val, 20.0);
        assert_eq!(first_test, 30.0);
    }

    #[test]
    fn test_fraction_split_rejects_empty_validation() {
        let ds = dataset(10);
        assert!(matches!(
            FractionSplit.split(&ds, 0.05, 1),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_fraction_split_rejects_empty_training() {
        let ds = dataset(10);
        assert!(matches!(
            FractionSplit.split(&ds, 0.5, 1),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_split_batching() {
        let ds = dataset(40);
        let split = FractionSplit.split(&ds, 0.25, 8).unwrap();

        // 20 train samples in batches of 8 -> 8, 8, 4
        assert_eq!(split.train.len(), 3);
        assert_eq!(split.validation.len(), 2);
    }
}
