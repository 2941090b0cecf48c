//! Dataset trait and in-memory implementation

use ndarray::Array1;

/// A single sample: input features plus a label vector.
///
/// The label travels with the sample so supervised variants can use it, but
/// the training loop itself discards it (pure reconstruction objective).
#[derive(Clone, Debug)]
pub struct Sample {
    /// Flattened input feature vector.
    pub features: Array1<f32>,
    /// Target / label value(s). Empty for unlabeled data.
    pub label: Array1<f32>,
}

impl Sample {
    /// Create a labeled sample.
    pub fn new(features: Array1<f32>, label: Array1<f32>) -> Self {
        Self { features, label }
    }

    /// Create an unlabeled sample.
    pub fn unlabeled(features: Array1<f32>) -> Self {
        Self {
            features,
            label: Array1::zeros(0),
        }
    }
}

/// An indexed collection of samples.
pub trait Dataset {
    /// Total number of samples.
    fn len(&self) -> usize;

    /// Whether the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retrieve the sample at `index`.
    ///
    /// # Panics
    /// May panic if `index >= self.len()`.
    fn get(&self, index: usize) -> Sample;
}

/// Dataset backed by a vector of samples.
#[derive(Clone, Debug, Default)]
pub struct InMemoryDataset {
    samples: Vec<Sample>,
}

impl InMemoryDataset {
    /// Create a dataset from samples.
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Append a sample.
    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }
}

impl Dataset for InMemoryDataset {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get(&self, index: usize) -> Sample {
        self.samples[index].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_dataset() {
        let mut ds = InMemoryDataset::default();
        assert!(ds.is_empty());

        ds.push(Sample::unlabeled(Array1::from(vec![1.0, 2.0])));
        ds.push(Sample::new(
            Array1::from(vec![3.0, 4.0]),
            Array1::from(vec![1.0]),
        ));

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(1).features[0], 3.0);
        assert_eq!(ds.get(0).label.len(), 0);
    }
}
