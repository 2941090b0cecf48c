//! Batches and batch-iterable partition views

use ndarray::Array2;

use super::{Dataset, Sample};
use crate::{Error, Result};

/// A fixed-size group of samples processed together in one step.
///
/// `inputs` has one row per sample; `labels` carries the samples' label
/// vectors row-wise (possibly zero-width for unlabeled data).
#[derive(Clone, Debug)]
pub struct Batch {
    /// Stacked input features, shape `(batch, features)`.
    pub inputs: Array2<f32>,
    /// Stacked labels, shape `(batch, label_len)`.
    pub labels: Array2<f32>,
}

impl Batch {
    /// Create a batch from pre-stacked arrays.
    pub fn new(inputs: Array2<f32>, labels: Array2<f32>) -> Self {
        Self { inputs, labels }
    }

    /// Stack samples into a batch, validating uniform dimensions.
    pub fn from_samples(samples: &[Sample]) -> Result<Self> {
        let first = samples
            .first()
            .ok_or_else(|| Error::Data("cannot build a batch from zero samples".into()))?;
        let feature_len = first.features.len();
        let label_len = first.label.len();

        let mut features = Vec::with_capacity(samples.len() * feature_len);
        let mut labels = Vec::with_capacity(samples.len() * label_len);
        for sample in samples {
            if sample.features.len() != feature_len || sample.label.len() != label_len {
                return Err(Error::Data(format!(
                    "inconsistent sample dimensions: expected {}/{} features/labels, got {}/{}",
                    feature_len,
                    label_len,
                    sample.features.len(),
                    sample.label.len()
                )));
            }
            features.extend(sample.features.iter().copied());
            labels.extend(sample.label.iter().copied());
        }

        let inputs = Array2::from_shape_vec((samples.len(), feature_len), features)
            .map_err(|e| Error::Data(e.to_string()))?;
        let labels = Array2::from_shape_vec((samples.len(), label_len), labels)
            .map_err(|e| Error::Data(e.to_string()))?;
        Ok(Self::new(inputs, labels))
    }

    /// Number of samples in the batch.
    pub fn len(&self) -> usize {
        self.inputs.nrows()
    }

    /// Whether the batch holds no samples.
    pub fn is_empty(&self) -> bool {
        self.inputs.nrows() == 0
    }
}

/// A batch-iterable view over one dataset partition.
///
/// Batches are assembled once, up front; iteration yields them in order,
/// repeatedly (one pass per epoch). A trailing partial batch is kept.
#[derive(Clone, Debug, Default)]
pub struct BatchLoader {
    batches: Vec<Batch>,
}

impl BatchLoader {
    /// Create a loader from pre-assembled batches.
    pub fn new(batches: Vec<Batch>) -> Self {
        Self { batches }
    }

    /// Build a loader over a contiguous index range of a dataset.
    pub fn from_range(
        dataset: &dyn Dataset,
        range: std::ops::Range<usize>,
        batch_size: usize,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".into()));
        }
        let samples: Vec<Sample> = range.map(|i| dataset.get(i)).collect();
        let batches = samples
            .chunks(batch_size)
            .map(Batch::from_samples)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(batches))
    }

    /// Number of batches per pass.
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// Whether the loader yields no batches.
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Iterate over the batches of one pass.
    pub fn iter(&self) -> std::slice::Iter<'_, Batch> {
        self.batches.iter()
    }
}

impl<'a> IntoIterator for &'a BatchLoader {
    type Item = &'a Batch;
    type IntoIter = std::slice::Iter<'a, Batch>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
