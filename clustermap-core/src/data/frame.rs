// Imports
use itertools::Itertools;
use ndarray::{Array2, ArrayView2};
use rand::Rng;
use thiserror::Error;

/// Tabular data, each row a sample and each column a feature
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    index: Vec<String>,
    values: Array2<f64>,
}

impl Frame {
    pub const MIN_NB_SAMPLES: usize = 2;

    pub fn new(
        columns: Vec<String>,
        index: Option<Vec<String>>,
        values: Array2<f64>,
    ) -> Result<Self, Error> {
        let (nb_samples, nb_features) = values.dim();
        if nb_features == 0 || columns.is_empty() {
            return Err(Error::NoFeatures);
        }
        if columns.len() != nb_features {
            return Err(Error::ColumnMismatch(columns.len(), nb_features));
        }
        if nb_samples < Self::MIN_NB_SAMPLES {
            return Err(Error::TooFewSamples(nb_samples));
        }
        let index = match index {
            Some(index) if index.len() != nb_samples => {
                return Err(Error::IndexMismatch(index.len(), nb_samples));
            }
            Some(index) => index,
            None => (0..nb_samples).map(|i| format!("sample-{i}")).collect_vec(),
        };
        if let Some(((row, col), _)) = values.indexed_iter().find(|(_, val)| !val.is_finite()) {
            return Err(Error::NonFinite { row, column: columns[col].clone() });
        }

        Ok(Self { columns, index, values })
    }

    /// Uniformly distributed values in `[0, 1)`, named `feature-{i}` and `sample-{i}`
    pub fn random_uniform<R: Rng>(
        nb_samples: usize,
        nb_features: usize,
        rng: &mut R,
    ) -> Result<Self, Error> {
        let values = Array2::from_shape_simple_fn((nb_samples, nb_features), || rng.random::<f64>());
        let columns = (0..nb_features).map(|i| format!("feature-{i}")).collect_vec();
        Self::new(columns, None, values)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn nb_samples(&self) -> usize {
        self.values.nrows()
    }

    pub fn nb_features(&self) -> usize {
        self.values.ncols()
    }

    pub fn truncated_columns(
        &self,
        max_chars: usize,
    ) -> Vec<String> {
        self.columns.iter().map(|name| truncate_label(name, max_chars)).collect_vec()
    }
}

/// Cuts `name` down to `max_chars` characters followed by `...`, names that already fit are returned as-is
pub fn truncate_label(
    name: &str,
    max_chars: usize,
) -> String {
    match name.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => [&name[..byte_idx], "..."].concat(),
        None => name.to_string(),
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Expected at least one feature column")]
    NoFeatures,
    #[error("Got {0} column names for {1} feature columns")]
    ColumnMismatch(usize, usize),
    #[error("Got {0} sample names for {1} samples")]
    IndexMismatch(usize, usize),
    #[error("Expected at least {min} samples, got {0}", min = Frame::MIN_NB_SAMPLES)]
    TooFewSamples(usize),
    #[error("Non-finite value in sample {row} of feature '{column}'")]
    NonFinite { row: usize, column: String },
}

#[cfg(test)]
mod test {
    use ndarray::array;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn truncate_label_test() {
        assert_eq!(truncate_label("feature-1", 60), "feature-1");
        assert_eq!(truncate_label("feature-1", 9), "feature-1");
        assert_eq!(truncate_label("feature-10", 9), "feature-1...");
        assert_eq!(truncate_label("température", 4), "temp...");
        assert_eq!(truncate_label("ééééé", 2), "éé...");
        assert_eq!(truncate_label("abc", 0), "...");
    }

    #[test]
    fn frame_validation_test() {
        let columns = vec!["a".to_string(), "b".to_string()];

        let frame = Frame::new(columns.clone(), None, array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert_eq!(frame.index(), ["sample-0", "sample-1"]);
        assert_eq!((frame.nb_samples(), frame.nb_features()), (2, 2));

        assert!(matches!(
            Frame::new(columns.clone(), None, array![[1.0, 2.0]]),
            Err(Error::TooFewSamples(1))
        ));
        assert!(matches!(
            Frame::new(vec!["a".to_string()], None, array![[1.0, 2.0], [3.0, 4.0]]),
            Err(Error::ColumnMismatch(1, 2))
        ));
        assert!(matches!(
            Frame::new(columns.clone(), Some(vec!["x".to_string()]), array![[1.0, 2.0], [3.0, 4.0]]),
            Err(Error::IndexMismatch(1, 2))
        ));
        match Frame::new(columns, None, array![[1.0, 2.0], [3.0, f64::NAN]]) {
            Err(Error::NonFinite { row, column }) => assert_eq!((row, column.as_str()), (1, "b")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn random_uniform_test() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let frame = Frame::random_uniform(100, 10, &mut rng).unwrap();
        assert_eq!((frame.nb_samples(), frame.nb_features()), (100, 10));
        assert_eq!(frame.columns()[9], "feature-9");
        assert_eq!(frame.index()[99], "sample-99");
        assert!(frame.values().iter().all(|val| (0.0..1.0).contains(val)));
    }
}
