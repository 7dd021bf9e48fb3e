// Imports
use itertools::Itertools;
use ndarray::{Array2, Axis};
use thiserror::Error;

use crate::{
    clustering::{Coloring, Dendrogram, Linkage, Method, linkage},
    correlation::pearson_matrix,
    data::Frame,
};

#[derive(Debug, Clone, Copy)]
pub struct ClusterParameters {
    pub method: Method,
    /// Maximum number of characters kept for each feature name
    pub max_chars: usize,
    pub parallel: bool,
    pub coloring: Coloring,
}

impl Default for ClusterParameters {
    fn default() -> Self {
        Self { method: Method::Ward, max_chars: 60, parallel: true, coloring: Coloring::default() }
    }
}

/// Correlation matrix of a frame's features, reordered along both axes by hierarchical clustering
#[derive(Debug, Clone)]
pub struct ClusteredCorrelation {
    pub matrix: Array2<f64>,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub row_linkage: Linkage,
    pub column_linkage: Linkage,
    pub row_dendrogram: Dendrogram,
    pub column_dendrogram: Dendrogram,
}

impl ClusteredCorrelation {
    pub fn compute(
        frame: &Frame,
        params: &ClusterParameters,
    ) -> Result<Self, Error> {
        let corr = pearson_matrix(frame.values(), params.parallel)?;
        tracing::debug!(nb_features = corr.nrows(), "computed correlation matrix");

        let row_linkage = linkage(corr.view(), params.method)?;
        let column_linkage = linkage(corr.t(), params.method)?;

        let row_dendrogram = Dendrogram::from_linkage(&row_linkage, params.coloring);
        let column_dendrogram = Dendrogram::from_linkage(&column_linkage, params.coloring);

        let matrix = permute(&corr, row_dendrogram.leaves(), column_dendrogram.leaves());

        let labels = frame.truncated_columns(params.max_chars);
        let row_labels = row_dendrogram.leaves().iter().map(|&idx| labels[idx].clone()).collect_vec();
        let column_labels = column_dendrogram.leaves().iter().map(|&idx| labels[idx].clone()).collect_vec();
        if row_labels != column_labels {
            tracing::warn!("row and column leaf orders differ, the reordered matrix is not symmetric");
        }

        Ok(Self { matrix, row_labels, column_labels, row_linkage, column_linkage, row_dendrogram, column_dendrogram })
    }

    pub fn nb_features(&self) -> usize {
        self.matrix.nrows()
    }
}

/// Reorders the rows of `matrix` by `rows`, then its columns by `cols`
pub fn permute(
    matrix: &Array2<f64>,
    rows: &[usize],
    cols: &[usize],
) -> Array2<f64> {
    matrix.select(Axis(0), rows).select(Axis(1), cols)
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Correlation(#[from] crate::correlation::Error),
    #[error(transparent)]
    Clustering(#[from] crate::clustering::Error),
    #[error(transparent)]
    Data(#[from] crate::data::Error),
    #[error(transparent)]
    IO(#[from] crate::io::Error),
    #[error(transparent)]
    Plot(#[from] crate::plot::Error),
}

#[cfg(test)]
mod test {
    use ndarray::array;

    use super::*;
    use crate::assert_float_eq;

    fn frame() -> Frame {
        // `a` and `c` move together, `b` and `d` move together, both groups are anti-correlated
        let values = array![
            [1.0, 9.0, 1.1, 8.7],
            [2.0, 7.5, 2.3, 7.9],
            [3.0, 6.0, 2.8, 5.5],
            [4.0, 4.0, 4.2, 4.4],
            [5.0, 2.5, 5.1, 2.0],
        ];
        let columns = ["a", "b", "c", "d"].map(str::to_string).to_vec();
        Frame::new(columns, None, values).unwrap()
    }

    #[test]
    fn permute_test() {
        let matrix = array![[1.0, 0.2, 0.3], [0.2, 1.0, 0.6], [0.3, 0.6, 1.0]];
        let order = [2, 0, 1];

        let output = permute(&matrix, &order, &order);

        assert_eq!(output, array![[1.0, 0.3, 0.6], [0.3, 1.0, 0.2], [0.6, 0.2, 1.0]]);
        assert_eq!(output, output.t());
    }

    #[test]
    fn clustered_correlation_test() {
        let cc = ClusteredCorrelation::compute(&frame(), &ClusterParameters::default()).unwrap();

        assert_eq!(cc.nb_features(), 4);
        assert_eq!(cc.row_labels, cc.column_labels);
        assert_eq!(cc.row_dendrogram.leaves(), cc.column_dendrogram.leaves());
        assert_eq!(cc.matrix, cc.matrix.t());
        for i in 0..4 {
            assert_float_eq!(cc.matrix[[i, i]], 1.0);
        }

        // the two groups end up adjacent in the leaf order
        let groups = cc.row_labels.iter().map(|label| matches!(label.as_str(), "a" | "c")).collect_vec();
        assert!(groups == [true, true, false, false] || groups == [false, false, true, true]);
        assert!(cc.matrix[[0, 1]] > 0.9);
        assert!(cc.matrix[[0, 3]] < -0.9);
    }

    #[test]
    fn clustered_correlation_truncates_labels_test() {
        let columns = ["alpha", "beta", "gamma"].map(str::to_string).to_vec();
        let values = array![[1.0, 2.0, 0.5], [2.0, 1.0, 0.1], [3.0, 3.0, 0.9]];
        let frame = Frame::new(columns, None, values).unwrap();
        let params = ClusterParameters { max_chars: 3, parallel: false, ..Default::default() };

        let cc = ClusteredCorrelation::compute(&frame, &params).unwrap();

        assert_eq!(cc.row_labels.iter().sorted().collect_vec(), ["alp...", "bet...", "gam..."]);
    }
}
