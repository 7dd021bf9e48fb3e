// Imports
use itertools::Itertools;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use thiserror::Error;

/// Pearson correlation coefficients between the columns of `values` (one row per sample), the output is
/// symmetric with a unit diagonal and every coefficient clipped to `[-1, 1]`
pub fn pearson_matrix(
    values: ArrayView2<f64>,
    parallel: bool,
) -> Result<Array2<f64>, Error> {
    let (nb_samples, nb_features) = values.dim();
    if nb_samples < 2 {
        return Err(Error::TooFewSamples(nb_samples));
    }

    let means: Array1<f64> = values.mean_axis(Axis(0)).ok_or(Error::TooFewSamples(nb_samples))?;
    let centered: Array2<f64> = &values - &means;
    let norms: Array1<f64> = centered.map_axis(Axis(0), |col| col.dot(&col).sqrt());

    if let Some((column, _)) = norms.iter().find_position(|&&norm| norm == 0.0) {
        return Err(Error::ZeroVariance { column });
    }

    let coefficient = |(i, j): (usize, usize)| -> f64 {
        let num = centered.column(i).dot(&centered.column(j));
        (num / (norms[i] * norms[j])).clamp(-1.0, 1.0)
    };

    let pairs = (0..nb_features).tuple_combinations::<(usize, usize)>().collect_vec();
    let coefficients: Vec<f64> = if parallel {
        pairs.clone().into_par_iter().map(coefficient).collect()
    } else {
        pairs.iter().copied().map(coefficient).collect()
    };

    let mut output = Array2::<f64>::eye(nb_features);
    for ((i, j), coef) in pairs.into_iter().zip_eq(coefficients) {
        output[[i, j]] = coef;
        output[[j, i]] = coef;
    }

    Ok(output)
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Expected at least two samples to compute correlations, got {0}")]
    TooFewSamples(usize),
    #[error("Feature {column} has zero variance, its correlation coefficients are undefined")]
    ZeroVariance { column: usize },
}

#[cfg(test)]
mod test {
    use ndarray::array;

    use super::*;
    use crate::assert_float_eq;

    #[test]
    fn pearson_matrix_test() {
        let values = array![[1.0, 2.0, 3.0], [2.0, 4.0, 1.0], [3.0, 6.0, 2.0], [4.0, 8.0, 0.0]];

        let corr = pearson_matrix(values.view(), false).unwrap();

        assert_eq!(corr.dim(), (3, 3));
        for i in 0..3 {
            assert_float_eq!(corr[[i, i]], 1.0);
        }
        // column 1 is an exact multiple of column 0
        assert_float_eq!(corr[[0, 1]], 1.0);
        // x = [1, 2, 3, 4], z = [3, 1, 2, 0] -> cov = -4 / 3, var(x) = var(z) = 5 / 3
        assert_float_eq!(corr[[0, 2]], -0.8);
        assert_float_eq!(corr[[2, 1]], -0.8);
        assert_eq!(corr, corr.t());
    }

    #[test]
    fn pearson_matrix_parallel_matches_sequential_test() {
        let values = array![
            [0.1, 0.7, 0.3, 0.9],
            [0.5, 0.2, 0.8, 0.4],
            [0.9, 0.6, 0.1, 0.3],
            [0.2, 0.9, 0.5, 0.7],
            [0.4, 0.1, 0.6, 0.2],
        ];
        assert_eq!(pearson_matrix(values.view(), true).unwrap(), pearson_matrix(values.view(), false).unwrap());
    }

    #[test]
    fn pearson_matrix_zero_variance_test() {
        let values = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0]];
        assert!(matches!(pearson_matrix(values.view(), false), Err(Error::ZeroVariance { column: 1 })));
    }
}
