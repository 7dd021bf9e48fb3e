// Modules
pub mod clustering;
pub mod correlation;
pub mod data;
pub mod heatmap;
pub mod io;
pub mod plot;
pub mod prelude;
pub mod utils;

#[cfg(test)]
#[macro_export]
macro_rules! assert_float_eq {
    ($lhs: expr, $rhs: expr) => {
        let (a, b): (f64, f64) = ($lhs, $rhs);
        assert!((a - b).abs() < 1E-9, "{a} != {b}")
    };
}
