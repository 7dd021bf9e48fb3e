// Imports
use ndarray::{Array2, ArrayView2};
use plotters::style::RGBColor;

use crate::clustering::LinkColor;

/// Diverging blue-white-red map over `[-1, 1]`, values outside are clamped
pub fn bwr(value: f64) -> RGBColor {
    let t = ((value + 1.0) / 2.0).clamp(0.0, 1.0);
    let (r, g, b) = if t < 0.5 { (2.0 * t, 2.0 * t, 1.0) } else { (1.0, 2.0 * (1.0 - t), 2.0 * (1.0 - t)) };
    RGBColor(to_u8(r), to_u8(g), to_u8(b))
}

/// How heatmap coefficients are spread over the colormap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorScale {
    /// The smallest coefficient is painted full blue and the largest full red
    #[default]
    DataRange,
    /// Coefficients keep their place on `[-1, 1]`
    Fixed,
}

impl ColorScale {
    /// Maps every value onto `[-1, 1]`, ready for [`bwr`]
    pub fn rescale(
        self,
        matrix: ArrayView2<f64>,
    ) -> Array2<f64> {
        match self {
            Self::Fixed => matrix.to_owned(),
            Self::DataRange => {
                let (low, high) = matrix
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), &v| (low.min(v), high.max(v)));
                if high - low > 0.0 {
                    matrix.mapv(|v| 2.0 * (v - low) / (high - low) - 1.0)
                } else {
                    matrix.to_owned()
                }
            }
        }
    }
}

#[inline]
fn to_u8(channel: f64) -> u8 {
    (channel * 255.0).round() as u8
}

/// Ten-colour categorical cycle, index 0 marks links above the colour threshold
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

pub const GRAY: RGBColor = RGBColor(0x80, 0x80, 0x80);

pub fn link_color(color: LinkColor) -> RGBColor {
    match color {
        LinkColor::AboveThreshold => PALETTE[0],
        LinkColor::Cluster(idx) => PALETTE[idx % PALETTE.len()],
        LinkColor::Uniform => GRAY,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bwr_test() {
        assert_eq!(bwr(-1.0), RGBColor(0, 0, 255));
        assert_eq!(bwr(0.0), RGBColor(255, 255, 255));
        assert_eq!(bwr(1.0), RGBColor(255, 0, 0));
        assert_eq!(bwr(-0.5), RGBColor(128, 128, 255));
        assert_eq!(bwr(0.5), RGBColor(255, 128, 128));
        assert_eq!(bwr(-3.0), bwr(-1.0));
        assert_eq!(bwr(7.0), bwr(1.0));
    }

    #[test]
    fn data_range_scale_test() {
        let matrix = ndarray::array![[1.0, -0.231], [-0.231, 1.0]];

        let scaled = ColorScale::DataRange.rescale(matrix.view());
        assert_eq!(bwr(scaled[[0, 1]]), RGBColor(0, 0, 255));
        assert_eq!(bwr(scaled[[0, 0]]), RGBColor(255, 0, 0));

        let fixed = ColorScale::Fixed.rescale(matrix.view());
        assert_eq!(bwr(fixed[[0, 1]]), bwr(-0.231));
        assert_ne!(bwr(fixed[[0, 1]]), RGBColor(0, 0, 255));
    }

    #[test]
    fn data_range_scale_constant_matrix_test() {
        let matrix = ndarray::array![[1.0]];
        assert_eq!(ColorScale::DataRange.rescale(matrix.view()), matrix);
    }

    #[test]
    fn link_color_test() {
        assert_eq!(link_color(LinkColor::AboveThreshold), PALETTE[0]);
        assert_eq!(link_color(LinkColor::Cluster(1)), PALETTE[1]);
        assert_eq!(link_color(LinkColor::Cluster(9)), PALETTE[9]);
        assert_eq!(link_color(LinkColor::Uniform), GRAY);
    }
}
