/// Rectangle in normalized figure coordinates, origin at the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

/// Rectangle in pixels, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    pub const fn new(
        left: f64,
        bottom: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self { left, bottom, width, height }
    }

    pub fn to_pixels(
        &self,
        fig_width: u32,
        fig_height: u32,
    ) -> PixelRect {
        let (w, h) = (fig_width as f64, fig_height as f64);
        PixelRect {
            x0: (self.left * w).round() as i32,
            y0: ((1.0 - self.bottom - self.height) * h).round() as i32,
            x1: ((self.left + self.width) * w).round() as i32,
            y1: ((1.0 - self.bottom) * h).round() as i32,
        }
    }
}

impl PixelRect {
    pub fn width(&self) -> f64 {
        (self.x1 - self.x0) as f64
    }

    pub fn height(&self) -> f64 {
        (self.y1 - self.y0) as f64
    }

    /// Largest rectangle of aspect `width / height` that fits, centred
    pub fn fit_aspect(
        &self,
        aspect: f64,
    ) -> Self {
        let (w, h) = (self.width(), self.height());
        if w / h > aspect {
            let inner_w = h * aspect;
            let x0 = self.x0 as f64 + (w - inner_w) / 2.0;
            Self { x0: x0.round() as i32, y0: self.y0, x1: (x0 + inner_w).round() as i32, y1: self.y1 }
        } else {
            let inner_h = w / aspect;
            let y0 = self.y0 as f64 + (h - inner_h) / 2.0;
            Self { x0: self.x0, y0: y0.round() as i32, x1: self.x1, y1: (y0 + inner_h).round() as i32 }
        }
    }
}

/// Placement of the four panels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub row_dendrogram: Rect,
    pub column_dendrogram: Rect,
    pub heatmap: Rect,
    pub colorbar: Rect,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            row_dendrogram: Rect::new(0.01, 0.1, 0.09, 0.59),
            column_dendrogram: Rect::new(0.1, 0.705, 0.6, 0.05),
            heatmap: Rect::new(0.1, 0.1, 0.6, 0.6),
            colorbar: Rect::new(0.70, 0.1, 0.1, 0.6),
        }
    }
}
