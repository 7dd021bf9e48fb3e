// Modules
pub mod colormap;
mod layout;

// Re-exports
pub use colormap::ColorScale;
pub use layout::{Layout, PixelRect, Rect};

// Imports
use std::path::Path;

use itertools::Itertools;
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use thiserror::Error;

use crate::{clustering::Dendrogram, heatmap::ClusteredCorrelation};

/// Extent of the colorbar gradient, 0.06 wide for a `[-1, 1]` range
const COLORBAR_ASPECT: f64 = 0.06 / 2.0;
const COLORBAR_NB_STEPS: usize = 200;
const COLORBAR_TICK_STEP: f64 = 0.25;
/// Headroom above the highest merge
const DENDROGRAM_MARGIN: f64 = 1.05;
const TICK_LENGTH_PT: f64 = 3.5;
const TICK_PAD_PT: f64 = 3.5;
/// Rough advance of a sans-serif glyph, relative to the font size
const GLYPH_WIDTH_FACTOR: f64 = 0.6;
const FONT_FAMILY: &str = "sans-serif";

#[derive(Debug, Clone, Copy)]
pub struct FigureParameters {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
    pub label_size_pt: f64,
    pub show_row_dendrogram: bool,
    pub color_scale: ColorScale,
    pub layout: Layout,
}

impl Default for FigureParameters {
    fn default() -> Self {
        Self {
            width_in: 12.0,
            height_in: 12.0,
            dpi: 100,
            label_size_pt: 10.0,
            show_row_dendrogram: false,
            color_scale: ColorScale::default(),
            layout: Layout::default(),
        }
    }
}

impl FigureParameters {
    pub fn size_px(&self) -> (u32, u32) {
        let dpi = self.dpi as f64;
        ((self.width_in * dpi).round().max(1.0) as u32, (self.height_in * dpi).round().max(1.0) as u32)
    }

    /// Converts points to pixels
    pub fn pt_to_px(
        &self,
        pt: f64,
    ) -> f64 {
        pt * self.dpi as f64 / 72.0
    }
}

pub fn render_to_file<Q: AsRef<Path>>(
    cc: &ClusteredCorrelation,
    params: &FigureParameters,
    filepath: Q,
) -> Result<(), Error> {
    let filepath = filepath.as_ref();
    let size = params.size_px();
    let is_svg = filepath.extension().and_then(|s| s.to_str()).is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    if is_svg {
        let root = SVGBackend::new(filepath, size).into_drawing_area();
        render(cc, params, &root)?;
        root.present().map_err(|e| Error::Drawing(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(filepath, size).into_drawing_area();
        render(cc, params, &root)?;
        root.present().map_err(|e| Error::Drawing(e.to_string()))?;
    }
    tracing::debug!(path = %filepath.display(), width = size.0, height = size.1, "saved figure");
    Ok(())
}

pub fn render_to_svg_string(
    cc: &ClusteredCorrelation,
    params: &FigureParameters,
) -> Result<String, Error> {
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, params.size_px()).into_drawing_area();
        render(cc, params, &root)?;
        root.present().map_err(|e| Error::Drawing(e.to_string()))?;
    }
    Ok(buffer)
}

/// Draws the column dendrogram, the optional row dendrogram, the heatmap and the colorbar onto `root`
pub fn render<DB: DrawingBackend>(
    cc: &ClusteredCorrelation,
    params: &FigureParameters,
    root: &DrawingArea<DB, Shift>,
) -> Result<(), Error> {
    draw_figure(cc, params, root).map_err(|e| Error::Drawing(e.to_string()))
}

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

fn draw_figure<DB: DrawingBackend>(
    cc: &ClusteredCorrelation,
    params: &FigureParameters,
    root: &DrawingArea<DB, Shift>,
) -> DrawResult<DB> {
    let (width, height) = params.size_px();
    let layout = &params.layout;
    let font_px = params.pt_to_px(params.label_size_pt);

    root.fill(&WHITE)?;

    let heatmap_px = layout.heatmap.to_pixels(width, height);
    draw_heatmap(root, cc, heatmap_px, params)?;

    draw_column_dendrogram(root, &cc.column_dendrogram, layout.column_dendrogram.to_pixels(width, height))?;

    if params.show_row_dendrogram {
        // keep the tick labels clear of the dendrogram
        let longest = cc.row_labels.iter().map(|label| label.chars().count()).max().unwrap_or_default();
        let label_strip = longest as f64 * GLYPH_WIDTH_FACTOR * font_px
            + params.pt_to_px(TICK_LENGTH_PT + TICK_PAD_PT);
        let mut panel = layout.row_dendrogram.to_pixels(width, height);
        panel.x1 = (heatmap_px.x0 - label_strip.round() as i32).max(panel.x0 + 1).min(panel.x1);
        if panel.x1 > panel.x0 {
            draw_row_dendrogram(root, &cc.row_dendrogram, panel)?;
        } else {
            tracing::warn!("figure too narrow to draw the row dendrogram");
        }
    }

    draw_colorbar(root, layout.colorbar.to_pixels(width, height), params)?;

    Ok(())
}

/// Lower origin, row 0 at the bottom, one tick label per row on the left
fn draw_heatmap<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    cc: &ClusteredCorrelation,
    panel: PixelRect,
    params: &FigureParameters,
) -> DrawResult<DB> {
    let (nb_rows, nb_cols) = cc.matrix.dim();
    let cell_w = panel.width() / nb_cols as f64;
    let cell_h = panel.height() / nb_rows as f64;

    let scaled = params.color_scale.rescale(cc.matrix.view());
    let cells = scaled.indexed_iter().map(|((i, j), &value)| {
        let x0 = panel.x0 + (j as f64 * cell_w).round() as i32;
        let x1 = panel.x0 + ((j + 1) as f64 * cell_w).round() as i32;
        let y0 = panel.y1 - ((i + 1) as f64 * cell_h).round() as i32;
        let y1 = panel.y1 - (i as f64 * cell_h).round() as i32;
        Rectangle::new([(x0, y0), (x1, y1)], colormap::bwr(value).filled())
    });
    for cell in cells {
        root.draw(&cell)?;
    }
    root.draw(&Rectangle::new([(panel.x0, panel.y0), (panel.x1, panel.y1)], BLACK.stroke_width(1)))?;

    let tick_len = params.pt_to_px(TICK_LENGTH_PT).round() as i32;
    let tick_pad = params.pt_to_px(TICK_PAD_PT).round() as i32;
    let style = (FONT_FAMILY, params.pt_to_px(params.label_size_pt))
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));

    for (i, label) in cc.row_labels.iter().enumerate() {
        let y = panel.y1 - ((i as f64 + 0.5) * cell_h).round() as i32;
        root.draw(&PathElement::new(vec![(panel.x0 - tick_len, y), (panel.x0, y)], BLACK.stroke_width(1)))?;
        root.draw(&Text::new(label.as_str(), (panel.x0 - tick_len - tick_pad, y), style.clone()))?;
    }
    Ok(())
}

fn dendrogram_height_range(dendrogram: &Dendrogram) -> f64 {
    match dendrogram.max_height() * DENDROGRAM_MARGIN {
        range if range > 0.0 => range,
        _ => 1.0,
    }
}

/// Root on top, leaves along the bottom edge
fn draw_column_dendrogram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    dendrogram: &Dendrogram,
    panel: PixelRect,
) -> DrawResult<DB> {
    let span = dendrogram.span();
    let range = dendrogram_height_range(dendrogram);
    let to_px = |(pos, h): (f64, f64)| -> (i32, i32) {
        (
            panel.x0 + (pos / span * panel.width()).round() as i32,
            panel.y1 - (h / range * panel.height()).round() as i32,
        )
    };
    draw_links(root, dendrogram, to_px)
}

/// Root on the left, leaves along the right edge, leaf 0 at the bottom
fn draw_row_dendrogram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    dendrogram: &Dendrogram,
    panel: PixelRect,
) -> DrawResult<DB> {
    let span = dendrogram.span();
    let range = dendrogram_height_range(dendrogram);
    let to_px = |(pos, h): (f64, f64)| -> (i32, i32) {
        (
            panel.x1 - (h / range * panel.width()).round() as i32,
            panel.y1 - (pos / span * panel.height()).round() as i32,
        )
    };
    draw_links(root, dendrogram, to_px)
}

fn draw_links<DB, F>(
    root: &DrawingArea<DB, Shift>,
    dendrogram: &Dendrogram,
    to_px: F,
) -> DrawResult<DB>
where
    DB: DrawingBackend,
    F: Fn((f64, f64)) -> (i32, i32),
{
    for link in dendrogram.links() {
        let points = link.points.iter().copied().map(&to_px).collect_vec();
        root.draw(&PathElement::new(points, colormap::link_color(link.color).stroke_width(1)))?;
    }
    Ok(())
}

/// Vertical gradient from +1 (top) to -1 (bottom), ticks on the right
fn draw_colorbar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    panel: PixelRect,
    params: &FigureParameters,
) -> DrawResult<DB> {
    let bar = panel.fit_aspect(COLORBAR_ASPECT);
    let step_h = bar.height() / COLORBAR_NB_STEPS as f64;

    for k in 0..COLORBAR_NB_STEPS {
        let value = 1.0 - 0.01 * k as f64;
        let y0 = bar.y0 + (k as f64 * step_h).round() as i32;
        let y1 = bar.y0 + ((k + 1) as f64 * step_h).round() as i32;
        root.draw(&Rectangle::new([(bar.x0, y0), (bar.x1, y1)], colormap::bwr(value).filled()))?;
    }
    root.draw(&Rectangle::new([(bar.x0, bar.y0), (bar.x1, bar.y1)], BLACK.stroke_width(1)))?;

    let tick_len = params.pt_to_px(TICK_LENGTH_PT).round() as i32;
    let tick_pad = params.pt_to_px(TICK_PAD_PT).round() as i32;
    let style = (FONT_FAMILY, params.pt_to_px(params.label_size_pt))
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));

    let nb_ticks = (2.0 / COLORBAR_TICK_STEP).round() as usize + 1;
    for tick in 0..nb_ticks {
        let value = -1.0 + tick as f64 * COLORBAR_TICK_STEP;
        let y = bar.y1 - ((value + 1.0) / 2.0 * bar.height()).round() as i32;
        root.draw(&PathElement::new(vec![(bar.x1, y), (bar.x1 + tick_len, y)], BLACK.stroke_width(1)))?;
        root.draw(&Text::new(format!("{value:.2}"), (bar.x1 + tick_len + tick_pad, y), style.clone()))?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to draw the figure, {0}")]
    Drawing(String),
}
