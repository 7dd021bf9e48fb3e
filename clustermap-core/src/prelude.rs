pub use crate::clustering::{Coloring, Dendrogram, Height, Linkage, Merge, Method, linkage};
pub use crate::correlation::pearson_matrix;
pub use crate::data::{Frame, truncate_label};
pub use crate::heatmap::{ClusterParameters, ClusteredCorrelation, Error, permute};
pub use crate::io::{CompressionMethod, CsvOptions, read_frame, read_frame_from_file, write_linkage, write_matrix};
pub use crate::plot::{ColorScale, FigureParameters, Layout, Rect, render, render_to_file, render_to_svg_string};
