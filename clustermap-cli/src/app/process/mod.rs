// Modules
mod demo;
mod linkage;
mod misc;
mod plot;

// Imports
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::ArgMatches;
use clustermap_core::{
    clustering::{Coloring, Method},
    heatmap::{ClusterParameters, ClusteredCorrelation},
    io::{CompressionMethod, CsvOptions},
    plot::{ColorScale, FigureParameters},
    utils::{greenify, simple_spinner},
};
use itertools::Itertools;

pub(in crate::app) use demo::process_demo as demo;
pub(in crate::app) use linkage::process_linkage as linkage;
pub(in crate::app) use misc::process_misc as misc;
pub(in crate::app) use plot::process_plot as plot;

use crate::app::config::Config;

fn remove_method(
    mat: &mut ArgMatches,
    config: &Config,
) -> anyhow::Result<Method> {
    Ok(mat.remove_one::<String>("method").map(|s| s.parse::<Method>()).transpose()?.unwrap_or(config.linkage_method))
}

fn remove_csv_options(mat: &mut ArgMatches) -> anyhow::Result<CsvOptions> {
    let delimiter = mat.remove_one::<char>("delimiter").unwrap_or(',');
    if !delimiter.is_ascii() {
        bail!("The delimiter must be a single ASCII character, got '{delimiter}'")
    }
    Ok(CsvOptions { delimiter: delimiter as u8, index_column: mat.get_flag("index-column") })
}

fn remove_cluster_parameters(
    mat: &mut ArgMatches,
    config: &Config,
) -> anyhow::Result<ClusterParameters> {
    let coloring = if mat.get_flag("gray-dendrogram") {
        Coloring::Uniform
    } else {
        Coloring::Threshold(mat.remove_one::<f64>("color-threshold"))
    };

    Ok(ClusterParameters {
        method: remove_method(mat, config)?,
        max_chars: mat.remove_one::<usize>("max-chars").unwrap_or(config.max_chars),
        parallel: config.multithreading_flag,
        coloring,
    })
}

fn remove_figure_parameters(
    mat: &mut ArgMatches,
    config: &Config,
) -> anyhow::Result<FigureParameters> {
    let (width_in, height_in) = match mat.remove_many::<f64>("figsize").map(|vals| vals.collect_vec()) {
        Some(vals) => match vals.as_slice() {
            &[width, height] if [width, height].iter().all(|v| v.is_finite() && *v > 0.0) => (width, height),
            _ => bail!("Expected two positive values for the figure size, got {vals:?}"),
        },
        None => (config.figure_width_in, config.figure_height_in),
    };
    let label_size_pt = mat.remove_one::<f64>("label-size").unwrap_or(config.label_size_pt);
    if label_size_pt <= 0.0 {
        bail!("Expected a positive label size, got {label_size_pt}")
    }

    Ok(FigureParameters {
        width_in,
        height_in,
        dpi: mat.remove_one::<u32>("dpi").unwrap_or(config.dpi),
        label_size_pt,
        show_row_dendrogram: mat.get_flag("row-dendrogram"),
        color_scale: match mat.remove_one::<String>("color-scale").as_deref() {
            Some("fixed") => ColorScale::Fixed,
            _ => ColorScale::DataRange,
        },
        ..Default::default()
    })
}

/// Where to write the figure and the optional `.csv` exports
struct Outputs {
    figure: PathBuf,
    matrix: Option<PathBuf>,
    linkage: Option<PathBuf>,
}

impl Outputs {
    fn remove_from(mat: &mut ArgMatches) -> anyhow::Result<Self> {
        let figure: PathBuf = mat.remove_one("output").context("Missing output filepath")?;
        if figure.file_name().is_none() {
            bail!("Provided output filepath does not contain a valid filename, '{}'", figure.display())
        }
        Ok(Self { figure, matrix: mat.remove_one("export-matrix"), linkage: mat.remove_one("export-linkage") })
    }
}

fn compression_for(
    filepath: &Path,
    config: &Config,
) -> CompressionMethod {
    filepath
        .extension()
        .and_then(|s| s.to_str())
        .map(CompressionMethod::from)
        .unwrap_or_default()
        .with_level(config.export_compression_level)
}

fn render_and_export(
    cc: &ClusteredCorrelation,
    fig_params: &FigureParameters,
    outputs: &Outputs,
    config: &Config,
) -> anyhow::Result<()> {
    let spinner = simple_spinner(Some(format!("Rendering '{}'", outputs.figure.display())), Some(200), None);
    clustermap_core::plot::render_to_file(cc, fig_params, &outputs.figure)
        .with_context(|| format!("Failed to render the figure to '{}'", outputs.figure.display()))?;
    spinner.finish_with_message(format!("Saved '{}'", outputs.figure.display()));

    if let Some(filepath) = &outputs.matrix {
        clustermap_core::io::write_to_file(filepath, &compression_for(filepath, config), |buffer| {
            clustermap_core::io::write_matrix(buffer, &cc.row_labels, &cc.matrix)
        })
        .with_context(|| format!("Failed to export the matrix to '{}'", filepath.display()))?;
        eprintln!("{} exported the reordered matrix to '{}'", greenify("✔"), filepath.display());
    }

    if let Some(filepath) = &outputs.linkage {
        clustermap_core::io::write_to_file(filepath, &compression_for(filepath, config), |buffer| {
            clustermap_core::io::write_linkage(buffer, &cc.row_linkage)
        })
        .with_context(|| format!("Failed to export the linkage to '{}'", filepath.display()))?;
        eprintln!("{} exported the row linkage to '{}'", greenify("✔"), filepath.display());
    }

    Ok(())
}
