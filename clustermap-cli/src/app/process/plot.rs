use clustermap_core::io::read_frame_from_file;

use super::*;

pub fn process_plot(
    mut mat: ArgMatches,
    config: &Config,
) -> anyhow::Result<()> {
    let input: PathBuf = mat.remove_one("input").context("Missing input filepath")?;
    if !input.is_file() {
        bail!("Invalid filepath: '{}'", input.display())
    }

    let csv_options = remove_csv_options(&mut mat)?;
    let cluster_params = remove_cluster_parameters(&mut mat, config)?;
    let fig_params = remove_figure_parameters(&mut mat, config)?;
    let outputs = Outputs::remove_from(&mut mat)?;

    let spinner = simple_spinner(Some(format!("Loading '{}'", input.display())), Some(200), None);
    let frame = read_frame_from_file(&input, &csv_options)
        .with_context(|| format!("Failed to read '{}'", input.display()))?;
    spinner.finish();
    tracing::info!(samples = frame.nb_samples(), features = frame.nb_features(), "loaded input");

    let cc = ClusteredCorrelation::compute(&frame, &cluster_params)?;
    render_and_export(&cc, &fig_params, &outputs, config)
}
