use clustermap_core::data::Frame;
use rand::SeedableRng;

use super::*;

pub fn process_demo(
    mut mat: ArgMatches,
    config: &Config,
) -> anyhow::Result<()> {
    let nb_samples: usize = mat.remove_one("samples").unwrap_or(100);
    let nb_features: usize = mat.remove_one("features").unwrap_or(10);

    let mut rng = match mat.remove_one::<u64>("seed") {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::try_from_os_rng()?,
    };

    let cluster_params = remove_cluster_parameters(&mut mat, config)?;
    let fig_params = remove_figure_parameters(&mut mat, config)?;
    let outputs = Outputs::remove_from(&mut mat)?;

    let frame = Frame::random_uniform(nb_samples, nb_features, &mut rng)?;
    let cc = ClusteredCorrelation::compute(&frame, &cluster_params)?;
    render_and_export(&cc, &fig_params, &outputs, config)
}
