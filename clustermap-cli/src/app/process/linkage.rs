use clustermap_core::{
    clustering::{Dendrogram, Linkage},
    io::read_frame_from_file,
    utils::colorizer_from_coefficient,
};
use console::style;
use indoc::printdoc;

use super::*;

pub fn process_linkage(
    mut mat: ArgMatches,
    config: &Config,
) -> anyhow::Result<()> {
    let input: PathBuf = mat.remove_one("input").context("Missing input filepath")?;
    if !input.is_file() {
        bail!("Invalid filepath: '{}'", input.display())
    }
    let csv_options = remove_csv_options(&mut mat)?;
    let params = ClusterParameters {
        method: remove_method(&mut mat, config)?,
        max_chars: config.max_chars,
        parallel: config.multithreading_flag,
        coloring: Coloring::default(),
    };
    let axis = mat.remove_one::<String>("axis").unwrap_or_else(|| "rows".to_string());
    let print_matrix = mat.get_flag("matrix");

    let frame = read_frame_from_file(&input, &csv_options)
        .with_context(|| format!("Failed to read '{}'", input.display()))?;
    let cc = ClusteredCorrelation::compute(&frame, &params)?;

    let (linkage, dendrogram, labels) = match axis.as_str() {
        "columns" => (&cc.column_linkage, &cc.column_dendrogram, &cc.column_labels),
        _ => (&cc.row_linkage, &cc.row_dendrogram, &cc.row_labels),
    };

    printdoc! {"
        {title}
        {nb_features} features, {nb_samples} samples, {method} linkage on the {axis}

        ",
        title = style(format!("-- {} --", input.display())).bold(),
        nb_features = frame.nb_features(),
        nb_samples = frame.nb_samples(),
        method = params.method,
    };
    print_leaf_order(dendrogram, labels);
    print_merges(linkage, frame.columns());
    if print_matrix {
        print_correlation_matrix(&cc);
    }
    Ok(())
}

fn print_leaf_order(
    dendrogram: &Dendrogram,
    labels: &[String],
) {
    println!("{}", style("Leaf order").bold().underlined());
    for (position, (leaf, label)) in dendrogram.leaves().iter().zip_eq(labels).enumerate() {
        println!("{:>4} {} {}", position, style(format!("({leaf})")).dim(), label);
    }
    println!();
}

fn print_merges(
    linkage: &Linkage,
    names: &[String],
) {
    let nb_leaves = linkage.nb_leaves();
    let describe = |id: usize| -> String {
        match names.get(id) {
            Some(name) if id < nb_leaves => name.clone(),
            _ => format!("#{}", id - nb_leaves),
        }
    };

    println!("{}", style("Merges").bold().underlined());
    for (idx, merge) in linkage.merges().iter().enumerate() {
        println!(
            "{:>4} {} + {} {} {}",
            format!("#{idx}"),
            describe(merge.left),
            describe(merge.right),
            style(format!("at {:.4}", *merge.height)).cyan(),
            style(format!("({} leaves)", merge.size)).dim(),
        );
    }
    println!();
}

fn print_correlation_matrix(cc: &ClusteredCorrelation) {
    println!("{}", style("Reordered correlation matrix").bold().underlined());
    for (label, row) in cc.row_labels.iter().zip_eq(cc.matrix.rows()) {
        let cells = row
            .iter()
            .map(|&coef| colorizer_from_coefficient(coef)(style(format!("{coef:>6.2}"))).to_string())
            .join(" ");
        println!("{cells} {label}");
    }
}
