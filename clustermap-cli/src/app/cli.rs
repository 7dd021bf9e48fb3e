// Imports
use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, builder::Styles, value_parser as vparser};

const LINKAGE_METHODS: [&str; 4] = ["single", "complete", "average", "ward"];

fn input_arg() -> Arg {
    Arg::new("input")
        .help("The `.csv` file to use as input, one row per sample and one column per feature")
        .long_help("The `.csv` file to use as input, one row per sample and one column per feature, `.gz` and `.zst` compressed files are also accepted")
        .required(true)
        .short('i')
        .long("input")
        .value_parser(vparser!(PathBuf))
        .action(ArgAction::Set)
}

fn method_arg() -> Arg {
    Arg::new("method")
        .help("The linkage method used to cluster both axes")
        .long_help("The linkage method used to cluster both axes, defaults to the config `linkage_method`")
        .required(false)
        .short('m')
        .long("method")
        .value_parser(LINKAGE_METHODS)
        .action(ArgAction::Set)
}

fn csv_args() -> [Arg; 2] {
    [
        Arg::new("delimiter")
            .help("The field delimiter of the input file")
            .required(false)
            .short('d')
            .long("delimiter")
            .value_parser(vparser!(char))
            .default_value(",")
            .action(ArgAction::Set),
        Arg::new("index-column")
            .help("Flag that marks the first column as sample names rather than a feature")
            .required(false)
            .long("index-column")
            .visible_alias("index")
            .action(ArgAction::SetTrue),
    ]
}

fn figure_args() -> [Arg; 10] {
    [
        Arg::new("output")
            .help("The figure to write, `.svg` files are written as vector graphics, anything else as `.png`")
            .required(true)
            .short('o')
            .long("output")
            .value_parser(vparser!(PathBuf))
            .action(ArgAction::Set),
        Arg::new("max-chars")
            .help("The maximum number of characters shown for each feature name")
            .long_help("The maximum number of characters shown for each feature name, longer names are cut and suffixed with `...`, defaults to the config `max_chars`")
            .required(false)
            .short('c')
            .long("max-chars")
            .value_parser(vparser!(usize))
            .action(ArgAction::Set),
        Arg::new("figsize")
            .help("The figure width and height, in inches")
            .required(false)
            .num_args(2)
            .value_names(["WIDTH", "HEIGHT"])
            .long("figsize")
            .value_parser(vparser!(f64))
            .action(ArgAction::Set),
        Arg::new("dpi")
            .help("The number of pixels per inch")
            .required(false)
            .long("dpi")
            .value_parser(vparser!(u32).range(1..))
            .action(ArgAction::Set),
        Arg::new("label-size")
            .help("The font size of the tick labels, in points")
            .required(false)
            .short('l')
            .long("label-size")
            .visible_alias("labelsize")
            .value_parser(vparser!(f64))
            .action(ArgAction::Set),
        Arg::new("color-scale")
            .help("How the coefficients are spread over the blue-white-red colormap")
            .long_help("How the coefficients are spread over the blue-white-red colormap, `data` paints the smallest coefficient full blue and the largest full red, `fixed` keeps them on [-1, 1]")
            .required(false)
            .long("color-scale")
            .value_parser(["data", "fixed"])
            .default_value("data")
            .action(ArgAction::Set),
        method_arg(),
        Arg::new("row-dendrogram")
            .help("Flag that decides if the row dendrogram is drawn next to the tick labels")
            .required(false)
            .long("row-dendrogram")
            .action(ArgAction::SetTrue),
        Arg::new("gray-dendrogram")
            .help("Flag that draws every dendrogram link in gray instead of colouring clusters")
            .required(false)
            .long("gray-dendrogram")
            .visible_alias("grey-dendrogram")
            .conflicts_with("color-threshold")
            .action(ArgAction::SetTrue),
        Arg::new("color-threshold")
            .help("The merge height below which subtrees are coloured as clusters")
            .long_help("The merge height below which subtrees are coloured as clusters, defaults to 70% of the highest merge")
            .required(false)
            .long("color-threshold")
            .value_parser(vparser!(f64))
            .action(ArgAction::Set),
    ]
}

fn export_args() -> [Arg; 2] {
    [
        Arg::new("export-matrix")
            .help("Write the reordered correlation matrix to a `.csv` file")
            .long_help("Write the reordered correlation matrix to a `.csv` file, compressed when the path ends in `.gz` or `.zst`")
            .required(false)
            .long("export-matrix")
            .value_parser(vparser!(PathBuf))
            .action(ArgAction::Set),
        Arg::new("export-linkage")
            .help("Write the row linkage merge table to a `.csv` file")
            .required(false)
            .long("export-linkage")
            .value_parser(vparser!(PathBuf))
            .action(ArgAction::Set),
    ]
}

#[rustfmt::skip]
pub fn build_cli() -> Command {
    let plot_subcommand = Command::new("plot")
        .about("Render the clustered correlation heatmap of a `.csv` file")
        .arg(input_arg())
        .args(csv_args())
        .args(figure_args())
        .args(export_args());

    let demo_subcommand = Command::new("demo")
        .about("Render the clustered correlation heatmap of uniformly random data")
        .arg(
            Arg::new("samples")
                .help("The number of random samples (rows)")
                .required(false)
                .short('n')
                .long("samples")
                .value_parser(vparser!(usize))
                .default_value("100")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("features")
                .help("The number of random features (columns)")
                .required(false)
                .short('f')
                .long("features")
                .value_parser(vparser!(usize))
                .default_value("10")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("seed")
                .help("The seed of the random number generator, seeded from the OS if unset")
                .required(false)
                .short('s')
                .long("seed")
                .value_parser(vparser!(u64))
                .action(ArgAction::Set),
        )
        .args(figure_args())
        .args(export_args());

    let linkage_subcommand = Command::new("linkage")
        .about("Print the leaf order and merge table of the clustered features")
        .arg(input_arg())
        .args(csv_args())
        .arg(method_arg())
        .arg(
            Arg::new("axis")
                .help("The axis of the correlation matrix to report")
                .required(false)
                .short('a')
                .long("axis")
                .value_parser(["rows", "columns"])
                .default_value("rows")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("matrix")
                .help("Flag that also prints the reordered correlation matrix")
                .required(false)
                .long("matrix")
                .action(ArgAction::SetTrue),
        );

    let misc_generate_shell_completions_subcommand = Command::new("generate-shell-completions")
        .about("Generate completions for your desired shell")
        .long_about("This subcommand is used to generate shell completions for the selected shell, outputs to stdout")
        .arg(
            Arg::new("shell")
                .index(1)
                .required(true)
                .help("The shell to target")
                .action(ArgAction::Set)
                .value_parser(vparser!(clap_complete::Shell)),
        );

    let misc_subcommand = Command::new("misc")
        .subcommands([
            misc_generate_shell_completions_subcommand,
        ]);

    Command::new("clustermap")
        .color(clap::ColorChoice::Auto)
        .styles(Styles::styled())
        .arg(
            Arg::new("version")
                .required(false)
                .short('v')
                .long("version")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("color")
                .required(false)
                .long("color")
                .value_parser(["always", "auto", "never"])
                .default_value("auto")
                .action(ArgAction::Set)
        )
        .subcommands([
            plot_subcommand,
            demo_subcommand,
            linkage_subcommand,
            misc_subcommand,
        ])
}
