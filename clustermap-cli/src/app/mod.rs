// Modules
pub mod cli;
pub mod config;
mod process;

// Imports
use anyhow::Context;
use clap::{ArgMatches, ColorChoice};
use config::Config;
use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

pub struct App {
    config: Config,
    mat: ArgMatches,
}

impl App {
    #[cfg(not(debug_assertions))]
    const NAME: &'static str = "clustermap";
    #[cfg(debug_assertions)]
    const NAME: &'static str = "clustermap-dev";

    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    /// Environment variable holding the log filter directives
    const LOG_ENV: &'static str = "CLUSTERMAP_LOG";

    pub fn load() -> anyhow::Result<Self> {
        let mut mat = cli::build_cli().get_matches();

        let color_choice = match mat.remove_one::<String>("color").as_deref() {
            Some("always") => {
                console::set_colors_enabled(true);
                console::set_colors_enabled_stderr(true);
                ColorChoice::Always
            }
            Some("never") => {
                console::set_colors_enabled(false);
                console::set_colors_enabled_stderr(false);
                ColorChoice::Never
            }
            _ => ColorChoice::Auto,
        };
        Self::init_logging(color_choice);

        let dirs = ProjectDirs::from("", "", Self::NAME)
            .ok_or_else(|| anyhow::anyhow!("Failed to get project directories"))?;

        let conf_dir = dirs.config_dir();
        if !conf_dir.exists() {
            std::fs::create_dir_all(conf_dir).with_context(|| {
                format!("Failed to create the config directory at `{}`", conf_dir.display())
            })?;
        }

        let config = config::Config::load(&conf_dir.join(Config::FILENAME));

        Ok(Self { config, mat })
    }

    pub fn run(self) -> anyhow::Result<()> {
        let Self { config, mut mat } = self;

        if mat.get_flag("version") {
            println!("clustermap {}", Self::VERSION);
            return Ok(());
        }

        let Some((subcommand, sub_mat)) = mat.remove_subcommand() else {
            return Ok(());
        };

        match subcommand.as_str() {
            "plot" => process::plot(sub_mat, &config),
            "demo" => process::demo(sub_mat, &config),
            "linkage" => process::linkage(sub_mat, &config),
            "misc" => process::misc(sub_mat, &config),
            _ => Ok(()),
        }
    }

    fn init_logging(color_choice: ColorChoice) {
        let filter = EnvFilter::try_from_env(Self::LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        let ansi = match color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => console::colors_enabled_stderr(),
        };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(ansi)
            .with_target(false)
            .try_init();
    }
}
