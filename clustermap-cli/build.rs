use std::{env, io::Error};

use clap::ValueEnum;
use clap_complete::{Shell, generate_to};

include!("src/app/cli.rs");

fn main() -> Result<(), Error> {
    println!("cargo:rerun-if-changed=src/app/cli.rs");

    let outdir = match env::var_os("OUT_DIR") {
        Some(outdir) => outdir,
        None => return Ok(()),
    };

    let mut cmd = build_cli();
    for &shell in Shell::value_variants() {
        generate_to(shell, &mut cmd, "clustermap", &outdir)?;
    }

    Ok(())
}
