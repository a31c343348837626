//! `redcap-lake` command-line entry point.

use clap::Parser;
use lake_cli::cli::{Cli, Command};
use lake_cli::commands::{
    GlobalOptions, run_digest, run_export, run_fields, run_ingest, run_provenance, run_to_path,
    run_to_uri, run_verify,
};
use lake_cli::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = cli.log_config();
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let options = GlobalOptions {
        config: cli.config.clone(),
        json: cli.json,
    };
    let result = match &cli.command {
        Command::Fields(args) => run_fields(&options, args).map(|()| 0),
        Command::Export(args) => run_export(&options, args).map(|_| 0),
        Command::Digest(args) => run_digest(&options, args).map(|()| 0),
        Command::Verify(args) => run_verify(&options, args).map(|ok| if ok { 0 } else { 1 }),
        Command::ToUri(args) => run_to_uri(&options, args).map(|()| 0),
        Command::ToPath(args) => run_to_path(&options, args).map(|()| 0),
        Command::Provenance(args) => run_provenance(&options, args).map(|_| 0),
        Command::Ingest(args) => run_ingest(&options, args).map(|_| 0),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}
