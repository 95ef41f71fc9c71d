use bnnkit_cli::{CliArgs, run};
use clap::Parser;
use log::error;

fn main() {
    let args = CliArgs::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .format_target(false)
        .init();

    if let Err(err) = run(&args.to_run_options()) {
        error!("Error processing files: {err:#}");
        std::process::exit(1);
    }
}
