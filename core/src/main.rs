use clap::Parser;
use dcmdiff_core::cli::Cli;
use dcmdiff_core::{Comparison, DcmdiffError, SummaryReport, TerminalResolver};
use log::{error, info, warn};
use std::process;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), DcmdiffError> {
    let options = cli.diff_options()?;
    info!(
        "Comparing {} against {}",
        cli.reference.display(),
        cli.test.display()
    );

    let mut comparison = Comparison::new(options, TerminalResolver::stdio());
    let summary = comparison.run(&cli.reference, &cli.test)?;

    println!();
    print!("{}", SummaryReport::new(&summary));

    if cli.open {
        let index = summary.index_path.to_string_lossy();
        if let Err(e) = webbrowser::open(&index) {
            warn!("Unable to open {} in a browser: {}", index, e);
        }
    }
    Ok(())
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}
