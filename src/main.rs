use clap::Parser;
use traytodo::cli::commands::Cli;
use traytodo::cli::handlers;
use traytodo::logging;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
