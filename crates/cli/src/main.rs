use clap::Parser as _;
use std::process::ExitCode;

fn main() -> ExitCode {
    iongraph_cli::init_logger();
    let args = iongraph_cli::cli::Args::parse();
    match iongraph_cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
