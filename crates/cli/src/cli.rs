//! iongraph CLI arguments.

use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Tools for working with ion.json IR dumps.
#[derive(Debug, Parser)]
#[command(name = "iongraph", version, arg_required_else_help = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Pack a dump into the compact (v2) encoding.
    ///
    /// The input may be in any supported schema version; it is normalized
    /// before packing. Note that `source` and `metadata` fields are not
    /// representable in the compact encoding and are dropped.
    Pack {
        /// Input ion.json file.
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Destination for the packed document.
        #[arg(value_hint = ValueHint::FilePath)]
        output: PathBuf,
        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
    /// Normalize a dump to the expanded canonical schema.
    Migrate {
        /// Input ion.json file.
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Destination for the normalized document.
        #[arg(value_hint = ValueHint::FilePath)]
        output: PathBuf,
        /// Export only the function at this index, as a standalone document.
        #[arg(long, value_name = "INDEX")]
        func: Option<usize>,
        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
}
