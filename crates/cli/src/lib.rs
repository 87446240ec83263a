#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

use iongraph_ingest::IngestError;
use iongraph_ir::CURRENT_VERSION;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

pub mod cli;
use cli::{Args, Command};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error("failed to serialize output: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("function index {index} out of range: document has {count} function(s)")]
    FunctionIndex { index: usize, count: usize },
}

/// Initializes the tracing logger from `RUST_LOG`.
pub fn init_logger() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Pack { input, output, pretty } => pack(&input, &output, pretty),
        Command::Migrate { input, output, func, pretty } => migrate(&input, &output, func, pretty),
    }
}

fn pack(input: &Path, output: &Path, pretty: bool) -> Result<(), CliError> {
    let document = read_json(input)?;
    let normalized = iongraph_ingest::migrate(&document)?;
    let packed = iongraph_ingest::encode(&normalized);
    debug!(functions = packed.functions.len(), strings = packed.strings.len(), "packed document");
    write_json(output, &packed, pretty)
}

fn migrate(
    input: &Path,
    output: &Path,
    func: Option<usize>,
    pretty: bool,
) -> Result<(), CliError> {
    let document = read_json(input)?;
    let mut normalized = iongraph_ingest::migrate(&document)?;
    // Expanded output is always tagged with the canonical version, even when
    // the source was compact.
    normalized.version = CURRENT_VERSION;

    if let Some(index) = func {
        normalized = normalized.single_function(index).ok_or(CliError::FunctionIndex {
            index,
            count: normalized.functions.len(),
        })?;
    }

    write_json(output, &normalized, pretty)
}

fn read_json(path: &Path) -> Result<serde_json::Value, CliError> {
    let text = fs::read_to_string(path)
        .map_err(|source| CliError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&text)
        .map_err(|source| CliError::Parse { path: path.to_path_buf(), source })
}

fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<(), CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(CliError::Serialize)?;
    fs::write(path, text).map_err(|source| CliError::Io { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expanded_fixture() -> serde_json::Value {
        json!({
            "version": 1,
            "functions": [
                {
                    "name": "first",
                    "passes": [{
                        "name": "BuildSSA",
                        "mir": { "blocks": [{
                            "ptr": 1,
                            "id": 0,
                            "instructions": [
                                { "ptr": 5, "id": 5, "opcode": "constant", "type": "Int32" },
                            ],
                        }] },
                        "lir": { "blocks": [] },
                    }],
                },
                { "name": "second", "passes": [] },
            ],
        })
    }

    #[test]
    fn pack_then_migrate_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.json");
        let packed = dir.path().join("packed.json");
        let expanded = dir.path().join("expanded.json");

        fs::write(&input, expanded_fixture().to_string()).unwrap();

        run(Args {
            command: Command::Pack { input: input.clone(), output: packed.clone(), pretty: false },
        })
        .unwrap();
        let packed_doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&packed).unwrap()).unwrap();
        assert_eq!(packed_doc["version"], 2);
        assert!(packed_doc["strings"].as_array().unwrap().iter().any(|s| s == "constant"));

        run(Args {
            command: Command::Migrate {
                input: packed,
                output: expanded.clone(),
                func: None,
                pretty: true,
            },
        })
        .unwrap();
        let expanded_doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&expanded).unwrap()).unwrap();
        assert_eq!(expanded_doc["version"], 1);
        assert_eq!(expanded_doc["functions"][0]["name"], "first");
        let ins = &expanded_doc["functions"][0]["passes"][0]["mir"]["blocks"][0]["instructions"][0];
        assert_eq!(ins["opcode"], "constant");
        assert_eq!(ins["type"], "Int32");
    }

    #[test]
    fn migrate_single_function_export() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.json");
        let output = dir.path().join("out.json");
        fs::write(&input, expanded_fixture().to_string()).unwrap();

        run(Args {
            command: Command::Migrate {
                input: input.clone(),
                output: output.clone(),
                func: Some(1),
                pretty: false,
            },
        })
        .unwrap();
        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(doc["functions"].as_array().unwrap().len(), 1);
        assert_eq!(doc["functions"][0]["name"], "second");

        let err = run(Args {
            command: Command::Migrate { input, output, func: Some(9), pretty: false },
        })
        .unwrap_err();
        assert!(matches!(err, CliError::FunctionIndex { index: 9, count: 2 }));
    }

    #[test]
    fn pack_rejects_non_object_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.json");
        let output = dir.path().join("out.json");
        fs::write(&input, "[1, 2, 3]").unwrap();

        let err = run(Args { command: Command::Pack { input, output, pretty: false } })
            .unwrap_err();
        assert!(matches!(err, CliError::Ingest(IngestError::NotAnObject)));
    }
}
