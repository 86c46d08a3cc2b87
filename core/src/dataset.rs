use crate::node::{decode_list, RawNode};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Root nodes from one dataset document: an object is a single root, an
/// array is a list of roots (entries that are not nodes are skipped).
/// Anything else contributes nothing.
pub fn load_document(file: &Path) -> Result<Vec<RawNode>> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let json: serde_json::Value = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing {}", file.display()))?;
    let roots = match json {
        v @ serde_json::Value::Array(_) => decode_list(v),
        v @ serde_json::Value::Object(_) => vec![serde_json::from_value(v)?],
        _ => Vec::new(),
    };
    Ok(roots)
}

/// Load a single document, or every `*.json` file under a directory in
/// file-name order, concatenating their roots. Unreadable files inside a
/// directory are skipped with a warning.
pub fn load_dataset<P: AsRef<Path>>(input: P) -> Result<Vec<RawNode>> {
    let input = input.as_ref();
    if input.is_file() {
        return load_document(input);
    }
    if !input.is_dir() {
        anyhow::bail!("dataset path {} does not exist", input.display());
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
        let p = entry.path();
        if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(p.to_path_buf());
        }
    }

    let mut roots = Vec::new();
    for file in files {
        match load_document(&file) {
            Ok(mut nodes) => {
                tracing::info!(file = %file.display(), roots = nodes.len(), "loaded dataset document");
                roots.append(&mut nodes);
            }
            Err(err) => tracing::warn!(file = %file.display(), error = %format!("{err:#}"), "skipping dataset document"),
        }
    }
    Ok(roots)
}
