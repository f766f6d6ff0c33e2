use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::group::Group;

/// Downstream tooling diffs the file, so the layout is fixed.
const INDENT: &[u8] = b"    ";

/// Serialize groups as pretty JSON with 4-space indentation.
pub fn to_json(groups: &[Group]) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    groups.serialize(&mut ser)?;
    Ok(buf)
}

/// Write the timeline document, replacing `output` only once it is complete.
pub fn write_media_json(groups: &[Group], output: &Path) -> anyhow::Result<()> {
    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    // Write to temp file first, then rename for atomicity
    let temp_path = temp_path_for(output);
    let json = to_json(groups)?;
    let mut writer = BufWriter::new(
        File::create(&temp_path).with_context(|| format!("cannot create {}", temp_path.display()))?,
    );
    writer.write_all(&json)?;
    writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;

    fs::rename(&temp_path, output)
        .with_context(|| format!("cannot move {} into place", temp_path.display()))?;
    Ok(())
}

fn temp_path_for(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "media.json".into());
    name.push(".tmp");
    output.with_file_name(name)
}
