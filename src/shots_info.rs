use std::path::*;
use anyhow::Context;
use serde::Serialize;

pub const SHOTS_INFO_FILE_NAME: &str = "shotsInfo.json";

/// Reads `shotsInfo.json` from folder. Content is not interpreted.
/// `Ok(None)` if there is no such file.
pub fn load_shots_info(folder: &Path) -> anyhow::Result<Option<serde_json::Value>> {
    let file_name = folder.join(SHOTS_INFO_FILE_NAME);
    if !file_name.is_file() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(&file_name)
        .with_context(|| format!("Can't read `{}`", file_name.display()))?;
    let value = serde_json::from_str(&text)
        .with_context(|| format!("`{}` is not valid JSON", file_name.display()))?;
    Ok(Some(value))
}

/// Pretty JSON with 4 spaces indent
pub fn shots_info_to_string(value: &serde_json::Value) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}
