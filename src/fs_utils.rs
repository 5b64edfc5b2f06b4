use std::path::*;
use anyhow::Context;
use itertools::Itertools;
use crate::image_formats::is_fits_file_name;

pub fn file_mask_to_regex_str(text: &str) -> String {
    let mut result = String::new();
    for sym in text.chars() {
        match sym {
            '.' | '\\' | '[' | ']' | '(' | ')' |
            '{' | '}' | '^' | '$' | '|' | '+' => {
                    result.push('\\');
                    result.push(sym)
                },

            '?' =>
                result.push('.'),

            '*' =>
                result.push_str(".*"),

            _ =>
                result.push(sym)
        }
    }
    result
}

/// Case insensitive regex for `;` separated file masks.
/// Each mask must match whole file name. `None` for empty masks.
pub fn create_regex_for_masks(masks: &str) -> anyhow::Result<Option<regex::Regex>> {
    let masks = masks.trim();
    if masks.is_empty() {
        return Ok(None);
    }
    let regex_str = masks
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(file_mask_to_regex_str)
        .map(|s| format!("(?:^{}$)", s))
        .join("|");

    let regex_str = format!("(?is){}", regex_str); // (?i) - case insensitive, (?s) - `.` matches `\n`
    let res = regex::Regex::new(&regex_str)?;
    Ok(Some(res))
}

/// FITS files directly inside `path` except ones matching `exclude_masks`.
/// Sorted by name.
pub fn get_fits_files_list(
    path:          &Path,
    exclude_masks: &str,
) -> anyhow::Result<Vec<PathBuf>> {
    let exclude = create_regex_for_masks(exclude_masks)?;
    let is_excluded = |name: &str| {
        exclude.as_ref().map(|r| r.is_match(name)).unwrap_or(false)
    };

    let mut result: Vec<_> = std::fs::read_dir(path)
        .with_context(|| format!("Can't read directory `{}`", path_to_str(path)))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            let name = extract_file_name(path);
            is_fits_file_name(name) && !is_excluded(name)
        })
        .collect();

    result.sort();
    Ok(result)
}

pub fn extract_file_name(path: &Path) -> &str {
    path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("")
}

pub fn path_to_str(path: &Path) -> &str {
    path
        .to_str()
        .unwrap_or("")
}

/// Last component of folder for labels. Whole path if there is no one.
pub fn folder_label(folder: &Path) -> String {
    match folder.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => folder.display().to_string(),
    }
}
