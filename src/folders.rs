use std::{io::*, path::*};

pub const FOLDER_PROMPT: &str = "Enter a folder path (or press Enter to start processing): ";

/// Asks for folders until empty line or end of input.
/// Existing paths are accepted in given order, others are reported.
pub fn collect_folders_interactive<R: BufRead, W: Write>(
    mut input: R,
    out:       &mut W
) -> anyhow::Result<Vec<PathBuf>> {
    let mut folders = Vec::new();
    loop {
        write!(out, "{}", FOLDER_PROMPT)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let folder = line.trim();
        if folder.is_empty() {
            break;
        }

        let path = PathBuf::from(folder);
        if path.exists() {
            log::info!("Folder {} accepted", folder);
            folders.push(path);
        } else {
            log::warn!("Folder not found: {}", folder);
            writeln!(out, "Folder not found: {}", folder)?;
        }
    }
    Ok(folders)
}

#[derive(Debug, Default)]
pub struct ValidatedFolders {
    pub accepted: Vec<PathBuf>,
    pub rejected: Vec<PathBuf>,
}

/// Same acceptance rule as interactive input, for folders from
/// command line or manifest
pub fn validate_folders<I>(candidates: I) -> ValidatedFolders
where I: IntoIterator<Item = PathBuf> {
    let mut result = ValidatedFolders::default();
    for folder in candidates {
        if folder.exists() {
            result.accepted.push(folder);
        } else {
            log::warn!("Folder not found: {}", folder.display());
            result.rejected.push(folder);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interactive_keeps_order_and_rejects_missing() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::create_dir(&a).unwrap();
        std::fs::create_dir(&b).unwrap();
        let missing = dir.path().join("missing");

        let input = format!(
            "{}\n  {}  \n{}\n{}\n\n{}\n",
            b.display(), missing.display(), a.display(), b.display(), a.display()
        );
        let mut out = Vec::new();
        let folders = collect_folders_interactive(input.as_bytes(), &mut out).unwrap();

        assert_eq!(folders, vec![b.clone(), a.clone(), b.clone()]);
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains(&format!("Folder not found: {}", missing.display())));
        assert_eq!(out.matches(FOLDER_PROMPT).count(), 5);
    }

    #[test]
    fn interactive_stops_at_eof() {
        let dir = tempfile::tempdir().unwrap();
        let input = format!("{}", dir.path().display());
        let mut out = Vec::new();
        let folders = collect_folders_interactive(input.as_bytes(), &mut out).unwrap();
        assert_eq!(folders, vec![dir.path().to_path_buf()]);
    }

    #[test]
    fn interactive_nothing_entered() {
        let mut out = Vec::new();
        let folders = collect_folders_interactive("\n".as_bytes(), &mut out).unwrap();
        assert!(folders.is_empty());
    }

    #[test]
    fn validate() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let result = validate_folders(vec![
            missing.clone(),
            dir.path().to_path_buf(),
            dir.path().to_path_buf(),
        ]);
        assert_eq!(result.accepted, vec![dir.path().to_path_buf(), dir.path().to_path_buf()]);
        assert_eq!(result.rejected, vec![missing]);
    }
}
