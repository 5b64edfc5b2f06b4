use std::path::*;
use anyhow::Context;
use serde::*;

pub const DEFAULT_EXCLUDE_MASKS: &str = "stacked*";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub enum CpuLoad {
    #[default]
    OneThread,
    HalfCPUs,
    AllCPUs,
    CustomCPUs(usize),
}

impl CpuLoad {
    pub fn to_threads_count(&self) -> usize {
        match self {
            CpuLoad::OneThread     => 1,
            CpuLoad::HalfCPUs      => (num_cpus::get()/2).max(1),
            CpuLoad::AllCPUs       => num_cpus::get(),
            CpuLoad::CustomCPUs(v) => (*v).max(1),
        }
    }

    /// `0` means all CPUs
    pub fn from_threads_count(threads: usize) -> CpuLoad {
        match threads {
            0 => CpuLoad::AllCPUs,
            1 => CpuLoad::OneThread,
            n => CpuLoad::CustomCPUs(n),
        }
    }
}

/// List of folders to convert with optional settings.
/// Stored as JSON.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Manifest {
    pub folders: Vec<PathBuf>,
    pub cpu_load: Option<CpuLoad>,
    pub exclude: Option<String>,
}

impl Manifest {
    pub fn load(file_name: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(file_name)
            .with_context(|| format!("Can't read manifest `{}`", file_name.display()))?;
        let manifest = serde_json::from_str(&text)
            .with_context(|| format!("Can't parse manifest `{}`", file_name.display()))?;
        Ok(manifest)
    }

    #[cfg(test)]
    pub fn save(&self, file_name: &Path) -> anyhow::Result<()> {
        let json_str = serde_json::to_string_pretty(self)?;
        std::fs::write(file_name, json_str)?;
        Ok(())
    }
}

/// Settings of converting one folder
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// `;` separated masks of files to ignore
    pub exclude: String,
    pub cpu_load: CpuLoad,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            exclude: DEFAULT_EXCLUDE_MASKS.to_string(),
            cpu_load: CpuLoad::OneThread,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threads_count() {
        assert_eq!(CpuLoad::from_threads_count(0), CpuLoad::AllCPUs);
        assert_eq!(CpuLoad::from_threads_count(1), CpuLoad::OneThread);
        assert_eq!(CpuLoad::from_threads_count(6), CpuLoad::CustomCPUs(6));
        assert_eq!(CpuLoad::OneThread.to_threads_count(), 1);
        assert_eq!(CpuLoad::CustomCPUs(0).to_threads_count(), 1);
        assert!(CpuLoad::HalfCPUs.to_threads_count() >= 1);
    }

    #[test]
    fn manifest_partial_json() {
        let dir = tempfile::tempdir().unwrap();
        let file_name = dir.path().join("manifest.json");
        std::fs::write(&file_name, r#"{"folders": ["/a", "/b"]}"#).unwrap();
        let manifest = Manifest::load(&file_name).unwrap();
        assert_eq!(manifest.folders, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(manifest.cpu_load, None);
        assert_eq!(manifest.exclude, None);
    }

    #[test]
    fn manifest_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let file_name = dir.path().join("manifest.json");
        let manifest = Manifest {
            folders: vec![PathBuf::from("/night1")],
            cpu_load: Some(CpuLoad::CustomCPUs(3)),
            exclude: Some("stacked*;dark*".to_string()),
        };
        manifest.save(&file_name).unwrap();
        assert_eq!(Manifest::load(&file_name).unwrap(), manifest);
    }

    #[test]
    fn broken_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let file_name = dir.path().join("manifest.json");
        std::fs::write(&file_name, "[1, 2").unwrap();
        assert!(Manifest::load(&file_name).is_err());
        assert!(Manifest::load(&dir.path().join("missing.json")).is_err());
    }
}
