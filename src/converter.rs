use std::{fmt, io::Write, path::*};
use anyhow::Context;
use rayon::prelude::*;
use crate::{
    config::*,
    fs_utils::*,
    image::*,
    image_formats::*,
    image_norm::*,
    log_utils::*,
    progress::*,
    shots_info::*,
};

pub const CONVERTED_DIR_NAME: &str = "converted";

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Shape after squeeze, slowest axis first
    UnexpectedShape(Vec<usize>),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnexpectedShape(shape) =>
                write!(f, "Unexpected shape: {}", format_shape(shape)),
        }
    }
}

#[derive(Debug)]
pub enum FileOutcome {
    Converted(PathBuf),
    Skipped(SkipReason),
    Failed(anyhow::Error),
}

#[derive(Debug)]
pub struct FileReport {
    pub file_name: PathBuf,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn message(&self) -> Option<String> {
        let name = extract_file_name(&self.file_name);
        match &self.outcome {
            FileOutcome::Converted(_) =>
                None,
            FileOutcome::Skipped(reason) =>
                Some(format!("Skipping {} - {}", name, reason)),
            FileOutcome::Failed(err) =>
                Some(format!("Failed {}: {:#}", name, err)),
        }
    }
}

#[derive(Debug)]
pub struct FolderSummary {
    pub folder: PathBuf,
    pub files: Vec<FileReport>,
}

impl FolderSummary {
    pub fn converted_count(&self) -> usize {
        self.files.iter().filter(|f| matches!(f.outcome, FileOutcome::Converted(_))).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.files.iter().filter(|f| matches!(f.outcome, FileOutcome::Skipped(_))).count()
    }

    pub fn failed_count(&self) -> usize {
        self.files.iter().filter(|f| matches!(f.outcome, FileOutcome::Failed(_))).count()
    }
}

pub fn converted_dir_for(folder: &Path) -> PathBuf {
    folder.join(CONVERTED_DIR_NAME)
}

/// Converts one FITS file into `<dst_dir>/<name>.tiff`
pub fn convert_file(file_name: &Path, dst_dir: &Path) -> FileOutcome {
    let timer = TimeLogger::start();
    let result = try_convert_file(file_name, dst_dir);
    timer.log(extract_file_name(file_name));
    match result {
        Ok(outcome) => outcome,
        Err(err) => {
            log::error!("Failed {}: {:#}", path_to_str(file_name), err);
            FileOutcome::Failed(err)
        }
    }
}

fn try_convert_file(file_name: &Path, dst_dir: &Path) -> anyhow::Result<FileOutcome> {
    let image = match load_primary_array_from_fits_file(file_name)? {
        Squeezed::Image2D(image) => image,
        Squeezed::UnsupportedShape(shape) => {
            let reason = SkipReason::UnexpectedShape(shape);
            log::warn!("Skipping {} - {}", path_to_str(file_name), reason);
            return Ok(FileOutcome::Skipped(reason));
        }
    };

    let normalized = normalize_to_u8(&image);
    let dst_file_name = dst_dir.join(tiff_file_name_for(file_name));
    save_grayscale_u8_to_tiff_file(&normalized, extract_file_name(file_name), &dst_file_name)
        .with_context(|| format!("Can't write `{}`", path_to_str(&dst_file_name)))?;

    log::info!("{} converted into {}", path_to_str(file_name), path_to_str(&dst_file_name));
    Ok(FileOutcome::Converted(dst_file_name))
}

fn echo_shots_info(folder: &Path, out: &mut dyn Write) -> anyhow::Result<()> {
    match load_shots_info(folder) {
        Ok(Some(value)) => {
            writeln!(out, "{} content:", SHOTS_INFO_FILE_NAME)?;
            writeln!(out, "{}", shots_info_to_string(&value)?)?;
        }
        Ok(None) => (),
        Err(err) => {
            log::warn!("{:#}", err);
            writeln!(out, "Warning: {:#}", err)?;
        }
    }
    Ok(())
}

/// Converts all FITS files of folder into `<folder>/converted`.
///
/// Errors of single files don't stop the process and are returned
/// inside summary. Error is returned only if the whole folder
/// can't be processed.
pub fn convert_folder(
    folder:   &Path,
    options:  &ConvertOptions,
    progress: &ProgressTs,
    out:      &mut dyn Write,
) -> anyhow::Result<FolderSummary> {
    log::info!("Converting folder {} with options {:?}", path_to_str(folder), options);

    let dst_dir = converted_dir_for(folder);
    std::fs::create_dir_all(&dst_dir)
        .with_context(|| format!("Can't create directory `{}`", path_to_str(&dst_dir)))?;

    echo_shots_info(folder, out)?;

    let files = get_fits_files_list(folder, &options.exclude)?;
    log::info!("{} files found in {}", files.len(), path_to_str(folder));

    {
        let mut progress = progress.lock().unwrap();
        progress.stage(&format!("Processing {}", folder_label(folder)));
        progress.set_total(files.len());
    }

    let convert_one = |file_name: &PathBuf| {
        let outcome = convert_file(file_name, &dst_dir);
        progress.lock().unwrap().progress(true, extract_file_name(file_name));
        FileReport { file_name: file_name.clone(), outcome }
    };

    let threads = options.cpu_load.to_threads_count();
    let reports: Vec<FileReport> = if threads <= 1 || files.len() <= 1 {
        let mut reports = Vec::with_capacity(files.len());
        for file_name in &files {
            let report = convert_one(file_name);
            if let Some(message) = report.message() {
                writeln!(out, "{}", message)?;
            }
            reports.push(report);
        }
        reports
    } else {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;
        let reports = thread_pool.install(|| files.par_iter().map(convert_one).collect::<Vec<_>>());
        for report in &reports {
            if let Some(message) = report.message() {
                writeln!(out, "{}", message)?;
            }
        }
        reports
    };

    progress.lock().unwrap().finish();

    let summary = FolderSummary { folder: folder.to_path_buf(), files: reports };
    writeln!(
        out,
        "Conversion completed for: {} ({} converted, {} skipped, {} failed)",
        folder.display(),
        summary.converted_count(),
        summary.skipped_count(),
        summary.failed_count()
    )?;
    Ok(summary)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    NoValidInput,
    PartialFailure,
    TotalFailure,
}

impl RunStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            RunStatus::Success        => 0,
            RunStatus::NoValidInput   => 2,
            RunStatus::PartialFailure => 3,
            RunStatus::TotalFailure   => 4,
        }
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub folders: Vec<FolderSummary>,
    pub folder_errors: Vec<(PathBuf, anyhow::Error)>,
}

impl RunSummary {
    pub fn converted_count(&self) -> usize {
        self.folders.iter().map(FolderSummary::converted_count).sum()
    }

    /// Failed files plus folders which were not processed at all
    pub fn failed_count(&self) -> usize {
        let failed_files: usize = self.folders.iter().map(FolderSummary::failed_count).sum();
        failed_files + self.folder_errors.len()
    }

    pub fn status(&self) -> RunStatus {
        if self.folders.is_empty() && self.folder_errors.is_empty() {
            RunStatus::NoValidInput
        } else if self.failed_count() == 0 {
            RunStatus::Success
        } else if self.converted_count() == 0 {
            RunStatus::TotalFailure
        } else {
            RunStatus::PartialFailure
        }
    }
}

/// Converts folders one by one. Failed folder is reported and
/// the next one is processed.
pub fn convert_folders(
    folders:  &[PathBuf],
    options:  &ConvertOptions,
    progress: &ProgressTs,
    out:      &mut dyn Write,
) -> anyhow::Result<RunSummary> {
    let mut summary = RunSummary::default();
    for folder in folders {
        match convert_folder(folder, options, progress, out) {
            Ok(folder_summary) =>
                summary.folders.push(folder_summary),
            Err(err) => {
                log::error!("Folder {} failed: {:#}", path_to_str(folder), err);
                writeln!(out, "Failed to convert folder {}: {:#}", folder.display(), err)?;
                summary.folder_errors.push((folder.clone(), err));
            }
        }
    }
    Ok(summary)
}
