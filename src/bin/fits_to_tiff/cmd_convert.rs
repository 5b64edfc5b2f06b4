use std::{io::*, path::*};
use clap::Args;
use fits_to_tiff::{config::*, converter::*, folders::*, progress::*};

#[derive(Args, Debug)]
pub struct CmdOptions {
    /// Folders containing FITS files
    folders: Vec<PathBuf>,

    /// JSON file with list of folders and settings
    #[arg(long, short)]
    manifest: Option<PathBuf>,

    /// Files converted in parallel (0 - all CPUs)
    #[arg(long, short)]
    threads: Option<usize>,

    /// `;` separated case insensitive masks of files to ignore [default: stacked*]
    #[arg(long)]
    exclude: Option<String>,

    /// Don't ask for folders if none were given
    #[arg(long)]
    no_prompt: bool,
}

pub fn execute(options: CmdOptions) -> anyhow::Result<RunStatus> {
    let manifest = match &options.manifest {
        Some(file_name) => Manifest::load(file_name)?,
        None => Manifest::default(),
    };

    let convert_options = ConvertOptions {
        exclude: options.exclude
            .or(manifest.exclude)
            .unwrap_or_else(|| DEFAULT_EXCLUDE_MASKS.to_string()),
        cpu_load: options.threads
            .map(CpuLoad::from_threads_count)
            .or(manifest.cpu_load)
            .unwrap_or_default(),
    };

    let candidates: Vec<PathBuf> = options.folders
        .into_iter()
        .chain(manifest.folders)
        .collect();

    let folders = if candidates.is_empty() && !options.no_prompt && stdin().is_terminal() {
        collect_folders_interactive(stdin().lock(), &mut stdout())?
    } else {
        let validated = validate_folders(candidates);
        for folder in &validated.rejected {
            eprintln!("Folder not found: {}", folder.display());
        }
        validated.accepted
    };

    if folders.is_empty() {
        eprintln!("No valid folders provided. Exiting.");
        return Ok(RunStatus::NoValidInput);
    }

    let progress = ProgressConsole::new_ts();
    let summary = convert_folders(&folders, &convert_options, &progress, &mut stdout())?;

    if folders.len() > 1 {
        println!(
            "All folders done: {} converted, {} failed",
            summary.converted_count(),
            summary.failed_count()
        );
    }
    Ok(summary.status())
}
