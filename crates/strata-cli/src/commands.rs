//! CLI command implementations

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use strata_core::config::ConfigFormat as CoreConfigFormat;
use strata_core::{ConfigLoader, ResultExt, Scanner, StrataConfig};
use tracing::{debug, info, warn};

use crate::output::{FileReport, OutputFormatter, ScanSummary};
use crate::{ConfigFormat, OutputFormat};

/// Scan command implementation
pub fn scan_command(
    paths: Vec<PathBuf>,
    format: OutputFormat,
    extensions: Vec<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    debug!("Running scan command on paths: {:?}", paths);

    let config = load_config(config_path.as_deref(), &paths)?;
    let files = collect_files(&paths, &extensions)?;
    let start_time = Instant::now();

    let reports = scan_files(config, &files)?;
    let summary = ScanSummary::from_reports(&reports, start_time.elapsed());
    info!(
        "Scanned {} file(s) in {:?}",
        summary.files_scanned, summary.duration
    );

    OutputFormatter::new(format).print_scan(&reports, &summary)?;
    Ok(())
}

/// Check command implementation
///
/// Fails when any file contains a literal that is never closed.
pub fn check_command(
    paths: Vec<PathBuf>,
    extensions: Vec<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    debug!("Running check command on paths: {:?}", paths);

    let config = load_config(config_path.as_deref(), &paths)?;
    let files = collect_files(&paths, &extensions)?;
    let start_time = Instant::now();

    let reports = scan_files(config, &files)?;
    let summary = ScanSummary::from_reports(&reports, start_time.elapsed());

    OutputFormatter::new(OutputFormat::Human).print_check(&reports, &summary)?;

    if summary.failures > 0 {
        bail!(
            "{} of {} file(s) failed the check",
            summary.failures,
            summary.files_scanned
        );
    }
    Ok(())
}

/// Config init command implementation
pub fn config_init_command(format: ConfigFormat, force: bool) -> Result<()> {
    debug!("Initializing configuration file with format: {:?}", format);

    let (filename, core_format) = match format {
        ConfigFormat::Toml => ("strata.toml", CoreConfigFormat::Toml),
        ConfigFormat::Json => (".stratarc.json", CoreConfigFormat::Json),
    };
    let config_path = PathBuf::from(filename);

    if config_path.exists() && !force {
        bail!("Configuration file '{filename}' already exists. Use --force to overwrite.");
    }

    let content = StrataConfig::default().render(core_format)?;
    std::fs::write(&config_path, content)
        .with_context(|| format!("Failed to write '{filename}'"))?;

    println!("✅ Created configuration file: {filename}");
    Ok(())
}

/// Config show command implementation
pub fn config_show_command(config_path: Option<PathBuf>) -> Result<()> {
    debug!("Showing configuration");

    let config = ConfigLoader::load(config_path.as_deref(), None)?;
    println!("{}", config.render(CoreConfigFormat::Json)?);
    Ok(())
}

/// Load the explicit config, or discover one next to the first input path
fn load_config(config_path: Option<&Path>, paths: &[PathBuf]) -> Result<StrataConfig> {
    if let Some(path) = config_path {
        return Ok(ConfigLoader::load_from_file(path)?);
    }

    let start_path = match paths.first() {
        Some(first) if first.is_file() => match first.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        },
        Some(first) if first.exists() => first.as_path(),
        _ => Path::new("."),
    };
    Ok(ConfigLoader::load(None, Some(start_path))?)
}

/// Expand directories into the files below them with a matching extension
///
/// Files named explicitly are always included.
fn collect_files(paths: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            bail!("Path not found: {}", path.display());
        }

        for entry in walkdir::WalkDir::new(path).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
            let file = entry.path();
            if file.is_file()
                && let Some(ext) = file.extension().and_then(|s| s.to_str())
                && extensions.iter().any(|wanted| wanted == ext)
            {
                files.push(file.to_path_buf());
            }
        }
    }

    debug!("Collected {} file(s)", files.len());
    Ok(files)
}

/// Scan every file in parallel, one session per file
///
/// Errors that only concern a single file are kept in its report.
fn scan_files(config: StrataConfig, files: &[PathBuf]) -> Result<Vec<FileReport>> {
    let scanner = Scanner::new(config)?;

    let reports = files
        .par_iter()
        .map(|path| {
            std::fs::read_to_string(path)
                .map_err(|e| strata_core::StrataError::io_error(path, e))
                .and_then(|source| scanner.scan(&source))
                .map(|literals| FileReport::scanned(path, literals))
                .recover_with(|e| {
                    warn!("{}: {}", path.display(), e);
                    FileReport::failed(path, e.to_string())
                })
        })
        .collect::<strata_core::Result<Vec<_>>>()?;

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn collect_files_filters_directories_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("src");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("a.lua"), "").unwrap();
        fs::write(nested.join("b.txt"), "").unwrap();
        let explicit = temp_dir.path().join("notes.txt");
        fs::write(&explicit, "").unwrap();

        let files = collect_files(
            &[temp_dir.path().to_path_buf(), explicit.clone()],
            &["lua".to_string()],
        )
        .unwrap();

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("src/a.lua"));
        assert_eq!(files[1], explicit);
    }

    #[test]
    fn collect_files_rejects_missing_paths() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        let err = collect_files(&[missing], &["lua".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Path not found"));
    }

    #[test]
    fn scan_files_keeps_per_file_failures() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.lua");
        let bad = temp_dir.path().join("bad.lua");
        fs::write(&good, "x = [[ok]]").unwrap();
        fs::write(&bad, "x = [=[open").unwrap();

        let reports = scan_files(StrataConfig::default(), &[good, bad]).unwrap();

        assert_eq!(reports[0].literals.len(), 1);
        assert!(reports[0].error.is_none());
        assert!(reports[1].literals.is_empty());
        assert!(reports[1].error.as_deref().unwrap().contains("line 1, column 8"));
    }
}
