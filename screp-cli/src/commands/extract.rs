//! `screp extract`: write one or all decompressed member files to disk.

use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use anyhow::{Context, Result};
use colored::Colorize;
use screp::Replay;

use crate::output::use_color;

pub fn run(path: &str, output_dir: &str, specific_file: Option<&str>) -> Result<()> {
    let replay = Replay::open(path).with_context(|| format!("opening {path}"))?;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {output_dir}"))?;

    match specific_file {
        Some(name) => extract_one(&replay, name, output_dir),
        None => extract_all(&replay, output_dir),
    }
}

fn extract_one(replay: &Replay, name: &str, output_dir: &str) -> Result<()> {
    let size = extract_file(replay, name, output_dir)?;
    println!("extracted {name} ({})", format_size(size as u64));
    Ok(())
}

fn extract_all(replay: &Replay, output_dir: &str) -> Result<()> {
    let names = replay.member_names();
    let mut extracted = 0;
    let mut failed = 0;

    for name in &names {
        match extract_file(replay, name, output_dir) {
            Ok(size) => {
                println!("{} {name} ({})", ok_marker(), format_size(size as u64));
                extracted += 1;
            }
            Err(e) => {
                println!("{} {name}: {e:#}", failed_marker());
                failed += 1;
            }
        }
    }

    println!("\n{extracted} extracted, {failed} failed");
    Ok(())
}

fn extract_file(replay: &Replay, name: &str, output_dir: &str) -> Result<usize> {
    let data = replay
        .archive()
        .read_file(name)
        .with_context(|| format!("reading {name} from archive"))?;

    let output_path = build_output_path(output_dir, name);
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory for {}", output_path.display()))?;
    }
    fs::write(&output_path, &data)
        .with_context(|| format!("writing {}", output_path.display()))?;

    Ok(data.len())
}

/// Archive member names use `/` or `\` as path separators depending on
/// origin; normalize to the host's separator before joining.
fn build_output_path(output_dir: &str, archive_filename: &str) -> PathBuf {
    let normalized = if MAIN_SEPARATOR == '\\' {
        archive_filename.replace('/', "\\")
    } else {
        archive_filename.replace('\\', "/")
    };
    Path::new(output_dir).join(normalized)
}

fn ok_marker() -> String {
    if use_color() { "OK".green().bold().to_string() } else { "OK".to_string() }
}

fn failed_marker() -> String {
    if use_color() { "FAILED".red().bold().to_string() } else { "FAILED".to_string() }
}

fn format_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = size as f64;
    let mut unit_index = 0;
    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }
    if unit_index == 0 {
        format!("{} {}", size as u64, UNITS[unit_index])
    } else {
        format!("{size:.1} {}", UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_output_path_normalizes_archive_separators() {
        let joined = build_output_path("out", "folder\\sub/file.txt");
        let expected = if MAIN_SEPARATOR == '\\' { "out\\folder\\sub\\file.txt" } else { "out/folder/sub/file.txt" };
        assert_eq!(joined, Path::new(expected));
    }

    #[test]
    fn format_size_picks_the_largest_whole_unit() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
    }
}
