//! Directory and file primitives for the metric store
//!
//! Thin seam over `tokio::fs`: existence check, recursive directory
//! creation, append-only line writes, whole-file reads, and directory
//! listing, plus the helpers that parse file content into metric records.
//! Every operation completes or fails; nothing here retries.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::codec;
use crate::types::{Metric, MetricStoreError, MetricStoreResult};

/// Check whether a file or directory exists at the given path
pub async fn target_exists(target_path: &Path) -> bool {
    tokio::fs::metadata(target_path).await.is_ok()
}

/// Create the directory containing the given file path, if it is absent
pub async fn ensure_directory_exists(target_file_path: &Path) -> MetricStoreResult<()> {
    let parent = match target_file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => return Ok(()),
    };

    if target_exists(parent).await {
        return Ok(());
    }

    tokio::fs::create_dir_all(parent)
        .await
        .map_err(MetricStoreError::DirectoryCreationFailed)
}

/// Append one line to the given file, creating it if necessary
///
/// The file is opened in append mode and the handle is released when the
/// call returns, so sequential awaited appends land in issue order. The line
/// and its terminating newline are written as a single buffer.
pub async fn append_line(target_file_path: &Path, line: &str) -> MetricStoreResult<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(target_file_path)
        .await
        .map_err(MetricStoreError::WriteFailed)?;

    let mut entry = String::with_capacity(line.len() + 1);
    entry.push_str(line);
    entry.push('\n');

    file.write_all(entry.as_bytes())
        .await
        .map_err(MetricStoreError::WriteFailed)?;
    file.flush().await.map_err(MetricStoreError::WriteFailed)
}

/// Read an entire file into a string
pub async fn read_whole_file(target_file_path: &Path) -> MetricStoreResult<String> {
    tokio::fs::read_to_string(target_file_path)
        .await
        .map_err(MetricStoreError::ReadFailed)
}

/// List the entries of a directory
pub async fn list_directory(dir_path: &Path) -> MetricStoreResult<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir_path)
        .await
        .map_err(MetricStoreError::ReadFailed)?;

    let mut paths = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(MetricStoreError::ReadFailed)?
    {
        paths.push(entry.path());
    }

    Ok(paths)
}

/// Read a metric file and decode its lines into records, in file order
///
/// Blank lines (including the trailing one produced by the final newline)
/// are dropped. A line that fails to decode is skipped with a warning so
/// one corrupt line cannot discard the rest of the log.
pub async fn read_and_parse_file(file_path: &Path) -> MetricStoreResult<Vec<Metric>> {
    let content = read_whole_file(file_path).await?;

    let mut metrics = Vec::new();
    for (line_num, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match codec::decode(line) {
            Ok(metric) => metrics.push(metric),
            Err(e) => {
                eprintln!(
                    "Warning: skipping malformed metric at {}:{}: {}",
                    file_path.display(),
                    line_num + 1,
                    e
                );
            }
        }
    }

    Ok(metrics)
}

/// Read every metric file in a directory and concatenate their records
pub async fn read_and_parse_directory(
    dir_path: &Path,
    extension: &str,
) -> MetricStoreResult<Vec<Metric>> {
    let mut file_paths = list_directory(dir_path).await?;
    file_paths.sort();

    let mut metrics = Vec::new();
    for file_path in file_paths {
        if file_path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let entries = read_and_parse_file(&file_path).await?;
        metrics.extend(entries);
    }

    Ok(metrics)
}
