//! Folder and HTML file discovery for "current folder" mode

use std::path::{Path, PathBuf};

use crate::error::{GeneratorError, Result};

/// Names of the sub-directories of `dir`, sorted
pub async fn list_folders(dir: &Path) -> Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| GeneratorError::filesystem(dir, e))?;

    let mut folders = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| GeneratorError::filesystem(dir, e))?
    {
        // Follows symlinks, like a plain stat
        let is_dir = tokio::fs::metadata(entry.path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if is_dir {
            folders.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    folders.sort();
    Ok(folders)
}

/// Folders whose name contains `input`; everything for empty input
#[must_use]
pub fn filter_folders(folders: &[String], input: &str) -> Vec<String> {
    folders
        .iter()
        .filter(|folder| folder.contains(input))
        .cloned()
        .collect()
}

/// Regular `.html` files directly inside `folder`, sorted
pub async fn find_html_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(folder)
        .await
        .map_err(|e| GeneratorError::filesystem(folder, e))?;

    let mut html_files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| GeneratorError::filesystem(folder, e))?
    {
        let path = entry.path();
        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);

        if is_file && path.extension().is_some_and(|ext| ext == "html") {
            html_files.push(path);
        }
    }

    html_files.sort();
    log::debug!(
        "Found {} HTML file(s) in {}",
        html_files.len(),
        folder.display()
    );
    Ok(html_files)
}
