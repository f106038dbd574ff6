use std::path::{Path, PathBuf};

use clap::ValueEnum;
use regex::Regex;
use walkdir::WalkDir;

use crate::error::TicketError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MatchType {
    #[default]
    #[value(name = "exact_match")]
    Exact,
    #[value(name = "regex_match")]
    Regex,
}

/// Resolve the files to upload.
///
/// Exact mode always yields the single path `folder/file_name`, whether or not
/// it exists; the upload surfaces a missing file. Regex mode walks `folder`
/// and yields every file whose name matches, sorted by path. No file name
/// means nothing to attach.
pub fn select_attachments(
    folder: &str,
    file_name: Option<&str>,
    match_type: MatchType,
) -> Result<Vec<PathBuf>, TicketError> {
    let Some(file_name) = file_name.filter(|f| !f.is_empty()) else {
        return Ok(Vec::new());
    };

    match match_type {
        MatchType::Exact => Ok(vec![combine_folder_and_file_name(folder, file_name)]),
        MatchType::Regex => {
            let pattern = Regex::new(file_name).map_err(|source| TicketError::InvalidPattern {
                pattern: file_name.to_string(),
                source,
            })?;
            let root = if folder.is_empty() { Path::new(".") } else { Path::new(folder) };
            let matches: Vec<PathBuf> = list_local_files(root)?
                .into_iter()
                .filter(|path| {
                    path.file_name()
                        .map(|n| pattern.is_match(&n.to_string_lossy()))
                        .unwrap_or(false)
                })
                .collect();
            tracing::info!(
                folder = %root.display(),
                pattern = file_name,
                matched = matches.len(),
                "regex attachment match"
            );
            Ok(matches)
        }
    }
}

pub fn combine_folder_and_file_name(folder: &str, file_name: &str) -> PathBuf {
    if folder.is_empty() {
        PathBuf::from(file_name)
    } else {
        Path::new(folder).join(file_name)
    }
}

/// Every regular file under `root`, recursively, sorted by path. Symlinks are
/// followed, so a linked file is listed under the link's own name.
pub fn list_local_files(root: &Path) -> Result<Vec<PathBuf>, TicketError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
