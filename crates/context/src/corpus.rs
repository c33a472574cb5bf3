//! Corpus providers.
//!
//! A corpus provider returns the documents visible to one user. Text is
//! cleaned with [`normalize_text`] on the way in.

use crate::types::Document;
use chrono::{DateTime, Utc};
use intexta_core::{AppError, AppResult};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Source of documents for a user.
#[async_trait::async_trait]
pub trait CorpusProvider: Send + Sync {
    /// Documents for `user`, in a stable order. May be empty.
    async fn documents(&self, user: &str) -> AppResult<Vec<Document>>;
}

/// Reads plain-text documents from a directory tree.
///
/// If `<root>/<user>` exists it is walked recursively. Otherwise only the
/// files directly under `<root>` are shared, never another user's folder.
/// Ids that are not a single plain path component see nothing.
#[derive(Debug, Clone)]
pub struct DirectoryCorpus {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryCorpus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: vec!["txt".to_string(), "md".to_string()],
        }
    }

    /// Replace the accepted file extensions.
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Every matching file under the root, user folders included.
    pub async fn load_all(&self) -> AppResult<Vec<Document>> {
        let root = self.root.clone();
        let extensions = self.extensions.clone();
        tokio::task::spawn_blocking(move || load_directory(&root, &extensions))
            .await
            .map_err(|e| AppError::Other(format!("Corpus loading task failed: {}", e)))?
    }

    /// Directory to read for `user` and how deep to walk it.
    ///
    /// `None` when the id is not a single plain path component.
    fn user_root(&self, user: &str) -> Option<(PathBuf, usize)> {
        if user.is_empty() {
            return Some((self.root.clone(), SHARED_DEPTH));
        }
        let mut components = Path::new(user).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return None,
        }
        let candidate = self.root.join(user);
        if candidate.is_dir() {
            Some((candidate, usize::MAX))
        } else {
            Some((self.root.clone(), SHARED_DEPTH))
        }
    }
}

/// Walk depth for the shared root: its own files, never user folders.
const SHARED_DEPTH: usize = 1;

#[async_trait::async_trait]
impl CorpusProvider for DirectoryCorpus {
    async fn documents(&self, user: &str) -> AppResult<Vec<Document>> {
        let Some((root, depth)) = self.user_root(user) else {
            tracing::warn!("Rejected user id {:?} for directory corpus", user);
            return Ok(Vec::new());
        };
        let extensions = self.extensions.clone();
        tokio::task::spawn_blocking(move || load_files(&root, &extensions, depth))
            .await
            .map_err(|e| AppError::Other(format!("Corpus loading task failed: {}", e)))?
    }
}

/// Load every matching file under `root`, sorted by path.
pub fn load_directory(root: &Path, extensions: &[String]) -> AppResult<Vec<Document>> {
    load_files(root, extensions, usize::MAX)
}

fn load_files(root: &Path, extensions: &[String], max_depth: usize) -> AppResult<Vec<Document>> {
    if !root.is_dir() {
        return Err(AppError::Config(format!(
            "Document directory does not exist: {:?}",
            root
        )));
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| has_extension(p, extensions))
        .collect();
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let raw = std::fs::read_to_string(&path)?;
        let id = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| id.clone());

        let mut document = Document::new(id, name, normalize_text(&raw));
        if let Ok(modified) = std::fs::metadata(&path).and_then(|m| m.modified()) {
            document = document.with_timestamp(DateTime::<Utc>::from(modified));
        }
        documents.push(document);
    }

    tracing::debug!("Loaded {} document(s) from {:?}", documents.len(), root);
    Ok(documents)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Clean extracted text.
///
/// Removes zero-width spaces, collapses runs of spaces and tabs to one
/// space, collapses three or more newlines to two and trims the result.
pub fn normalize_text(text: &str) -> String {
    let mut spaced = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        match c {
            '\u{200b}' | '\r' => {}
            ' ' | '\t' => {
                if !in_space {
                    spaced.push(' ');
                }
                in_space = true;
            }
            _ => {
                spaced.push(c);
                in_space = false;
            }
        }
    }

    let mut out = String::with_capacity(spaced.len());
    let mut newlines = 0;
    for c in spaced.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(c);
            }
        } else {
            newlines = 0;
            out.push(c);
        }
    }

    out.trim().to_string()
}
