use crate::error::Result;
use crate::fs_utils::{discover_documents, read_document, read_snippet, resolve_snippet_path};
use globset::GlobSet;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Matches `<!-- include: path/to/file -->`, capturing the path non-greedily
pub const MARKER_PATTERN: &str = r"<!-- include:\s+(.*?)\s+-->";

/// Language hint placed on every generated fence
pub const DEFAULT_FENCE_LANG: &str = "yaml";

/// Suffix identifying Markdown documents during discovery
pub const DEFAULT_EXTENSION: &str = "md";

/// Directory walked when no root is given
pub const DEFAULT_ROOT: &str = "ReadMe";

/// Configuration for include expansion
#[derive(Debug, Clone)]
pub struct ExpandConfig {
    /// Directory snippet paths are resolved against (usually current working directory)
    pub base_dir: PathBuf,
    /// Language hint for the generated code fence
    pub fence_lang: String,
    /// Document file suffix, without the leading dot
    pub extension: String,
    /// Documents to skip, matched relative to the discovery root
    pub exclude: Option<GlobSet>,
    /// Compute reports without writing documents back
    pub dry_run: bool,
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self {
            base_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            fence_lang: DEFAULT_FENCE_LANG.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            exclude: None,
            dry_run: false,
        }
    }
}

/// An include marker found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeMarker {
    /// The full marker text, from `<!--` through `-->`
    pub full_match: String,
    /// The referenced path exactly as written
    pub path: String,
    /// Starting byte offset in the document
    pub start: usize,
    /// Ending byte offset in the document
    pub end: usize,
}

/// Result of expanding a document's text in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// The rewritten text
    pub text: String,
    /// Number of marker occurrences replaced
    pub replaced: usize,
    /// Distinct referenced paths with no regular file behind them, in scan order
    pub unresolved: Vec<String>,
}

/// Outcome of expanding one document on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    /// The document that was expanded
    pub path: PathBuf,
    /// Number of marker occurrences replaced
    pub replaced: usize,
    /// Distinct referenced paths with no regular file behind them
    pub unresolved: Vec<String>,
    /// Whether the document text differs after expansion
    pub changed: bool,
}

/// A marker located in a discovered document, with its resolution status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerListing {
    /// The document containing the marker
    pub document: PathBuf,
    /// The referenced path exactly as written
    pub path: String,
    /// The path resolved against the base directory
    pub snippet: PathBuf,
    /// Whether a regular file exists at `snippet`
    pub resolved: bool,
    /// Starting byte offset in the document
    pub start: usize,
    /// Ending byte offset in the document
    pub end: usize,
}

/// Finds all include markers in the given text, in scan order
///
/// # Errors
///
/// Returns `MdIncludeError::Regex` if there's an error compiling the regex pattern.
pub fn find_markers(text: &str) -> Result<Vec<IncludeMarker>> {
    let pattern = Regex::new(MARKER_PATTERN)?;
    let mut markers = Vec::new();

    for capture in pattern.captures_iter(text) {
        if let Some(full_match) = capture.get(0)
            && let Some(path_match) = capture.get(1)
        {
            markers.push(IncludeMarker {
                full_match: full_match.as_str().to_string(),
                path: path_match.as_str().to_string(),
                start: full_match.start(),
                end: full_match.end(),
            });
        }
    }

    Ok(markers)
}

/// Wraps snippet text in a fenced code block
pub fn fenced_block(snippet: &str, lang: &str) -> String {
    format!("```{lang}\n{snippet}\n```")
}

/// Canonical marker text for a path, the literal string that gets replaced
pub fn marker_text(path: &str) -> String {
    format!("<!-- include: {path} -->")
}

/// Expands every resolvable marker in `text`
///
/// Paths are taken in scan order. For each one whose snippet exists, every
/// literal occurrence of `<!-- include: {path} -->` in the running text is
/// replaced, including occurrences brought in by an earlier snippet. Marker
/// spellings with other whitespace are matched by the scan but left as is.
///
/// # Errors
///
/// - `MdIncludeError::Regex` from `find_markers`.
/// - `MdIncludeError::Io` if a snippet file exists but cannot be read.
pub fn expand_text(text: &str, config: &ExpandConfig) -> Result<Expansion> {
    let markers = find_markers(text)?;

    let mut result = text.to_string();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut replaced = 0;
    let mut unresolved = Vec::new();

    for marker in &markers {
        if !seen.insert(marker.path.as_str()) {
            continue;
        }

        let snippet_path = resolve_snippet_path(&marker.path, &config.base_dir);
        let Some(snippet) = read_snippet(&snippet_path)? else {
            tracing::debug!(path = %marker.path, snippet = %snippet_path.display(), "no snippet file, marker left as is");
            unresolved.push(marker.path.clone());
            continue;
        };

        let key = marker_text(&marker.path);
        let occurrences = result.matches(key.as_str()).count();
        tracing::debug!(path = %marker.path, snippet = %snippet_path.display(), occurrences, "resolved include");

        if occurrences > 0 {
            result = result.replace(&key, &fenced_block(&snippet, &config.fence_lang));
            replaced += occurrences;
        }
    }

    Ok(Expansion {
        text: result,
        replaced,
        unresolved,
    })
}

/// Expands include markers in the document at `document_path`, overwriting it in place
///
/// The file is only written when its text changes and `config.dry_run` is off.
///
/// # Errors
///
/// - `MdIncludeError::DocumentNotFound` if the document doesn't exist.
/// - `MdIncludeError::Io` if the document cannot be read or written.
/// - Errors from `expand_text`.
pub fn expand(document_path: &Path, config: &ExpandConfig) -> Result<DocumentReport> {
    let original = read_document(document_path)?;
    let expansion = expand_text(&original, config)?;
    let changed = expansion.text != original;

    if changed && !config.dry_run {
        fs::write(document_path, &expansion.text)?;
        tracing::info!(
            document = %document_path.display(),
            replaced = expansion.replaced,
            "expanded includes"
        );
    }

    Ok(DocumentReport {
        path: document_path.to_path_buf(),
        replaced: expansion.replaced,
        unresolved: expansion.unresolved,
        changed,
    })
}

/// Expands every Markdown document found under `root`
///
/// Stops at the first document that fails.
///
/// # Errors
///
/// Returns errors from `discover_documents` or from `expand` for any document.
pub fn run_all(root: &Path, config: &ExpandConfig) -> Result<Vec<DocumentReport>> {
    let documents = discover_documents(root, &config.extension, config.exclude.as_ref())?;
    tracing::debug!(root = %root.display(), count = documents.len(), "discovered documents");

    documents
        .iter()
        .map(|document| expand(document, config))
        .collect()
}

/// Lists every marker in every Markdown document found under `root`
///
/// # Errors
///
/// Returns errors from `discover_documents`, `read_document` or `find_markers`.
pub fn list_markers(root: &Path, config: &ExpandConfig) -> Result<Vec<MarkerListing>> {
    let documents = discover_documents(root, &config.extension, config.exclude.as_ref())?;
    let mut listings = Vec::new();

    for document in documents {
        let text = read_document(&document)?;
        for marker in find_markers(&text)? {
            let snippet = resolve_snippet_path(&marker.path, &config.base_dir);
            listings.push(MarkerListing {
                document: document.clone(),
                resolved: snippet.is_file(),
                path: marker.path,
                snippet,
                start: marker.start,
                end: marker.end,
            });
        }
    }

    Ok(listings)
}
