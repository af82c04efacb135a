use crate::error::{MdIncludeError, Result};
use globset::GlobSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Reads the full text of a Markdown document
///
/// # Errors
///
/// - `MdIncludeError::DocumentNotFound` if the path doesn't exist or isn't a file.
/// - `MdIncludeError::Io` if there's an error reading the file.
pub fn read_document(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(MdIncludeError::DocumentNotFound {
            path: path.to_path_buf(),
        });
    }

    fs::read_to_string(path).map_err(Into::into)
}

/// Reads a snippet file, returning `None` when no regular file exists at `path`
///
/// # Errors
///
/// Returns `MdIncludeError::Io` if the file exists but cannot be read as UTF-8 text.
pub fn read_snippet(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }

    Ok(Some(fs::read_to_string(path)?))
}

/// Resolves a marker path against the base directory.
///
/// No canonicalization and no containment check: `../shared/x.yml` and
/// absolute paths are taken as written.
pub fn resolve_snippet_path(reference: &str, base_dir: &Path) -> PathBuf {
    base_dir.join(reference)
}

/// Finds every file under `root` whose name ends with `.{extension}`
///
/// Paths matched by `exclude` (relative to `root`) are skipped. Results are
/// sorted by file name within each directory.
///
/// # Errors
///
/// - `MdIncludeError::RootNotFound` if `root` is not a directory.
/// - `MdIncludeError::WalkDir` if traversal fails part way.
pub fn discover_documents(
    root: &Path,
    extension: &str,
    exclude: Option<&GlobSet>,
) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(MdIncludeError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let suffix = format!(".{}", extension.trim_start_matches('.'));
    let mut documents = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let matches_suffix = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(&suffix));
        if !matches_suffix {
            continue;
        }

        if let Some(set) = exclude {
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if set.is_match(relative) {
                tracing::debug!(path = %entry.path().display(), "excluded");
                continue;
            }
        }

        documents.push(entry.into_path());
    }

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use globset::{Glob, GlobSetBuilder};
    use tempfile::TempDir;

    #[test]
    fn test_read_document() {
        let temp_dir = TempDir::new().unwrap();
        let doc = temp_dir.path().join("doc.md");

        fs::write(&doc, "# Title\n").unwrap();
        assert_eq!(read_document(&doc).unwrap(), "# Title\n");

        let missing = temp_dir.path().join("missing.md");
        let result = read_document(&missing);
        assert!(matches!(result, Err(MdIncludeError::DocumentNotFound { .. })));

        // A directory is not a document
        let dir = temp_dir.path().join("dir.md");
        fs::create_dir(&dir).unwrap();
        let result = read_document(&dir);
        assert!(matches!(result, Err(MdIncludeError::DocumentNotFound { .. })));
    }

    #[test]
    fn test_read_snippet() {
        let temp_dir = TempDir::new().unwrap();
        let snippet = temp_dir.path().join("a.yml");
        fs::write(&snippet, "key: value").unwrap();

        assert_eq!(
            read_snippet(&snippet).unwrap(),
            Some("key: value".to_string())
        );
        assert_eq!(read_snippet(&temp_dir.path().join("nope.yml")).unwrap(), None);
        assert_eq!(read_snippet(temp_dir.path()).unwrap(), None);
    }

    #[test]
    fn test_read_snippet_empty_and_unicode() {
        let temp_dir = TempDir::new().unwrap();
        let empty = temp_dir.path().join("empty.yml");
        fs::write(&empty, "").unwrap();
        assert_eq!(read_snippet(&empty).unwrap(), Some(String::new()));

        let unicode = temp_dir.path().join("unicode.yml");
        fs::write(&unicode, "greeting: \"héllo wörld\"\n").unwrap();
        assert_eq!(
            read_snippet(&unicode).unwrap(),
            Some("greeting: \"héllo wörld\"\n".to_string())
        );
    }

    #[test]
    fn test_resolve_snippet_path() {
        let base = Path::new("/work/project");
        assert_eq!(
            resolve_snippet_path("cfg/a.yml", base),
            PathBuf::from("/work/project/cfg/a.yml")
        );
        assert_eq!(
            resolve_snippet_path("../shared/b.yml", base),
            PathBuf::from("/work/project/../shared/b.yml")
        );
        assert_eq!(
            resolve_snippet_path("/etc/c.yml", base),
            PathBuf::from("/etc/c.yml")
        );
    }

    #[test]
    fn test_discover_documents_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("guide/deep")).unwrap();
        fs::write(root.join("index.md"), "").unwrap();
        fs::write(root.join("guide/setup.md"), "").unwrap();
        fs::write(root.join("guide/deep/notes.md"), "").unwrap();
        fs::write(root.join("guide/config.yml"), "").unwrap();
        fs::write(root.join("README.markdown"), "").unwrap();

        let docs = discover_documents(root, "md", None).unwrap();
        let relative: Vec<_> = docs
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(relative.len(), 3);
        assert!(relative.contains(&PathBuf::from("index.md")));
        assert!(relative.contains(&PathBuf::from("guide/setup.md")));
        assert!(relative.contains(&PathBuf::from("guide/deep/notes.md")));
    }

    #[test]
    fn test_discover_documents_custom_extension() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.md"), "").unwrap();
        fs::write(root.join("b.markdown"), "").unwrap();

        let docs = discover_documents(root, ".markdown", None).unwrap();
        assert_eq!(docs, vec![root.join("b.markdown")]);
    }

    #[test]
    fn test_discover_documents_exclude() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("drafts")).unwrap();
        fs::write(root.join("keep.md"), "").unwrap();
        fs::write(root.join("drafts/skip.md"), "").unwrap();

        let mut builder = GlobSetBuilder::new();
        builder.add(Glob::new("drafts/**").unwrap());
        let set = builder.build().unwrap();

        let docs = discover_documents(root, "md", Some(&set)).unwrap();
        assert_eq!(docs, vec![root.join("keep.md")]);
    }

    #[test]
    fn test_discover_documents_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let result = discover_documents(&temp_dir.path().join("ReadMe"), "md", None);
        assert!(matches!(result, Err(MdIncludeError::RootNotFound { .. })));
    }
}
