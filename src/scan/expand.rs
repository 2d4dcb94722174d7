//! Target pattern expansion

use crate::domain::{is_reserved_result_file, FileExtension};
use crate::error::{AppendError, AppendResult};
use crate::utils::normalize_path;
use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Sentinel target meaning every eligible file in the working directory.
pub const ALL_FILES: &str = ".";

/// Expands target patterns into a concrete list of files.
pub struct TargetExpander {
    root_path: PathBuf,
    ignore: Vec<String>,
    recursive: bool,
    filetypes: Vec<FileExtension>,
    candidates: Option<Vec<PathBuf>>,
}

impl TargetExpander {
    /// Create an expander rooted at `root_path` accepting every known extension.
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            ignore: Vec::new(),
            recursive: false,
            filetypes: FileExtension::ALL.to_vec(),
            candidates: None,
        }
    }

    /// Set path fragments that exclude a candidate when contained in its path
    pub fn ignore(mut self, fragments: Vec<String>) -> Self {
        self.ignore = fragments.into_iter().filter(|f| !f.is_empty()).collect();
        self
    }

    /// Set whether subdirectories are walked
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set the extensions eligible for `.` and wildcard targets
    pub fn filetypes(mut self, filetypes: Vec<FileExtension>) -> Self {
        self.filetypes = filetypes;
        self
    }

    /// Expand `targets` into absolute, de-duplicated file paths in sorted order.
    pub fn expand(&mut self, targets: &[String]) -> AppendResult<Vec<PathBuf>> {
        self.root_path = self
            .root_path
            .canonicalize()
            .map_err(|e| AppendError::io(&self.root_path, e))?;

        let mut resolved = BTreeSet::new();
        for target in targets {
            let target = target.trim();
            if target == ALL_FILES {
                resolved.extend(self.candidates()?.iter().cloned());
            } else if target.starts_with('*') {
                let matcher = build_suffix_matcher(target)?;
                let root = self.root_path.clone();
                let matched: Vec<PathBuf> = self
                    .candidates()?
                    .iter()
                    .filter(|path| matcher.is_match(relative_to(&root, path)))
                    .cloned()
                    .collect();
                if matched.is_empty() {
                    tracing::warn!("No files match {}", target);
                }
                resolved.extend(matched);
            } else if let Some(path) = self.resolve_literal(target)? {
                resolved.insert(path);
            }
        }

        tracing::debug!("Expanded {:?} into {} file(s)", targets, resolved.len());
        Ok(resolved.into_iter().collect())
    }

    fn resolve_literal(&self, target: &str) -> AppendResult<Option<PathBuf>> {
        let path = Path::new(target);
        let path = if path.is_absolute() { path.to_path_buf() } else { self.root_path.join(path) };
        let path = path.canonicalize().map_err(|_| AppendError::TargetNotFound(path.clone()))?;

        if is_reserved_result_file(&path) {
            tracing::warn!("Skipping reserved result file {}", path.display());
            return Ok(None);
        }
        Ok(Some(path))
    }

    /// Files eligible for `.` and wildcard targets, walked once and cached.
    fn candidates(&mut self) -> AppendResult<&[PathBuf]> {
        if self.candidates.is_none() {
            self.candidates = Some(self.walk()?);
        }
        Ok(self.candidates.as_deref().unwrap_or_default())
    }

    fn walk(&self) -> AppendResult<Vec<PathBuf>> {
        let root = self.root_path.clone();
        let fragments = self.ignore.clone();

        // Only the configured fragments filter paths, not VCS or hidden-file rules.
        let mut builder = WalkBuilder::new(&self.root_path);
        builder
            .standard_filters(false)
            .follow_links(false)
            .max_depth(if self.recursive { None } else { Some(1) })
            .filter_entry(move |entry| !is_ignored(&relative_to(&root, entry.path()), &fragments));

        let mut files = Vec::new();
        for entry_result in builder.build() {
            let entry = match entry_result {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            if is_reserved_result_file(path) {
                tracing::debug!("Skipping reserved result file {}", path.display());
                continue;
            }
            match FileExtension::from_path(path) {
                Some(ext) if self.filetypes.contains(&ext) => files.push(path.to_path_buf()),
                _ => continue,
            }
        }

        files.sort();
        Ok(files)
    }
}

/// Expand `targets` relative to `cwd`.
pub fn expand(
    targets: &[String],
    cwd: &Path,
    ignore: &[String],
    recursive: bool,
    filetypes: &[FileExtension],
) -> AppendResult<Vec<PathBuf>> {
    TargetExpander::new(cwd.to_path_buf())
        .ignore(ignore.to_vec())
        .recursive(recursive)
        .filetypes(filetypes.to_vec())
        .expand(targets)
}

/// Compile a `*`-prefixed target into a case-insensitive suffix match.
///
/// Only the leading `*` is a wildcard; `[`, `{` and `?` in the rest of the
/// target match literally.
fn build_suffix_matcher(target: &str) -> AppendResult<GlobMatcher> {
    let suffix = target.strip_prefix('*').unwrap_or(target);
    let pattern = format!("*{}", globset::escape(suffix));
    let glob = GlobBuilder::new(&pattern)
        .case_insensitive(true)
        .literal_separator(false)
        .build()
        .map_err(|source| AppendError::Pattern { pattern: target.to_string(), source })?;
    Ok(glob.compile_matcher())
}

fn relative_to(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    normalize_path(&rel.to_string_lossy())
}

fn is_ignored(rel_path: &str, fragments: &[String]) -> bool {
    !rel_path.is_empty() && fragments.iter().any(|fragment| rel_path.contains(fragment.as_str()))
}
