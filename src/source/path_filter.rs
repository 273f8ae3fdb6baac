//! Path filtering using .gitignore-style patterns
//!
//! Architectural Principle: Service Layer - PathFilter decides which manifests are read
//! - Patterns are applied in order; the last match wins and `!` re-includes
//! - Walked files are matched relative to the walk root, so the root's own location never matters
//! - `.namingignore` files apply to everything below their directory
//! - Directory walking is delegated to walkdir

use crate::domain::{NamingError, NamingResult};
use crate::config::DEFAULT_IGNORE_FILE;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Manages path filtering using .gitignore-style patterns
#[derive(Debug, Clone)]
pub struct PathFilter {
    patterns: Vec<FilterPattern>,
    /// Name of per-directory ignore files, `None` when disabled
    ignore_filename: Option<String>,
}

#[derive(Debug, Clone)]
struct FilterPattern {
    glob: glob::Pattern,
    /// Starts with `!`
    reinclude: bool,
    /// Contains a `/`, so it matches against the whole path
    anchored: bool,
    source: String,
}

impl FilterPattern {
    fn parse(line: &str) -> NamingResult<Self> {
        let (reinclude, body) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };
        let body = body.trim_start_matches('/').trim_end_matches('/');

        let glob = glob::Pattern::new(body)
            .map_err(|e| NamingError::pattern(format!("Invalid pattern '{line}': {e}")))?;

        Ok(Self { glob, reinclude, anchored: body.contains('/'), source: line.to_string() })
    }

    fn matches(&self, path: &Path) -> bool {
        if self.anchored {
            return self.glob.matches_path(path);
        }

        // Unanchored patterns match any single path component
        path.components().any(|c| self.glob.matches(&c.as_os_str().to_string_lossy()))
    }
}

impl PathFilter {
    /// Create a new path filter with the given patterns
    pub fn new(patterns: Vec<String>, ignore_filename: Option<String>) -> NamingResult<Self> {
        let patterns = patterns.iter().map(|p| FilterPattern::parse(p)).collect::<NamingResult<_>>()?;
        Ok(Self { patterns, ignore_filename })
    }

    /// Default exclusions plus `.namingignore` processing
    pub fn with_defaults() -> NamingResult<Self> {
        Self::new(
            vec![
                "**/target/**".to_string(),
                "**/node_modules/**".to_string(),
                "**/.git/**".to_string(),
            ],
            Some(DEFAULT_IGNORE_FILE.to_string()),
        )
    }

    /// Stop consulting ignore files
    pub fn without_ignore_files(mut self) -> Self {
        self.ignore_filename = None;
        self
    }

    /// Add a pattern to the filter
    pub fn add_pattern(&mut self, pattern: &str) -> NamingResult<()> {
        self.patterns.push(FilterPattern::parse(pattern)?);
        Ok(())
    }

    /// Whether a file passes configured patterns and ignore files
    pub fn should_include<P: AsRef<Path>>(&self, path: P) -> NamingResult<bool> {
        let path = path.as_ref();
        self.includes(path, path.strip_prefix(".").unwrap_or(path))
    }

    /// `relative` is what patterns see; ignore files are located from `path`
    fn includes(&self, path: &Path, relative: &Path) -> NamingResult<bool> {
        if !apply(&self.patterns, relative, true) {
            return Ok(false);
        }

        match &self.ignore_filename {
            Some(name) => Ok(!self.is_ignored_by_files(path, name)?),
            None => Ok(true),
        }
    }

    fn is_ignored_by_files(&self, path: &Path, ignore_filename: &str) -> NamingResult<bool> {
        // Outermost ignore file first, so nearer files override
        let ancestors: Vec<&Path> = path.ancestors().skip(1).collect();
        let mut included = true;

        for dir in ancestors.into_iter().rev() {
            let ignore_file = dir.join(ignore_filename);
            if !ignore_file.is_file() {
                continue;
            }

            if let Ok(relative) = path.strip_prefix(dir) {
                let patterns = load_ignore_file(&ignore_file)?;
                included = apply(&patterns, relative, included);
            }
        }

        Ok(!included)
    }

    /// All files below `root` that pass the filter
    pub fn find_files<P: AsRef<Path>>(&self, root: P) -> NamingResult<Vec<PathBuf>> {
        let root = root.as_ref();
        let mut files = Vec::new();

        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .ok()
                .filter(|r| !r.as_os_str().is_empty())
                .unwrap_or(entry.path());

            if self.includes(entry.path(), relative)? {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Keep only the paths that pass the filter
    pub fn filter_paths<P: AsRef<Path>>(&self, paths: &[P]) -> NamingResult<Vec<PathBuf>> {
        let mut filtered = Vec::new();
        for path in paths {
            if self.should_include(path)? {
                filtered.push(path.as_ref().to_path_buf());
            }
        }
        Ok(filtered)
    }

    /// Which patterns match a path, for `--verbose` output
    pub fn explain<P: AsRef<Path>>(&self, path: P) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|p| p.matches(path.as_ref()))
            .map(|p| p.source.clone())
            .collect()
    }
}

/// Apply patterns in order; last match wins
fn apply(patterns: &[FilterPattern], path: &Path, initially_included: bool) -> bool {
    patterns
        .iter()
        .filter(|p| p.matches(path))
        .last()
        .map_or(initially_included, |p| p.reinclude)
}

fn load_ignore_file(path: &Path) -> NamingResult<Vec<FilterPattern>> {
    let content = fs::read_to_string(path).map_err(|e| {
        NamingError::config(format!("Failed to read ignore file '{}': {}", path.display(), e))
    })?;

    let mut patterns = Vec::new();
    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match FilterPattern::parse(line) {
            Ok(pattern) => patterns.push(pattern),
            Err(e) => tracing::warn!("{} in {}", e, path.display()),
        }
    }

    Ok(patterns)
}
