//! Declaration sources
//!
//! Architecture: Anti-Corruption Layer - External parsers hand declarations over as manifests
//! - Each manifest format implements DeclarationSource
//! - Manifests are discovered with PathFilter and loaded sequentially or streamed async
//! - Unknown declaration kinds fail at load time, never inside the engine

pub mod path_filter;

use crate::domain::{
    Declaration, DeclarationKind, Modifier, NamingError, NamingResult, SourceLocation,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

pub use path_filter::PathFilter;

/// A manifest file produced by an external parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Source file the declarations belong to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    pub declarations: Vec<ManifestEntry>,
}

/// One declaration record inside a manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub identifier: String,
    pub kind: DeclarationKind,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enclosing_kind: Option<DeclarationKind>,
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    /// Overrides the manifest-level file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Manifest {
    /// Turn entries into declarations; `origin` is used when no file is named
    pub fn into_declarations(self, origin: &Path) -> Vec<Declaration> {
        let default_file = self.file.unwrap_or_else(|| origin.to_path_buf());

        self.declarations
            .into_iter()
            .map(|entry| {
                let file = entry.file.unwrap_or_else(|| default_file.clone());
                let mut location = SourceLocation::new(file, entry.line);
                if let Some(column) = entry.column {
                    location = location.with_column(column);
                }

                let declaration = Declaration::new(entry.identifier, entry.kind, location)
                    .with_modifiers(entry.modifiers);
                match entry.enclosing_kind {
                    Some(enclosing) => declaration.within(enclosing),
                    None => declaration,
                }
            })
            .collect()
    }
}

/// Trait for manifest formats
pub trait DeclarationSource: Send + Sync {
    /// Parse manifest content into declarations
    fn load(&self, path: &Path, content: &str) -> NamingResult<Vec<Declaration>>;

    /// Check if this source handles the given file type
    fn handles_file(&self, path: &Path) -> bool;
}

/// `*.json` manifests
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonManifestSource;

/// `*.yaml` and `*.yml` manifests
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlManifestSource;

impl DeclarationSource for JsonManifestSource {
    fn load(&self, path: &Path, content: &str) -> NamingResult<Vec<Declaration>> {
        let manifest: Manifest = serde_json::from_str(content)
            .map_err(|e| NamingError::source(path.display().to_string(), e.to_string()))?;
        Ok(manifest.into_declarations(path))
    }

    fn handles_file(&self, path: &Path) -> bool {
        has_extension(path, &["json"])
    }
}

impl DeclarationSource for YamlManifestSource {
    fn load(&self, path: &Path, content: &str) -> NamingResult<Vec<Declaration>> {
        let manifest: Manifest = serde_yaml::from_str(content)
            .map_err(|e| NamingError::source(path.display().to_string(), e.to_string()))?;
        Ok(manifest.into_declarations(path))
    }

    fn handles_file(&self, path: &Path) -> bool {
        has_extension(path, &["yaml", "yml"])
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

/// Declarations loaded from a set of manifests
#[derive(Debug, Default)]
pub struct LoadedDeclarations {
    pub declarations: Vec<Declaration>,
    pub manifests_loaded: usize,
    /// Manifests that failed to load when not failing fast
    pub failures: Vec<(PathBuf, String)>,
}

/// Discovers and loads declaration manifests
pub struct ManifestLoader {
    sources: Vec<Box<dyn DeclarationSource>>,
    path_filter: PathFilter,
}

impl ManifestLoader {
    /// Loader for JSON and YAML manifests behind the given filter
    pub fn new(path_filter: PathFilter) -> Self {
        Self {
            sources: vec![Box::new(JsonManifestSource), Box::new(YamlManifestSource)],
            path_filter,
        }
    }

    /// Register an additional manifest format
    pub fn with_source(mut self, source: Box<dyn DeclarationSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn path_filter(&self) -> &PathFilter {
        &self.path_filter
    }

    pub fn path_filter_mut(&mut self) -> &mut PathFilter {
        &mut self.path_filter
    }

    fn source_for(&self, path: &Path) -> Option<&dyn DeclarationSource> {
        self.sources.iter().find(|s| s.handles_file(path)).map(|s| s.as_ref())
    }

    /// Whether some registered source can read this file
    pub fn handles_file(&self, path: &Path) -> bool {
        self.source_for(path).is_some()
    }

    /// Expand files and directories into manifest paths
    ///
    /// Files named explicitly are kept even if the filter would exclude them.
    pub fn discover<P: AsRef<Path>>(&self, paths: &[P]) -> NamingResult<Vec<PathBuf>> {
        let mut manifests = Vec::new();

        for path in paths {
            let path = path.as_ref();
            if path.is_file() {
                if self.handles_file(path) {
                    manifests.push(path.to_path_buf());
                }
            } else if path.is_dir() {
                manifests.extend(
                    self.path_filter
                        .find_files(path)?
                        .into_iter()
                        .filter(|file| self.handles_file(file)),
                );
            } else {
                return Err(NamingError::source(path.display().to_string(), "No such file or directory"));
            }
        }

        tracing::debug!("Discovered {} manifests", manifests.len());
        Ok(manifests)
    }

    /// Load declarations from one manifest
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> NamingResult<Vec<Declaration>> {
        let path = path.as_ref();
        let source = self.source_for(path).ok_or_else(|| {
            NamingError::source(path.display().to_string(), "Unsupported manifest format")
        })?;

        let content = fs::read_to_string(path).map_err(|e| {
            NamingError::source(path.display().to_string(), format!("Failed to read file: {e}"))
        })?;

        source.load(path, &content)
    }

    /// Load every manifest in order
    pub fn load_all(&self, manifests: &[PathBuf], fail_fast: bool) -> NamingResult<LoadedDeclarations> {
        let mut loaded = LoadedDeclarations::default();

        for path in manifests {
            match self.load_file(path) {
                Ok(declarations) => {
                    loaded.declarations.extend(declarations);
                    loaded.manifests_loaded += 1;
                }
                Err(e) if fail_fast => return Err(e),
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}", path.display(), e);
                    loaded.failures.push((path.clone(), e.to_string()));
                }
            }
        }

        Ok(loaded)
    }

    /// Read manifests with tokio and push their declarations into a channel
    ///
    /// Stops early when the receiver is dropped. Returns the number of declarations sent.
    pub async fn stream(
        &self,
        manifests: &[PathBuf],
        sender: mpsc::Sender<Declaration>,
        fail_fast: bool,
    ) -> NamingResult<usize> {
        let mut sent = 0;

        for path in manifests {
            let declarations = match self.load_file_async(path).await {
                Ok(declarations) => declarations,
                Err(e) if fail_fast => return Err(e),
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}", path.display(), e);
                    continue;
                }
            };

            for declaration in declarations {
                if sender.send(declaration).await.is_err() {
                    tracing::debug!("Receiver closed; stopping manifest stream");
                    return Ok(sent);
                }
                sent += 1;
            }
        }

        Ok(sent)
    }

    async fn load_file_async(&self, path: &Path) -> NamingResult<Vec<Declaration>> {
        let source = self.source_for(path).ok_or_else(|| {
            NamingError::source(path.display().to_string(), "Unsupported manifest format")
        })?;

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            NamingError::source(path.display().to_string(), format!("Failed to read file: {e}"))
        })?;

        source.load(path, &content)
    }
}
