//! Shader asset catalog.
//!
//! The renderer consumes five WGSL files loaded by path. Each program loads
//! and reloads individually: one broken file never takes down the rest, it
//! just keeps its previous source (the renderer keeps its previous
//! pipeline). Content hashes let a reload skip programs whose file on disk
//! has not changed.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The five shader programs of the pipeline, in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShaderKind {
    /// Instanced scene objects, writes color + signed CoC.
    Scene,
    /// Background sphere, same outputs as `Scene`.
    Background,
    /// Instance bounding-sphere wireframe.
    Bounds,
    /// Separable blur / downsample, horizontal and vertical.
    Blur,
    /// Final composite to the swapchain.
    Composite,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 5] = [
        ShaderKind::Scene,
        ShaderKind::Background,
        ShaderKind::Bounds,
        ShaderKind::Blur,
        ShaderKind::Composite,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ShaderKind::Scene => "scene.wgsl",
            ShaderKind::Background => "background.wgsl",
            ShaderKind::Bounds => "bounds.wgsl",
            ShaderKind::Blur => "blur.wgsl",
            ShaderKind::Composite => "composite.wgsl",
        }
    }
}

/// Errors from shader asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("shader {0:?} has not been loaded")]
    NotLoaded(ShaderKind),
}

/// Result of loading one shader file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file content changed (or was loaded for the first time).
    Updated,
    /// The file matched the stored content hash; nothing to rebuild.
    Unchanged,
}

/// A loaded shader source with its content hash.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub source: String,
    pub content_hash: u64,
}

/// Catalog of shader sources keyed by program.
///
/// BTreeMap keeps iteration order deterministic, so load reports and
/// rebuilds always happen in the same program order.
#[derive(Debug, Clone)]
pub struct ShaderCatalog {
    dir: PathBuf,
    sources: BTreeMap<ShaderKind, ShaderSource>,
}

impl ShaderCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            sources: BTreeMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, kind: ShaderKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Loaded source for a program, if any.
    pub fn source(&self, kind: ShaderKind) -> Option<&ShaderSource> {
        self.sources.get(&kind)
    }

    /// Source text for a program, as an error when missing.
    pub fn require(&self, kind: ShaderKind) -> Result<&str, AssetError> {
        self.sources
            .get(&kind)
            .map(|s| s.source.as_str())
            .ok_or(AssetError::NotLoaded(kind))
    }

    /// Load (or reload) one program from disk. On IO failure the previous
    /// source, if any, stays in the catalog.
    pub fn load(&mut self, kind: ShaderKind) -> Result<LoadOutcome, AssetError> {
        let path = self.path_for(kind);
        let source = std::fs::read_to_string(&path).map_err(|source| AssetError::Io {
            path: path.clone(),
            source,
        })?;
        let content_hash = content_hash(&source);

        if let Some(existing) = self.sources.get(&kind) {
            if existing.content_hash == content_hash {
                tracing::debug!(?kind, "shader unchanged");
                return Ok(LoadOutcome::Unchanged);
            }
        }

        tracing::info!(?kind, path = %path.display(), "shader loaded");
        self.sources.insert(
            kind,
            ShaderSource {
                source,
                content_hash,
            },
        );
        Ok(LoadOutcome::Updated)
    }

    /// Load every program, reporting each outcome individually.
    pub fn load_all(&mut self) -> Vec<(ShaderKind, Result<LoadOutcome, AssetError>)> {
        ShaderKind::ALL
            .iter()
            .map(|&kind| (kind, self.load(kind)))
            .collect()
    }
}

/// First 8 bytes of the SHA-256 of the source text.
fn content_hash(source: &str) -> u64 {
    let digest = Sha256::digest(source.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

pub fn crate_info() -> &'static str {
    "defocus-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_all_shaders(dir: &Path) {
        for kind in ShaderKind::ALL {
            std::fs::write(dir.join(kind.file_name()), format!("// {kind:?}\n")).unwrap();
        }
    }

    #[test]
    fn file_names_are_distinct() {
        let mut names: Vec<_> = ShaderKind::ALL.iter().map(|k| k.file_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn load_all_reads_five_programs() {
        let dir = tempfile::tempdir().unwrap();
        write_all_shaders(dir.path());

        let mut catalog = ShaderCatalog::new(dir.path());
        let report = catalog.load_all();
        assert_eq!(report.len(), 5);
        for (kind, outcome) in report {
            assert!(matches!(outcome, Ok(LoadOutcome::Updated)), "{kind:?}");
            assert!(catalog.source(kind).is_some());
        }
    }

    #[test]
    fn unchanged_file_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        write_all_shaders(dir.path());

        let mut catalog = ShaderCatalog::new(dir.path());
        assert_eq!(catalog.load(ShaderKind::Blur).unwrap(), LoadOutcome::Updated);
        assert_eq!(
            catalog.load(ShaderKind::Blur).unwrap(),
            LoadOutcome::Unchanged
        );

        std::fs::write(dir.path().join("blur.wgsl"), "// edited\n").unwrap();
        assert_eq!(catalog.load(ShaderKind::Blur).unwrap(), LoadOutcome::Updated);
    }

    #[test]
    fn missing_file_keeps_previous_source() {
        let dir = tempfile::tempdir().unwrap();
        write_all_shaders(dir.path());

        let mut catalog = ShaderCatalog::new(dir.path());
        catalog.load(ShaderKind::Scene).unwrap();
        let before = catalog.source(ShaderKind::Scene).unwrap().content_hash;

        std::fs::remove_file(dir.path().join("scene.wgsl")).unwrap();
        assert!(matches!(
            catalog.load(ShaderKind::Scene),
            Err(AssetError::Io { .. })
        ));
        // Degraded but still serving the old source.
        assert_eq!(
            catalog.source(ShaderKind::Scene).unwrap().content_hash,
            before
        );
    }

    #[test]
    fn require_reports_unloaded_program() {
        let catalog = ShaderCatalog::new("/nonexistent");
        assert!(matches!(
            catalog.require(ShaderKind::Composite),
            Err(AssetError::NotLoaded(ShaderKind::Composite))
        ));
    }
}
