//! # Filesystem Subject Resolver
//!
//! Resolves statement subjects to files under a base directory and hashes
//! them with SHA-256. Subject URIs must be relative paths that stay inside
//! the base directory, and the file they name must still be inside it once
//! symlinks are followed.

use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};

use evidence_core::hex;
use evidence_dsse::{DigestSet, ResolveError, SubjectResolver};
use sha2::{Digest, Sha256};

/// Resolves `uri` to `base_dir/uri`.
#[derive(Debug, Clone)]
pub struct FsResolver {
    base_dir: PathBuf,
}

impl FsResolver {
    /// Resolver rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn path_for(&self, uri: &str) -> Result<PathBuf, ResolveError> {
        let relative = Path::new(uri);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(format!("subject {uri:?} is not a path inside the base directory").into());
        }

        let base = self.base_dir.canonicalize().map_err(|e| {
            format!("cannot resolve base directory {}: {e}", self.base_dir.display())
        })?;
        let joined = self.base_dir.join(relative);
        let resolved = joined
            .canonicalize()
            .map_err(|e| format!("cannot open {}: {e}", joined.display()))?;
        if !resolved.starts_with(&base) {
            return Err(format!("subject {uri:?} resolves outside the base directory").into());
        }
        Ok(resolved)
    }
}

impl SubjectResolver for FsResolver {
    fn resolve(&self, uri: &str) -> Result<DigestSet, ResolveError> {
        let path = self.path_for(uri)?;
        let mut file = File::open(&path)
            .map_err(|e| format!("cannot open {}: {e}", path.display()))?;
        let mut hasher = Sha256::new();
        io::copy(&mut file, &mut hasher)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        let digest = hex::encode(&hasher.finalize());
        tracing::debug!(uri, path = %path.display(), sha256 = %digest, "hashed subject");
        Ok(DigestSet::sha256(digest))
    }
}
