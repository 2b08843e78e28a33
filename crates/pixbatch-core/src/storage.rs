//! Persistence sink for originals and derivatives.
//!
//! The pipeline only ever asks a store to write bytes under a location and
//! gets back success or failure. Locations are the strings returned to
//! clients, e.g. `images/3f1e….jpg`.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::error::StorageError;

/// Where processed images go.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Location a file called `name` would be stored at.
    fn location_for(&self, name: &str) -> String;

    /// Whether `location` is one this store could have handed out.
    fn validate_location(&self, location: &str) -> Result<(), StorageError> {
        check_location(location).map(|_| ())
    }

    /// Write `bytes` at `location`, replacing any previous content.
    async fn save(&self, location: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Whether something is stored at `location`.
    async fn exists(&self, location: &str) -> bool;

    /// Read back the bytes stored at `location`.
    async fn read(&self, location: &str) -> Result<Vec<u8>, StorageError>;
}

/// Rejects absolute locations and parent-directory components.
pub fn check_location(location: &str) -> Result<&Path, StorageError> {
    let path = Path::new(location);
    if location.is_empty() {
        return Err(StorageError::InvalidLocation("empty location".into()));
    }
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(StorageError::InvalidLocation(location.to_string()));
    }
    Ok(path)
}

/// Stores files in a directory on the local filesystem.
///
/// Locations are relative paths that start with the image directory, so the
/// same string can be handed back to clients and resolved again later.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
    base: PathBuf,
}

impl LocalImageStore {
    /// Store rooted at `image_dir`; locations are resolved against the
    /// current directory.
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self::with_base(".", image_dir)
    }

    /// Store whose relative locations are resolved against `base`.
    pub fn with_base(base: impl Into<PathBuf>, image_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: image_dir.into(),
            base: base.into(),
        }
    }

    /// Directory that receives new files.
    pub fn image_dir(&self) -> PathBuf {
        self.base.join(&self.root)
    }

    /// Create the image directory.
    pub async fn init(&self) -> Result<(), StorageError> {
        fs::create_dir_all(self.image_dir()).await?;
        Ok(())
    }

    /// Map a location to a file path. Relative and absolute locations alike
    /// must start with the image directory.
    fn resolve(&self, location: &str) -> Result<PathBuf, StorageError> {
        let path = Path::new(location);
        let inside = if path.is_absolute() {
            path.strip_prefix(&self.root).map(Path::to_path_buf)
        } else {
            without_cur_dir(path)
                .strip_prefix(without_cur_dir(&self.root))
                .map(Path::to_path_buf)
        };
        let relative = inside.map_err(|_| {
            StorageError::InvalidLocation(format!(
                "{location} is outside {}",
                self.root.display()
            ))
        })?;
        check_location(&relative.to_string_lossy())?;
        Ok(self.image_dir().join(relative))
    }
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[async_trait]
impl ImageStore for LocalImageStore {
    fn location_for(&self, name: &str) -> String {
        self.root.join(name).to_string_lossy().into_owned()
    }

    fn validate_location(&self, location: &str) -> Result<(), StorageError> {
        self.resolve(location).map(|_| ())
    }

    async fn save(&self, location: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve(location)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        debug!("Writing {} bytes to {:?}", bytes.len(), path);
        fs::write(&path, bytes).await?;
        Ok(())
    }

    async fn exists(&self, location: &str) -> bool {
        match self.resolve(location) {
            Ok(path) => fs::try_exists(path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn read(&self, location: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(location)?;
        Ok(fs::read(path).await?)
    }
}
