use crate::catalog::SiteCatalog;
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Loads the site table on first use and keeps it until told otherwise.
///
/// The cached catalog never expires on its own: edits to the file are only
/// picked up after [`reload`](Self::reload) or [`invalidate`](Self::invalidate).
#[derive(Debug)]
pub struct SiteCache {
    path: PathBuf,
    catalog: RwLock<Option<Arc<SiteCatalog>>>,
}
impl SiteCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), catalog: RwLock::new(None) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.catalog.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// The cached catalog, loading it if this is the first call since
    /// construction or the last invalidation. A failed load is not cached.
    pub fn get(&self) -> Result<Arc<SiteCatalog>> {
        if let Some(catalog) = self.catalog.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            return Ok(Arc::clone(catalog));
        }
        let mut slot = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have filled it while we waited for the lock.
        if let Some(catalog) = slot.as_ref() {
            return Ok(Arc::clone(catalog));
        }
        let catalog = Arc::new(SiteCatalog::from_path(&self.path)?);
        *slot = Some(Arc::clone(&catalog));
        Ok(catalog)
    }

    /// Re-read the file now, replacing the cached catalog on success. On
    /// failure the previous catalog (if any) stays in place.
    pub fn reload(&self) -> Result<Arc<SiteCatalog>> {
        let catalog = Arc::new(SiteCatalog::from_path(&self.path)?);
        tracing::info!(path = %self.path.display(), count = catalog.len(), "Reloaded radar site list");
        *self.catalog.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&catalog));
        Ok(catalog)
    }

    /// Forget the cached catalog; the next [`get`](Self::get) reads the file.
    pub fn invalidate(&self) {
        *self.catalog.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
