use std::{
    io,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use tracing::{debug, warn};

use super::errors::StoreError;

/// Generic JSON file-backed ordered list.
///
/// The backing file holds one pretty-printed JSON array. Nothing is cached:
/// every call reads the file, so the file is the only state. Mutations run
/// under an async mutex, which serializes read-modify-write cycles within the
/// process, and are persisted by writing a sibling temp file and renaming it
/// over the target.
///
/// The store never creates its backing file; a missing file is a read error.
pub struct JsonListStore<T> {
    file_path: PathBuf,
    write_lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonListStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into(), write_lock: Mutex::new(()), _marker: PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read and decode the whole document.
    pub async fn load(&self) -> Result<Vec<T>, StoreError> {
        let bytes = fs::read(&self.file_path)
            .await
            .map_err(|source| StoreError::StorageRead { path: self.file_path.clone(), source })?;
        let items: Vec<T> = serde_json::from_slice(&bytes)
            .map_err(|source| StoreError::Decode { path: self.file_path.clone(), source })?;
        debug!(path = %self.file_path.display(), count = items.len(), "document loaded");
        Ok(items)
    }

    /// Load under the lock and hand the items to `f`; nothing is written.
    pub async fn read<R, F>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&[T]) -> R,
    {
        let _guard = self.write_lock.lock().await;
        let items = self.load().await?;
        Ok(f(&items))
    }

    /// Load, apply `f`, persist. `f` returning an error aborts without writing.
    pub async fn mutate<R, F>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, StoreError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut items = self.load().await?;
        let out = f(&mut items)?;
        self.persist(&items).await?;
        Ok(out)
    }

    async fn persist(&self, items: &[T]) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(items).map_err(|e| StoreError::StorageWrite {
            path: self.file_path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;

        let tmp = self.tmp_path();
        if let Err(source) = write_then_rename(&tmp, &self.file_path, &data).await {
            if let Err(e) = fs::remove_file(&tmp).await {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(tmp = %tmp.display(), error = %e, "failed to clean up temp file");
                }
            }
            return Err(StoreError::StorageWrite { path: self.file_path.clone(), source });
        }
        debug!(path = %self.file_path.display(), count = items.len(), bytes = data.len(), "document persisted");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store".to_string());
        self.file_path.with_file_name(format!(".{}.{}.tmp", name, uuid::Uuid::new_v4().simple()))
    }
}

async fn write_then_rename(tmp: &Path, target: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(tmp).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(tmp, target).await
}
