//! Avatar uploads: whitelist checks, staging in a temp dir, and placement
//! under the public avatars directory.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::ServiceError;

const EXTENSION_WHITELIST: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];
const MIMETYPE_WHITELIST: [&str; 4] = ["image/png", "image/jpg", "image/jpeg", "image/gif"];

pub const NOT_A_PHOTO: &str = "File isn't a photo";

/// One uploaded file as received from the multipart layer.
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl AvatarUpload {
    /// Lowercased extension including the dot, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
    }

    /// Both the extension and the declared MIME type must be whitelisted.
    pub fn is_photo(&self) -> bool {
        let ext_ok = self
            .extension()
            .is_some_and(|e| EXTENSION_WHITELIST.contains(&e.as_str()));
        let mime_ok = self
            .content_type
            .as_deref()
            .is_some_and(|m| MIMETYPE_WHITELIST.contains(&m));
        ext_ok && mime_ok
    }
}

#[derive(Debug, Clone)]
pub struct AvatarService {
    temp_dir: PathBuf,
    avatars_dir: PathBuf,
    public_prefix: String,
    max_bytes: usize,
}

impl AvatarService {
    pub fn new(temp_dir: impl Into<PathBuf>, avatars_dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            temp_dir: temp_dir.into(),
            avatars_dir: avatars_dir.into(),
            public_prefix: "/avatars".into(),
            max_bytes,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn avatars_dir(&self) -> &Path {
        &self.avatars_dir
    }

    /// Validate, stage and publish an upload; returns its public URL.
    #[instrument(skip(self, upload), fields(file_name = %upload.file_name, size = upload.bytes.len()))]
    pub async fn store(&self, upload: AvatarUpload) -> Result<String, ServiceError> {
        if !upload.is_photo() {
            return Err(ServiceError::Validation(NOT_A_PHOTO.into()));
        }
        if upload.bytes.len() > self.max_bytes {
            return Err(ServiceError::TooLarge(format!("File too large (max {} bytes)", self.max_bytes)));
        }
        let ext = upload.extension().unwrap_or_default();

        // client names are reduced to their last component before use
        let original = Path::new(&upload.file_name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let staged = self.temp_dir.join(format!("{}{}", Uuid::new_v4(), original));
        fs::create_dir_all(&self.temp_dir).await.map_err(io_err)?;
        fs::write(&staged, &upload.bytes).await.map_err(io_err)?;

        let file_name = format!("{}{}", Uuid::new_v4(), ext);
        let target = self.avatars_dir.join(&file_name);
        if let Err(e) = self.publish(&staged, &target).await {
            if let Err(cleanup) = fs::remove_file(&staged).await {
                warn!(staged = %staged.display(), error = %cleanup, "failed to remove staged avatar");
            }
            return Err(io_err(e));
        }

        let url = format!("{}/{}", self.public_prefix, file_name);
        info!(%url, "avatar_stored");
        Ok(url)
    }

    async fn publish(&self, staged: &Path, target: &Path) -> std::io::Result<()> {
        fs::create_dir_all(&self.avatars_dir).await?;
        // rename fails across filesystems; fall back to copy + remove
        if fs::rename(staged, target).await.is_err() {
            fs::copy(staged, target).await?;
            fs::remove_file(staged).await?;
        }
        Ok(())
    }
}

fn io_err(e: std::io::Error) -> ServiceError {
    ServiceError::Io(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, mime: &str, size: usize) -> AvatarUpload {
        AvatarUpload { file_name: name.into(), content_type: Some(mime.into()), bytes: vec![7u8; size] }
    }

    fn service(root: &Path, max: usize) -> AvatarService {
        AvatarService::new(root.join("tmp"), root.join("public/avatars"), max)
    }

    #[test]
    fn whitelist_requires_extension_and_mimetype() {
        assert!(upload("me.PNG", "image/png", 1).is_photo());
        assert!(upload("me.jpeg", "image/jpeg", 1).is_photo());
        assert!(!upload("me.txt", "image/png", 1).is_photo());
        assert!(!upload("me.png", "text/plain", 1).is_photo());
        assert!(!AvatarUpload { content_type: None, ..upload("me.png", "", 1) }.is_photo());
    }

    #[tokio::test]
    async fn stores_photo_under_avatars_dir() -> Result<(), anyhow::Error> {
        let root = std::env::temp_dir().join(format!("avatars_{}", Uuid::new_v4()));
        let svc = service(&root, 1024);
        let url = svc.store(upload("../../me.gif", "image/gif", 10)).await?;

        assert!(url.starts_with("/avatars/"));
        assert!(url.ends_with(".gif"));
        let stored = root.join("public").join(url.trim_start_matches('/'));
        assert_eq!(fs::read(&stored).await?.len(), 10);

        let mut staged = fs::read_dir(root.join("tmp")).await?;
        assert!(staged.next_entry().await?.is_none());
        let _ = fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn rejects_non_photos_and_oversized_files() {
        let root = std::env::temp_dir().join(format!("avatars_{}", Uuid::new_v4()));
        let svc = service(&root, 4);
        assert!(matches!(
            svc.store(upload("notes.txt", "text/plain", 1)).await,
            Err(ServiceError::Validation(m)) if m == NOT_A_PHOTO
        ));
        assert!(matches!(svc.store(upload("me.png", "image/png", 5)).await, Err(ServiceError::TooLarge(_))));
        let _ = fs::remove_dir_all(&root).await;
    }
}
