use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use chrono::Utc;
use rand::Rng;
use tokio::{fs, io::AsyncWriteExt};

use crate::{
    dto::uploads::StoredFile,
    error::{AppError, AppResult},
};

pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
pub const MAX_FILES: usize = 10;
pub const PUBLIC_PREFIX: &str = "/uploads";

pub const ALLOWED_EXTENSIONS: [&str; 9] = [
    "jpeg", "jpg", "png", "gif", "webp", "mp4", "avi", "mov", "wmv",
];

pub const ALLOWED_MIME_TYPES: [&str; 10] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "video/mp4",
    "video/avi",
    "video/x-msvideo",
    "video/quicktime",
    "video/x-ms-wmv",
];

/// Where product media lands and what is accepted.
///
/// Only the file name extension and the declared content type are checked.
/// Both come from the client, so neither proves what the bytes are.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub dir: PathBuf,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl UploadPolicy {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_file_size: MAX_FILE_SIZE,
            max_files: MAX_FILES,
        }
    }

    /// Returns the normalized extension when both the name and the declared
    /// type are on the allow-list.
    pub fn check(&self, file_name: &str, content_type: Option<&str>) -> AppResult<String> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
            .ok_or_else(|| AppError::UnsupportedMedia(format!("{file_name}: extension not allowed")))?;

        let mime = content_type
            .map(|m| m.trim().to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_MIME_TYPES.contains(&mime.as_str()) {
            return Err(AppError::UnsupportedMedia(format!(
                "{file_name}: content type '{mime}' not allowed"
            )));
        }

        Ok(ext)
    }

    /// Stream every file field of `multipart` into the upload directory.
    ///
    /// Text fields are ignored. On any failure the files already written by
    /// this call are removed again.
    pub async fn store(&self, multipart: &mut Multipart) -> AppResult<Vec<StoredFile>> {
        let mut stored: Vec<StoredFile> = Vec::new();
        match self.store_all(multipart, &mut stored).await {
            Ok(()) => Ok(stored),
            Err(err) => {
                self.discard(&stored).await;
                Err(err)
            }
        }
    }

    /// Remove files returned by [`UploadPolicy::store`] whose database rows
    /// could not be written. Missing files are ignored.
    pub async fn discard(&self, files: &[StoredFile]) {
        for file in files {
            if let Err(err) = fs::remove_file(self.dir.join(&file.filename)).await {
                tracing::debug!(file = %file.filename, error = %err, "discard upload");
            }
        }
    }

    async fn store_all(
        &self,
        multipart: &mut Multipart,
        stored: &mut Vec<StoredFile>,
    ) -> AppResult<()> {
        while let Some(mut field) = multipart.next_field().await? {
            let Some(original_name) = field.file_name().map(str::to_string) else {
                continue;
            };
            if stored.len() >= self.max_files {
                return Err(AppError::BadRequest(format!(
                    "at most {} files per upload",
                    self.max_files
                )));
            }

            let content_type = field.content_type().map(str::to_string);
            let ext = self.check(&original_name, content_type.as_deref())?;
            let field_name = field.name().unwrap_or("file").to_string();

            fs::create_dir_all(&self.dir)
                .await
                .map_err(|e| AppError::Internal(e.into()))?;
            let filename = unique_file_name(&field_name, &ext);
            let path = self.dir.join(&filename);

            let mut file = fs::File::create(&path)
                .await
                .map_err(|e| AppError::Internal(e.into()))?;
            let mut size: u64 = 0;
            let written: AppResult<()> = async {
                while let Some(chunk) = field.chunk().await? {
                    size += chunk.len() as u64;
                    if size > self.max_file_size {
                        return Err(AppError::PayloadTooLarge(format!(
                            "{original_name} exceeds {} bytes",
                            self.max_file_size
                        )));
                    }
                    file.write_all(&chunk)
                        .await
                        .map_err(|e| AppError::Internal(e.into()))?;
                }
                file.flush().await.map_err(|e| AppError::Internal(e.into()))?;
                Ok(())
            }
            .await;

            if let Err(err) = written {
                drop(file);
                let _ = fs::remove_file(&path).await;
                return Err(err);
            }

            tracing::info!(file = %filename, size, "stored upload");
            stored.push(StoredFile {
                url: format!("{PUBLIC_PREFIX}/{filename}"),
                field: field_name,
                original_name,
                filename,
                content_type: content_type.unwrap_or_default(),
                size,
            });
        }

        Ok(())
    }
}

/// `{field}-{unix millis}-{random}.{ext}`; the field name is reduced to a
/// safe path component.
pub fn unique_file_name(field: &str, ext: &str) -> String {
    let field: String = field
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    let field = if field.is_empty() { "file".to_string() } else { field };
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{field}-{}-{suffix}.{ext}", Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::FromRequest,
        http::{Request, header},
    };

    const BOUNDARY: &str = "XBOUNDARYX";

    fn multipart_request(parts: &[(&str, &str, &str, &[u8])]) -> Request<Body> {
        let mut body: Vec<u8> = Vec::new();
        for (field, file_name, content_type, bytes) in parts {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request")
    }

    async fn multipart(req: Request<Body>) -> Multipart {
        Multipart::from_request(req, &()).await.expect("multipart")
    }

    fn files_in(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    #[test]
    fn allow_list_accepts_images_and_videos() {
        let policy = UploadPolicy::new("unused");
        assert_eq!(policy.check("shirt.JPG", Some("image/jpeg")).unwrap(), "jpg");
        assert_eq!(policy.check("clip.mov", Some("video/quicktime")).unwrap(), "mov");
    }

    #[test]
    fn allow_list_requires_both_extension_and_type() {
        let policy = UploadPolicy::new("unused");
        assert!(matches!(
            policy.check("script.php", Some("image/png")),
            Err(AppError::UnsupportedMedia(_))
        ));
        assert!(matches!(
            policy.check("photo.png", Some("text/html")),
            Err(AppError::UnsupportedMedia(_))
        ));
        assert!(matches!(
            policy.check("photo.png", None),
            Err(AppError::UnsupportedMedia(_))
        ));
        assert!(policy.check("no_extension", Some("image/png")).is_err());
    }

    #[test]
    fn unique_names_keep_extension_and_strip_path_characters() {
        let name = unique_file_name("../images", "png");
        assert!(name.starts_with("images-"));
        assert!(name.ends_with(".png"));
        assert!(!name.contains('/'));
        assert_ne!(unique_file_name("images", "png"), unique_file_name("images", "png"));
    }

    #[tokio::test]
    async fn stores_allowed_files_in_created_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let policy = UploadPolicy::new(tmp.path().join("products"));
        let mut mp = multipart(multipart_request(&[(
            "images",
            "hoodie.png",
            "image/png",
            b"\x89PNG fake bytes",
        )]))
        .await;

        let stored = policy.store(&mut mp).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].field, "images");
        assert_eq!(stored[0].size, 15);
        assert!(stored[0].url.starts_with("/uploads/images-"));
        assert!(policy.dir.join(&stored[0].filename).is_file());
    }

    #[tokio::test]
    async fn rejected_extension_never_touches_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let policy = UploadPolicy::new(tmp.path().join("products"));
        let mut mp = multipart(multipart_request(&[(
            "images",
            "payload.exe",
            "image/png",
            b"MZ",
        )]))
        .await;

        let err = policy.store(&mut mp).await.unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMedia(_)));
        assert!(!policy.dir.exists());
    }

    #[tokio::test]
    async fn oversized_file_is_removed_along_with_earlier_ones() {
        let tmp = tempfile::tempdir().unwrap();
        let mut policy = UploadPolicy::new(tmp.path().to_path_buf());
        policy.max_file_size = 8;
        let mut mp = multipart(multipart_request(&[
            ("images", "small.gif", "image/gif", b"GIF89a"),
            ("images", "large.gif", "image/gif", b"GIF89a and then some"),
        ]))
        .await;

        let err = policy.store(&mut mp).await.unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
        assert_eq!(files_in(tmp.path()), 0);
    }
}
