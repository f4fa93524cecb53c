//! File-backed media store.
//!
//! Files are placed in the store directories out of band; this side only
//! ever opens them for reading and needs no locking.

use std::path::PathBuf;

use error::MediaError;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncSeek};

pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";
pub const MAX_MEDIA_ID_LEN: usize = 255;

/// A seekable async byte source.
pub trait MediaSource: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T: AsyncRead + AsyncSeek + Send + Unpin> MediaSource for T {}

/// An opened media resource.
pub struct MediaObject {
    pub length: u64,
    pub content_type: &'static str,
    pub reader: Box<dyn MediaSource>,
}

impl std::fmt::Debug for MediaObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaObject")
            .field("length", &self.length)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
pub trait MediaStore: Send + Sync {
    /// Open a resource by its opaque identifier.
    async fn open(&self, id: &str) -> Result<MediaObject, MediaError>;

    async fn exists(&self, id: &str) -> Result<bool, MediaError> {
        match self.open(id).await {
            Ok(_) => Ok(true),
            Err(MediaError::NotFound) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

/// Local filesystem-backed [`MediaStore`]: identifiers are file names
/// directly under `root`.
#[derive(Debug, Clone)]
pub struct LocalFsMediaStore {
    root: PathBuf,
}

impl LocalFsMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait::async_trait]
impl MediaStore for LocalFsMediaStore {
    async fn open(&self, id: &str) -> Result<MediaObject, MediaError> {
        if !is_valid_media_id(id) {
            tracing::debug!("Rejecting media id with disallowed characters");
            return Err(MediaError::NotFound);
        }

        let path = self.root.join(id);
        let file = fs::File::open(&path).await.map_err(map_not_found)?;
        let meta = file.metadata().await?;
        if !meta.is_file() {
            return Err(MediaError::NotFound);
        }

        Ok(MediaObject {
            length: meta.len(),
            content_type: content_type_for(id),
            reader: Box::new(file),
        })
    }
}

fn map_not_found(err: std::io::Error) -> MediaError {
    if err.kind() == std::io::ErrorKind::NotFound {
        MediaError::NotFound
    } else {
        MediaError::Io(err)
    }
}

/// Identifiers are opaque file names restricted to ASCII `[A-Za-z0-9._-]`,
/// which rules out path separators and traversal.
pub(crate) fn is_valid_media_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_MEDIA_ID_LEN
        && id != "."
        && id != ".."
        && id
            .bytes()
            .all(|b| matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-'))
}

/// Best-effort content type from the file extension.
pub fn content_type_for(id: &str) -> &'static str {
    let ext = match id.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return CONTENT_TYPE_OCTET_STREAM,
    };

    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "ogv" => "video/ogg",
        "ts" => "video/mp2t",
        "m3u8" => "application/vnd.apple.mpegurl",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "vtt" => "text/vtt",
        _ => CONTENT_TYPE_OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_id_validation_rejects_traversal() {
        let invalid = ["", ".", "..", "../x", "..\\x", "a/b", "a\\b", "%2e%2e%2fx", "a b"];
        for id in invalid {
            assert!(!is_valid_media_id(id), "expected invalid id: {id:?}");
        }

        let valid = ["a", "movie.mp4", "3f2a_b-c.webm", "a..b"];
        for id in valid {
            assert!(is_valid_media_id(id), "expected valid id: {id:?}");
        }

        assert!(!is_valid_media_id(&"a".repeat(MAX_MEDIA_ID_LEN + 1)));
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type_for("a.mp4"), "video/mp4");
        assert_eq!(content_type_for("A.MP4"), "video/mp4");
        assert_eq!(content_type_for("poster.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("noext"), CONTENT_TYPE_OCTET_STREAM);
        assert_eq!(content_type_for("weird.xyz"), CONTENT_TYPE_OCTET_STREAM);
    }

    #[tokio::test]
    async fn open_reports_length_and_type() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("clip.webm"), b"0123456789").await.unwrap();

        let store = LocalFsMediaStore::new(dir.path());
        let object = store.open("clip.webm").await.unwrap();
        assert_eq!(object.length, 10);
        assert_eq!(object.content_type, "video/webm");
    }

    #[tokio::test]
    async fn missing_files_and_directories_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::create_dir(dir.path().join("subdir")).await.unwrap();

        let store = LocalFsMediaStore::new(dir.path());
        assert!(matches!(store.open("missing.mp4").await, Err(MediaError::NotFound)));
        assert!(matches!(store.open("subdir").await, Err(MediaError::NotFound)));
        assert!(matches!(store.open("../etc").await, Err(MediaError::NotFound)));
        assert!(!store.exists("missing.mp4").await.unwrap());
    }
}
