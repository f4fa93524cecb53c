//! Windowed streaming of media resources.
//!
//! The body stream owns the file handle. Dropping it, which hyper does as soon
//! as the client goes away, closes the file; nothing keeps reading in the
//! background.

use std::io::{self, SeekFrom};
use std::pin::Pin;

use bytes::Bytes;
use error::MediaError;
use futures_util::{Stream, TryStreamExt};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use super::range::{parse_range_header, resolve_window, RangeError, RangeWindow};
use super::store::{MediaSource, MediaStore};

/// Streaming response body.
pub type MediaBody = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// A resolved byte window ready to be sent as partial content.
pub struct MediaWindow {
    pub window: RangeWindow,
    pub content_type: &'static str,
    pub body: MediaBody,
}

/// A whole resource ready to be sent.
pub struct MediaFile {
    pub length: u64,
    pub content_type: &'static str,
    pub body: MediaBody,
}

/// Open `id` and prepare the window selected by the `Range` header value.
pub async fn open_window(
    store: &dyn MediaStore,
    id: &str,
    range_header: Option<&str>,
    cap: u64,
) -> Result<MediaWindow, MediaError> {
    let object = store.open(id).await?;
    let length = object.length;
    let unsatisfiable = |err: RangeError| {
        tracing::debug!(id, length, "Rejecting range: {}", err);
        MediaError::RangeNotSatisfiable {
            length: Some(length),
        }
    };

    let spec = match range_header {
        Some(value) => parse_range_header(value).map_err(unsatisfiable)?,
        None => None,
    };
    let window = resolve_window(spec, length, cap).map_err(unsatisfiable)?;
    tracing::debug!(id, start = window.start, end = window.end, length, "Serving range");

    let mut reader = object.reader;
    reader.seek(SeekFrom::Start(window.start)).await?;

    Ok(MediaWindow {
        window,
        content_type: object.content_type,
        body: stream_bytes(reader, window.len(), id),
    })
}

/// Open `id` for sending in full.
pub async fn open_full(store: &dyn MediaStore, id: &str) -> Result<MediaFile, MediaError> {
    let object = store.open(id).await?;
    Ok(MediaFile {
        length: object.length,
        content_type: object.content_type,
        body: stream_bytes(object.reader, object.length, id),
    })
}

/// Stream exactly `len` bytes from the reader's current position. A read
/// failure ends the stream after being logged; the client re-requests.
fn stream_bytes(reader: Box<dyn MediaSource>, len: u64, id: &str) -> MediaBody {
    let id = id.to_string();
    Box::pin(ReaderStream::new(reader.take(len)).inspect_err(move |err| {
        tracing::error!(id = %id, "Media read failed mid-stream: {}", err);
    }))
}
