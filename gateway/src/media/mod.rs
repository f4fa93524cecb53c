//! Media delivery
//!
//! Range resolution, the file-backed media store, and windowed streaming.

pub mod range;
pub mod reader;
pub mod store;

pub use range::{parse_range_header, resolve_window, RangeError, RangeSpec, RangeWindow, DEFAULT_CHUNK_CAP};
pub use reader::{open_full, open_window, MediaBody, MediaFile, MediaWindow};
pub use store::{content_type_for, LocalFsMediaStore, MediaObject, MediaSource, MediaStore};
