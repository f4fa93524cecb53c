//! HTTP `Range` handling for a single `bytes` range with a server-side cap.
//!
//! Every response window is at most [`DEFAULT_CHUNK_CAP`] bytes (or the
//! configured cap), whatever the client asked for. Players keep issuing
//! follow-up requests from the end of the last window, so playback and
//! seeking still work while memory and bandwidth per request stay bounded.
//!
//! A missing first position means offset 0 (`bytes=-500` is `bytes=0-500`),
//! not an RFC 9110 suffix range.

use std::cmp;

use thiserror::Error;

/// 1 MiB.
pub const DEFAULT_CHUNK_CAP: u64 = 1024 * 1024;

/// An inclusive byte window (`start..=end`) into a resource of known length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeWindow {
    pub start: u64,
    pub end: u64,
    pub resource_length: u64,
}

impl RangeWindow {
    /// Length of this window in bytes.
    pub fn len(&self) -> u64 {
        // `end` is inclusive.
        self.end - self.start + 1
    }

    /// `Content-Range` header value.
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.resource_length)
    }
}

/// A parsed `bytes=<start>-<end>` specification, either side optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeSpec {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("invalid Range header")]
    Malformed,
    #[error("range not satisfiable")]
    Unsatisfiable,
    #[error("resource is empty")]
    EmptyResource,
}

/// Parse a `Range` header value.
///
/// Returns `Ok(None)` when the range-unit is not `bytes`; such headers are
/// ignored as RFC 9110 asks. Multiple ranges are rejected.
pub fn parse_range_header(value: &str) -> Result<Option<RangeSpec>, RangeError> {
    let value = value.trim();
    let (unit, rest) = value.split_once('=').ok_or(RangeError::Malformed)?;
    if !unit.trim().eq_ignore_ascii_case("bytes") {
        return Ok(None);
    }

    let rest = rest.trim();
    if rest.contains(',') {
        return Err(RangeError::Malformed);
    }

    let (start, end) = rest.split_once('-').ok_or(RangeError::Malformed)?;
    let spec = RangeSpec {
        start: parse_position(start)?,
        end: parse_position(end)?,
    };

    if let (Some(start), Some(end)) = (spec.start, spec.end) {
        if start > end {
            return Err(RangeError::Malformed);
        }
    }

    Ok(Some(spec))
}

fn parse_position(s: &str) -> Result<Option<u64>, RangeError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    // `u64::from_str` accepts a leading `+`; positions are bare digits.
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RangeError::Malformed);
    }
    s.parse::<u64>().map(Some).map_err(|_| RangeError::Malformed)
}

/// Resolve an optional range specification against a resource length.
///
/// `cap` bounds the window length; a zero cap is treated as one byte.
pub fn resolve_window(
    spec: Option<RangeSpec>,
    resource_length: u64,
    cap: u64,
) -> Result<RangeWindow, RangeError> {
    if resource_length == 0 {
        return Err(RangeError::EmptyResource);
    }
    let cap = cmp::max(cap, 1);
    let last = resource_length - 1;

    let Some(spec) = spec else {
        return Ok(RangeWindow {
            start: 0,
            end: cmp::min(resource_length, cap) - 1,
            resource_length,
        });
    };

    let start = spec.start.unwrap_or(0);
    if start >= resource_length {
        return Err(RangeError::Unsatisfiable);
    }

    let requested_end = spec.end.unwrap_or(last);
    let capped_end = start.saturating_add(cap - 1);
    let end = cmp::min(cmp::min(requested_end, capped_end), last);

    if start > end {
        return Err(RangeError::Unsatisfiable);
    }

    Ok(RangeWindow {
        start,
        end,
        resource_length,
    })
}
