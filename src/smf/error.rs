// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Decode error types.

use thiserror::Error;

/// Fatal file-level decode errors.
///
/// Any of these means the header is unreadable and the whole file must be
/// rejected. Irregularities inside a track (stray status bytes, unmatched
/// note-offs, truncated events) never surface as errors; the decoder keeps
/// whatever it parsed and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Buffer is too small to hold a header and one track chunk tag
    #[error("file too short to be a MIDI file ({0} bytes)")]
    TooShort(usize),
    /// First four bytes are not `MThd`
    #[error("missing MThd header tag")]
    MissingHeaderTag,
    /// Header chunk declares fewer than 6 data bytes
    #[error("truncated MThd header chunk")]
    TruncatedHeader,
    /// Format 2 (multi-sequence) or an unknown format value
    #[error("unsupported SMF format {0} (only formats 0 and 1 are supported)")]
    UnsupportedFormat(u16),
}
