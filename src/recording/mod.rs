// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Live recording support.
//!
//! This module provides:
//! - Parsing of the engine's polled note-event log
//! - Incremental pairing of note-on/note-off events into renderable notes

pub mod event_log;
pub mod pairer;

pub use event_log::{parse_entry, NoteEventKind, RawNoteEvent};
pub use pairer::LiveRecordingPairer;
