// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Raw note events polled from the engine's recording log.
//!
//! During recording the engine exposes its captured events as a growing
//! semicolon-separated string, one `pitch,velocity,type,timestampSamples`
//! entry per event (type 0 = note-off, 1 = note-on). That textual grammar is
//! an artifact of the engine boundary; the structured [`RawNoteEvent`] form
//! is preferred wherever the caller already has typed events.

use tracing::warn;

use crate::note::ENGINE_SAMPLE_RATE;

/// Kind of a raw note event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEventKind {
    /// Key released (wire value 0)
    NoteOff,
    /// Key pressed (wire value 1)
    NoteOn,
}

/// One event from the engine's append-only recording log.
///
/// Timestamps are in samples at [`ENGINE_SAMPLE_RATE`], relative to the
/// start of the recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawNoteEvent {
    /// MIDI note number (0-127)
    pub pitch: u8,
    /// Velocity (0-127)
    pub velocity: u8,
    /// Note on or off
    pub kind: NoteEventKind,
    /// Timestamp in samples since the recording started
    pub timestamp_samples: u64,
}

impl RawNoteEvent {
    /// Create a note-on event
    pub fn note_on(pitch: u8, velocity: u8, timestamp_samples: u64) -> Self {
        Self {
            pitch,
            velocity,
            kind: NoteEventKind::NoteOn,
            timestamp_samples,
        }
    }

    /// Create a note-off event
    pub fn note_off(pitch: u8, timestamp_samples: u64) -> Self {
        Self {
            pitch,
            velocity: 0,
            kind: NoteEventKind::NoteOff,
            timestamp_samples,
        }
    }

    /// Position of this event in beats at the given tempo, relative to the
    /// recording start.
    pub fn beat_position(&self, tempo: f64) -> f64 {
        self.timestamp_samples as f64 / f64::from(ENGINE_SAMPLE_RATE) * (tempo / 60.0)
    }
}

/// Parse one textual log entry.
///
/// Returns `None` for anything that is not four comma-separated integers
/// with a valid event type; the caller skips such entries and keeps going.
pub fn parse_entry(entry: &str) -> Option<RawNoteEvent> {
    let mut fields = entry.split(',');
    let pitch = fields.next()?.trim().parse::<u8>().ok()?;
    let velocity = fields.next()?.trim().parse::<u8>().ok()?;
    let kind = match fields.next()?.trim().parse::<u8>().ok()? {
        0 => NoteEventKind::NoteOff,
        1 => NoteEventKind::NoteOn,
        _ => return None,
    };
    let timestamp_samples = fields.next()?.trim().parse::<u64>().ok()?;
    if fields.next().is_some() {
        warn!(entry, "log entry has trailing fields");
    }
    Some(RawNoteEvent {
        pitch,
        velocity,
        kind,
        timestamp_samples,
    })
}
