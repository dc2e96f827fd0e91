// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Shared note types and engine constants.

use serde::{Deserialize, Serialize};

/// Engine sample rate in Hz. Live recording event timestamps are expressed
/// in samples at this rate.
pub const ENGINE_SAMPLE_RATE: u32 = 48_000;

/// Minimum note duration in beats.
///
/// Zero-length notes are invisible in the piano roll and unplayable, so every
/// note produced by the codec or the pairer is clamped to at least this long.
pub const MIN_NOTE_DURATION: f64 = 0.01;

/// A timed note with clip-relative timing in beats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// MIDI note number (0-127)
    pub pitch: u8,
    /// Velocity (0-127)
    pub velocity: u8,
    /// Start time in beats, relative to clip start
    pub start: f64,
    /// Duration in beats, always at least [`MIN_NOTE_DURATION`]
    pub duration: f64,
}

impl Note {
    /// Create a new note, clamping the duration to [`MIN_NOTE_DURATION`].
    pub fn new(pitch: u8, velocity: u8, start: f64, duration: f64) -> Self {
        Self {
            pitch,
            velocity,
            start,
            duration: duration.max(MIN_NOTE_DURATION),
        }
    }

    /// End time in beats
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}
