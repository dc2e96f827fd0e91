// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file encoding.
//!
//! Writes Type 0 (single track) files at 480 PPQ. Output is deterministic:
//! the same notes and tempo produce byte-identical files on every call.

use super::status;
use super::vlq::write_vlq;
use super::PPQ;
use crate::note::Note;

/// A channel message placed on the tick timeline
struct TimelineEvent {
    /// Absolute tick
    tick: u32,
    status: u8,
    data1: u8,
    data2: u8,
}

/// Standard MIDI file encoder
pub struct SmfEncoder {
    /// Tempo in BPM
    tempo: f64,
    /// Optional track name meta-event
    track_name: Option<String>,
}

impl SmfEncoder {
    /// Create a new encoder at 120 BPM with no track name
    pub fn new() -> Self {
        Self {
            tempo: 120.0,
            track_name: None,
        }
    }

    /// Set tempo in BPM
    pub fn set_tempo(&mut self, bpm: f64) {
        self.tempo = bpm.max(1.0);
    }

    /// Get tempo
    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    /// Set tempo (builder style)
    pub fn with_tempo(mut self, bpm: f64) -> Self {
        self.set_tempo(bpm);
        self
    }

    /// Set the track name written as a meta-event
    pub fn set_track_name(&mut self, name: impl Into<String>) {
        self.track_name = Some(name.into());
    }

    /// Set the track name (builder style)
    pub fn with_track_name(mut self, name: impl Into<String>) -> Self {
        self.set_track_name(name);
        self
    }

    /// Encode notes into a complete Type 0 MIDI file.
    pub fn encode(&self, notes: &[Note]) -> Vec<u8> {
        let mut events = Vec::with_capacity(notes.len() * 2);

        for note in notes {
            let pitch = note.pitch.min(127);
            let velocity = note.velocity.clamp(1, 127);
            events.push(TimelineEvent {
                tick: beats_to_ticks(note.start),
                status: status::NOTE_ON,
                data1: pitch,
                data2: velocity,
            });
            events.push(TimelineEvent {
                tick: beats_to_ticks(note.end()),
                status: status::NOTE_OFF,
                data1: pitch,
                data2: 0,
            });
        }

        // 0x80 sorts before 0x90, so a note ending exactly where another
        // starts on the same pitch releases before the new one triggers.
        events.sort_by_key(|e| (e.tick, e.status));

        let mut track = Vec::new();

        // Tempo first, at delta 0
        write_vlq(&mut track, 0);
        track.extend_from_slice(&tempo_meta(self.tempo));

        if let Some(name) = &self.track_name {
            write_vlq(&mut track, 0);
            track.extend_from_slice(&[status::META, status::META_TRACK_NAME]);
            write_vlq(&mut track, name.len() as u32);
            track.extend_from_slice(name.as_bytes());
        }

        let mut last_tick = 0u32;
        for event in &events {
            write_vlq(&mut track, event.tick - last_tick);
            track.extend_from_slice(&[event.status, event.data1, event.data2]);
            last_tick = event.tick;
        }

        // End of track
        write_vlq(&mut track, 0);
        track.extend_from_slice(&[status::META, status::META_END_OF_TRACK, 0x00]);

        let mut out = Vec::with_capacity(14 + 8 + track.len());
        out.extend_from_slice(b"MThd");
        out.extend_from_slice(&6u32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes()); // Format 0
        out.extend_from_slice(&1u16.to_be_bytes()); // Single track
        out.extend_from_slice(&PPQ.to_be_bytes());
        out.extend_from_slice(b"MTrk");
        out.extend_from_slice(&(track.len() as u32).to_be_bytes());
        out.extend_from_slice(&track);
        out
    }
}

impl Default for SmfEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode notes into a Type 0 MIDI file at the given tempo.
pub fn encode(notes: &[Note], tempo: f64) -> Vec<u8> {
    SmfEncoder::new().with_tempo(tempo).encode(notes)
}

fn beats_to_ticks(beats: f64) -> u32 {
    (beats * f64::from(PPQ)).round().max(0.0) as u32
}

fn tempo_meta(bpm: f64) -> [u8; 6] {
    let micros = (60_000_000.0 / bpm).round() as u32;
    [
        status::META,
        status::META_TEMPO,
        0x03,
        ((micros >> 16) & 0xFF) as u8,
        ((micros >> 8) & 0xFF) as u8,
        (micros & 0xFF) as u8,
    ]
}
