// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Live recording note pairing.
//!
//! Pairs the note-on/note-off events of an in-progress recording into
//! renderable notes. The caller polls the engine's append-only event log at a
//! fixed interval, feeds it through [`LiveRecordingPairer::process_log`] (or
//! the structured [`LiveRecordingPairer::process_events`]) and rebuilds the
//! snapshot on every repaint tick. Held notes extend to the playhead in the
//! snapshot, so it must be rebuilt even when no new events arrived.
//!
//! The pairer never fails: malformed log entries and unmatched note-offs are
//! skipped so that a recording in progress keeps rendering no matter what
//! comes in.

use std::collections::HashMap;

use tracing::warn;

use super::event_log::{parse_entry, NoteEventKind, RawNoteEvent};
use crate::note::Note;

/// A note whose note-on has been seen but not yet its note-off
struct HeldNote {
    velocity: u8,
    /// Start in beats, relative to the recording start
    start_beat: f64,
}

/// State of one recording session
struct Session {
    /// Timeline position where recording started, in beats
    start_beat: f64,
    /// Transport position from the most recent process call, in beats
    current_beat: f64,
    /// Track the recording will land on
    track_id: u64,
    /// Notes whose note-off has arrived
    completed: Vec<Note>,
    /// Currently sounding notes, keyed by pitch (single virtual channel)
    active: HashMap<u8, HeldNote>,
    /// Number of log entries already consumed
    cursor: usize,
    /// Byte offset just past the last consumed textual log entry, so a poll
    /// with an unchanged log does not re-scan the whole string
    log_offset: usize,
}

/// Incremental note pairer for live recording preview.
///
/// Two states: idle (no session) and recording. All methods are cheap,
/// synchronous and single-owner; wrap the pairer in a mutex if the host
/// polls from more than one thread.
pub struct LiveRecordingPairer {
    session: Option<Session>,
}

impl LiveRecordingPairer {
    /// Create an idle pairer
    pub fn new() -> Self {
        Self { session: None }
    }

    /// Check if a recording session is active
    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// Track id of the active session
    pub fn track_id(&self) -> Option<u64> {
        self.session.as_ref().map(|s| s.track_id)
    }

    /// Start a recording session, discarding any previous state.
    pub fn start_recording(&mut self, start_beat: f64, track_id: u64) {
        self.session = Some(Session {
            start_beat,
            current_beat: start_beat,
            track_id,
            completed: Vec::new(),
            active: HashMap::new(),
            cursor: 0,
            log_offset: 0,
        });
    }

    /// Process the engine's textual event log.
    ///
    /// `log` is the complete log seen so far; the session remembers the byte
    /// offset of its unconsumed tail, so a poll over an unchanged log costs
    /// nothing no matter how long the recording has grown. Malformed entries
    /// are skipped but still advance the cursor. Returns the number of newly
    /// consumed entries, 0 when idle. Feed a session either this textual
    /// form or [`process_events`](Self::process_events), not a mix of both.
    pub fn process_log(&mut self, log: &str, current_beat: f64, tempo: f64) -> usize {
        let Some(session) = self.session.as_mut() else {
            return 0;
        };
        session.current_beat = current_beat;

        // The engine appends ";entry" per new event, so the unconsumed tail
        // starts with at most one separator
        let tail = &log[session.log_offset.min(log.len())..];
        let tail = tail.strip_prefix(';').unwrap_or(tail);
        if tail.is_empty() {
            session.log_offset = log.len();
            return 0;
        }

        let mut consumed = 0;
        for entry in tail.split(';') {
            consumed += 1;
            match parse_entry(entry) {
                Some(event) => session.apply(event, tempo),
                None => warn!(entry, "skipping malformed live event entry"),
            }
        }
        session.cursor += consumed;
        session.log_offset = log.len();
        consumed
    }

    /// Process structured events.
    ///
    /// Same incremental contract as [`process_log`](Self::process_log):
    /// `events` is the complete append-only log, and only entries past the
    /// cursor are applied. Use one input form per session.
    pub fn process_events(&mut self, events: &[RawNoteEvent], current_beat: f64, tempo: f64) -> usize {
        let Some(session) = self.session.as_mut() else {
            return 0;
        };
        session.current_beat = current_beat;

        let mut consumed = 0;
        for &event in events.iter().skip(session.cursor) {
            session.apply(event, tempo);
            consumed += 1;
        }
        session.cursor += consumed;
        consumed
    }

    /// Build the renderable note list: completed notes plus one synthetic
    /// note per held pitch, extended to the playhead.
    ///
    /// Returns `None` when idle. Pure and idempotent, safe to call on every
    /// repaint tick.
    pub fn snapshot(&self) -> Option<Vec<Note>> {
        let session = self.session.as_ref()?;
        let playhead = session.current_beat - session.start_beat;

        let mut notes = session.completed.clone();
        let mut held: Vec<_> = session.active.iter().collect();
        held.sort_by(|a, b| {
            a.1.start_beat
                .total_cmp(&b.1.start_beat)
                .then(a.0.cmp(b.0))
        });
        for (&pitch, note) in held {
            notes.push(Note::new(
                pitch,
                note.velocity,
                note.start_beat,
                playhead - note.start_beat,
            ));
        }
        Some(notes)
    }

    /// Stop the session, force-closing held notes at the playhead.
    ///
    /// Returns the final note list, or `None` if no session was active.
    pub fn stop(&mut self) -> Option<Vec<Note>> {
        let mut session = self.session.take()?;
        let playhead = session.current_beat - session.start_beat;

        let mut held: Vec<_> = session.active.drain().collect();
        held.sort_by(|a, b| a.1.start_beat.total_cmp(&b.1.start_beat).then(a.0.cmp(&b.0)));
        for (pitch, note) in held {
            session.completed.push(Note::new(
                pitch,
                note.velocity,
                note.start_beat,
                playhead - note.start_beat,
            ));
        }
        Some(session.completed)
    }

    /// Discard the session and everything it accumulated.
    pub fn clear(&mut self) {
        self.session = None;
    }
}

impl Default for LiveRecordingPairer {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    fn apply(&mut self, event: RawNoteEvent, tempo: f64) {
        let beat = event.beat_position(tempo);
        match event.kind {
            NoteEventKind::NoteOn if event.velocity > 0 => {
                // Duplicate note-on for a held pitch: last one wins
                self.active.insert(
                    event.pitch,
                    HeldNote {
                        velocity: event.velocity,
                        start_beat: beat,
                    },
                );
            }
            _ => {
                // Note-off, or note-on with velocity 0. An unmatched
                // note-off means the key went down before recording
                // started or was already closed; ignore it.
                if let Some(held) = self.active.remove(&event.pitch) {
                    self.completed.push(Note::new(
                        event.pitch,
                        held.velocity,
                        held.start_beat,
                        beat - held.start_beat,
                    ));
                }
            }
        }
    }
}
