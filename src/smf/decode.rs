// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file decoding.
//!
//! Accepts Type 0 and Type 1 files and merges all tracks into a single note
//! list. Header problems reject the whole file; anything wrong inside a track
//! (stray status bytes, unmatched note-offs, truncated events) degrades to a
//! partial result instead of an error, since real-world files routinely
//! contain such noise.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::FormatError;
use super::status;
use super::vlq::read_vlq;
use crate::note::Note;

/// Result of decoding a MIDI file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeResult {
    /// Completed notes from all tracks, timing in beats
    pub notes: Vec<Note>,
    /// Tempo in BPM from the first tempo meta-event found, informational
    /// only; note timing is never rescaled by it
    pub tempo: Option<f64>,
    /// Name from the first track-name meta-event found
    pub track_name: Option<String>,
}

/// A note that received its note-on and is waiting for the matching note-off
struct ActiveNote {
    velocity: u8,
    start_tick: u64,
}

/// Decode a Standard MIDI File.
///
/// Returns [`FormatError`] for an unreadable header (too short, missing
/// `MThd`, format 2). Per-track irregularities stop only that track's scan
/// and keep whatever was parsed before.
pub fn decode(bytes: &[u8]) -> Result<DecodeResult, FormatError> {
    if bytes.len() < 14 {
        return Err(FormatError::TooShort(bytes.len()));
    }
    if &bytes[0..4] != b"MThd" {
        return Err(FormatError::MissingHeaderTag);
    }

    let header_len = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
    if header_len < 6 {
        return Err(FormatError::TruncatedHeader);
    }

    let format = u16::from_be_bytes([bytes[8], bytes[9]]);
    if format > 1 {
        return Err(FormatError::UnsupportedFormat(format));
    }

    let track_count = u16::from_be_bytes([bytes[10], bytes[11]]);
    let division = u16::from_be_bytes([bytes[12], bytes[13]]);

    // SMPTE time-code division (top bit set) is approximated as 480 PPQ.
    // Known lossy: timecode files decode with skewed beat positions.
    let ppq = if division & 0x8000 != 0 {
        debug!(division, "SMPTE division approximated as 480 PPQ");
        480
    } else {
        division.max(1)
    };

    let mut result = DecodeResult {
        notes: Vec::new(),
        tempo: None,
        track_name: None,
    };

    // Walk chunks until the declared number of tracks has been read.
    // Foreign chunks (some DAWs insert custom metadata) are skipped by
    // their declared length and do not count toward the track total.
    let mut pos = 8 + header_len;
    let mut tracks_read = 0u16;
    while tracks_read < track_count && pos + 8 <= bytes.len() {
        let tag = &bytes[pos..pos + 4];
        let chunk_len =
            u32::from_be_bytes([bytes[pos + 4], bytes[pos + 5], bytes[pos + 6], bytes[pos + 7]])
                as usize;
        pos += 8;
        let end = (pos + chunk_len).min(bytes.len());

        if tag == b"MTrk" {
            decode_track(&bytes[pos..end], ppq, &mut result);
            tracks_read += 1;
        } else {
            debug!(tag = ?tag, chunk_len, "skipping unknown chunk");
        }
        pos = end;
    }

    Ok(result)
}

/// Decode one track chunk, appending completed notes to `result`.
fn decode_track(data: &[u8], ppq: u16, result: &mut DecodeResult) {
    let mut pos = 0usize;
    let mut tick = 0u64;
    let mut running_status: Option<u8> = None;
    let mut active: HashMap<(u8, u8), ActiveNote> = HashMap::new();

    let push_note = |notes: &mut Vec<Note>, pitch: u8, note: ActiveNote, end_tick: u64| {
        let start = note.start_tick as f64 / f64::from(ppq);
        let duration = end_tick.saturating_sub(note.start_tick) as f64 / f64::from(ppq);
        notes.push(Note::new(pitch, note.velocity, start, duration));
    };

    loop {
        let Some(delta) = read_vlq(data, &mut pos) else {
            break;
        };
        tick += u64::from(delta);

        let Some(&first) = data.get(pos) else {
            break;
        };
        let status_byte = if first >= 0x80 {
            pos += 1;
            first
        } else if let Some(prev) = running_status {
            // Running status: data byte reuses the previous channel status
            prev
        } else {
            warn!(byte = first, tick, "data byte with no running status, stopping track scan");
            break;
        };

        match status_byte {
            0x80..=0xEF => {
                running_status = Some(status_byte);
                let kind = status_byte & 0xF0;
                let channel = status_byte & 0x0F;

                let data_len: usize = match kind {
                    status::PROGRAM_CHANGE | status::CHANNEL_AFTERTOUCH => 1,
                    _ => 2,
                };
                if pos + data_len > data.len() {
                    break;
                }

                if kind == status::NOTE_ON || kind == status::NOTE_OFF {
                    let pitch = data[pos] & 0x7F;
                    let velocity = data[pos + 1] & 0x7F;
                    let key = (channel, pitch);

                    if kind == status::NOTE_ON && velocity > 0 {
                        // Retrigger without a note-off: close the old note
                        // here so neither is lost
                        if let Some(prev) = active.remove(&key) {
                            push_note(&mut result.notes, pitch, prev, tick);
                        }
                        active.insert(
                            key,
                            ActiveNote {
                                velocity,
                                start_tick: tick,
                            },
                        );
                    } else {
                        // Note-off, or note-on with velocity 0. An unmatched
                        // note-off is dropped without comment.
                        if let Some(prev) = active.remove(&key) {
                            push_note(&mut result.notes, pitch, prev, tick);
                        }
                    }
                }
                // Other channel messages are length-skipped, not interpreted
                pos += data_len;
            }
            status::META => {
                running_status = None;
                let Some(&meta_type) = data.get(pos) else {
                    break;
                };
                pos += 1;
                let Some(len) = read_vlq(data, &mut pos) else {
                    break;
                };
                let len = len as usize;
                if pos + len > data.len() {
                    break;
                }
                let payload = &data[pos..pos + len];
                pos += len;

                match meta_type {
                    status::META_TEMPO if len == 3 => {
                        let micros = u32::from(payload[0]) << 16
                            | u32::from(payload[1]) << 8
                            | u32::from(payload[2]);
                        if result.tempo.is_none() && micros > 0 {
                            result.tempo = Some(60_000_000.0 / f64::from(micros));
                        }
                    }
                    status::META_TRACK_NAME => {
                        if result.track_name.is_none() && !payload.is_empty() {
                            result.track_name =
                                Some(String::from_utf8_lossy(payload).into_owned());
                        }
                    }
                    status::META_END_OF_TRACK => break,
                    _ => {}
                }
            }
            status::SYSEX_START | status::SYSEX_END => {
                running_status = None;
                let Some(len) = read_vlq(data, &mut pos) else {
                    break;
                };
                debug!(len, tick, "skipping SysEx block");
                pos = (pos + len as usize).min(data.len());
            }
            _ => {
                // 0xF1-0xF6, 0xF8-0xFE have no business inside an SMF track;
                // treat as a desync and keep what we have
                warn!(byte = status_byte, tick, "unrecognized status byte, stopping track scan");
                break;
            }
        }
    }

    // Force-close anything still sounding at the last tick reached, so
    // trailing notes in truncated files are not silently dropped
    let mut leftovers: Vec<_> = active.drain().collect();
    leftovers.sort_by_key(|&((channel, pitch), ref note)| (note.start_tick, channel, pitch));
    for ((_, pitch), note) in leftovers {
        push_note(&mut result.notes, pitch, note, tick);
    }
}
