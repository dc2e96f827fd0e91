// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file codec.
//!
//! This module provides:
//! - Type 0 encoding of note lists at 480 PPQ
//! - Type 0/1 decoding with running status and multi-track merging
//! - Variable-length quantity (VLQ) primitives
//!
//! Timing is kept in musical beats: encode scales beats to ticks at a fixed
//! 480 PPQ, decode divides ticks by the file's own division. The tempo found
//! in a file is reported but never applied to note timing; callers run their
//! own project tempo.

pub mod decode;
pub mod encode;
pub mod error;
pub mod vlq;

pub use decode::{decode, DecodeResult};
pub use encode::{encode, SmfEncoder};
pub use error::FormatError;

/// Ticks per quarter note used when encoding files.
pub const PPQ: u16 = 480;

/// MIDI status and meta-event byte constants
pub mod status {
    // Channel Voice Messages (upper nibble, lower nibble is channel 0-15)
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const POLY_AFTERTOUCH: u8 = 0xA0;
    pub const CONTROL_CHANGE: u8 = 0xB0;
    pub const PROGRAM_CHANGE: u8 = 0xC0;
    pub const CHANNEL_AFTERTOUCH: u8 = 0xD0;
    pub const PITCH_BEND: u8 = 0xE0;

    // System messages
    pub const SYSEX_START: u8 = 0xF0;
    pub const SYSEX_END: u8 = 0xF7;
    pub const META: u8 = 0xFF;

    // Meta-event types
    pub const META_TRACK_NAME: u8 = 0x03;
    pub const META_TEMPO: u8 = 0x51;
    pub const META_END_OF_TRACK: u8 = 0x2F;
}
