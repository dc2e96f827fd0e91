// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI core library.
//!
//! This crate provides the two data-transformation components behind the
//! workstation's MIDI features:
//! - Standard MIDI file (SMF) encoding and decoding
//! - Live recording note pairing for real-time piano roll preview
//!
//! Both components are pure and synchronous: callers hand in raw bytes or
//! polled event logs and get structured note lists back. File I/O, devices,
//! and the audio thread live in the transport layer, not here.

pub mod note;
pub mod recording;
pub mod smf;

pub use note::{Note, ENGINE_SAMPLE_RATE, MIN_NOTE_DURATION};
pub use recording::{LiveRecordingPairer, NoteEventKind, RawNoteEvent};
pub use smf::{decode, encode, DecodeResult, FormatError, SmfEncoder, PPQ};
