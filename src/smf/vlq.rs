// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Variable-length quantity encoding.
//!
//! MIDI files store delta-times and meta/SysEx lengths as big-endian 7-bit
//! groups with a continuation bit (0x80) on every byte except the last.

/// Append a value to `out` as a variable-length quantity.
///
/// Values below 128 encode as a single byte with no continuation bit.
pub fn write_vlq(out: &mut Vec<u8>, mut value: u32) {
    let mut bytes = Vec::new();

    bytes.push((value & 0x7F) as u8);
    value >>= 7;

    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }

    bytes.reverse();
    out.extend_from_slice(&bytes);
}

/// Read a variable-length quantity from `data` starting at `*pos`.
///
/// Advances the cursor past the value and stops at the first byte with
/// bit 7 clear. A valid value is at most four bytes (2^28 - 1); `None`
/// means the buffer ended mid-value or the value ran past four bytes,
/// and the caller should treat the stream as desynced.
pub fn read_vlq(data: &[u8], pos: &mut usize) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..4 {
        let byte = *data.get(*pos)?;
        *pos += 1;
        value = (value << 7) | u32::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Some(value);
        }
    }
    None
}
