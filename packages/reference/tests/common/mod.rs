//! Fixture writer for genuine FLAC files.
//!
//! Output is a STREAMINFO block followed by fixed-size frames of VERBATIM
//! 16-bit subframes. Nothing is compressed, but the bytes go through the FLAC
//! demuxer and decoder exactly like an encoder's output would.

use std::path::Path;

use anyhow::{Result, ensure};

const BLOCK: usize = 4096;

/// Sample `i` of `channel`. Channel 1 is inverted and halved so a decoder
/// that mixes or picks the wrong channel is caught.
pub fn flac_sample(i: usize, channel: u16) -> i16 {
    let v = (i as f32 * 0.03).sin() * 8_000.0;
    match channel {
        0 => v as i16,
        _ => (-v * 0.5) as i16,
    }
}

/// Write `frames` samples per channel of [`flac_sample`] as 16-bit FLAC.
pub fn write_flac(path: &Path, sample_rate: u32, channels: u16, frames: usize) -> Result<()> {
    ensure!((1..=8).contains(&channels), "FLAC carries 1 to 8 channels");
    ensure!(frames.div_ceil(BLOCK) < 0x800, "fixture too long for 2-byte frame numbers");

    let mut out = b"fLaC".to_vec();

    // Last metadata block, type STREAMINFO, 34 bytes.
    out.extend_from_slice(&[0x80, 0x00, 0x00, 34]);
    out.extend_from_slice(&(BLOCK as u16).to_be_bytes());
    out.extend_from_slice(&(BLOCK as u16).to_be_bytes());
    // Min and max frame sizes unknown.
    out.extend_from_slice(&[0; 6]);
    // 20-bit rate, 3-bit channels - 1, 5-bit bits per sample - 1, 36-bit total.
    let packed = (u64::from(sample_rate) << 44)
        | (u64::from(channels - 1) << 41)
        | (15 << 36)
        | frames as u64;
    out.extend_from_slice(&packed.to_be_bytes());
    // MD5 unset.
    out.extend_from_slice(&[0; 16]);

    for (number, start) in (0..frames).step_by(BLOCK).enumerate() {
        let len = BLOCK.min(frames - start);
        let head = out.len();

        // Sync code, fixed blocking.
        out.extend_from_slice(&[0xFF, 0xF8]);
        // Block size in a trailing 16-bit field, rate from STREAMINFO.
        out.push(0x70);
        // Independent channels, 16 bits per sample.
        out.push(((channels as u8 - 1) << 4) | 0x08);
        push_frame_number(&mut out, number);
        out.extend_from_slice(&((len - 1) as u16).to_be_bytes());
        let header_crc = crc8(&out[head..]);
        out.push(header_crc);

        for channel in 0..channels {
            // VERBATIM, no wasted bits.
            out.push(0x02);
            for i in start..start + len {
                out.extend_from_slice(&flac_sample(i, channel).to_be_bytes());
            }
        }
        let frame_crc = crc16(&out[head..]);
        out.extend_from_slice(&frame_crc.to_be_bytes());
    }

    std::fs::write(path, out)?;
    Ok(())
}

/// UTF-8 style coding, one or two bytes.
fn push_frame_number(out: &mut Vec<u8>, n: usize) {
    if n < 0x80 {
        out.push(n as u8);
    } else {
        out.push(0xC0 | (n >> 6) as u8);
        out.push(0x80 | (n & 0x3F) as u8);
    }
}

/// CRC-8, polynomial 0x07, as used by FLAC frame headers.
fn crc8(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |mut crc, &b| {
        crc ^= b;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 { (crc << 1) ^ 0x07 } else { crc << 1 };
        }
        crc
    })
}

/// CRC-16, polynomial 0x8005, as used by FLAC frame footers.
fn crc16(bytes: &[u8]) -> u16 {
    bytes.iter().fold(0u16, |mut crc, &b| {
        crc ^= u16::from(b) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 { (crc << 1) ^ 0x8005 } else { crc << 1 };
        }
        crc
    })
}
