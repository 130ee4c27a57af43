//! WAV header check for sample import
//!
//! The sampler only accepts mono 8-bit PCM. Only the canonical 44-byte
//! header layout is inspected: `RIFF` chunk, `WAVE` form, then `fmt ` as the
//! first sub-chunk.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

/// Bytes of the canonical header needed for the check
const HEADER_LEN: usize = 36;

/// Format fields read from a WAV header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// Parse the canonical header; `None` when the markers do not match
    pub fn parse(header: &[u8]) -> Option<Self> {
        if header.len() < HEADER_LEN {
            return None;
        }
        if &header[0..4] != b"RIFF" || &header[8..12] != b"WAVE" || &header[12..16] != b"fmt " {
            return None;
        }

        let u16_at = |at: usize| u16::from_le_bytes([header[at], header[at + 1]]);
        let u32_at = |at: usize| {
            u32::from_le_bytes([header[at], header[at + 1], header[at + 2], header[at + 3]])
        };

        Some(Self {
            audio_format: u16_at(20),
            channels: u16_at(22),
            sample_rate: u32_at(24),
            bits_per_sample: u16_at(34),
        })
    }

    /// Uncompressed PCM, one channel, eight bits per sample
    pub fn is_mono_8bit_pcm(&self) -> bool {
        self.audio_format == 1 && self.channels == 1 && self.bits_per_sample == 8
    }
}

/// Whether the file at `path` is a mono 8-bit PCM WAV
///
/// A missing or unreadable file is an error; a short or foreign file is
/// simply not a valid sample.
pub fn is_mono_8bit_wav(path: &Path) -> Result<bool> {
    let mut file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_LEN);
    file.by_ref()
        .take(HEADER_LEN as u64)
        .read_to_end(&mut header)?;

    let format = WavFormat::parse(&header);
    debug!("WAV header of {}: {:?}", path.display(), format);
    Ok(format.is_some_and(|f| f.is_mono_8bit_pcm()))
}

/// Build a canonical 44-byte header, used to fabricate fixtures
#[cfg(test)]
pub(crate) fn header(channels: u16, sample_rate: u32, bits: u16, data_len: u32) -> Vec<u8> {
    let block_align = channels * bits / 8;
    let mut out = Vec::with_capacity(44);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bits.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out
}
