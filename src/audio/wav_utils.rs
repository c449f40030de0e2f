use crate::error::{Result, TtsError};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::Cursor;

/// Whether `bytes` start with a RIFF/WAVE header
pub fn is_wav(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}

/// Wrap little-endian signed 16-bit PCM into a WAV container
///
/// A trailing odd byte cannot form a sample and is dropped.
pub fn encode_pcm16_wav(pcm: &[u8], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    if channels == 0 || sample_rate == 0 {
        return Err(TtsError::AudioEncoding(format!(
            "Invalid PCM layout: {} Hz, {} channel(s)",
            sample_rate, channels
        )));
    }

    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut output = Cursor::new(Vec::with_capacity(pcm.len() + 44));
    {
        let mut writer = WavWriter::new(&mut output, spec)?;
        for frame in pcm.chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([frame[0], frame[1]]))?;
        }
        writer.finalize()?;
    }

    Ok(output.into_inner())
}

/// Calculate duration in milliseconds from WAV file bytes
pub fn wav_duration_ms(wav_bytes: &[u8]) -> Result<f64> {
    let reader = WavReader::new(Cursor::new(wav_bytes))?;

    let spec = reader.spec();
    let sample_rate = spec.sample_rate as f64;
    let num_channels = spec.channels.max(1) as f64;

    // reader.len() counts samples across all channels
    let num_frames = reader.len() as f64 / num_channels;

    Ok((num_frames / sample_rate) * 1000.0)
}
