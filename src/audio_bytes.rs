use crate::audio_types::{Quantization, SampleBuffer};
use crate::error::{AudioError, Result};
use byteorder::{ByteOrder, LittleEndian};
use bytes::BufMut;
use tracing::warn;

pub fn i16le_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|chunk| LittleEndian::read_i16(chunk) as f32 / 32768.0)
        .collect()
}

/// Splits interleaved s16le bytes into per-channel normalized floats.
/// Bytes past the last whole frame are ignored; zero channels yield no output.
pub fn deinterleave_vecs_i16le_f32(input: &[u8], channel_count: usize) -> Vec<Vec<f32>> {
    match channel_count {
        0 => return Vec::new(),
        1 => return vec![i16le_to_f32(input)],
        _ => {}
    }

    let frame_bytes = channel_count * 2;
    let sample_count = input.len() / frame_bytes;
    let mut result = vec![Vec::with_capacity(sample_count); channel_count];

    input.chunks_exact(frame_bytes).for_each(|chunk| {
        chunk
            .chunks_exact(2)
            .enumerate()
            .for_each(|(channel, bytes)| {
                result[channel].push(LittleEndian::read_i16(bytes) as f32 / 32768.0);
            });
    });

    result
}

/// Quantizes and interleaves planar floats into s16le, appending to `out`.
pub fn interleave_f32_to_i16le<B: BufMut>(
    channels: &[Vec<f32>],
    quantization: Quantization,
    out: &mut B,
) {
    let sample_count = channels.first().map_or(0, Vec::len);
    for i in 0..sample_count {
        for channel in channels {
            out.put_i16_le(quantization.quantize(channel[i]));
        }
    }
}

/// Decodes raw speech-synthesis output (interleaved signed 16-bit
/// little-endian PCM) into a [`SampleBuffer`].
pub fn decode_pcm_i16le(
    data: &[u8],
    channel_count: u16,
    sampling_rate: u32,
) -> Result<SampleBuffer> {
    if channel_count == 0 {
        return Err(AudioError::InvalidPcmData(
            "channel count is zero".to_string(),
        ));
    }
    if sampling_rate == 0 {
        return Err(AudioError::InvalidPcmData(
            "sampling rate is zero".to_string(),
        ));
    }

    let frame_bytes = channel_count as usize * 2;
    let widow = data.len() % frame_bytes;
    if widow != 0 {
        warn!(
            "dropping {} trailing bytes that do not form a whole {}-channel frame",
            widow, channel_count
        );
    }

    let channels = deinterleave_vecs_i16le_f32(data, channel_count as usize);
    SampleBuffer::new(channels, sampling_rate)
}
