use crate::audio_bytes::interleave_f32_to_i16le;
use crate::audio_types::{EncoderConfig, SampleBuffer};
use crate::error::{AudioError, Result};
use byteorder::{ByteOrder, LittleEndian};
use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

pub const WAV_HEADER_LEN: usize = 44;
const FMT_CHUNK_SIZE: u32 = 16;
const FORMAT_PCM: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: usize = (BITS_PER_SAMPLE / 8) as usize;

/// A complete, immutable 16-bit PCM RIFF/WAVE file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavContainer {
    data: Bytes,
}

impl WavContainer {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Interleaved s16le sample data following the header.
    pub fn samples(&self) -> &[u8] {
        &self.data[WAV_HEADER_LEN..]
    }

    pub fn header(&self) -> Result<WavHeader> {
        WavHeader::parse(&self.data)
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

impl AsRef<[u8]> for WavContainer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// Fields of the canonical 44-byte PCM header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub riff_size: u32,
    pub audio_format: u16,
    pub channel_count: u16,
    pub sampling_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

impl WavHeader {
    /// Parses a header laid out as `encode` writes it: `fmt ` directly after
    /// `WAVE` and `data` directly after a 16-byte `fmt ` chunk.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < WAV_HEADER_LEN || &buf[..4] != b"RIFF" || &buf[8..12] != b"WAVE" {
            return Err(AudioError::NotAWav);
        }

        if &buf[12..16] != b"fmt " {
            return Err(AudioError::UnsupportedFormat(
                "fmt chunk is not the first chunk".to_string(),
            ));
        }

        let fmt_size = LittleEndian::read_u32(&buf[16..20]);
        if fmt_size != FMT_CHUNK_SIZE {
            return Err(AudioError::UnsupportedFormat(format!(
                "fmt chunk size {}",
                fmt_size
            )));
        }

        if &buf[36..40] != b"data" {
            return Err(AudioError::UnsupportedFormat(
                "data chunk does not follow fmt".to_string(),
            ));
        }

        Ok(Self {
            riff_size: LittleEndian::read_u32(&buf[4..8]),
            audio_format: LittleEndian::read_u16(&buf[20..22]),
            channel_count: LittleEndian::read_u16(&buf[22..24]),
            sampling_rate: LittleEndian::read_u32(&buf[24..28]),
            byte_rate: LittleEndian::read_u32(&buf[28..32]),
            block_align: LittleEndian::read_u16(&buf[32..34]),
            bits_per_sample: LittleEndian::read_u16(&buf[34..36]),
            data_size: LittleEndian::read_u32(&buf[40..44]),
        })
    }

    pub fn frame_count(&self) -> usize {
        if self.block_align == 0 {
            return 0;
        }
        self.data_size as usize / self.block_align as usize
    }
}

pub fn encode(buffer: &SampleBuffer) -> Result<WavContainer> {
    encode_with(buffer, &EncoderConfig::default())
}

pub fn encode_with(buffer: &SampleBuffer, config: &EncoderConfig) -> Result<WavContainer> {
    let channel_count = buffer.channel_count();
    let sample_count = buffer.frame_count();

    let block_align = channel_count
        .checked_mul(BYTES_PER_SAMPLE)
        .and_then(|n| u16::try_from(n).ok())
        .ok_or_else(|| {
            AudioError::InvalidAudioBuffer(format!(
                "{} channels overflow the block align field",
                channel_count
            ))
        })?;
    // block_align fits u16, so the channel count does too
    let channel_field = channel_count as u16;

    let sub_chunk_2_size = sample_count
        .checked_mul(block_align as usize)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| n.checked_add(36).is_some())
        .ok_or_else(|| {
            AudioError::InvalidAudioBuffer(format!(
                "{} frames of {} channels overflow the RIFF size fields",
                sample_count, channel_count
            ))
        })?;
    let byte_rate = (buffer.sampling_rate() as u64 * block_align as u64) as u32;

    let total_len = WAV_HEADER_LEN + sub_chunk_2_size as usize;
    let mut cursor = BytesMut::with_capacity(total_len);

    cursor.put_slice(b"RIFF");
    cursor.put_u32_le(36 + sub_chunk_2_size);
    cursor.put_slice(b"WAVE");

    cursor.put_slice(b"fmt ");
    cursor.put_u32_le(FMT_CHUNK_SIZE);
    cursor.put_u16_le(FORMAT_PCM);
    cursor.put_u16_le(channel_field);
    cursor.put_u32_le(buffer.sampling_rate());
    cursor.put_u32_le(byte_rate);
    cursor.put_u16_le(block_align);
    cursor.put_u16_le(BITS_PER_SAMPLE);

    cursor.put_slice(b"data");
    cursor.put_u32_le(sub_chunk_2_size);

    interleave_f32_to_i16le(buffer.channels(), config.quantization, &mut cursor);

    debug!(
        "encoded {} frames x {} channels at {} Hz into {} byte wav ({:?})",
        sample_count,
        channel_count,
        buffer.sampling_rate(),
        cursor.len(),
        config.quantization
    );

    Ok(WavContainer {
        data: cursor.freeze(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_types::{Quantization, MAX_CHANNEL_COUNT};

    fn samples_i16(wav: &WavContainer) -> Vec<i16> {
        wav.samples()
            .chunks_exact(2)
            .map(LittleEndian::read_i16)
            .collect()
    }

    #[test]
    fn test_header_fields() {
        let buf = SampleBuffer::new(vec![vec![0.0; 10], vec![0.0; 10]], 44_100).unwrap();
        let wav = encode(&buf).unwrap();
        let bytes = wav.as_bytes();

        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(LittleEndian::read_u32(&bytes[4..8]) as usize, bytes.len() - 8);

        let header = wav.header().unwrap();
        assert_eq!(header.audio_format, 1);
        assert_eq!(header.channel_count, 2);
        assert_eq!(header.sampling_rate, 44_100);
        assert_eq!(header.byte_rate, 44_100 * 2 * 2);
        assert_eq!(header.block_align, 4);
        assert_eq!(header.bits_per_sample, 16);
        assert_eq!(header.data_size, 40);
        assert_eq!(header.frame_count(), 10);
    }

    #[test]
    fn test_size_law() {
        for (channels, frames) in [(1usize, 0usize), (1, 7), (2, 5), (3, 11), (6, 1)] {
            let buf = SampleBuffer::new(vec![vec![0.25; frames]; channels], 16_000).unwrap();
            let wav = encode(&buf).unwrap();
            assert_eq!(wav.len(), 44 + frames * channels * 2);
        }
    }

    #[test]
    fn test_empty_buffer_is_header_only() {
        let buf = SampleBuffer::mono(Vec::new(), 24_000).unwrap();
        let wav = encode(&buf).unwrap();
        assert_eq!(wav.len(), WAV_HEADER_LEN);
        assert!(wav.samples().is_empty());
        assert_eq!(wav.header().unwrap().riff_size, 36);
    }

    #[test]
    fn test_silence() {
        let buf = SampleBuffer::new(vec![vec![0.0; 32]; 3], 22_050).unwrap();
        let wav = encode(&buf).unwrap();
        assert!(wav.samples().iter().all(|&b| b == 0));

        let header = wav.header().unwrap();
        assert_eq!(header.channel_count, 3);
        assert_eq!(header.sampling_rate, 22_050);
        assert_eq!(header.byte_rate, 22_050 * 3 * 2);
        assert_eq!(header.block_align, 6);
    }

    #[test]
    fn test_clamping_and_asymmetric_scaling() {
        let buf = SampleBuffer::mono(vec![2.0, 1.0, -1.0, -7.5], 8_000).unwrap();
        let wav = encode(&buf).unwrap();
        assert_eq!(samples_i16(&wav), vec![32767, 32767, -32768, -32768]);
    }

    #[test]
    fn test_mono_24khz_fixture() {
        let buf = SampleBuffer::mono(vec![0.0, 0.5, -0.5], 24_000).unwrap();
        let wav = encode(&buf).unwrap();
        let bytes = wav.as_bytes();

        assert_eq!(bytes.len(), 50);
        assert_eq!(&bytes[22..24], &[0x01, 0x00]);
        assert_eq!(&bytes[24..28], &[0xC0, 0x5D, 0x00, 0x00]);
        assert_eq!(samples_i16(&wav), vec![0, 16383, -16383]);
    }

    #[test]
    fn test_symmetric_fixture() {
        let buf = SampleBuffer::mono(vec![0.0, 0.5, -0.5, -1.0], 24_000).unwrap();
        let cfg = EncoderConfig::new(Quantization::Symmetric);
        let wav = encode_with(&buf, &cfg).unwrap();
        assert_eq!(samples_i16(&wav), vec![0, 16384, -16384, -32767]);
    }

    #[test]
    fn test_interleaving_order() {
        let left = vec![1.0, 0.0, -1.0];
        let right = vec![0.0, 1.0, 0.0];
        let buf = SampleBuffer::new(vec![left, right], 48_000).unwrap();
        let wav = encode(&buf).unwrap();
        assert_eq!(samples_i16(&wav), vec![32767, 0, 0, 32767, -32768, 0]);
    }

    #[test]
    fn test_deterministic() {
        let ch: Vec<f32> = (0..256).map(|i| ((i as f32) * 0.1).sin()).collect();
        let buf = SampleBuffer::new(vec![ch.clone(), ch], 24_000).unwrap();
        assert_eq!(encode(&buf).unwrap(), encode(&buf).unwrap());
    }

    #[test]
    fn test_widest_buffer_header_is_consistent() {
        let buf = SampleBuffer::new(vec![vec![0.0]; MAX_CHANNEL_COUNT], 8_000).unwrap();
        let header = encode(&buf).unwrap().header().unwrap();
        assert_eq!(header.channel_count as usize, MAX_CHANNEL_COUNT);
        assert_eq!(header.block_align, 65_534);
        assert_eq!(header.data_size, 65_534);
        assert_eq!(header.frame_count(), 1);
    }

    #[test]
    fn test_parse_rejects_non_wav() {
        assert_eq!(WavHeader::parse(b"RIFF"), Err(AudioError::NotAWav));

        let buf = SampleBuffer::mono(vec![0.0], 24_000).unwrap();
        let mut bytes = encode(&buf).unwrap().as_bytes().to_vec();
        bytes[8..12].copy_from_slice(b"AVI ");
        assert_eq!(WavHeader::parse(&bytes), Err(AudioError::NotAWav));

        bytes[8..12].copy_from_slice(b"WAVE");
        bytes[36..40].copy_from_slice(b"LIST");
        assert!(matches!(
            WavHeader::parse(&bytes),
            Err(AudioError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_parse_rejects_misplaced_fmt() {
        let buf = SampleBuffer::mono(vec![0.0], 24_000).unwrap();
        let mut bytes = encode(&buf).unwrap().as_bytes().to_vec();
        bytes[12..16].copy_from_slice(b"JUNK");
        assert_eq!(
            WavHeader::parse(&bytes),
            Err(AudioError::UnsupportedFormat(
                "fmt chunk is not the first chunk".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_rejects_extended_fmt() {
        let buf = SampleBuffer::mono(vec![0.0], 24_000).unwrap();
        let mut bytes = encode(&buf).unwrap().as_bytes().to_vec();
        bytes[16..20].copy_from_slice(&18u32.to_le_bytes());
        assert_eq!(
            WavHeader::parse(&bytes),
            Err(AudioError::UnsupportedFormat("fmt chunk size 18".to_string()))
        );
    }
}
