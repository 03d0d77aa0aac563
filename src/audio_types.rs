use crate::error::{AudioError, Result};
use serde::{Deserialize, Serialize};

/// Sample rate of the speech-synthesis PCM stream.
pub const TTS_SAMPLE_RATE: u32 = 24_000;
/// Channel count of the speech-synthesis PCM stream.
pub const TTS_CHANNEL_COUNT: u16 = 1;
/// Largest channel count whose 16-bit block align (`channels * 2`) still fits
/// the WAV header.
pub const MAX_CHANNEL_COUNT: usize = (u16::MAX / 2) as usize;

/// Planar floating point audio, one `Vec` per channel.
///
/// Samples are expected in `[-1.0, 1.0]`; values outside that range are
/// clamped when quantized. Every channel holds the same number of frames.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    channels: Vec<Vec<f32>>,
    sampling_rate: u32,
}

impl SampleBuffer {
    pub fn new(channels: Vec<Vec<f32>>, sampling_rate: u32) -> Result<Self> {
        if channels.is_empty() {
            return Err(AudioError::InvalidAudioBuffer(
                "channel count is zero".to_string(),
            ));
        }

        if channels.len() > MAX_CHANNEL_COUNT {
            return Err(AudioError::InvalidAudioBuffer(format!(
                "{} channels exceed the WAV limit of {}",
                channels.len(),
                MAX_CHANNEL_COUNT
            )));
        }

        if sampling_rate == 0 {
            return Err(AudioError::InvalidAudioBuffer(
                "sampling rate is zero".to_string(),
            ));
        }

        let frame_count = channels[0].len();
        if let Some((idx, ch)) = channels
            .iter()
            .enumerate()
            .find(|(_, ch)| ch.len() != frame_count)
        {
            return Err(AudioError::InvalidAudioBuffer(format!(
                "channel {} has {} frames, expected {}",
                idx,
                ch.len(),
                frame_count
            )));
        }

        Ok(Self {
            channels,
            sampling_rate,
        })
    }

    pub fn mono(samples: Vec<f32>, sampling_rate: u32) -> Result<Self> {
        Self::new(vec![samples], sampling_rate)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    pub fn sampling_rate(&self) -> u32 {
        self.sampling_rate
    }

    pub fn channel(&self, idx: usize) -> Option<&[f32]> {
        self.channels.get(idx).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sampling_rate as f64
    }
}

/// How normalized samples are mapped onto signed 16-bit integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantization {
    /// `s * 32768` below -0.5, `s * 32767` otherwise, truncated toward zero.
    /// Bit-compatible with the widely copied browser `AudioBuffer` to WAV
    /// exporter.
    #[default]
    Legacy,
    /// `round(s * 32767)`.
    Symmetric,
}

impl Quantization {
    pub fn quantize(self, sample: f32) -> i16 {
        if sample.is_nan() {
            return 0;
        }

        let clamped = (sample as f64).max(-1.0).min(1.0);
        match self {
            Quantization::Legacy => {
                let scaled = if 0.5 + clamped < 0.0 {
                    clamped * 32768.0
                } else {
                    clamped * 32767.0
                };
                scaled.trunc() as i16
            }
            Quantization::Symmetric => (clamped * 32767.0).round() as i16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub quantization: Quantization,
}

impl EncoderConfig {
    pub fn new(quantization: Quantization) -> Self {
        Self { quantization }
    }
}
