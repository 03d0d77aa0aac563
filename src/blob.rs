use crate::audio_bytes::decode_pcm_i16le;
use crate::error::Result;
use crate::wav::{encode, WavContainer};
use bytes::Bytes;

pub const WAV_MIME_TYPE: &str = "audio/wav";
pub const DEFAULT_FILE_NAME: &str = "voiceover.wav";

/// Encoded audio ready to be handed to a player or offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBlob {
    data: Bytes,
    file_name: String,
}

impl AudioBlob {
    pub fn from_container(container: WavContainer, file_name: &str) -> Self {
        let file_name = if file_name.is_empty() || file_name.eq_ignore_ascii_case(".wav") {
            DEFAULT_FILE_NAME.to_string()
        } else if file_name.to_ascii_lowercase().ends_with(".wav") {
            file_name.to_string()
        } else {
            format!("{}.wav", file_name)
        };

        Self {
            data: container.into_bytes(),
            file_name,
        }
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn mime_type(&self) -> &'static str {
        WAV_MIME_TYPE
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<WavContainer> for AudioBlob {
    fn from(container: WavContainer) -> Self {
        Self::from_container(container, DEFAULT_FILE_NAME)
    }
}

/// Raw s16le speech-synthesis output straight to a WAV file.
pub fn pcm_i16le_to_wav(
    data: &[u8],
    channel_count: u16,
    sampling_rate: u32,
) -> Result<WavContainer> {
    let buffer = decode_pcm_i16le(data, channel_count, sampling_rate)?;
    encode(&buffer)
}
