pub mod audio_bytes;
pub mod audio_types;
pub mod blob;
pub mod error;
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod wasm;
pub mod wav;

pub use audio_bytes::decode_pcm_i16le;
pub use audio_types::{
    EncoderConfig, Quantization, SampleBuffer, MAX_CHANNEL_COUNT, TTS_CHANNEL_COUNT,
    TTS_SAMPLE_RATE,
};
pub use blob::{pcm_i16le_to_wav, AudioBlob, WAV_MIME_TYPE};
pub use error::AudioError;
pub use wav::{encode, encode_with, WavContainer, WavHeader};
