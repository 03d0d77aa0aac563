use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("Invalid audio buffer: {0}")]
    InvalidAudioBuffer(String),
    #[error("Invalid PCM data: {0}")]
    InvalidPcmData(String),
    #[error("Not a WAV file")]
    NotAWav,
    #[error("Unsupported WAV format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, AudioError>;
