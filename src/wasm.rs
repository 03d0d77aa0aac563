use crate::blob::{pcm_i16le_to_wav, WAV_MIME_TYPE};
use crate::error::AudioError;
use crate::wav::WavContainer;
use js_sys::{Array, Uint8Array};
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, Url};

fn to_js(err: AudioError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_blob(wav: &WavContainer) -> Result<Blob, JsValue> {
    let parts = Array::of1(&Uint8Array::from(wav.as_bytes()));
    let opts = BlobPropertyBag::new();
    opts.set_type(WAV_MIME_TYPE);
    Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
}

/// s16le PCM bytes to a complete WAV file.
#[wasm_bindgen]
pub fn pcm_to_wav(
    data: &[u8],
    channel_count: u16,
    sampling_rate: u32,
) -> Result<Uint8Array, JsValue> {
    let wav = pcm_i16le_to_wav(data, channel_count, sampling_rate).map_err(to_js)?;
    Ok(Uint8Array::from(wav.as_bytes()))
}

/// s16le PCM bytes to an object URL for an `audio/wav` Blob, suitable for an
/// `<audio>` source or a download link. The caller revokes the URL.
#[wasm_bindgen]
pub fn pcm_to_wav_url(
    data: &[u8],
    channel_count: u16,
    sampling_rate: u32,
) -> Result<String, JsValue> {
    let wav = pcm_i16le_to_wav(data, channel_count, sampling_rate).map_err(to_js)?;
    let blob = to_blob(&wav)?;
    Url::create_object_url_with_blob(&blob)
}
