pub mod wav_utils;

pub use wav_utils::{encode_pcm16_wav, is_wav, wav_duration_ms};
