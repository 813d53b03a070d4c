//! # Refvoice Audio
//!
//! Audio plumbing shared by admission and output:
//!
//! * [`wav`] – channel-0 WAV reads and mono float / PCM16 writes (hound)
//! * [`pcm`] – decoding of MP3, Ogg Vorbis and FLAC (symphonia)
//! * [`stats`] – level snapshots for the finalization trace
//! * [`limiter`] – the in-place peak limiter applied to model output

pub mod error;
pub mod limiter;
pub mod pcm;
pub mod stats;
pub mod wav;

pub use error::{AudioError, Result};
pub use limiter::{FinalizeReport, Finalizer, finalize};
pub use pcm::{DecodedAudio, decode};
pub use stats::SignalStats;
pub use wav::{WavData, read_channel0, write_float_mono, write_pcm16_mono};
