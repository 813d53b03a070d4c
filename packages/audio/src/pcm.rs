//! Symphonia loader → f32 channel-0 PCM

use std::fs::File;
use std::path::Path;

use symphonia::core::{
    audio::{AudioBufferRef, Signal},
    codecs::{CODEC_TYPE_NULL, DecoderOptions},
    conv::FromSample,
    errors::Error as SymphoniaError,
    formats::FormatOptions,
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
    sample::Sample,
};

use crate::error::{AudioError, Result};

/// Output of a full decode.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Channel 0 only.
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    /// Channel count of the source stream.
    pub channels: u16,
}

impl DecodedAudio {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Decode any container Symphonia knows about, keeping channel 0.
///
/// Packets that fail with a recoverable `DecodeError` are skipped, matching
/// what players do with a damaged frame; anything else aborts the decode.
pub fn decode<P: AsRef<Path>>(path: P) -> Result<DecodedAudio> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AudioError::io(path, e))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AudioError::decode(path, e))?;
    let mut format = probed.format;

    // Extract track information before starting packet processing
    // to avoid overlapping borrows
    let (track_id, codec_params) = {
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AudioError::NoAudioTrack(path.to_path_buf()))?;
        (track.id, track.codec_params.clone())
    };

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| AudioError::decode(path, e))?;

    let mut sample_rate = codec_params.sample_rate;
    let mut channels = codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);
    let mut pcm = Vec::<f32>::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(AudioError::decode(path, e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate.get_or_insert(spec.rate);
                if channels == 0 {
                    channels = spec.channels.count() as u16;
                }
                push_channel0(&mut pcm, decoded);
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                tracing::debug!(path = %path.display(), error = msg, "skipping undecodable packet");
            }
            Err(e) => return Err(AudioError::decode(path, e)),
        }
    }

    let sample_rate = sample_rate.ok_or_else(|| AudioError::UnknownSampleRate(path.to_path_buf()))?;

    Ok(DecodedAudio {
        samples: pcm,
        sample_rate,
        channels: channels.max(1),
    })
}

fn push_channel0(dst: &mut Vec<f32>, decoded: AudioBufferRef<'_>) {
    match decoded {
        AudioBufferRef::F32(buf) => dst.extend_from_slice(buf.chan(0)),
        AudioBufferRef::F64(buf) => extend(dst, buf.chan(0)),
        AudioBufferRef::U8(buf) => extend(dst, buf.chan(0)),
        AudioBufferRef::U16(buf) => extend(dst, buf.chan(0)),
        AudioBufferRef::U24(buf) => extend(dst, buf.chan(0)),
        AudioBufferRef::U32(buf) => extend(dst, buf.chan(0)),
        AudioBufferRef::S8(buf) => extend(dst, buf.chan(0)),
        AudioBufferRef::S16(buf) => extend(dst, buf.chan(0)),
        AudioBufferRef::S24(buf) => extend(dst, buf.chan(0)),
        AudioBufferRef::S32(buf) => extend(dst, buf.chan(0)),
    }
}

fn extend<T>(dst: &mut Vec<f32>, src: &[T])
where
    T: Sample,
    f32: FromSample<T>,
{
    dst.extend(src.iter().map(|s| f32::from_sample(*s)));
}
