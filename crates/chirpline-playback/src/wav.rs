//! WAV decoding and encoding.
//!
//! [`WavFileFetcher`] is the file-backed clip capability: paths are resolved
//! against a root directory and decoded on the blocking pool. Multi-channel
//! audio is averaged down to mono.

use std::io::Read;
use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::clip::DecodedClip;
use crate::error::LoadError;
use crate::fetch::ClipFetcher;
use crate::mixer::StereoOutput;

/// Loads clips from WAV files under a root directory.
#[derive(Debug, Clone)]
pub struct WavFileFetcher {
    root: PathBuf,
}

impl WavFileFetcher {
    /// Creates a fetcher resolving paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ClipFetcher for WavFileFetcher {
    fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<DecodedClip, LoadError>> {
        let full = self.root.join(path);
        let label = path.to_string();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || decode_wav_file(&full))
                .await
                .map_err(|e| LoadError::fetch(label, e.to_string()))?
        })
    }
}

/// Decodes a WAV file to a mono clip.
pub fn decode_wav_file(path: &Path) -> Result<DecodedClip, LoadError> {
    let label = path.display().to_string();
    let reader = WavReader::open(path).map_err(|e| match e {
        hound::Error::IoError(io) => LoadError::fetch(&label, io.to_string()),
        other => LoadError::decode(&label, other.to_string()),
    })?;
    decode_reader(&label, reader)
}

/// Decodes WAV bytes to a mono clip.
pub fn decode_wav_bytes(label: &str, bytes: &[u8]) -> Result<DecodedClip, LoadError> {
    let reader = WavReader::new(bytes).map_err(|e| LoadError::decode(label, e.to_string()))?;
    decode_reader(label, reader)
}

fn decode_reader<R: Read>(label: &str, mut reader: WavReader<R>) -> Result<DecodedClip, LoadError> {
    let spec = reader.spec();
    let channels = spec.channels.max(1);

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| LoadError::decode(label, e.to_string()))?,
        (SampleFormat::Int, 8) => read_int::<i8, R>(label, &mut reader, 8)?,
        (SampleFormat::Int, 16) => read_int::<i16, R>(label, &mut reader, 16)?,
        (SampleFormat::Int, bits @ (24 | 32)) => read_int::<i32, R>(label, &mut reader, bits)?,
        (format, bits) => {
            return Err(LoadError::decode(
                label,
                format!("unsupported sample format {format:?} at {bits} bits"),
            ));
        }
    };

    Ok(DecodedClip::new(
        spec.sample_rate,
        downmix(&interleaved, channels),
    ))
}

fn read_int<T, R>(label: &str, reader: &mut WavReader<R>, bits: u16) -> Result<Vec<f32>, LoadError>
where
    T: hound::Sample + Into<i32>,
    R: Read,
{
    let scale = normalization_scale(bits);
    reader
        .samples::<T>()
        .map(|s| s.map(|v| (f64::from(v.into()) / scale) as f32))
        .collect::<Result<_, _>>()
        .map_err(|e| LoadError::decode(label, e.to_string()))
}

fn normalization_scale(bits: u16) -> f64 {
    match bits {
        8 => 128.0,
        16 => 32_768.0,
        24 => 8_388_608.0,
        _ => 2_147_483_648.0,
    }
}

/// Averages interleaved channels to mono.
fn downmix(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels == 1 {
        return samples.to_vec();
    }
    let channels = usize::from(channels);
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Writes stereo output as a 16-bit PCM WAV file.
///
/// Samples are clamped to `[-1.0, 1.0]` before quantization.
pub fn write_stereo_wav(
    path: &Path,
    output: &StereoOutput,
    sample_rate: u32,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for (l, r) in output.left.iter().zip(&output.right) {
        writer.write_sample(quantize(*l))?;
        writer.write_sample(quantize(*r))?;
    }
    writer.finalize()
}

/// Writes mono samples as a 16-bit PCM WAV file.
pub fn write_mono_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &s in samples {
        writer.write_sample(quantize(f64::from(s)))?;
    }
    writer.finalize()
}

fn quantize(sample: f64) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32_767.0).round() as i16
}
