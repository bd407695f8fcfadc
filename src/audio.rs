//! Audio file loading.
//!
//! Reads a WAV file and converts it to the 16 kHz mono f32 samples Whisper
//! expects: integer samples are normalized to [-1.0, 1.0], interleaved
//! channels are averaged down to mono, and anything not already at 16 kHz
//! goes through a sinc resampler.

use anyhow::{bail, Context, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use std::path::Path;

pub const WHISPER_SAMPLE_RATE: u32 = 16000;

/// Load an audio file as 16 kHz mono f32 samples.
pub fn load_audio(path: &Path) -> Result<Vec<f32>> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .context("Failed to read float samples")?,
        hound::SampleFormat::Int => {
            if spec.bits_per_sample > 32 {
                bail!("Unsupported bit depth: {}", spec.bits_per_sample);
            }
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .context("Failed to read integer samples")?
        }
    };

    let mono = downmix(&samples, spec.channels as usize);
    resample(mono, spec.sample_rate, WHISPER_SAMPLE_RATE)
}

/// Average interleaved channels down to mono.
fn downmix(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Resample mono audio with high-quality sinc interpolation.
fn resample(samples: Vec<f32>, from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate {
        return Ok(samples);
    }

    let resample_ratio = to_rate as f64 / from_rate as f64;
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(
        resample_ratio,
        2.0, // max relative ratio (safety margin)
        params,
        1024, // chunk size
        1,    // mono channel
    )
    .context("Failed to create resampler")?;

    let mut out = Vec::with_capacity((samples.len() as f64 * resample_ratio) as usize + 1024);
    let input_frames = resampler.input_frames_next();

    for chunk in samples.chunks(input_frames) {
        if chunk.len() == input_frames {
            let input = vec![chunk.to_vec()];
            let output = resampler
                .process(&input, None)
                .context("Resampling failed")?;
            out.extend(&output[0]);
        } else {
            // Pad the last chunk and take only the proportional output
            let mut padded = chunk.to_vec();
            padded.resize(input_frames, 0.0);
            let input = vec![padded];
            let output = resampler
                .process(&input, None)
                .context("Resampling failed")?;
            let output_len = (chunk.len() as f64 * output[0].len() as f64
                / input_frames as f64) as usize;
            out.extend(&output[0][..output_len.min(output[0].len())]);
        }
    }

    Ok(out)
}
