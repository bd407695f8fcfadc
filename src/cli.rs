//! Command-line interface definition and device resolution.
//!
//! Flag names deliberately keep the snake_case spelling of the original
//! tool (`--compute_type`, `--beam_size`, ...) so existing invocations
//! keep working.

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

/// Transcribe an audio file to text using a Whisper model.
#[derive(Parser, Debug)]
#[command(name = "whisper-transcribe", version, about)]
pub struct Cli {
    /// Model size/name (tiny|base|small|medium|large-v3) or path to a ggml model file
    #[arg(long, default_value = "small")]
    pub model: String,

    /// Compute device: cpu, cuda or auto (auto selects cuda)
    #[arg(long, default_value = "cpu")]
    pub device: String,

    /// Model weight precision: int8|int8_float16|float16|float32
    #[arg(long = "compute_type", default_value = "int8")]
    pub compute_type: String,

    /// Language code (e.g. ru/en). Omit for auto-detection
    #[arg(long)]
    pub language: Option<String>,

    /// Decoding beam width; 1 = greedy decoding
    #[arg(long = "beam_size", default_value_t = 1)]
    pub beam_size: i32,

    /// Filter out non-speech audio before decoding (Silero VAD)
    #[arg(long = "vad_filter", default_value_t = true, action = clap::ArgAction::SetTrue)]
    pub vad_filter: bool,

    /// No-speech probability above which a segment is dropped as silence
    #[arg(long = "no_speech_threshold", default_value_t = 0.6)]
    pub no_speech_threshold: f32,

    /// Average log-probability below which decoded text is treated as failed
    #[arg(long = "log_prob_threshold", default_value_t = -1.0, allow_hyphen_values = true)]
    pub log_prob_threshold: f32,

    /// Cutoff for repetitive (hallucinated) decoded text
    #[arg(long = "compression_ratio_threshold", default_value_t = 2.4)]
    pub compression_ratio_threshold: f32,

    /// Optional prompt to bias decoding toward certain vocabulary
    #[arg(long)]
    pub prompt: Option<String>,

    /// Path to the audio file (WAV)
    pub file: PathBuf,
}

/// Compute device the model runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeDevice {
    Cpu,
    Cuda,
}

impl ComputeDevice {
    pub fn use_gpu(self) -> bool {
        matches!(self, ComputeDevice::Cuda)
    }
}

/// Resolve a `--device` string to a concrete device.
///
/// "auto" is rewritten to cuda unconditionally, with no capability
/// probing; loading then fails if no CUDA device is present.
pub fn resolve_device(device: &str) -> Result<ComputeDevice> {
    match device {
        "cpu" => Ok(ComputeDevice::Cpu),
        "cuda" | "auto" => Ok(ComputeDevice::Cuda),
        other => bail!("Unknown device '{}' (expected cpu, cuda or auto)", other),
    }
}
