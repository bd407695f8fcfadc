//! Whisper model loading and transcription via whisper-rs.

use anyhow::{Context, Result};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// A contiguous span of decoded speech.
#[derive(Debug, Clone)]
pub struct Segment {
    pub text: String,
    /// Start of the segment in seconds.
    pub start: f32,
    /// End of the segment in seconds.
    pub end: f32,
}

/// Decoding and anti-hallucination parameters for one transcription call.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Language code, or None for auto-detection.
    pub language: Option<String>,
    /// Beam width; 1 selects greedy decoding.
    pub beam_size: i32,
    /// No-speech probability above which a segment is dropped.
    pub no_speech_threshold: f32,
    /// Average log-probability below which decoding is treated as failed.
    pub log_prob_threshold: f32,
    /// Entropy cutoff for repetitive decoded text; whisper.cpp's analogue
    /// of the compression-ratio threshold, same 2.4 default.
    pub compression_ratio_threshold: f32,
    /// Optional prompt biasing decoding toward certain vocabulary.
    pub prompt: Option<String>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            language: None,
            beam_size: 1,
            no_speech_threshold: 0.6,
            log_prob_threshold: -1.0,
            compression_ratio_threshold: 2.4,
            prompt: None,
        }
    }
}

pub struct WhisperSTT {
    ctx: WhisperContext,
}

impl WhisperSTT {
    /// Load a ggml Whisper model from disk.
    ///
    /// `use_gpu` is passed straight through to whisper.cpp; on a build
    /// without CUDA support it has no effect.
    pub fn new(model_path: &str, use_gpu: bool) -> Result<Self> {
        let mut ctx_params = WhisperContextParameters::default();
        ctx_params.use_gpu(use_gpu);

        let ctx = WhisperContext::new_with_params(model_path, ctx_params)
            .with_context(|| format!("Failed to load Whisper model from {}", model_path))?;

        Ok(Self { ctx })
    }

    /// Transcribe 16 kHz mono samples into time-stamped text segments.
    ///
    /// Blocks for the whole inference; there is no cancellation.
    pub fn transcribe(&self, samples: &[f32], opts: &DecodeOptions) -> Result<Vec<Segment>> {
        let strategy = if opts.beam_size > 1 {
            SamplingStrategy::BeamSearch {
                beam_size: opts.beam_size,
                patience: -1.0,
            }
        } else {
            SamplingStrategy::Greedy { best_of: 1 }
        };
        let mut params = FullParams::new(strategy);

        // Language is only set when requested; whisper.cpp auto-detects
        // otherwise.
        if let Some(lang) = opts.language.as_deref() {
            params.set_language(Some(lang));
        }
        if let Some(prompt) = opts.prompt.as_deref() {
            params.set_initial_prompt(prompt);
        }

        params.set_no_speech_thold(opts.no_speech_threshold);
        params.set_logprob_thold(opts.log_prob_threshold);
        params.set_entropy_thold(opts.compression_ratio_threshold);

        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        let mut state = self.ctx.create_state().context("Failed to create Whisper state")?;
        state.full(params, samples).context("Transcription failed")?;

        let num_segments = state.full_n_segments()?;
        let mut segments = Vec::with_capacity(num_segments as usize);

        for i in 0..num_segments {
            let text = state.full_get_segment_text(i)?;
            // Segment timestamps are in centiseconds
            let start = state.full_get_segment_t0(i)? as f32 / 100.0;
            let end = state.full_get_segment_t1(i)? as f32 / 100.0;
            segments.push(Segment { text, start, end });
        }

        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_options_defaults_match_cli() {
        let opts = DecodeOptions::default();
        assert_eq!(opts.language, None);
        assert_eq!(opts.beam_size, 1);
        assert_eq!(opts.no_speech_threshold, 0.6);
        assert_eq!(opts.log_prob_threshold, -1.0);
        assert_eq!(opts.compression_ratio_threshold, 2.4);
        assert_eq!(opts.prompt, None);
    }

    #[test]
    fn test_load_nonexistent_model_is_error() {
        let result = WhisperSTT::new("/definitely/not/a/model.bin", false);
        assert!(result.is_err());
    }
}
