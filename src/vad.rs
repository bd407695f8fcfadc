//! Silero-based voice activity filtering.
//!
//! Uses the voice_activity_detector crate which bundles the Silero ONNX
//! model. The filter scores fixed-size chunks, keeps the ones at or above
//! the speech probability threshold, and dilates the keep-mask so word
//! onsets and tails survive the cut.

use anyhow::Result;
use voice_activity_detector::VoiceActivityDetector as SileroVad;

const SAMPLE_RATE_HZ: u32 = 16000;
/// Chunk size for Silero VAD at 16kHz (must be 512 samples per V5 model requirements)
const CHUNK_SIZE: usize = 512;
/// Chunks of context kept on each side of detected speech (~64ms)
const SPEECH_PAD_CHUNKS: usize = 2;

pub const DEFAULT_SPEECH_THRESHOLD: f32 = 0.5;

/// Removes non-speech audio before transcription.
pub struct SpeechFilter {
    vad: SileroVad,
    threshold: f32,
}

impl SpeechFilter {
    /// Create a filter with the given speech probability threshold (0.0-1.0).
    pub fn new(threshold: f32) -> Result<Self> {
        let vad = SileroVad::builder()
            .sample_rate(SAMPLE_RATE_HZ)
            .chunk_size(CHUNK_SIZE)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create Silero VAD: {}", e))?;

        Ok(Self { vad, threshold })
    }

    /// Keep only the chunks judged to contain speech, with padding.
    ///
    /// Returns an empty vector when no speech is detected at all.
    pub fn filter(&mut self, samples: &[f32]) -> Result<Vec<f32>> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let mask: Vec<bool> = samples
            .chunks(CHUNK_SIZE)
            .map(|chunk| self.vad.predict(chunk.iter().copied()) >= self.threshold)
            .collect();

        let keep = dilate_mask(&mask, SPEECH_PAD_CHUNKS);

        let mut out = Vec::new();
        for (chunk, &keep_chunk) in samples.chunks(CHUNK_SIZE).zip(keep.iter()) {
            if keep_chunk {
                out.extend_from_slice(chunk);
            }
        }

        Ok(out)
    }
}

/// Widen each speech run in the mask by `pad` chunks on both sides.
fn dilate_mask(mask: &[bool], pad: usize) -> Vec<bool> {
    let mut out = vec![false; mask.len()];
    for (i, &speech) in mask.iter().enumerate() {
        if speech {
            let lo = i.saturating_sub(pad);
            let hi = (i + pad).min(mask.len() - 1);
            for slot in &mut out[lo..=hi] {
                *slot = true;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dilate_mask_empty() {
        assert!(dilate_mask(&[], 2).is_empty());
    }

    #[test]
    fn test_dilate_mask_all_silence_stays_silence() {
        assert_eq!(dilate_mask(&[false, false, false], 2), vec![false; 3]);
    }

    #[test]
    fn test_dilate_mask_pads_both_sides() {
        let mask = [false, false, false, true, false, false, false];
        let out = dilate_mask(&mask, 1);
        assert_eq!(out, vec![false, false, true, true, true, false, false]);
    }

    #[test]
    fn test_dilate_mask_clamps_at_boundaries() {
        let mask = [true, false, false];
        let out = dilate_mask(&mask, 5);
        assert_eq!(out, vec![true, true, true]);
    }

    #[test]
    fn test_dilate_mask_merges_adjacent_runs() {
        let mask = [true, false, false, true];
        let out = dilate_mask(&mask, 1);
        assert_eq!(out, vec![true, true, true, true]);
    }

    #[test]
    fn test_filter_empty_input() {
        let mut filter = SpeechFilter::new(DEFAULT_SPEECH_THRESHOLD).unwrap();
        let out = filter.filter(&[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_filter_silence_removed() {
        let mut filter = SpeechFilter::new(DEFAULT_SPEECH_THRESHOLD).unwrap();
        // 2 seconds of silence
        let silence = vec![0.0f32; SAMPLE_RATE_HZ as usize * 2];
        let out = filter.filter(&silence).unwrap();
        assert!(out.is_empty(), "silence should be filtered out entirely");
    }
}
