mod audio;
mod cli;
mod models;
mod transcript;
mod vad;
mod whisper;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;

use cli::Cli;
use whisper::{DecodeOptions, WhisperSTT};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let device = cli::resolve_device(&cli.device)?;

    let samples = audio::load_audio(&cli.file)?;
    log::info!(
        "Loaded {:.1}s of audio from {}",
        samples.len() as f32 / audio::WHISPER_SAMPLE_RATE as f32,
        cli.file.display()
    );

    let samples = if cli.vad_filter {
        let mut filter = vad::SpeechFilter::new(vad::DEFAULT_SPEECH_THRESHOLD)?;
        let filtered = filter.filter(&samples)?;
        log::info!(
            "VAD kept {:.1}s of speech",
            filtered.len() as f32 / audio::WHISPER_SAMPLE_RATE as f32
        );
        filtered
    } else {
        samples
    };

    // No speech at all: nothing to decode, empty transcript
    if samples.is_empty() {
        return Ok(());
    }

    let model_path = models::resolve(&cli.model, &cli.compute_type)?;
    log::info!("Loading model: {}", model_path.display());
    let stt = WhisperSTT::new(&model_path.to_string_lossy(), device.use_gpu())?;

    let opts = DecodeOptions {
        language: cli.language,
        beam_size: cli.beam_size,
        no_speech_threshold: cli.no_speech_threshold,
        log_prob_threshold: cli.log_prob_threshold,
        compression_ratio_threshold: cli.compression_ratio_threshold,
        prompt: cli.prompt,
    };
    let segments = stt.transcribe(&samples, &opts)?;

    for segment in &segments {
        log::debug!(
            "[{:.2}s - {:.2}s] {}",
            segment.start,
            segment.end,
            segment.text.trim()
        );
    }

    let text = transcript::assemble(&segments);
    let mut stdout = std::io::stdout();
    stdout
        .write_all(text.as_bytes())
        .context("Failed to write transcript")?;
    stdout.flush().context("Failed to flush stdout")?;

    Ok(())
}
