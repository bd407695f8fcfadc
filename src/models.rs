//! Model resolution and download.
//!
//! Maps a model size name plus a compute-precision selector onto one of the
//! ggml files published in the ggerganov/whisper.cpp HuggingFace repository,
//! downloading it into the local cache on first use. A `--model` value that
//! names an existing file is used verbatim.

use anyhow::{bail, Context, Result};
use futures_util::StreamExt;
use std::fs;
use std::path::{Path, PathBuf};

const HUGGINGFACE_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/";

/// Model sizes available in the whisper.cpp repository.
const MODEL_SIZES: &[&str] = &[
    "tiny",
    "tiny.en",
    "base",
    "base.en",
    "small",
    "small.en",
    "medium",
    "medium.en",
    "large-v1",
    "large-v2",
    "large-v3",
    "large-v3-turbo",
];

pub fn models_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("whisper")
}

/// Map a model size and compute type to a ggml filename.
///
/// Bare "large" means the newest large model. Quantized q8_0 files stand in
/// for int8 inference; the plain ggml files carry f16 weights and serve both
/// float16 and float32 requests.
pub fn ggml_filename(model: &str, compute_type: &str) -> Result<String> {
    let size = if model == "large" { "large-v3" } else { model };

    if !MODEL_SIZES.contains(&size) {
        bail!(
            "Unknown model '{}' (expected one of {}, or a path to a ggml file)",
            model,
            MODEL_SIZES.join(", ")
        );
    }

    let suffix = match compute_type {
        "int8" | "int8_float16" | "q8_0" => "-q8_0",
        "q5_1" => "-q5_1",
        "q5_0" => "-q5_0",
        "float16" | "float32" | "f16" | "default" => "",
        other => bail!(
            "Unsupported compute type '{}' (expected int8, int8_float16, float16 or float32)",
            other
        ),
    };

    Ok(format!("ggml-{}{}.bin", size, suffix))
}

/// Resolve a `--model` argument to a local model file, downloading it into
/// the cache directory if necessary.
pub fn resolve(model: &str, compute_type: &str) -> Result<PathBuf> {
    let direct = Path::new(model);
    if direct.exists() {
        return Ok(direct.to_path_buf());
    }

    let filename = ggml_filename(model, compute_type)?;
    let path = models_dir().join(&filename);

    if !path.exists() {
        log::info!("Model {} not cached, downloading", filename);
        let runtime = tokio::runtime::Runtime::new().context("Failed to start download runtime")?;
        runtime.block_on(download_model(&filename, download_progress))?;
        eprintln!();
    }

    Ok(path)
}

pub async fn download_model<F>(filename: &str, progress_callback: F) -> Result<()>
where
    F: Fn(u64, u64) + Send + 'static,
{
    let url = format!("{}{}", HUGGINGFACE_BASE_URL, filename);
    let dir = models_dir();

    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

    let temp_path = dir.join(format!("{}.downloading", filename));
    let final_path = dir.join(filename);

    let client = reqwest::Client::new();
    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("Failed to connect to {}", url))?;

    if !response.status().is_success() {
        bail!(
            "Model download failed: HTTP {} for {}",
            response.status(),
            url
        );
    }

    let total_size = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;

    let mut file = fs::File::create(&temp_path)
        .with_context(|| format!("Failed to create file: {}", temp_path.display()))?;

    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("Error while downloading model")?;
        std::io::Write::write_all(&mut file, &chunk).context("Failed to write model data")?;

        downloaded += chunk.len() as u64;
        progress_callback(downloaded, total_size);
    }

    fs::rename(&temp_path, &final_path).with_context(|| {
        format!(
            "Failed to rename {} -> {}",
            temp_path.display(),
            final_path.display()
        )
    })?;

    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading model... {}%", pct);
    } else {
        eprint!("\rDownloading model... {} bytes", downloaded);
    }
}
