//! Final video assembly: still images + narration (+ optional background
//! song) muxed into an MP4 through a spawned `ffmpeg`.

use crate::error::{ReelgenError, ReelgenResult};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Composes a deliverable video from generated assets.
pub trait Composer {
    fn compose(
        &self,
        images: &[PathBuf],
        audio: &Path,
        music: Option<&Path>,
        output: &Path,
    ) -> ReelgenResult<PathBuf>;
}

/// FFmpeg-backed composer. Each image holds the frame for an equal share
/// of the narration, scaled and padded into the target box; narration is
/// the primary track, with the song mixed underneath when present.
pub struct FfmpegComposer {
    width: u32,
    height: u32,
    fps: u32,
    music_volume: f64,
}

impl FfmpegComposer {
    /// 1080x1920 portrait, the short-form default.
    pub fn portrait(music_volume: f64) -> Self {
        Self {
            width: 1080,
            height: 1920,
            fps: 30,
            music_volume,
        }
    }
}

impl Composer for FfmpegComposer {
    fn compose(
        &self,
        images: &[PathBuf],
        audio: &Path,
        music: Option<&Path>,
        output: &Path,
    ) -> ReelgenResult<PathBuf> {
        if images.is_empty() {
            return Err(ReelgenError::Compose("no images to compose".into()));
        }

        let narration_secs = ffprobe_duration(audio)?;
        let per_image = per_image_duration(narration_secs, images.len());

        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-y");

        for image in images {
            cmd.args(["-loop", "1", "-t", &format!("{per_image:.3}"), "-i"])
                .arg(image.as_os_str());
        }
        cmd.arg("-i").arg(audio.as_os_str());
        if let Some(song) = music {
            cmd.arg("-i").arg(song.as_os_str());
        }

        let filter = filter_graph(
            images.len(),
            self.width,
            self.height,
            music.map(|_| self.music_volume),
        );
        cmd.args(["-filter_complex", &filter, "-map", "[vout]"]);

        if music.is_some() {
            cmd.args(["-map", "[aout]"]);
        } else {
            cmd.args(["-map", &format!("{}:a", images.len())]);
        }

        cmd.args([
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-r",
            &self.fps.to_string(),
            "-crf",
            "23",
            "-preset",
            "medium",
            "-c:a",
            "aac",
            "-b:a",
            "128k",
            "-ar",
            "44100",
            "-shortest",
            "-movflags",
            "+faststart",
        ]);
        cmd.arg(output.as_os_str());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::piped());

        debug!(
            "Composing {} images + narration ({narration_secs:.1}s) into {}",
            images.len(),
            output.display()
        );

        let result = cmd
            .output()
            .map_err(|e| ReelgenError::Compose(format!("failed to spawn ffmpeg: {e}")))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ReelgenError::Compose(format!(
                "ffmpeg failed (exit {}): {}",
                result.status,
                stderr.lines().last().unwrap_or("unknown error")
            )));
        }

        Ok(output.to_path_buf())
    }
}

/// Seconds each image stays on screen. Never below 0.1s so a zero-length
/// probe cannot produce an empty video stream.
fn per_image_duration(narration_secs: f64, image_count: usize) -> f64 {
    (narration_secs / image_count as f64).max(0.1)
}

/// Build the filter graph: scale/pad each image input into the frame,
/// concat them, and mix the song under the narration when present.
/// Narration is input `image_count`, the song `image_count + 1`.
fn filter_graph(image_count: usize, width: u32, height: u32, music_volume: Option<f64>) -> String {
    let mut parts: Vec<String> = Vec::new();

    for i in 0..image_count {
        parts.push(format!(
            "[{i}:v]scale={width}:{height}:force_original_aspect_ratio=decrease,\
             pad={width}:{height}:(ow-iw)/2:(oh-ih)/2,setsar=1[v{i}]"
        ));
    }

    let inputs: String = (0..image_count).map(|i| format!("[v{i}]")).collect();
    parts.push(format!("{inputs}concat=n={image_count}:v=1:a=0[vout]"));

    if let Some(volume) = music_volume {
        let voice = image_count;
        let music = image_count + 1;
        parts.push(format!(
            "[{voice}:a]volume=1.0[voice];[{music}:a]volume={volume:.2}[music];\
             [voice][music]amix=inputs=2:duration=first:dropout_transition=2[aout]"
        ));
    }

    parts.join(";")
}

/// Query audio duration via ffprobe. Returns seconds.
pub fn ffprobe_duration(path: &Path) -> ReelgenResult<f64> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "csv=p=0",
        ])
        .arg(path.as_os_str())
        .output()
        .map_err(|e| ReelgenError::Compose(format!("failed to run ffprobe: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ReelgenError::Compose(format!("ffprobe failed: {stderr}")));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .trim()
        .parse::<f64>()
        .map_err(|e| ReelgenError::Compose(format!("failed to parse ffprobe duration: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_image_duration_even_split() {
        assert!((per_image_duration(12.0, 3) - 4.0).abs() < f64::EPSILON);
        assert!((per_image_duration(10.0, 4) - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_per_image_duration_floor() {
        assert!((per_image_duration(0.0, 3) - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_filter_graph_without_music() {
        let graph = filter_graph(2, 1080, 1920, None);
        assert!(graph.contains("[0:v]scale=1080:1920"));
        assert!(graph.contains("[1:v]scale=1080:1920"));
        assert!(graph.contains("[v0][v1]concat=n=2:v=1:a=0[vout]"));
        assert!(!graph.contains("amix"));
    }

    #[test]
    fn test_filter_graph_with_music() {
        let graph = filter_graph(3, 1080, 1920, Some(0.15));
        assert!(graph.contains("concat=n=3"));
        // narration is input 3, song input 4
        assert!(graph.contains("[3:a]volume=1.0[voice]"));
        assert!(graph.contains("[4:a]volume=0.15[music]"));
        assert!(graph.contains("amix=inputs=2:duration=first"));
        assert!(graph.contains("[aout]"));
    }

    #[test]
    fn test_compose_rejects_empty_image_list() {
        let composer = FfmpegComposer::portrait(0.15);
        let err = composer
            .compose(&[], Path::new("a.mp3"), None, Path::new("out.mp4"))
            .unwrap_err();
        assert!(matches!(err, ReelgenError::Compose(_)));
    }
}
