use crate::adapters::{VideoMetadata, VideoUploader};
use crate::error::{ReelgenError, ReelgenResult};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

const UPLOAD_URL: &str =
    "https://www.googleapis.com/upload/youtube/v3/videos?uploadType=resumable&part=snippet,status";
const CATEGORY_PEOPLE_AND_BLOGS: &str = "22";

/// Video publication to YouTube via the Data API's resumable upload:
/// one metadata POST opening the session, one PUT with the file bytes.
/// No retry; a provider failure is reported and leaves local state alone.
pub struct YouTubeUploader {
    access_token: String,
}

impl YouTubeUploader {
    pub fn new(access_token: String) -> Self {
        Self { access_token }
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    id: Option<String>,
}

impl VideoUploader for YouTubeUploader {
    fn upload(&self, video_path: &Path, metadata: &VideoMetadata) -> ReelgenResult<String> {
        let body = request_body(metadata);

        debug!("opening resumable upload session");
        let response = ureq::post(UPLOAD_URL)
            .header("Authorization", &format!("Bearer {}", self.access_token))
            .header("Content-Type", "application/json")
            .header("X-Upload-Content-Type", "video/mp4")
            .send(body.to_string().as_bytes())
            .map_err(|e| ReelgenError::Upload(format!("failed to open upload session: {e}")))?;

        let session_url = response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                ReelgenError::Upload("upload session response had no location header".into())
            })?;

        let bytes = std::fs::read(video_path)
            .map_err(|e| ReelgenError::Upload(format!("failed to read video file: {e}")))?;

        debug!("uploading {} bytes", bytes.len());
        let response = ureq::put(&session_url)
            .header("Authorization", &format!("Bearer {}", self.access_token))
            .header("Content-Type", "video/mp4")
            .send(&bytes[..])
            .map_err(|e| ReelgenError::Upload(format!("upload failed: {e}")))?;

        let text = response
            .into_body()
            .read_to_string()
            .map_err(|e| ReelgenError::Upload(format!("failed to read upload response: {e}")))?;

        let id = extract_video_id(&text)?;
        Ok(watch_url(&id))
    }
}

/// Snippet/status document for the upload session.
fn request_body(metadata: &VideoMetadata) -> serde_json::Value {
    serde_json::json!({
        "snippet": {
            "title": metadata.title,
            "description": metadata.description,
            "tags": metadata.tags,
            "categoryId": CATEGORY_PEOPLE_AND_BLOGS,
        },
        "status": {
            "privacyStatus": "unlisted",
            "selfDeclaredMadeForKids": metadata.made_for_kids,
        },
    })
}

fn extract_video_id(body: &str) -> ReelgenResult<String> {
    let parsed: UploadResponse = serde_json::from_str(body)
        .map_err(|e| ReelgenError::Upload(format!("unexpected upload response: {e}")))?;
    parsed
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ReelgenError::Upload("upload response carried no video id".into()))
}

fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}
