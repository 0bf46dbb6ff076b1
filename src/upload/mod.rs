//! Authenticated video upload with best-effort thumbnail attachment.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;

use crate::auth::CredentialManager;
use crate::error::{Result, TubetoolError};

const DEFAULT_UPLOAD_URL: &str = "https://www.googleapis.com/upload/youtube/v3/videos";
const DEFAULT_THUMBNAIL_URL: &str = "https://www.googleapis.com/upload/youtube/v3/thumbnails/set";

/// Viewer-facing metadata for the uploaded video.
#[derive(Debug, Clone, Serialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub category_id: String,
    /// `public`, `unlisted`, or `private`.
    pub privacy: String,
}

impl VideoMetadata {
    /// Render the YouTube Data API v3 `snippet`/`status` envelope.
    fn to_resource(&self) -> Value {
        serde_json::json!({
            "snippet": {
                "title": self.title,
                "description": self.description,
                "tags": self.tags,
                "categoryId": self.category_id,
            },
            "status": {
                "privacyStatus": self.privacy,
            },
        })
    }
}

/// Where the thumbnail bytes come from.
///
/// A URL (typically the generation service's artifact) is fetched and
/// buffered; a local path is read directly. Both are resolved before any
/// quota-consuming upload call is made.
#[derive(Debug, Clone)]
pub enum ThumbnailSource {
    Url(String),
    Path(PathBuf),
}

impl ThumbnailSource {
    /// Accepts either an `http(s)` URL or a local filesystem path.
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value.to_string())
        } else {
            Self::Path(PathBuf::from(value))
        }
    }
}

/// Resolved thumbnail payload.
struct ThumbnailPayload {
    bytes: Vec<u8>,
    content_type: String,
}

/// Result of an upload operation.
///
/// `warning` is populated when the primary upload succeeded but the
/// thumbnail attachment did not; the video exists either way.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub video_id: String,
    pub watch_url: String,
    pub warning: Option<String>,
}

/// Drives the authenticated two-step upload: multipart video insert, then
/// thumbnail attachment against the created resource.
pub struct UploadOrchestrator {
    client: reqwest::Client,
    manager: Arc<CredentialManager>,
    upload_url: String,
    thumbnail_url: String,
}

impl UploadOrchestrator {
    pub fn new(manager: Arc<CredentialManager>) -> Self {
        Self {
            client: reqwest::Client::new(),
            manager,
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            thumbnail_url: DEFAULT_THUMBNAIL_URL.to_string(),
        }
    }

    pub fn with_upload_url(mut self, url: impl Into<String>) -> Self {
        self.upload_url = url.into();
        self
    }

    pub fn with_thumbnail_url(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = url.into();
        self
    }

    /// Upload a video and attach its thumbnail.
    ///
    /// Local inputs are validated and the thumbnail buffered before any
    /// network quota is spent. Thumbnail failure after a successful insert
    /// is downgraded to a warning in the outcome; the primary artifact
    /// already exists and is not rolled back.
    pub async fn upload(
        &self,
        video_path: &Path,
        metadata: &VideoMetadata,
        thumbnail: Option<ThumbnailSource>,
    ) -> Result<UploadOutcome> {
        let video_bytes = tokio::fs::read(video_path).await.map_err(|err| {
            TubetoolError::InvalidArgument(format!(
                "video file {}: {err}",
                video_path.display()
            ))
        })?;
        let thumbnail_payload = match thumbnail {
            Some(source) => Some(self.resolve_thumbnail(source).await?),
            None => None,
        };

        let credential = self.manager.obtain_valid_credential().await?;

        let video_id = self
            .insert_video(&credential.access_token, metadata, video_bytes)
            .await?;
        let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
        tracing::info!(%video_id, "video uploaded");

        let mut warning = None;
        if let Some(payload) = thumbnail_payload {
            if let Err(err) = self
                .set_thumbnail(&credential.access_token, &video_id, payload)
                .await
            {
                tracing::warn!(%video_id, error = %err, "thumbnail attachment failed; video upload stands");
                warning = Some(format!("thumbnail attachment failed: {err}"));
            }
        }

        Ok(UploadOutcome {
            video_id,
            watch_url,
            warning,
        })
    }

    async fn resolve_thumbnail(&self, source: ThumbnailSource) -> Result<ThumbnailPayload> {
        match source {
            ThumbnailSource::Url(url) => {
                let resp = self.client.get(&url).send().await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(TubetoolError::api(
                        status.as_u16(),
                        format!("thumbnail fetch from {url}"),
                    ));
                }
                let content_type = resp
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("image/png")
                    .to_string();
                let bytes = resp.bytes().await?.to_vec();
                Ok(ThumbnailPayload {
                    bytes,
                    content_type,
                })
            }
            ThumbnailSource::Path(path) => {
                let bytes = tokio::fs::read(&path).await.map_err(|err| {
                    TubetoolError::InvalidArgument(format!(
                        "thumbnail file {}: {err}",
                        path.display()
                    ))
                })?;
                Ok(ThumbnailPayload {
                    bytes,
                    content_type: guess_image_content_type(&path),
                })
            }
        }
    }

    async fn insert_video(
        &self,
        access_token: &str,
        metadata: &VideoMetadata,
        video_bytes: Vec<u8>,
    ) -> Result<String> {
        let metadata_part = reqwest::multipart::Part::text(metadata.to_resource().to_string())
            .mime_str("application/json")
            .map_err(TubetoolError::Network)?;
        let video_part = reqwest::multipart::Part::bytes(video_bytes)
            .mime_str("video/mp4")
            .map_err(TubetoolError::Network)?;
        let form = reqwest::multipart::Form::new()
            .part("metadata", metadata_part)
            .part("video", video_part);

        let resp = self
            .client
            .post(&self.upload_url)
            .query(&[("uploadType", "multipart"), ("part", "snippet,status")])
            .bearer_auth(access_token)
            .multipart(form)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TubetoolError::api(status.as_u16(), body));
        }
        let body: Value = resp.json().await?;
        body.get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                TubetoolError::api(status.as_u16(), "upload response missing video id")
            })
    }

    async fn set_thumbnail(
        &self,
        access_token: &str,
        video_id: &str,
        payload: ThumbnailPayload,
    ) -> Result<()> {
        let resp = self
            .client
            .post(&self.thumbnail_url)
            .query(&[("videoId", video_id)])
            .bearer_auth(access_token)
            .header(CONTENT_TYPE, payload.content_type)
            .header(CONTENT_LENGTH, payload.bytes.len())
            .body(payload.bytes)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TubetoolError::api(status.as_u16(), body));
        }
        Ok(())
    }
}

fn guess_image_content_type(path: &Path) -> String {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg".to_string(),
        Some("webp") => "image/webp".to_string(),
        _ => "image/png".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_source_parses_urls_and_paths() {
        assert!(matches!(
            ThumbnailSource::parse("https://x/y.png"),
            ThumbnailSource::Url(_)
        ));
        assert!(matches!(
            ThumbnailSource::parse("http://x/y.png"),
            ThumbnailSource::Url(_)
        ));
        assert!(matches!(
            ThumbnailSource::parse("/tmp/thumb.png"),
            ThumbnailSource::Path(_)
        ));
    }

    #[test]
    fn metadata_renders_snippet_and_status() {
        let metadata = VideoMetadata {
            title: "My video".to_string(),
            description: "About things".to_string(),
            tags: vec!["a".to_string(), "b".to_string()],
            category_id: "22".to_string(),
            privacy: "unlisted".to_string(),
        };
        let resource = metadata.to_resource();
        assert_eq!(resource["snippet"]["title"], "My video");
        assert_eq!(resource["snippet"]["categoryId"], "22");
        assert_eq!(resource["status"]["privacyStatus"], "unlisted");
    }

    #[test]
    fn image_content_type_guessing() {
        assert_eq!(
            guess_image_content_type(Path::new("t.JPG")),
            "image/jpeg"
        );
        assert_eq!(
            guess_image_content_type(Path::new("t.webp")),
            "image/webp"
        );
        assert_eq!(guess_image_content_type(Path::new("t.png")), "image/png");
        assert_eq!(guess_image_content_type(Path::new("t")), "image/png");
    }
}
