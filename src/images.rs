//! Logo images: format conversion and upload to the image host.
//!
//! Logos picked by the user arrive in whatever format the file has. They are
//! normalised to PNG, shrunk to fit [`MAX_LOGO_SIDE`], and uploaded; the
//! host answers with the public URL stored on the user's profile.

use std::future::Future;

use base64::Engine as _;
use image::{DynamicImage, GenericImageView, ImageOutputFormat};
use serde::Serialize;
use thiserror::Error;

use crate::config::{ImageHostConfig, IMAGE_UPLOAD_TIMEOUT};

/// Largest width or height kept for an uploaded logo, in pixels.
pub const MAX_LOGO_SIDE: u32 = 512;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image conversion failed: {0}")]
    Codec(#[from] image::ImageError),

    #[error("Image host is not configured")]
    NotConfigured,

    #[error("Image host unreachable: {0}")]
    Transport(String),

    #[error("Image host rejected upload (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Image host response did not contain a URL")]
    MissingUrl,
}

/// Re-encodes any supported image as PNG, shrinking it to fit the logo bounds.
pub fn convert_to_png(bytes: &[u8]) -> Result<Vec<u8>, ImageError> {
    let img = image::load_from_memory(bytes)?;
    let img = fit_logo(img);

    let mut out = Vec::new();
    img.write_to(&mut out, ImageOutputFormat::Png)?;
    Ok(out)
}

fn fit_logo(img: DynamicImage) -> DynamicImage {
    let (w, h) = img.dimensions();
    if w <= MAX_LOGO_SIDE && h <= MAX_LOGO_SIDE {
        img
    } else {
        img.thumbnail(MAX_LOGO_SIDE, MAX_LOGO_SIDE)
    }
}

/// Remote image storage returning public URLs.
pub trait ImageHost {
    fn upload(
        &self,
        png: Vec<u8>,
        name: &str,
    ) -> impl Future<Output = Result<String, ImageError>> + Send;
}

/// Converts then uploads. Returns the public URL.
pub async fn upload_logo<H: ImageHost>(
    host: &H,
    bytes: &[u8],
    name: &str,
) -> Result<String, ImageError> {
    let png = convert_to_png(bytes)?;
    let size = png.len();
    let url = host.upload(png, name).await?;
    tracing::info!(%url, bytes = size, "Logo uploaded");
    Ok(url)
}

// ─── HTTP host ────────────────────────────────────────────────────────────────

/// Image host speaking the common "base64 in, JSON with URL out" protocol.
pub struct HttpImageHost {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct UploadRequest<'a> {
    image: String,
    name: &'a str,
}

impl HttpImageHost {
    pub fn new(config: &ImageHostConfig) -> Result<Self, ImageError> {
        let client = reqwest::Client::builder()
            .timeout(IMAGE_UPLOAD_TIMEOUT)
            .build()
            .map_err(|e| ImageError::Transport(e.to_string()))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            client,
        })
    }
}

impl ImageHost for HttpImageHost {
    fn upload(
        &self,
        png: Vec<u8>,
        name: &str,
    ) -> impl Future<Output = Result<String, ImageError>> + Send {
        let body = UploadRequest {
            image: base64::engine::general_purpose::STANDARD.encode(&png),
            name,
        };
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        async move {
            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    ImageError::Transport(format!(
                        "Request timed out after {}s",
                        IMAGE_UPLOAD_TIMEOUT.as_secs()
                    ))
                } else {
                    ImageError::Transport(e.to_string())
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ImageError::Rejected {
                    status: status.as_u16(),
                    body,
                });
            }

            let json: serde_json::Value = response
                .json()
                .await
                .map_err(|e| ImageError::Transport(e.to_string()))?;
            extract_url(&json).ok_or(ImageError::MissingUrl)
        }
    }
}

/// Reads `data.url`, falling back to a top-level `url`.
fn extract_url(json: &serde_json::Value) -> Option<String> {
    json.pointer("/data/url")
        .or_else(|| json.get("url"))
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
