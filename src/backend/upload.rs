use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::backend::error::ProfileError;

/// A file picked in the browser, already read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[async_trait(?Send)]
pub trait ImageUploader {
    /// Uploads the file and returns the URL it is served from.
    async fn upload(&self, file: ImageFile) -> Result<String, ProfileError>;
}

/// Unsigned upload to a Cloudinary-style endpoint.
pub struct CloudinaryUploader {
    client: reqwest::Client,
    url: String,
    preset: String,
}

#[derive(serde::Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl CloudinaryUploader {
    pub fn new(url: impl Into<String>, preset: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), url: url.into(), preset: preset.into() }
    }
}

#[async_trait(?Send)]
impl ImageUploader for CloudinaryUploader {
    async fn upload(&self, file: ImageFile) -> Result<String, ProfileError> {
        if file.bytes.is_empty() {
            return Err(ProfileError::Upload("empty file".to_string()));
        }
        let mime = if file.mime.is_empty() { "application/octet-stream".to_string() } else { file.mime };
        tracing::info!("Uploading {} ({} bytes)", file.name, file.bytes.len());

        let part = Part::bytes(file.bytes).file_name(file.name).mime_str(&mime)?;
        let form = Form::new().part("file", part).text("upload_preset", self.preset.clone());

        let resp = self.client.post(&self.url).multipart(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ProfileError::Upload(format!("rejected with status {}", status.as_u16())));
        }
        let body: UploadResponse = resp.json().await?;
        Ok(body.secure_url)
    }
}
