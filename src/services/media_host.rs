use crate::config::MediaHostConfig;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use bytes::Bytes;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::Duration;
use tracing::{debug, info};
use utoipa::ToSchema;

type HmacSha256 = Hmac<Sha256>;

/// Default lifetime of a direct-upload signature, in seconds.
pub const DEFAULT_SIGNATURE_TTL_SECS: i64 = 3600;

#[derive(Debug, Clone)]
pub enum MediaSource {
    Bytes(Bytes),
    /// Remote URL the host fetches on its own
    Url(String),
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub source: MediaSource,
    pub folder: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedMedia {
    pub url: String,
    pub file_id: String,
    pub file_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadSignature {
    pub token: String,
    pub expire: i64,
    pub signature: String,
    pub public_key: String,
}

/// Host-side transformation applied when building a derived URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transform {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Ask for a still frame of a video instead of the video itself
    pub thumbnail: bool,
}

impl Transform {
    /// Portrait still used as a video's thumbnail.
    pub fn thumbnail() -> Self {
        Self {
            width: Some(300),
            height: Some(533),
            thumbnail: true,
        }
    }

    fn params(&self) -> Vec<String> {
        let mut params = Vec::new();
        if let Some(w) = self.width {
            params.push(format!("w-{}", w));
        }
        if let Some(h) = self.height {
            params.push(format!("h-{}", h));
        }
        params
    }
}

/// Builds `<source>[/ik-thumbnail.jpg]?tr=w-..,h-..`, keeping any existing query.
pub fn build_transform_url(source_url: &str, transform: &Transform) -> String {
    let (base, query) = match source_url.split_once('?') {
        Some((b, q)) => (b.to_string(), Some(q.to_string())),
        None => (source_url.to_string(), None),
    };

    let mut url = base.trim_end_matches('/').to_string();
    if transform.thumbnail {
        url.push_str("/ik-thumbnail.jpg");
    }

    let mut query_parts: Vec<String> = query.into_iter().filter(|q| !q.is_empty()).collect();
    let params = transform.params();
    if !params.is_empty() {
        query_parts.push(format!("tr={}", params.join(",")));
    }

    if query_parts.is_empty() {
        url
    } else {
        format!("{}?{}", url, query_parts.join("&"))
    }
}

/// Hex HMAC-SHA256 of `token + expire` under the host's private key.
pub fn sign_upload(private_key: &str, token: &str, expire: i64) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(private_key.as_bytes())
        .map_err(|e| anyhow!("invalid signing key: {}", e))?;
    mac.update(token.as_bytes());
    mac.update(expire.to_string().as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> Result<UploadedMedia>;

    async fn delete_file(&self, file_id: &str) -> Result<()>;

    /// Signed parameters for a direct client-side upload.
    async fn upload_signature(
        &self,
        token: Option<String>,
        expire: Option<i64>,
    ) -> Result<UploadSignature>;

    fn derived_url(&self, source_url: &str, transform: &Transform) -> String {
        build_transform_url(source_url, transform)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadApiResponse {
    file_id: String,
    url: String,
    file_path: String,
}

/// Media host reached over its REST API.
pub struct HttpMediaHost {
    client: reqwest::Client,
    config: MediaHostConfig,
}

impl HttpMediaHost {
    pub fn new(config: MediaHostConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build media host HTTP client")?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl MediaHost for HttpMediaHost {
    async fn upload(&self, request: UploadRequest) -> Result<UploadedMedia> {
        let file_part = match request.source {
            MediaSource::Bytes(bytes) => reqwest::multipart::Part::bytes(bytes.to_vec())
                .file_name(request.file_name.clone()),
            MediaSource::Url(url) => reqwest::multipart::Part::text(url),
        };

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("fileName", request.file_name.clone())
            .text("folder", request.folder.clone())
            .text("useUniqueFileName", "true");

        debug!(
            "Uploading {} to media host folder {}",
            request.file_name, request.folder
        );

        let response = self
            .client
            .post(&self.config.upload_url)
            .basic_auth(&self.config.private_key, Some(""))
            .multipart(form)
            .send()
            .await
            .context("media host upload request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("media host upload failed ({}): {}", status, body));
        }

        let parsed: UploadApiResponse = response
            .json()
            .await
            .context("media host returned an unexpected upload response")?;

        info!("☁️  Uploaded media {} ({})", parsed.file_path, parsed.file_id);

        Ok(UploadedMedia {
            url: parsed.url,
            file_id: parsed.file_id,
            file_path: parsed.file_path,
        })
    }

    async fn delete_file(&self, file_id: &str) -> Result<()> {
        let url = format!(
            "{}/files/{}",
            self.config.api_url.trim_end_matches('/'),
            file_id
        );

        let response = self
            .client
            .delete(&url)
            .basic_auth(&self.config.private_key, Some(""))
            .send()
            .await
            .context("media host delete request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("media host delete failed ({}): {}", status, body));
        }

        info!("🗑️  Deleted media {}", file_id);
        Ok(())
    }

    async fn upload_signature(
        &self,
        token: Option<String>,
        expire: Option<i64>,
    ) -> Result<UploadSignature> {
        let token = token.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let expire =
            expire.unwrap_or_else(|| chrono::Utc::now().timestamp() + DEFAULT_SIGNATURE_TTL_SECS);
        let signature = sign_upload(&self.config.private_key, &token, expire)?;

        Ok(UploadSignature {
            token,
            expire,
            signature,
            public_key: self.config.public_key.clone(),
        })
    }
}
