//! Cloudinary REST client (signed uploads and deletes).

use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tracing::{debug, warn};

use super::{MediaError, MediaHost, UploadedMedia};
use crate::auth::claims::unix_secs;
use crate::config::app::MediaCredentials;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

pub struct CloudinaryMediaHost {
    credentials: MediaCredentials,
    base_url: String,
    client: reqwest::Client,
}

impl CloudinaryMediaHost {
    pub fn new(credentials: MediaCredentials) -> Self {
        Self::with_base_url(credentials, API_BASE)
    }

    pub fn with_base_url(credentials: MediaCredentials, base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            credentials,
            base_url: base_url.into(),
            client,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{action}",
            self.base_url.trim_end_matches('/'),
            self.credentials.cloud_name
        )
    }

    /// Signed form: caller params plus `timestamp`, `api_key` and `signature`.
    fn signed_form(&self, params: &[(&str, &str)]) -> Vec<(String, String)> {
        let timestamp = unix_secs(SystemTime::now()).to_string();

        let mut to_sign: Vec<(&str, &str)> = params.to_vec();
        to_sign.push(("timestamp", &timestamp));
        let signature = sign(&to_sign, &self.credentials.api_secret);

        let mut form: Vec<(String, String)> = to_sign
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        form.push(("api_key".into(), self.credentials.api_key.clone()));
        form.push(("signature".into(), signature));
        form
    }

    async fn post_form(
        &self,
        action: &str,
        form: Vec<(String, String)>,
    ) -> Result<reqwest::Response, MediaError> {
        let resp = self
            .client
            .post(self.endpoint(action))
            .form(&form)
            .send()
            .await
            .map_err(|e| MediaError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let detail = resp.text().await.unwrap_or_default();
            return Err(MediaError::Rejected { status, detail });
        }
        Ok(resp)
    }
}

/// Request signature: parameters sorted by name, joined as `k=v&k=v`,
/// followed by the API secret, SHA-1, lowercase hex.
pub fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaHost for CloudinaryMediaHost {
    async fn upload(&self, source: &str, folder: &str) -> Result<UploadedMedia, MediaError> {
        let mut form = self.signed_form(&[("folder", folder)]);
        form.push(("file".into(), source.to_string()));

        let resp = self.post_form("upload", form).await?;
        let body: UploadResponse = resp
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        debug!(public_id = %body.public_id, "image uploaded");
        Ok(UploadedMedia {
            secure_url: body.secure_url,
            public_id: body.public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        let form = self.signed_form(&[("public_id", public_id)]);
        let resp = self.post_form("destroy", form).await?;
        let body: DestroyResponse = resp
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        match body.result.as_str() {
            "ok" => Ok(()),
            "not found" => {
                warn!(public_id, "image already absent from media host");
                Ok(())
            }
            other => Err(MediaError::InvalidResponse(format!(
                "destroy result '{other}'"
            ))),
        }
    }

    fn owns_url(&self, url: &str) -> bool {
        url.contains("cloudinary")
    }
}
