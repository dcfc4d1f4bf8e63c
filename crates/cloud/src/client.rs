//! Async client for the imagery engine's scene service
//!
//! Speaks the `POST /scenes` contract with bounded retries: transient
//! failures (transport errors, 5xx) back off exponentially, client errors
//! (4xx) fail immediately.

use std::time::Duration;

use terradiff_core::service::Scene;

use crate::error::{CloudError, Result};
use crate::models::{SceneRequest, SceneResponse};

/// Configuration for [`EngineClient`]
pub struct EngineOptions {
    /// Per-request timeout (default 30 s)
    pub request_timeout: Duration,
    /// Maximum retries on transient failures (default 3)
    pub max_retries: u32,
    /// Scene cap applied to requests without one (default 64)
    pub scene_limit: Option<u32>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            scene_limit: Some(64),
        }
    }
}

/// Async client for one engine endpoint
pub struct EngineClient {
    base_url: String,
    client: reqwest::Client,
    options: EngineOptions,
}

impl EngineClient {
    pub fn new(base_url: impl Into<String>, options: EngineOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(options.request_timeout)
            .build()
            .map_err(CloudError::Http)?;

        Ok(Self {
            base_url: base_url.into(),
            client,
            options,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the scene endpoint
    pub fn scenes_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/scenes") {
            base.to_string()
        } else {
            format!("{base}/scenes")
        }
    }

    /// Fetch all scenes matching a request
    pub async fn scenes(&self, request: &SceneRequest) -> Result<Vec<Scene>> {
        let mut request = request.clone();
        if request.limit.is_none() {
            request.limit = self.options.scene_limit;
        }

        let url = self.scenes_url();
        let mut last_err = None;

        for attempt in 0..=self.options.max_retries {
            if attempt > 0 {
                // Exponential backoff: 500ms, 1s, 2s, ...
                let delay = Duration::from_millis(500 * (1 << (attempt - 1)));
                tokio::time::sleep(delay).await;
            }

            let resp = self.client.post(&url).json(&request).send().await;

            match resp {
                Ok(r) if r.status().is_success() => {
                    let body = r.text().await.map_err(CloudError::Http)?;
                    let parsed: SceneResponse = serde_json::from_str(&body)
                        .map_err(|e| CloudError::Protocol(format!("parsing scene response: {e}")))?;
                    return parsed
                        .scenes
                        .into_iter()
                        .map(|dto| dto.into_scene())
                        .collect();
                }
                Ok(r) => {
                    let status = r.status();
                    let body = r.text().await.unwrap_or_default();
                    last_err = Some(CloudError::Status {
                        code: status.as_u16(),
                        body: body.chars().take(500).collect(),
                    });
                    // Don't retry client errors (4xx)
                    if status.is_client_error() {
                        break;
                    }
                }
                Err(e) => {
                    last_err = Some(CloudError::Http(e));
                }
            }
        }

        Err(last_err.unwrap_or_else(|| CloudError::Protocol("scene request failed".into())))
    }

    /// Fetch both windows of a detection concurrently.
    ///
    /// The requests are independent; neither result is observed before
    /// both complete.
    pub async fn scene_pair(
        &self,
        before: &SceneRequest,
        after: &SceneRequest,
    ) -> Result<(Vec<Scene>, Vec<Scene>)> {
        let (before, after) = tokio::join!(self.scenes(before), self.scenes(after));
        Ok((before?, after?))
    }
}
