use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use jobhunt_core::{JobId, StatusReport};
use jobhunt_logging::hunt_debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{FailureKind, Interaction, WorkerError};

#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    pub refresh_delay: Duration,
    pub max_snapshot_bytes: u64,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(2000),
            refresh_delay: Duration::from_millis(1000),
            max_snapshot_bytes: 8 * 1024 * 1024,
        }
    }
}

/// HTTP contract of the browser-automation worker.
#[async_trait::async_trait]
pub trait WorkerClient: Send + Sync {
    async fn start_job(&self, query: &str, location: &str) -> Result<JobId, WorkerError>;

    async fn job_status(&self, job_id: &JobId) -> Result<StatusReport, WorkerError>;

    /// `Ok(None)` when the worker has no frame to show yet.
    async fn screenshot(&self, job_id: &JobId) -> Result<Option<Bytes>, WorkerError>;

    async fn interact(&self, job_id: &JobId, interaction: Interaction) -> Result<(), WorkerError>;
}

#[derive(Serialize)]
struct StartJobRequest<'a> {
    query: &'a str,
    location: &'a str,
}

#[derive(Deserialize)]
struct StartJobResponse {
    job_id: JobId,
}

#[derive(Debug, Clone)]
pub struct ReqwestWorkerClient {
    base_url: Url,
    client: reqwest::Client,
    max_snapshot_bytes: u64,
}

impl ReqwestWorkerClient {
    pub fn new(settings: &WorkerSettings) -> Result<Self, WorkerError> {
        let mut base = settings.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|err| WorkerError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(WorkerError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be a base url", settings.base_url),
            ));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| WorkerError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            base_url,
            client,
            max_snapshot_bytes: settings.max_snapshot_bytes,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, WorkerError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| WorkerError::new(FailureKind::InvalidUrl, "base url has no path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &T,
    ) -> Result<Response, WorkerError> {
        let body = serde_json::to_vec(body)
            .map_err(|err| WorkerError::new(FailureKind::Decode, err.to_string()))?;
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(response)
    }
}

#[async_trait::async_trait]
impl WorkerClient for ReqwestWorkerClient {
    async fn start_job(&self, query: &str, location: &str) -> Result<JobId, WorkerError> {
        let url = self.endpoint(&["jobs", "start"])?;
        let response = self
            .post_json(url, &StartJobRequest { query, location })
            .await?;
        let started: StartJobResponse = read_json(response).await?;
        Ok(started.job_id)
    }

    async fn job_status(&self, job_id: &JobId) -> Result<StatusReport, WorkerError> {
        let url = self.endpoint(&["jobs", job_id.as_str()])?;
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(ensure_success(response)?).await
    }

    async fn screenshot(&self, job_id: &JobId) -> Result<Option<Bytes>, WorkerError> {
        let url = self.endpoint(&["jobs", job_id.as_str(), "screenshot"])?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            hunt_debug!("Screenshot for job {} not available: {}", job_id, status);
            return Ok(None);
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.max_snapshot_bytes {
                return Err(WorkerError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.max_snapshot_bytes,
                        actual: Some(content_len),
                    },
                    "screenshot too large",
                ));
            }
        }

        let mut image = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = image.len() as u64 + chunk.len() as u64;
            if next_len > self.max_snapshot_bytes {
                return Err(WorkerError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.max_snapshot_bytes,
                        actual: Some(next_len),
                    },
                    "screenshot too large",
                ));
            }
            image.extend_from_slice(&chunk);
        }

        if image.is_empty() {
            return Ok(None);
        }
        Ok(Some(image.freeze()))
    }

    async fn interact(&self, job_id: &JobId, interaction: Interaction) -> Result<(), WorkerError> {
        let url = self.endpoint(&["jobs", job_id.as_str(), "interact"])?;
        self.post_json(url, &interaction).await?;
        Ok(())
    }
}

fn ensure_success(response: Response) -> Result<Response, WorkerError> {
    let status = response.status();
    if !status.is_success() {
        return Err(WorkerError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    Ok(response)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, WorkerError> {
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|err| WorkerError::new(FailureKind::Decode, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> WorkerError {
    if err.is_timeout() {
        return WorkerError::new(FailureKind::Timeout, err.to_string());
    }
    WorkerError::new(FailureKind::Network, err.to_string())
}
