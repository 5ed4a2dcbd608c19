//! HTTP clients for the services the study loop talks to
//!
//! - Flashcard API (`backend_url`): card list
//! - Agent service (`agent_url`): PDF upload for generation, answer grading
//!
//! One `reqwest::Client` is shared by all calls. Its timeout bounds every
//! request so a hung service cannot leave the UI busy forever.

mod agent;
mod backend;

pub use agent::GenerationResponse;

use std::time::Duration;

use flash_common::config::ServicesConfig;

use crate::error::{Result, StudyError};

const USER_AGENT: &str = concat!("flash-study/", env!("CARGO_PKG_VERSION"));

/// Base URLs and timeout for [`StudyClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend_url: String,
    pub agent_url: String,
    pub timeout: Duration,
}

impl From<&ServicesConfig> for ClientConfig {
    fn from(services: &ServicesConfig) -> Self {
        Self {
            backend_url: services.backend_url.clone(),
            agent_url: services.agent_url.clone(),
            timeout: Duration::from_secs(services.request_timeout_secs),
        }
    }
}

/// Client for the flashcard API and the agent service
#[derive(Debug, Clone)]
pub struct StudyClient {
    http: reqwest::Client,
    backend_url: String,
    agent_url: String,
}

impl StudyClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| StudyError::Network(e.to_string()))?;

        Ok(Self {
            http,
            backend_url: trim_base(config.backend_url),
            agent_url: trim_base(config.agent_url),
        })
    }

    fn backend(&self, path: &str) -> String {
        format!("{}{}", self.backend_url, path)
    }

    fn agent(&self, path: &str) -> String {
        format!("{}{}", self.agent_url, path)
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Map a non-success status to [`StudyError::Status`]
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    Err(StudyError::Status(status.as_u16(), error_text))
}
