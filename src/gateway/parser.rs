// src/gateway/parser.rs
//! Client for the external CV-parsing service. One synchronous attempt per
//! upload with an explicit timeout; no retries. A failed parse is reported
//! to the caller, which keeps the already-persisted candidate row and marks
//! it parse-failed.

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use tracing::{error, info};

const PARSE_CV_ENDPOINT: &str = "/parse-cv";

/// Candidate metadata forwarded alongside the CV file
pub struct CandidateMeta {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub skills: String,
}

/// Structured fields extracted by the parsing service
#[derive(Debug, Deserialize)]
pub struct ParsedCv {
    pub skills: Vec<String>,
    pub experience_years: i32,
}

pub struct CvParserClient {
    client: reqwest::Client,
    base_url: String,
}

impl CvParserClient {
    pub fn new(base_url: String, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Send the stored CV file plus candidate fields as a multipart form and
    /// extract the parsed skill list and experience years from the reply.
    pub async fn parse_cv(&self, file_path: &Path, meta: &CandidateMeta) -> Result<ParsedCv> {
        let url = format!("{}{}", self.base_url, PARSE_CV_ENDPOINT);

        let file_content = tokio::fs::read(file_path)
            .await
            .with_context(|| format!("Failed to read file: {}", file_path.display()))?;

        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("cv")
            .to_string();

        let form = Form::new()
            .part("file", Part::bytes(file_content).file_name(file_name))
            .text("first_name", meta.first_name.clone())
            .text("last_name", meta.last_name.clone())
            .text("email", meta.email.clone())
            .text("phone", meta.phone.clone())
            .text("skills", meta.skills.clone());

        info!("Calling CV parsing service: {}", url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("CV parsing request failed")?;

        let status = response.status();
        if status.is_success() {
            let parsed: ParsedCv = response
                .json()
                .await
                .context("Failed to parse CV service response")?;
            Ok(parsed)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            error!("CV parsing service error response: {}", error_text);
            anyhow::bail!("Service returned error status {}: {}", status, error_text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_cv_deserializes_service_reply() {
        let body = r#"{"skills": ["Go", "SQL"], "experience_years": 3}"#;
        let parsed: ParsedCv = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.skills, vec!["Go", "SQL"]);
        assert_eq!(parsed.experience_years, 3);
    }

    #[test]
    fn test_parsed_cv_rejects_missing_fields() {
        let body = r#"{"skills": ["Go"]}"#;
        assert!(serde_json::from_str::<ParsedCv>(body).is_err());
    }
}
