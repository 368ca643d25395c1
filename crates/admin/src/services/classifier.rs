//! Review sentiment classification.
//!
//! Two implementations sit behind [`SentimentClassifier`]:
//!
//! - [`KeywordClassifier`] - fixed keyword lists with canned responses, the
//!   default when no remote service is configured
//! - [`RemoteClassifier`] - JSON call to an external classification service

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use prifam_core::Sentiment;

use crate::config::ClassifierConfig;
use crate::models::Classification;

const POSITIVE_KEYWORDS: [&str; 4] = ["excellent", "amazing", "great", "love"];
const NEGATIVE_KEYWORDS: [&str; 4] = ["terrible", "bad", "worst", "hate"];

const POSITIVE_RESPONSE: &str = "Thank you so much for your wonderful feedback! We're thrilled to hear about your positive experience and look forward to serving you again soon.";
const NEGATIVE_RESPONSE: &str = "We sincerely apologize for the poor experience. This is not the standard we strive for, and we would like to make this right. Please reach out to us directly so we can address your concerns.";
const NEUTRAL_RESPONSE: &str = "Thank you for your feedback! We appreciate you taking the time to share your experience with us and will use it to continue improving our service.";

/// Errors that can occur during classification.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("classifier returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response could not be interpreted.
    #[error("invalid classifier response: {0}")]
    InvalidResponse(String),

    /// The API key cannot be sent as a header.
    #[error("invalid classifier API key")]
    InvalidApiKey,
}

/// Turns review text into a [`Classification`].
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Classify `text`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClassifierError`] if the classification backend fails.
    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Keyword-list classifier.
///
/// Matching is a case-insensitive substring test. Positive keywords are
/// checked first, so text containing both lists classifies as positive.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    #[must_use]
    pub fn classify_text(text: &str) -> Classification {
        let lower = text.to_lowercase();
        let mentions = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        let (sentiment, confidence, response) = if mentions(&POSITIVE_KEYWORDS) {
            (Sentiment::Positive, 92, POSITIVE_RESPONSE)
        } else if mentions(&NEGATIVE_KEYWORDS) {
            (Sentiment::Negative, 88, NEGATIVE_RESPONSE)
        } else {
            (Sentiment::Neutral, 65, NEUTRAL_RESPONSE)
        };

        Classification {
            sentiment,
            confidence,
            suggested_response: response.to_string(),
        }
    }
}

#[async_trait]
impl SentimentClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        Ok(Self::classify_text(text))
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

/// Classifier backed by an external HTTP service.
///
/// Sends `{"text": ...}` with a bearer token and expects
/// `{"sentiment", "confidence", "suggested_response"}` back, confidence in
/// percent.
#[derive(Clone)]
pub struct RemoteClassifier {
    client: reqwest::Client,
    url: url::Url,
}

impl RemoteClassifier {
    /// Build a client for the configured service.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid header value or the HTTP
    /// client cannot be built.
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
            .map_err(|_| ClassifierError::InvalidApiKey)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

impl std::fmt::Debug for RemoteClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClassifier")
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SentimentClassifier for RemoteClassifier {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&ClassifyRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status { status, body });
        }

        let body: ClassifyResponse = response.json().await?;
        let classification = body.into_classification()?;
        debug!(sentiment = %classification.sentiment, "Remote classification");
        Ok(classification)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    sentiment: String,
    confidence: u8,
    suggested_response: String,
}

impl ClassifyResponse {
    fn into_classification(self) -> Result<Classification, ClassifierError> {
        let sentiment = self
            .sentiment
            .parse::<Sentiment>()
            .map_err(|e| ClassifierError::InvalidResponse(e.to_string()))?;
        if self.confidence > 100 {
            return Err(ClassifierError::InvalidResponse(format!(
                "confidence out of range: {}",
                self.confidence
            )));
        }
        Ok(Classification {
            sentiment,
            confidence: self.confidence,
            suggested_response: self.suggested_response,
        })
    }
}
