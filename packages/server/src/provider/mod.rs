mod replicate;

pub use replicate::ReplicateClient;

use async_trait::async_trait;
use common::PredictionStatus;
use serde::Deserialize;

/// A generation job as reported by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    /// URLs of the generated images, present once the job succeeds.
    #[serde(default)]
    pub output: Option<Vec<String>>,
    /// Provider-reported failure detail, if any.
    #[serde(default)]
    pub error: Option<String>,
}

impl Prediction {
    /// The first output URL, if the provider returned any.
    pub fn first_output_url(&self) -> Option<&str> {
        self.output
            .as_deref()
            .and_then(|urls| urls.first())
            .map(String::as_str)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// External image-generation backend.
///
/// Behind a trait so the workflow can be exercised against scripted
/// doubles without network access.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Submit a prompt and get back the freshly created prediction.
    async fn create_prediction(&self, prompt: &str) -> Result<Prediction, ProviderError>;

    /// Fetch the current state of a prediction by id.
    async fn get_prediction(&self, id: &str) -> Result<Prediction, ProviderError>;
}
