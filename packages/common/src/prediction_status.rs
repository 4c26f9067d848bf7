use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a generation prediction as reported by the external provider.
///
/// The workflow only depends on this four-state contract; provider-specific
/// wire values outside it are folded in via serde aliases (`starting` is what
/// freshly created predictions report, `canceled` is terminal and treated as
/// a failure).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    /// Accepted by the provider, not yet picked up.
    #[serde(alias = "starting")]
    Queued,
    /// Generation in progress.
    Processing,
    /// Finished with output available.
    Succeeded,
    /// Finished without output.
    #[serde(alias = "canceled")]
    Failed,
}

impl PredictionStatus {
    /// Returns true once no further status change can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Returns true if the prediction produced output.
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// All possible status values.
    pub const ALL: &'static [PredictionStatus] =
        &[Self::Queued, Self::Processing, Self::Succeeded, Self::Failed];

    /// Returns the string representation (lowercase).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for PredictionStatus {
    fn default() -> Self {
        Self::Queued
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    invalid: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid status '{}'. Valid values: {}",
            self.invalid,
            PredictionStatus::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for PredictionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" | "starting" => Ok(Self::Queued),
            "processing" => Ok(Self::Processing),
            "succeeded" => Ok(Self::Succeeded),
            "failed" | "canceled" => Ok(Self::Failed),
            _ => Err(ParseStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_classification() {
        assert!(!PredictionStatus::Queued.is_terminal());
        assert!(!PredictionStatus::Processing.is_terminal());
        assert!(PredictionStatus::Succeeded.is_terminal());
        assert!(PredictionStatus::Failed.is_terminal());
    }

    #[test]
    fn provider_aliases_deserialize() {
        let status: PredictionStatus = serde_json::from_str("\"starting\"").unwrap();
        assert_eq!(status, PredictionStatus::Queued);

        let status: PredictionStatus = serde_json::from_str("\"canceled\"").unwrap();
        assert_eq!(status, PredictionStatus::Failed);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PredictionStatus::Succeeded).unwrap(),
            "\"succeeded\""
        );
    }

    #[test]
    fn from_str_works() {
        assert_eq!(
            "processing".parse::<PredictionStatus>().unwrap(),
            PredictionStatus::Processing
        );
        assert!("exploded".parse::<PredictionStatus>().is_err());
    }
}
