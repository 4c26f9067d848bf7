pub mod backoff;
pub mod prediction_status;

pub use backoff::{BackoffPolicy, retry_fixed};
pub use prediction_status::PredictionStatus;
