use shopnorm_core::PlatformId;
use thiserror::Error;

/// Failures at the edges of normalization.
///
/// Normalizing a payload never fails; these cover turning text into a payload
/// and turning a rules file into a platform table.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("invalid JSON payload for {context}: {source}")]
    InvalidPayload {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid rule for platform {platform}: {reason}")]
    InvalidRule { platform: PlatformId, reason: String },
}
