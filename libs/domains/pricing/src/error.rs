use thiserror::Error;

/// Result type for pricing operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors that can occur in the pricing domain.
///
/// The cost engine itself never produces these: once an [`crate::EstimateInput`]
/// has been built and validated, estimation is total. Errors come from the
/// input and catalog boundaries.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Region not present in the price catalog
    #[error("No pricing available for region: {0}")]
    NotFound(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Field-level validation failures
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Price catalog document is malformed or contains invalid prices
    #[error("Invalid price catalog: {0}")]
    Catalog(String),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
