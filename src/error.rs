use crate::config::ConfigError;
use thiserror::Error;

/// Top-level error type for the simple-env-flags library.
///
/// Flag resolution itself never fails; see [`ResolutionDetail`](crate::ResolutionDetail).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
