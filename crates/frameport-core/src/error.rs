//! Error types for configuration resolution.

use thiserror::Error;

/// Errors resolving the embedding configuration.
///
/// None of these stop the frame from being attached. An endpoint whose origin
/// cannot be resolved simply never accepts a message.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The host page location is not an absolute URL
    #[error("invalid page location {location:?}: {source}")]
    InvalidPageLocation {
        /// Location as reported by the host
        location: String,
        /// Parser failure
        #[source]
        source: url::ParseError,
    },

    /// The configured source cannot be resolved against the page location
    #[error("invalid notebook source {src:?}: {source}")]
    InvalidSource {
        /// Configured source URL
        src: String,
        /// Parser failure
        #[source]
        source: url::ParseError,
    },

    /// The source resolves to an opaque origin (`data:`, `blob:` without
    /// host, ...), which cannot be matched against anything
    #[error("notebook source {src:?} has an opaque origin")]
    OpaqueOrigin {
        /// Configured source URL
        src: String,
    },
}
