//! The embedding boundary: which window we talk to and which origin it must
//! speak from.

use std::fmt;

use url::{Origin, Url};

use crate::ConfigError;

/// Opaque handle to a browsing context (a frame's content window).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Why an inbound message was dropped before dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Sent by a window other than the endpoint's frame
    ForeignSource {
        /// Window the message came from, if known
        source: Option<WindowId>,
    },
    /// Sent from an origin other than the expected one
    OriginMismatch {
        /// Origin the message claims
        origin: String,
    },
    /// The endpoint has no expected origin, so nothing can pass
    NoExpectedOrigin,
    /// The message carried no data
    EmptyPayload,
}

/// Connection to one embedded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    window: Option<WindowId>,
    expected_origin: Option<String>,
    sandbox: String,
}

impl Endpoint {
    /// Create an endpoint.
    ///
    /// `expected_origin` is `None` when the source URL could not be resolved;
    /// such an endpoint rejects every message.
    pub fn new(
        window: Option<WindowId>,
        expected_origin: Option<String>,
        sandbox: impl Into<String>,
    ) -> Self {
        Self { window, expected_origin, sandbox: sandbox.into() }
    }

    /// Frame window this endpoint talks to.
    pub fn window(&self) -> Option<WindowId> {
        self.window
    }

    /// Origin inbound messages must come from.
    pub fn expected_origin(&self) -> Option<&str> {
        self.expected_origin.as_deref()
    }

    /// Sandbox policy applied to the frame.
    pub fn sandbox(&self) -> &str {
        &self.sandbox
    }

    /// Check an inbound message's source window and origin.
    ///
    /// Source is checked before origin; a message from the wrong window is a
    /// [`Rejection::ForeignSource`] regardless of its origin.
    pub fn validate(&self, source: Option<WindowId>, origin: &str) -> Result<(), Rejection> {
        match (source, self.window) {
            (Some(source), Some(window)) if source == window => {},
            _ => return Err(Rejection::ForeignSource { source }),
        }

        match self.expected_origin.as_deref() {
            None => Err(Rejection::NoExpectedOrigin),
            Some(expected) if expected == origin => Ok(()),
            Some(_) => Err(Rejection::OriginMismatch { origin: origin.to_string() }),
        }
    }
}

/// Resolve the origin a frame loaded from `src` will report.
///
/// `src` may be relative; it is resolved against the host page location the
/// same way a browser resolves a frame's `src` attribute.
pub fn resolve_origin(src: &str, page_location: &str) -> Result<String, ConfigError> {
    let base = Url::parse(page_location).map_err(|source| ConfigError::InvalidPageLocation {
        location: page_location.to_string(),
        source,
    })?;

    let url = base
        .join(src)
        .map_err(|source| ConfigError::InvalidSource { src: src.to_string(), source })?;

    match url.origin() {
        origin @ Origin::Tuple(..) => Ok(origin.ascii_serialization()),
        Origin::Opaque(_) => Err(ConfigError::OpaqueOrigin { src: src.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: WindowId = WindowId(7);

    fn endpoint() -> Endpoint {
        Endpoint::new(Some(FRAME), Some("https://nb.example".to_string()), "allow-scripts")
    }

    #[test]
    fn accepts_matching_window_and_origin() {
        assert_eq!(endpoint().validate(Some(FRAME), "https://nb.example"), Ok(()));
    }

    #[test]
    fn rejects_foreign_window_before_origin() {
        assert_eq!(
            endpoint().validate(Some(WindowId(8)), "https://evil.example"),
            Err(Rejection::ForeignSource { source: Some(WindowId(8)) })
        );
        assert_eq!(
            endpoint().validate(None, "https://nb.example"),
            Err(Rejection::ForeignSource { source: None })
        );
    }

    #[test]
    fn rejects_other_origin() {
        assert_eq!(
            endpoint().validate(Some(FRAME), "https://nb.example:8443"),
            Err(Rejection::OriginMismatch { origin: "https://nb.example:8443".to_string() })
        );
    }

    #[test]
    fn endpoint_without_window_rejects_everything() {
        let endpoint = Endpoint::new(None, Some("https://nb.example".to_string()), "");
        assert!(matches!(
            endpoint.validate(Some(FRAME), "https://nb.example"),
            Err(Rejection::ForeignSource { .. })
        ));
    }

    #[test]
    fn endpoint_without_origin_rejects_everything() {
        let endpoint = Endpoint::new(Some(FRAME), None, "");
        assert_eq!(endpoint.validate(Some(FRAME), "null"), Err(Rejection::NoExpectedOrigin));
    }

    #[test]
    fn resolves_absolute_source() {
        let origin = resolve_origin(
            "https://unpkg.com/starboard-notebook@0.11.1/dist/index.html",
            "https://host.example/page",
        )
        .unwrap();
        assert_eq!(origin, "https://unpkg.com");
    }

    #[test]
    fn resolves_relative_source_against_page() {
        let origin = resolve_origin("/nb/index.html", "http://localhost:8080/docs/page.html").unwrap();
        assert_eq!(origin, "http://localhost:8080");
    }

    #[test]
    fn keeps_non_default_port() {
        let origin = resolve_origin("https://nb.example:8443/x", "https://host.example/").unwrap();
        assert_eq!(origin, "https://nb.example:8443");
    }

    #[test]
    fn opaque_source_is_an_error() {
        assert!(matches!(
            resolve_origin("data:text/html,hi", "https://host.example/"),
            Err(ConfigError::OpaqueOrigin { .. })
        ));
    }

    #[test]
    fn relative_source_needs_absolute_page() {
        assert!(matches!(
            resolve_origin("/nb/index.html", "not a url"),
            Err(ConfigError::InvalidPageLocation { .. })
        ));
    }
}
