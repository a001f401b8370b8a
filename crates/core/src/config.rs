//! Session-scoped configuration types.

use std::fmt::{self, Debug, Formatter};

/// The fixed project name reported to the tracing integration.
pub const TRACE_PROJECT: &str = "minichat";

/// The two secrets required before any chat behavior is enabled.
///
/// A value of this type only exists when both keys are non-empty, so code
/// that takes `Credentials` can assume the gating check already happened.
/// The keys are not validated any further here; an invalid key only shows
/// up as a failed remote call.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credentials {
    model_key: String,
    tracing_key: String,
}

impl Credentials {
    /// Creates credentials from the two user-entered keys.
    ///
    /// Returns `None` if either key is empty after trimming.
    pub fn new<S1: Into<String>, S2: Into<String>>(
        model_key: S1,
        tracing_key: S2,
    ) -> Option<Self> {
        let model_key = model_key.into();
        let tracing_key = tracing_key.into();
        if model_key.trim().is_empty() || tracing_key.trim().is_empty() {
            return None;
        }
        Some(Self {
            model_key,
            tracing_key,
        })
    }

    /// Returns the model API key.
    #[inline]
    pub fn model_key(&self) -> &str {
        &self.model_key
    }

    /// Returns the tracing API key.
    #[inline]
    pub fn tracing_key(&self) -> &str {
        &self.tracing_key
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("model_key", &"<redacted>")
            .field("tracing_key", &"<redacted>")
            .finish()
    }
}

/// Session-scoped configuration for the tracing integration.
///
/// The settings live with the session that needs them and are dropped with
/// it; nothing is written to process-wide state and there is no teardown to
/// forget.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TraceConfig {
    api_key: String,
    project: String,
}

impl TraceConfig {
    /// Creates a config with the fixed project name.
    #[inline]
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            project: TRACE_PROJECT.to_owned(),
        }
    }

    /// Returns the project name reported on trace spans.
    #[inline]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Returns the API key for the tracing integration.
    #[inline]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl Debug for TraceConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceConfig")
            .field("api_key", &"<redacted>")
            .field("project", &self.project)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_keys_required() {
        assert!(Credentials::new("model", "tracing").is_some());
        assert!(Credentials::new("", "tracing").is_none());
        assert!(Credentials::new("model", "").is_none());
        assert!(Credentials::new("", "").is_none());
        // Whitespace-only keys don't count either.
        assert!(Credentials::new("   ", "tracing").is_none());
        assert!(Credentials::new("model", "\t").is_none());
    }

    #[test]
    fn test_keys_are_kept_verbatim() {
        let credentials = Credentials::new("gsk_abc", "lsv2_def").unwrap();
        assert_eq!(credentials.model_key(), "gsk_abc");
        assert_eq!(credentials.tracing_key(), "lsv2_def");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials::new("gsk_abc", "lsv2_def").unwrap();
        let repr = format!("{credentials:?}");
        assert!(!repr.contains("gsk_abc"));
        assert!(!repr.contains("lsv2_def"));

        let trace = TraceConfig::new("lsv2_def");
        let repr = format!("{trace:?}");
        assert!(!repr.contains("lsv2_def"));
        assert_eq!(trace.project(), TRACE_PROJECT);
        assert_eq!(trace.api_key(), "lsv2_def");
    }
}
