use serde::{Deserialize, Serialize};

/// The events in a preset response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetEvent {
    /// An incremental piece of the reply text.
    #[serde(rename = "fragment")]
    Fragment(String),
    /// Fails the stream at this point with the given message.
    #[serde(rename = "error")]
    Error(String),
}

/// The preset response for an assistant step.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Events in this response.
    pub events: Vec<PresetEvent>,
}

impl PresetResponse {
    /// Creates a `PresetResponse` with the specified events.
    #[inline]
    pub fn with_events(events: impl Into<Vec<PresetEvent>>) -> Self {
        Self {
            events: events.into(),
        }
    }

    /// Creates a `PresetResponse` that streams the given fragments and
    /// then completes.
    #[inline]
    pub fn with_fragments<S: Into<String>>(
        fragments: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            events: fragments
                .into_iter()
                .map(|s| PresetEvent::Fragment(s.into()))
                .collect(),
        }
    }
}
