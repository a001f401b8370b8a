use minichat_model::{
    ModelProvider, ModelProviderError, ModelRequest, Turn,
};
use tracing::Instrument;

use crate::config::TraceConfig;
use crate::conversation::Conversation;
use crate::model_client::ModelClient;

/// The error returned when a submission fails.
///
/// All remote failure modes (bad credentials, network, quota, malformed
/// responses) arrive here; hosts decide how much of the [`ErrorKind`]
/// taxonomy to surface.
///
/// [`ErrorKind`]: minichat_model::ErrorKind
pub type SessionError = Box<dyn ModelProviderError>;

/// A chat session: one conversation history plus the model client that
/// produces replies for it.
///
/// The session processes one submission at a time; there is no queueing,
/// no timeout, and no background work. A stalled remote stream blocks the
/// in-flight `submit` call until the host drops it.
pub struct ChatSession {
    model_client: ModelClient,
    conversation: Conversation,
    trace: TraceConfig,
}

impl ChatSession {
    /// Creates a session backed by the given model provider.
    pub fn new<P: ModelProvider + 'static>(
        provider: P,
        trace: TraceConfig,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            conversation: Default::default(),
            trace,
        }
    }

    /// Returns the conversation history.
    #[inline]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Returns the tracing configuration scoped to this session.
    #[inline]
    pub fn trace_config(&self) -> &TraceConfig {
        &self.trace
    }

    /// Submits a user input and streams the reply.
    ///
    /// Empty or whitespace-only input is ignored: nothing is appended to
    /// the history, no request is sent, and `Ok(None)` is returned.
    ///
    /// Otherwise the user turn is appended to the history immediately,
    /// the full ordered history is sent to the model, and each streamed
    /// fragment is passed to `on_fragment` as it arrives. On success the
    /// assistant turn built from the concatenated fragments is appended
    /// and returned.
    ///
    /// A stream that closes without producing any fragment appends no
    /// assistant turn and returns `Ok(None)`, so the history never holds
    /// an assistant turn that was never displayed.
    ///
    /// On failure the already-appended user turn stays in the history with
    /// no paired reply, and the error propagates to the caller. There is
    /// no compensation step.
    pub async fn submit(
        &mut self,
        input: &str,
        on_fragment: impl FnMut(&str) + Send + 'static,
    ) -> Result<Option<&Turn>, SessionError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        self.conversation.push(Turn::user(input));
        let reply = self.respond(on_fragment).await?;
        if reply.is_empty() {
            return Ok(None);
        }
        self.conversation.push(Turn::assistant(reply));
        Ok(self.conversation.turns().last())
    }

    /// The single response step: sends the full history to the model and
    /// returns the complete reply text.
    async fn respond(
        &self,
        on_fragment: impl FnMut(&str) + Send + 'static,
    ) -> Result<String, SessionError> {
        let request = ModelRequest {
            messages: self.conversation.turns().to_vec(),
        };
        let span = info_span!("respond", project = self.trace.project());
        self.model_client
            .send_request(request, on_fragment)
            .instrument(span)
            .await
    }
}
