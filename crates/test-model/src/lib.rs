//! A local fake model for testing purpose.

mod preset;

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::ready;
use std::pin::Pin;
use std::task::{Context, Poll, ready};
use std::time::Duration;

use minichat_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};
use tokio::time::{Sleep, sleep};

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    #[allow(dead_code)]
    message: String,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

pub struct TestModelResponse {
    provider: TestModelProvider,
    request: ModelRequest,
    event_idx: usize,
    sleep: Option<Pin<Box<Sleep>>>,
}

impl ModelResponse for TestModelResponse {
    type Error = crate::Error;

    fn poll_next_fragment(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<String>, Self::Error>> {
        let this = self.get_mut();

        let step_idx = this.request.messages.len();
        if step_idx >= this.provider.conversation_script.len() {
            return Poll::Ready(Err(Error {
                message: "no enough steps".to_owned(),
                kind: ErrorKind::RateLimitExceeded,
            }));
        }

        let step = &this.provider.conversation_script[step_idx];
        let preset_events = match step {
            ConversationStep::UserTurn => {
                return Poll::Ready(Err(Error {
                    message: "not an assistant turn step".to_owned(),
                    kind: ErrorKind::Other,
                }));
            }
            ConversationStep::AssistantTurn(response) => &response.events,
        };

        if let Some(sleep) = &mut this.sleep {
            let sleep = sleep.as_mut();
            ready!(sleep.poll(cx));
            this.sleep = None;

            if this.event_idx < preset_events.len() {
                let event = preset_events[this.event_idx].clone();
                this.event_idx += 1;
                return match event {
                    PresetEvent::Fragment(fragment) => {
                        Poll::Ready(Ok(Some(fragment)))
                    }
                    PresetEvent::Error(message) => Poll::Ready(Err(Error {
                        message,
                        kind: ErrorKind::Other,
                    })),
                };
            }
            // In case this method is called after completion.
            return Poll::Ready(Ok(None));
        }
        this.sleep = Some(Box::pin(sleep(
            this.provider.delay.unwrap_or(Duration::from_millis(1)),
        )));
        Pin::new(this).poll_next_fragment(cx)
    }
}

#[derive(Clone)]
enum ConversationStep {
    UserTurn,
    AssistantTurn(PresetResponse),
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the conversation script, which
/// is how the model should respond to a request. The added steps will be
/// selected according to the history turns in your request. If there are no
/// enough steps in the script, an error will be returned.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    conversation_script: Vec<ConversationStep>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    #[inline]
    pub fn add_user_turn(&mut self) {
        self.conversation_script.push(ConversationStep::UserTurn);
    }

    #[inline]
    pub fn add_assistant_turn(&mut self, preset: PresetResponse) {
        self.conversation_script
            .push(ConversationStep::AssistantTurn(preset));
    }

    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;
    type Response = TestModelResponse;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let resp = TestModelResponse {
            provider: self.clone(),
            request: req.clone(),
            event_idx: 0,
            sleep: None,
        };
        ready(Ok(resp))
    }
}

#[cfg(test)]
mod tests {
    use std::future::poll_fn;
    use std::pin::pin;

    use minichat_model::Turn;

    use super::*;

    async fn collect_response(
        resp: TestModelResponse,
    ) -> Result<String, Error> {
        let mut resp = pin!(resp);
        let mut msg = String::new();
        loop {
            match poll_fn(|cx| resp.as_mut().poll_next_fragment(cx)).await {
                Ok(Some(fragment)) => msg.push_str(&fragment),
                Ok(None) => break,
                Err(err) => return Err(err),
            }
        }
        Ok(msg)
    }

    #[tokio::test]
    async fn test_send_request() {
        let mut provider = TestModelProvider::default();
        provider.add_user_turn();
        provider.add_assistant_turn(PresetResponse::with_fragments([
            "Hello, ", "world!",
        ]));
        provider.add_user_turn();
        provider.add_assistant_turn(PresetResponse::with_fragments([
            "Sure, ",
            "let me take a ",
            "look.",
        ]));

        let mut req = ModelRequest {
            messages: vec![Turn::user("Hi")],
        };
        let resp = provider.send_request(&req).await.unwrap();
        let msg = collect_response(resp).await.unwrap();
        assert_eq!(msg, "Hello, world!");

        req.messages.push(Turn::assistant(msg));
        req.messages.push(Turn::user("Check my todo"));
        let resp = provider.send_request(&req).await.unwrap();
        let msg = collect_response(resp).await.unwrap();
        assert_eq!(msg, "Sure, let me take a look.");
    }

    #[tokio::test]
    async fn test_mid_stream_error() {
        let mut provider = TestModelProvider::default();
        provider.add_user_turn();
        provider.add_assistant_turn(PresetResponse::with_events([
            PresetEvent::Fragment("Hel".to_owned()),
            PresetEvent::Error("connection reset".to_owned()),
        ]));

        let req = ModelRequest {
            messages: vec![Turn::user("Hi")],
        };
        let resp = provider.send_request(&req).await.unwrap();
        let err = collect_response(resp).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[tokio::test]
    async fn test_script_exhausted() {
        let provider = TestModelProvider::default();
        let req = ModelRequest {
            messages: vec![Turn::user("Hi")],
        };
        let resp = provider.send_request(&req).await.unwrap();
        assert!(collect_response(resp).await.is_err());
    }
}
