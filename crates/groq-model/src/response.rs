use std::pin::Pin;
use std::task::{Context, Poll, ready};

use minichat_model::{ErrorKind, ModelResponse};
use pin_project_lite::pin_project;

use crate::Error;
use crate::io::Sse;
use crate::proto::ChatCompletionChunk;

struct PartialState {
    sse: Sse,
    id: Option<String>,
}

type PinnedFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type NextFragment = Result<(Option<String>, PartialState), Error>;

pin_project! {
    /// A streaming chat-completion response.
    pub struct GroqResponse {
        next_fragment_fut: Option<PinnedFuture<NextFragment>>,
    }
}

impl GroqResponse {
    #[inline]
    pub(crate) fn from_sse(sse: Sse) -> Self {
        let partial_state = PartialState { sse, id: None };
        let next_fragment_fut =
            async move { next_fragment(partial_state).await };
        Self {
            next_fragment_fut: Some(Box::pin(next_fragment_fut)),
        }
    }
}

impl ModelResponse for GroqResponse {
    type Error = crate::Error;

    fn poll_next_fragment(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<String>, Self::Error>> {
        let this = self.project();
        let Some(next_fragment_fut) = this.next_fragment_fut else {
            // The stream has been exhausted.
            return Poll::Ready(Ok(None));
        };
        let (fragment, partial_state) =
            match ready!(next_fragment_fut.as_mut().poll(cx)) {
                Ok((Some(fragment), partial_state)) => {
                    (fragment, partial_state)
                }
                Ok((None, _)) => {
                    *this.next_fragment_fut = None;
                    return Poll::Ready(Ok(None));
                }
                Err(err) => {
                    *this.next_fragment_fut = None;
                    return Poll::Ready(Err(err));
                }
            };

        // The stream may still have more data to pull, create a new future
        // for the next fragment.
        let next_fragment_fut =
            async move { next_fragment(partial_state).await };
        *this.next_fragment_fut = Some(Box::pin(next_fragment_fut));

        Poll::Ready(Ok(Some(fragment)))
    }
}

async fn next_fragment(mut partial_state: PartialState) -> NextFragment {
    loop {
        let sse_event = match partial_state.sse.next_event().await {
            Ok(Some(event)) => event,
            Ok(None) => return Ok((None, partial_state)),
            Err(err) => {
                return Err(Error::new(format!("{err:?}"), ErrorKind::Other));
            }
        };
        trace!("got sse event: {sse_event}");
        if sse_event == "[DONE]" {
            return Ok((None, partial_state));
        }

        let mut chunk = serde_json::from_str::<ChatCompletionChunk>(&sse_event)
            .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;
        if partial_state.id.get_or_insert_with(|| chunk.id.clone())
            != &chunk.id
        {
            return Err(Error::new("chunk id mismatch", ErrorKind::Other));
        }

        let Some(choice) = chunk.choices.pop() else {
            return Ok((None, partial_state));
        };
        if choice.finish_reason.is_some() {
            // The reply is complete, the rest of the stream is only the
            // `[DONE]` sentinel.
            return Ok((None, partial_state));
        }

        if let Some(content) = choice.delta.content {
            if !content.is_empty() {
                return Ok((Some(content), partial_state));
            }
        }
        // A chunk without reply content (such as the initial role
        // announcement), keep reading.
    }
}

#[cfg(test)]
mod tests {
    use std::future::poll_fn;
    use std::pin::pin;

    use bytes::Bytes;
    use minichat_model::ModelProviderError;

    use super::*;
    use crate::io::Chunks;

    async fn collect_fragments(resp: GroqResponse) -> Result<String, Error> {
        let mut resp = pin!(resp);
        let mut reply = String::new();
        loop {
            match poll_fn(|cx| resp.as_mut().poll_next_fragment(cx)).await {
                Ok(Some(fragment)) => reply.push_str(&fragment),
                Ok(None) => break,
                Err(err) => return Err(err),
            }
        }
        // Polling after completion must keep returning `None`.
        assert!(matches!(
            poll_fn(|cx| resp.as_mut().poll_next_fragment(cx)).await,
            Ok(None)
        ));
        Ok(reply)
    }

    #[tokio::test]
    async fn test_streamed_reply() {
        let chunks = Chunks::from_script(
            vec![
                Bytes::from_static(
                    b"data: {\"id\":\"c1\",\"choices\":[{\"delta\":{\"role\":\"assistant\",\"content\":\"\"},\"finish_reason\":null}]}\n\n",
                ),
                Bytes::from_static(
                    b"data: {\"id\":\"c1\",\"choices\":[{\"delta\":{\"content\":\"Hello\"},\"finish_reason\":null}]}\n\n",
                ),
                Bytes::from_static(
                    b"data: {\"id\":\"c1\",\"choices\":[{\"delta\":{\"content\":\", world!\"},\"finish_reason\":null}]}\n\n",
                ),
                Bytes::from_static(
                    b"data: {\"id\":\"c1\",\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
                ),
                Bytes::from_static(b"data: [DONE]\n\n"),
            ]
            .into(),
        );
        let resp = GroqResponse::from_sse(Sse::new(chunks));
        let reply = collect_fragments(resp).await.unwrap();
        assert_eq!(reply, "Hello, world!");
    }

    #[tokio::test]
    async fn test_chunk_id_mismatch() {
        let chunks = Chunks::from_script(
            vec![
                Bytes::from_static(
                    b"data: {\"id\":\"c1\",\"choices\":[{\"delta\":{\"content\":\"Hi\"},\"finish_reason\":null}]}\n\n",
                ),
                Bytes::from_static(
                    b"data: {\"id\":\"c2\",\"choices\":[{\"delta\":{\"content\":\"!\"},\"finish_reason\":null}]}\n\n",
                ),
            ]
            .into(),
        );
        let resp = GroqResponse::from_sse(Sse::new(chunks));
        let err = collect_fragments(resp).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[tokio::test]
    async fn test_malformed_chunk() {
        let chunks = Chunks::from_script(
            vec![Bytes::from_static(b"data: {\"not\": \"a chunk\"}\n\n")]
                .into(),
        );
        let resp = GroqResponse::from_sse(Sse::new(chunks));
        assert!(collect_fragments(resp).await.is_err());
    }
}
