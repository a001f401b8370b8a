use std::future::poll_fn;
use std::pin::{Pin, pin};

use minichat_model::{
    ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};
use tracing::Instrument;

type SendRequestResult = Result<String, Box<dyn ModelProviderError>>;
type BoxedSendRequestFuture =
    Pin<Box<dyn Future<Output = SendRequestResult> + Send>>;
#[rustfmt::skip]
type HandlerFn = Box<
    dyn Fn(ModelRequest, Box<dyn FnMut(&str) + Send + 'static>)
        -> BoxedSendRequestFuture + Send + Sync
>;

/// A wrapper around a model provider that drives streaming responses to
/// completion and provides a type-erased interface for the other modules.
pub struct ModelClient {
    handler_fn: HandlerFn,
}

impl ModelClient {
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `ModelClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Box::new(move |req, on_fragment| {
            let fut = provider.send_request(&req);
            Box::pin(
                async move {
                    trace!("got a request: {:?}", req);
                    let resp_or_err = fut.await;
                    handle_response::<P>(resp_or_err, on_fragment).await
                }
                .instrument(trace_span!("model client req")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a request and returns the complete reply text.
    ///
    /// `on_fragment` is invoked for each streamed fragment before it is
    /// folded into the returned reply.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. The response stops streaming further
    /// fragments when this operation is cancelled.
    #[inline]
    pub async fn send_request(
        &self,
        req: ModelRequest,
        on_fragment: impl FnMut(&str) + Send + 'static,
    ) -> SendRequestResult {
        (self.handler_fn)(req, Box::new(on_fragment)).await
    }
}

async fn handle_response<P: ModelProvider + 'static>(
    resp_or_err: Result<P::Response, P::Error>,
    mut on_fragment: Box<dyn FnMut(&str) + Send + 'static>,
) -> SendRequestResult {
    let resp = match resp_or_err {
        Ok(resp) => resp,
        Err(err) => {
            error!("got an error: {err:?}");
            return Err(Box::new(err));
        }
    };

    let mut reply = String::new();

    trace!("start receiving fragments");

    let mut pinned_resp = pin!(resp);
    loop {
        let fragment_or_err =
            poll_fn(|cx| pinned_resp.as_mut().poll_next_fragment(cx)).await;
        let fragment = match fragment_or_err {
            Ok(fragment) => fragment,
            Err(err) => {
                error!("got an error: {err:?}");
                return Err(Box::new(err));
            }
        };

        let Some(fragment) = fragment else {
            // The remote stream has closed, the reply is complete.
            break;
        };
        trace!("got a fragment: {fragment:?}");

        reply.push_str(&fragment);
        on_fragment(&fragment);
    }

    trace!("finished a request");

    Ok(reply)
}
