#[cfg(test)]
use std::collections::VecDeque;

use bytes::Bytes;
use reqwest::Response;

/// The error produced when the underlying byte stream fails.
#[derive(Debug, PartialEq, Eq)]
pub struct Error(pub(crate) String);

/// An adapter for streaming byte chunks.
pub enum Chunks {
    Http(Response),
    #[cfg(test)]
    Scripted(VecDeque<Bytes>),
}

impl Chunks {
    pub fn from_response(response: Response) -> Self {
        Chunks::Http(response)
    }

    #[cfg(test)]
    pub fn from_script(chunks: VecDeque<Bytes>) -> Self {
        Chunks::Scripted(chunks)
    }

    #[inline]
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>, Error> {
        match self {
            Chunks::Http(response) => match response.chunk().await {
                Ok(chunk) => Ok(chunk),
                Err(err) => Err(Error(format!("{err}"))),
            },
            #[cfg(test)]
            Chunks::Scripted(chunks) => Ok(chunks.pop_front()),
        }
    }
}
