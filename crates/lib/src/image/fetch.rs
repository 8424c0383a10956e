//! Downloading the bytes behind an image reference.

use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

use super::ImageError;
use crate::Result;

/// A streamed image body.
///
/// The stream is lazy: dropping it before completion aborts the transfer.
pub struct ImageBody {
    /// `Content-Length` reported by the remote host, if any.
    pub content_length: Option<u64>,
    stream: BoxStream<'static, std::io::Result<Bytes>>,
}

impl ImageBody {
    pub fn new(
        content_length: Option<u64>,
        stream: BoxStream<'static, std::io::Result<Bytes>>,
    ) -> Self {
        Self {
            content_length,
            stream,
        }
    }

    /// A body that is already fully in memory.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self {
            content_length: Some(bytes.len() as u64),
            stream: stream::once(async move { Ok(bytes) }).boxed(),
        }
    }

    /// Take the chunk stream.
    pub fn into_stream(self) -> BoxStream<'static, std::io::Result<Bytes>> {
        self.stream
    }

    /// Read the whole body into memory.
    pub async fn collect(self) -> std::io::Result<Bytes> {
        let buf = self
            .stream
            .try_fold(BytesMut::new(), |mut buf, chunk| async move {
                buf.extend_from_slice(&chunk);
                Ok(buf)
            })
            .await?;
        Ok(buf.freeze())
    }
}

impl std::fmt::Debug for ImageBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBody")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Fetches the bytes an image reference points at.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn download(&self, reference: &str) -> Result<ImageBody>;
}

/// Downloads images over HTTP(S) with reqwest.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    /// Build a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImageError::DownloadFailed {
                reason: format!("Failed to build HTTP client: {e}"),
                source: Some(e),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn download(&self, reference: &str) -> Result<ImageBody> {
        let response = self
            .client
            .get(reference)
            .send()
            .await
            .map_err(|e| ImageError::DownloadFailed {
                reason: format!("GET {reference}: {e}"),
                source: Some(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::InvalidImage {
                reason: format!("remote responded with status {}", status.as_u16()),
            }
            .into());
        }

        let content_length = response.content_length();
        let stream = response
            .bytes_stream()
            .map_err(std::io::Error::other)
            .boxed();
        Ok(ImageBody::new(content_length, stream))
    }
}
