use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Status line, length and streaming body of a GET response.
pub struct Response<E> {
    pub status: u16,
    pub content_length: Option<u64>,
    pub body: BoxStream<'static, std::result::Result<Bytes, E>>,
}

impl<E> Response<E> {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Asynchronous HTTP client abstraction.
///
/// Implementations follow redirects themselves and must not turn an error
/// status into `Err`: the caller inspects [`Response::status`] before it
/// touches the body.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
pub trait HttpClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send a GET request with extra `headers`.
    ///
    /// # Errors
    ///
    /// Transport failures only (DNS, connection, TLS).
    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> impl Future<Output = std::result::Result<Response<Self::Error>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use crate::error::{Error, Result};

    /// Production HTTP client implementation using reqwest.
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// Every request carries `user_agent`; GitHub rejects requests without one.
        pub fn new(user_agent: &str) -> Result<Self> {
            let client = reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .map_err(|e| Error::Client(e.to_string()))?;
            Ok(Self { client })
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn get(
            &self,
            url: &str,
            headers: &[(String, String)],
        ) -> std::result::Result<Response<Self::Error>, Self::Error> {
            let mut request = self.client.get(url);
            for (key, value) in headers {
                request = request.header(key, value);
            }

            let response = request.send().await?;
            Ok(Response {
                status: response.status().as_u16(),
                content_length: response.content_length(),
                body: Box::pin(response.bytes_stream()),
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
