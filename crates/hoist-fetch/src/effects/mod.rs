//! Network and file effects.

mod fetcher;
mod http;

pub use fetcher::{DownloadedArchive, Fetcher};
pub use http::{BoxStream, HttpClient, Response};
#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
