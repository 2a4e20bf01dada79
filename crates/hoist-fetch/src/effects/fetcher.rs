use std::path::Path;

use futures_util::StreamExt;
use hoist_archive::{ArchiveFormat, ArchiveReport};
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::data::{ArchiveSource, FetchOptions, FetchPhase, Progress};
use crate::effects::http::HttpClient;
use crate::error::{Error, Result};

/// A downloaded archive in a temporary file.
///
/// The file is deleted when this value is dropped, on success and on every
/// error path alike.
#[derive(Debug)]
pub struct DownloadedArchive {
    file: NamedTempFile,
    format: ArchiveFormat,
    size: u64,
}

impl DownloadedArchive {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// Number of body bytes written.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Extract into `destination` using the format inferred from the URL.
    pub fn extract(&self, destination: &Path) -> hoist_archive::Result<ArchiveReport> {
        hoist_archive::extract(self.path(), self.format, destination)
    }
}

/// Downloads release archives through an [`HttpClient`].
pub struct Fetcher<C: HttpClient> {
    client: C,
    options: FetchOptions,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self {
        Self::with_options(client, FetchOptions::default())
    }

    pub fn with_options(client: C, options: FetchOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Stream `source` into a temporary file.
    ///
    /// Any status other than 200 fails before the temporary file exists.
    pub async fn fetch(&self, source: &ArchiveSource) -> Result<DownloadedArchive> {
        let url = source.url();
        self.options.report(Progress::new(FetchPhase::Connecting, 0, None));
        debug!(%url, "requesting archive");

        let response = self
            .client
            .get(url, &self.options.headers)
            .await
            .map_err(|e| Error::network(url, e))?;
        if !response.is_ok() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: response.status,
            });
        }
        let total_bytes = response.content_length;

        let temp = self.create_temp_file(source.format())?;
        let temp_path = temp.path().to_path_buf();
        let write_error = |e| Error::Write {
            path: temp_path.clone(),
            source: e,
        };
        let handle = temp.as_file().try_clone().map_err(write_error)?;
        let mut file = tokio::fs::File::from_std(handle);

        self.options
            .report(Progress::new(FetchPhase::Downloading, 0, total_bytes));

        let mut body = response.body;
        let mut bytes_downloaded = 0u64;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| Error::network(url, e))?;
            file.write_all(&chunk).await.map_err(write_error)?;
            bytes_downloaded += chunk.len() as u64;
            self.options.report(Progress::new(
                FetchPhase::Downloading,
                bytes_downloaded,
                total_bytes,
            ));
        }
        file.flush().await.map_err(write_error)?;
        drop(file);

        info!(%url, bytes = bytes_downloaded, "downloaded archive");
        Ok(DownloadedArchive {
            file: temp,
            format: source.format(),
            size: bytes_downloaded,
        })
    }

    /// Download `source` and extract it into `destination`.
    ///
    /// The temporary archive is gone when this returns, whatever the outcome.
    pub async fn fetch_and_extract(
        &self,
        source: &ArchiveSource,
        destination: &Path,
    ) -> Result<ArchiveReport> {
        let archive = self.fetch(source).await?;
        self.extract(&archive, destination)
        // `archive` drops here, deleting the temporary file
    }

    /// Extract a downloaded archive, reporting the `Extracting` and
    /// `Completed` phases.
    pub fn extract(&self, archive: &DownloadedArchive, destination: &Path) -> Result<ArchiveReport> {
        let size = archive.size();
        self.options
            .report(Progress::new(FetchPhase::Extracting, size, Some(size)));
        debug!(destination = %destination.display(), format = %archive.format(), "extracting archive");

        let report = archive.extract(destination).map_err(Error::Extract)?;

        self.options
            .report(Progress::new(FetchPhase::Completed, size, Some(size)));
        Ok(report)
    }

    /// GET `url` and decode the body as JSON.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<T> {
        let mut all_headers = self.options.headers.clone();
        all_headers.extend_from_slice(headers);

        let response = self
            .client
            .get(url, &all_headers)
            .await
            .map_err(|e| Error::network(url, e))?;
        if !response.is_ok() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: response.status,
            });
        }

        let mut body = response.body;
        let mut buffer = Vec::new();
        while let Some(chunk) = body.next().await {
            buffer.extend_from_slice(&chunk.map_err(|e| Error::network(url, e))?);
        }
        serde_json::from_slice(&buffer).map_err(|e| Error::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    fn create_temp_file(&self, format: ArchiveFormat) -> Result<NamedTempFile> {
        let dir = self
            .options
            .temp_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        let temp_error = |e| Error::TempFile {
            dir: dir.clone(),
            source: e,
        };

        std::fs::create_dir_all(&dir).map_err(temp_error)?;
        tempfile::Builder::new()
            .prefix("hoist-")
            .suffix(format.extension())
            .tempfile_in(&dir)
            .map_err(temp_error)
    }
}
