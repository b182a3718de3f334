//! Staging of uploaded files on local disk.
//!
//! A [`StagedUpload`] owns the file it wrote: dropping the guard removes the
//! file, so every exit path of a handler cleans up after itself.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::domain::Error;

/// An upload written to the staging directory under a random name.
#[derive(Debug)]
pub struct StagedUpload {
    path: PathBuf,
    original_name: String,
    len: usize,
}

fn staging_error(path: &Path, err: &std::io::Error) -> Error {
    error!(path = %path.display(), error = %err, "failed to stage upload");
    Error::internal("upload could not be staged")
}

/// File extension of `original_name`, kept only when it is plain ASCII
/// alphanumerics.
fn safe_extension(original_name: &str) -> Option<&str> {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

impl StagedUpload {
    /// Stream `chunks` into a fresh file under `directory`.
    ///
    /// Fails with `invalid_request` once more than `max_bytes` arrive; the
    /// partial file is removed before returning.
    pub async fn stage<S, E>(
        directory: &Path,
        original_name: &str,
        chunks: S,
        max_bytes: usize,
    ) -> Result<Self, Error>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: std::fmt::Display,
    {
        tokio::fs::create_dir_all(directory)
            .await
            .map_err(|err| staging_error(directory, &err))?;

        let file_name = match safe_extension(original_name) {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };
        let mut upload = Self {
            path: directory.join(file_name),
            original_name: original_name.to_owned(),
            len: 0,
        };
        let mut file = tokio::fs::File::create(&upload.path)
            .await
            .map_err(|err| staging_error(&upload.path, &err))?;

        let mut chunks = std::pin::pin!(chunks);
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|err| {
                debug!(error = %err, "upload stream failed");
                Error::invalid_request("malformed multipart upload")
            })?;
            upload.len += chunk.len();
            if upload.len > max_bytes {
                return Err(Error::invalid_request(format!(
                    "file exceeds the {max_bytes} byte upload limit"
                ))
                .with_details(serde_json::json!({ "field": "file", "limit": max_bytes })));
            }
            file.write_all(&chunk)
                .await
                .map_err(|err| staging_error(&upload.path, &err))?;
        }
        file.flush()
            .await
            .map_err(|err| staging_error(&upload.path, &err))?;
        Ok(upload)
    }

    /// Location of the staged file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name as supplied by the client.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Number of bytes written.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read the staged contents back.
    pub async fn read(&self) -> Result<Vec<u8>, Error> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|err| staging_error(&self.path, &err))
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed staged upload"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!(
                path = %self.path.display(),
                error = %err,
                "failed to remove staged upload"
            ),
        }
    }
}
