//! Test helpers for inbound HTTP components.

use actix_web::web;

use super::state::{HttpState, HttpStatePorts, UploadSettings};

/// Handler state backed entirely by fixture ports.
pub fn fixture_state() -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        HttpStatePorts::fixtures(),
        UploadSettings::default(),
    ))
}

/// Handler state with custom ports and uploads staged under `directory`.
pub fn state_with(
    ports: HttpStatePorts,
    directory: &std::path::Path,
    max_bytes: usize,
) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        ports,
        UploadSettings::new(directory, max_bytes),
    ))
}

const MULTIPART_BOUNDARY: &str = "gendoc-test-boundary";

/// One part of a hand-built `multipart/form-data` body.
#[derive(Debug, Clone)]
pub enum Part<'a> {
    Text {
        name: &'a str,
        value: &'a str,
    },
    File {
        name: &'a str,
        file_name: &'a str,
        contents: &'a [u8],
    },
}

impl<'a> Part<'a> {
    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self::Text { name, value }
    }

    pub fn file(name: &'a str, file_name: &'a str, contents: &'a [u8]) -> Self {
        Self::File {
            name,
            file_name,
            contents,
        }
    }
}

/// Encode `parts` as a multipart body; returns the `Content-Type` header
/// value and the payload.
pub fn multipart_body(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                contents,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(contents);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    (
        format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        body,
    )
}
