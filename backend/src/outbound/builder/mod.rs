//! Document builder outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `DocumentBuilder`
//! port.

mod dto;
mod http_builder;

pub use http_builder::HttpDocumentBuilder;
