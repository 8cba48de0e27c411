//! Response decoding.
//!
//! The [`ResponseFormat`] trait turns a 2xx body into the caller's declared
//! type. [`JsonFormat`] is what [`ApiClient::request`](crate::ApiClient::request)
//! uses; the other formats are reachable through
//! [`ApiClient::request_as`](crate::ApiClient::request_as).

mod format;
mod no_content;

pub use format::{BinaryFormat, DecodeError, JsonFormat, PlainTextFormat, ResponseFormat};
pub use no_content::NoContent;
