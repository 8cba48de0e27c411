//! HTTP methods accepted by [`RequestDescriptor`](crate::RequestDescriptor).

use strum::{Display, EnumIter, EnumString};

/// HTTP method of a request.
///
/// Parsing is case-insensitive so values can come straight from a CLI flag
/// or a config file.
///
/// ## Examples
///
/// ```rust
/// use api::RestMethod;
///
/// let method: RestMethod = "patch".parse().unwrap();
/// assert_eq!(method, RestMethod::Patch);
/// assert!(method.accepts_body());
/// assert_eq!(method.to_string(), "PATCH");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum RestMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl RestMethod {
    /// Returns `true` if a JSON body may be attached.
    ///
    /// `DELETE` is allowed a body because several APIs use it for bulk deletes.
    pub fn accepts_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch | Self::Delete)
    }
}

impl From<RestMethod> for reqwest::Method {
    fn from(method: RestMethod) -> Self {
        match method {
            RestMethod::Get => reqwest::Method::GET,
            RestMethod::Post => reqwest::Method::POST,
            RestMethod::Put => reqwest::Method::PUT,
            RestMethod::Patch => reqwest::Method::PATCH,
            RestMethod::Delete => reqwest::Method::DELETE,
            RestMethod::Head => reqwest::Method::HEAD,
            RestMethod::Options => reqwest::Method::OPTIONS,
        }
    }
}
