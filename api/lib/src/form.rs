//! Mapping validation failures onto form fields.
//!
//! Form code knows which inputs it renders; the server may name fields the
//! form does not have (`base`, `server_error`, a renamed column). Those
//! messages go under [`FORM_ERROR_KEY`] so they are shown somewhere instead
//! of disappearing.

use std::collections::{BTreeMap, HashSet};

use crate::error::ValidationError;

/// Catch-all key for messages that belong to no known field.
pub const FORM_ERROR_KEY: &str = "_form";

/// Separator used when several messages share the catch-all key.
const FORM_ERROR_SEPARATOR: &str = "; ";

/// One message per form field, ready to attach to form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Returns the message for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Returns the catch-all message.
    pub fn form_error(&self) -> Option<&str> {
        self.get(FORM_ERROR_KEY)
    }

    /// Iterates `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of fields with a message, catch-all included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no field carries a message.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the map, e.g. to hand it to a form library or serializer.
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

/// Maps a [`ValidationError`] onto the fields a form knows about.
///
/// - a known field gets its first message
/// - messages for unknown fields are joined under [`FORM_ERROR_KEY`], in field order
/// - a field listed with no messages contributes nothing
/// - the top-level message fills [`FORM_ERROR_KEY`] only if nothing else did
///
/// ## Examples
///
/// ```rust
/// use api::ValidationError;
/// use api::form::map_to_field_errors;
///
/// let err = ValidationError::default().with_field_message("email", "is invalid");
/// let fields = map_to_field_errors(&err, ["email", "password"]);
/// assert_eq!(fields.get("email"), Some("is invalid"));
/// assert_eq!(fields.len(), 1);
/// ```
pub fn map_to_field_errors<I, S>(error: &ValidationError, known_fields: I) -> FieldErrors
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let known: HashSet<String> = known_fields
        .into_iter()
        .map(|f| f.as_ref().to_string())
        .collect();

    let mut mapped = BTreeMap::new();
    let mut unmatched = Vec::new();

    for (field, messages) in error.errors() {
        let Some(first) = messages.first() else {
            continue;
        };

        if field != FORM_ERROR_KEY && known.contains(field) {
            mapped.insert(field.clone(), first.clone());
        } else {
            unmatched.push(first.as_str());
        }
    }

    if !unmatched.is_empty() {
        mapped.insert(FORM_ERROR_KEY.to_string(), unmatched.join(FORM_ERROR_SEPARATOR));
    } else if let Some(message) = error.message() {
        mapped.insert(FORM_ERROR_KEY.to_string(), message.to_string());
    }

    FieldErrors(mapped)
}
