use serde::de::{Deserialize, Deserializer, IgnoredAny};
use serde::Serialize;

/// Explicit "nothing to return" value for endpoints answering `204` or an empty `200`.
///
/// Any body is accepted and discarded, so a server that starts returning a
/// payload later does not break callers that never read it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct NoContent;

impl<'de> Deserialize<'de> for NoContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        IgnoredAny::deserialize(deserializer)?;
        Ok(NoContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_anything() {
        assert_eq!(serde_json::from_str::<NoContent>("null").unwrap(), NoContent);
        assert_eq!(serde_json::from_str::<NoContent>(r#"{"ok":true}"#).unwrap(), NoContent);
        assert_eq!(serde_json::from_str::<NoContent>("[1,2]").unwrap(), NoContent);
    }
}
