//! Field deserializers for backend rows where a column may come back `null`.

use serde::{Deserialize, Deserializer};

/// Deserialize `T`, treating an explicit JSON `null` as `T::default()`.
///
/// Pair with `#[serde(default)]` so a missing key behaves the same way.
///
/// # Errors
///
/// Propagates the underlying error for any value that is neither `null` nor
/// a valid `T`.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "super::or_default")]
        ids: Vec<String>,
        #[serde(default, deserialize_with = "super::or_default")]
        flag: bool,
    }

    #[test]
    fn null_missing_and_present_values() {
        let row: Row = serde_json::from_str(r#"{"ids": null, "flag": null}"#).unwrap();
        assert!(row.ids.is_empty());
        assert!(!row.flag);

        let row: Row = serde_json::from_str("{}").unwrap();
        assert!(row.ids.is_empty());

        let row: Row = serde_json::from_str(r#"{"ids": ["a"], "flag": true}"#).unwrap();
        assert_eq!(row.ids, vec!["a".to_string()]);
        assert!(row.flag);
    }

    #[test]
    fn wrong_type_is_still_an_error() {
        assert!(serde_json::from_str::<Row>(r#"{"ids": "a"}"#).is_err());
    }
}
