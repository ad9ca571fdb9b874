use serde::{Deserialize, Deserializer};

/// Custom deserializer mapping an explicit `null` to `T::default()`.
///
/// The service sends `null` for unset strings and lists on some records. Pair
/// with `#[serde(default)]` so a missing field behaves the same way.
pub fn de_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        #[serde(default, deserialize_with = "crate::nullable::de_null_default")]
        name: String,
        #[serde(default, deserialize_with = "crate::nullable::de_null_default")]
        scopes: Vec<String>,
    }

    #[test]
    fn null_and_missing_become_default() {
        let null: Wrapper = serde_json::from_str(r#"{"name":null,"scopes":null}"#).unwrap();
        assert_eq!(null.name, "");
        assert!(null.scopes.is_empty());

        let missing: Wrapper = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.name, "");
        assert!(missing.scopes.is_empty());
    }

    #[test]
    fn present_values_pass_through() {
        let w: Wrapper = serde_json::from_str(r#"{"name":"web","scopes":["a"]}"#).unwrap();
        assert_eq!(w.name, "web");
        assert_eq!(w.scopes, ["a"]);
        assert!(serde_json::from_str::<Wrapper>(r#"{"name":1}"#).is_err());
    }
}
