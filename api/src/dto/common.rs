//! Helpers shared by the request DTOs.

use serde::{Deserialize, Deserializer};

use kurator_shared::Pagination;

/// Distinguishes an absent field from an explicit `null` in update bodies.
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`:
/// absent gives `None`, `null` gives `Some(None)`, a value `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// `?include_inactive=true` on list endpoints
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct IncludeInactiveQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// Page parameters from a query string; missing values use the defaults
pub fn pagination(page: Option<u32>, per_page: Option<u32>) -> Pagination {
    let defaults = Pagination::default();
    Pagination::new(
        page.unwrap_or(defaults.page),
        per_page.unwrap_or(defaults.per_page),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        notes: Option<Option<String>>,
    }

    #[test]
    fn test_double_option_distinguishes_null_from_absent() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.notes, None);

        let cleared: Patch = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        assert_eq!(cleared.notes, Some(None));

        let set: Patch = serde_json::from_str(r#"{"notes": "met at forum"}"#).unwrap();
        assert_eq!(set.notes, Some(Some("met at forum".to_string())));
    }

    #[test]
    fn test_pagination_defaults_and_clamps() {
        assert_eq!(pagination(None, None), Pagination::default());
        let page = pagination(Some(0), Some(1000));
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 100);
    }
}
