use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

// Query-string values always arrive as strings, so numeric params are parsed
// by hand and empty strings fall back to the default.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PaginationParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: Some(1),
            limit: Some(10),
        }
    }
}

impl PaginationParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).max(1).min(100)
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(total: i64, params: &PaginationParams) -> Self {
        let limit = params.limit();
        let page = params.page();
        let total_pages = if total == 0 { 0 } else { (total + limit - 1) / limit };

        Self {
            total,
            page,
            limit,
            total_pages,
            has_more: page < total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_params_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_pagination_params_offset_from_page() {
        let params = PaginationParams {
            page: Some(3),
            limit: Some(20),
        };
        assert_eq!(params.offset(), 40);
    }

    #[test]
    fn test_pagination_params_limit_clamped() {
        let cases = vec![
            (Some(1), 1),
            (Some(100), 100),
            (Some(150), 100),
            (Some(0), 1),
            (Some(-10), 1),
            (None, 10),
        ];

        for (input, expected) in cases {
            let params = PaginationParams {
                page: Some(1),
                limit: input,
            };
            assert_eq!(params.limit(), expected);
        }
    }

    #[test]
    fn test_pagination_params_page_floor_is_one() {
        let params = PaginationParams {
            page: Some(-2),
            limit: Some(10),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_pagination_params_deserialize_string_values() {
        let json = r#"{"page":"3","limit":"25"}"#;
        let params: PaginationParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.page(), 3);
        assert_eq!(params.limit(), 25);
    }

    #[test]
    fn test_pagination_params_deserialize_empty_strings() {
        let json = r#"{"page":"","limit":""}"#;
        let params: PaginationParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
    }

    #[test]
    fn test_pagination_params_deserialize_missing_fields() {
        let json = r#"{}"#;
        let params: PaginationParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
    }

    #[test]
    fn test_pagination_meta_exact_fit() {
        let params = PaginationParams {
            page: Some(2),
            limit: Some(10),
        };
        let meta = PaginationMeta::new(20, &params);
        assert_eq!(meta.total_pages, 2);
        assert!(!meta.has_more);
    }

    #[test]
    fn test_pagination_meta_partial_last_page() {
        let params = PaginationParams {
            page: Some(1),
            limit: Some(10),
        };
        let meta = PaginationMeta::new(25, &params);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_more);
    }

    #[test]
    fn test_pagination_meta_zero_total() {
        let params = PaginationParams::default();
        let meta = PaginationMeta::new(0, &params);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_more);
    }

    #[test]
    fn test_pagination_meta_serialize() {
        let params = PaginationParams {
            page: Some(3),
            limit: Some(20),
        };
        let meta = PaginationMeta::new(100, &params);
        let serialized = serde_json::to_string(&meta).unwrap();
        assert!(serialized.contains(r#""total":100"#));
        assert!(serialized.contains(r#""page":3"#));
        assert!(serialized.contains(r#""total_pages":5"#));
        assert!(serialized.contains(r#""has_more":true"#));
    }
}
