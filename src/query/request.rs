use serde_json::Value;
use std::collections::BTreeMap;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 15;
pub const MAX_PER_PAGE: u32 = 100;

/// Query keys with a fixed meaning; they never reach filter handlers.
pub const RESERVED_KEYS: &[&str] = &[
    "search",
    "sort_by",
    "sort_direction",
    "sort_order",
    "page",
    "per_page",
    "lang",
];

/// Validated `(page, per_page)` cursor.
///
/// Construction never fails: absent or non-numeric values take the defaults
/// and out-of-range values are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.clamp(1, u32::MAX as i64) as u32,
            per_page: per_page.clamp(1, MAX_PER_PAGE as i64) as u32,
        }
    }

    pub fn from_raw(page: Option<&str>, per_page: Option<&str>) -> Self {
        let page = page.and_then(parse_integer).unwrap_or(DEFAULT_PAGE as i64);
        let per_page = per_page
            .and_then(parse_integer)
            .unwrap_or(DEFAULT_PER_PAGE as i64);
        Self::new(page, per_page)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }
}

/// Parse an integer, saturating on overflow; `None` when not an integer.
fn parse_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }

    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(if negative { i64::MIN } else { i64::MAX })
    } else {
        None
    }
}

/// A list request as received, before it is matched against a descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListRequest {
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
    pub filters: BTreeMap<String, Value>,
    pub page: PageRequest,
}

impl ListRequest {
    /// Build from decoded query-string pairs.
    ///
    /// `key[]=a&key[]=b` and repeated `key=a&key=b` both collect into a list.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut request = ListRequest::default();
        let mut page = None;
        let mut per_page = None;

        for (key, value) in pairs {
            match key.as_str() {
                "search" => request.search = Some(value),
                "sort_by" => request.sort_by = Some(value),
                "sort_direction" | "sort_order" => request.sort_direction = Some(value),
                "page" => page = Some(value),
                "per_page" => per_page = Some(value),
                "lang" => {}
                _ => {
                    let (name, is_list) = match key.strip_suffix("[]") {
                        Some(name) => (name.to_string(), true),
                        None => (key, false),
                    };
                    push_filter_value(&mut request.filters, name, value, is_list);
                }
            }
        }

        request.page = PageRequest::from_raw(page.as_deref(), per_page.as_deref());
        request
    }
}

fn push_filter_value(
    filters: &mut BTreeMap<String, Value>,
    name: String,
    value: String,
    is_list: bool,
) {
    match filters.get_mut(&name) {
        Some(Value::Array(items)) => items.push(Value::String(value)),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, Value::String(value)]);
        }
        None if is_list => {
            filters.insert(name, Value::Array(vec![Value::String(value)]));
        }
        None => {
            filters.insert(name, Value::String(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ==================== PageRequest Tests ====================

    #[test]
    fn test_page_request_defaults() {
        let page = PageRequest::from_raw(None, None);
        assert_eq!(page.page(), 1);
        assert_eq!(page.per_page(), 15);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_per_page_clamps_to_bounds() {
        assert_eq!(PageRequest::from_raw(None, Some("0")).per_page(), 1);
        assert_eq!(PageRequest::from_raw(None, Some("-5")).per_page(), 1);
        assert_eq!(PageRequest::from_raw(None, Some("101")).per_page(), 100);
        assert_eq!(PageRequest::from_raw(None, Some("100")).per_page(), 100);
        assert_eq!(
            PageRequest::from_raw(None, Some("99999999999999999999")).per_page(),
            100
        );
    }

    #[test]
    fn test_non_numeric_values_default() {
        let page = PageRequest::from_raw(Some("two"), Some("many"));
        assert_eq!(page, PageRequest::default());
        assert_eq!(PageRequest::from_raw(Some(""), None).page(), 1);
    }

    #[test]
    fn test_page_clamps_to_one() {
        assert_eq!(PageRequest::from_raw(Some("0"), None).page(), 1);
        assert_eq!(PageRequest::from_raw(Some("-3"), None).page(), 1);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::from_raw(Some("2"), Some("10")).offset(), 10);
        assert_eq!(PageRequest::from_raw(Some("3"), Some("15")).offset(), 30);
    }

    // ==================== ListRequest Tests ====================

    #[test]
    fn test_from_pairs_reserved_keys() {
        let request = ListRequest::from_pairs(pairs(&[
            ("search", "summit"),
            ("sort_by", "invalid_field"),
            ("sort_order", "asc"),
            ("page", "2"),
            ("per_page", "10"),
            ("lang", "en"),
        ]));

        assert_eq!(request.search.as_deref(), Some("summit"));
        assert_eq!(request.sort_by.as_deref(), Some("invalid_field"));
        assert_eq!(request.sort_direction.as_deref(), Some("asc"));
        assert_eq!(request.page, PageRequest::new(2, 10));
        assert!(request.filters.is_empty());
    }

    #[test]
    fn test_from_pairs_collects_lists() {
        let request = ListRequest::from_pairs(pairs(&[
            ("tags[]", "policy"),
            ("tags[]", "media"),
            ("status", "published"),
            ("category", "a"),
            ("category", "b"),
        ]));

        assert_eq!(request.filters["tags"], json!(["policy", "media"]));
        assert_eq!(request.filters["status"], json!("published"));
        assert_eq!(request.filters["category"], json!(["a", "b"]));
    }
}
