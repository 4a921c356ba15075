//! Location query parameters
//!
//! Filters are deep-linked as `?filters[kind]=api&filters[text]=payments`.
//! Repeated keys (`filters[kind]=a&filters[kind]=b`) and array keys
//! (`filters[kind][]=a`, `filters[kind][0]=a`) both collect multiple values.

use std::collections::BTreeMap;

use crate::filter::EntityFilters;

const FILTERS_PREFIX: &str = "filters[";

/// Filter values parsed from a location
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParameters {
    filters: BTreeMap<String, Vec<String>>,
}

impl QueryParameters {
    /// Parse a query string. Accepts a bare query (`filters[kind]=api`), one
    /// with a leading `?`, or a full location; anything after `#` is ignored.
    pub fn parse(location: &str) -> Self {
        let query = location.split('#').next().unwrap_or_default();
        let query = match query.split_once('?') {
            Some((_, q)) => q,
            None => query,
        };

        let mut params = Self::default();

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let Some((raw_key, raw_value)) = pair.split_once('=') else {
                tracing::warn!(pair, "Ignoring query pair without a value");
                continue;
            };

            let key = percent_decode(raw_key);
            let value = percent_decode(raw_value);

            if !key.starts_with(FILTERS_PREFIX) {
                continue;
            }

            match filter_name(&key) {
                Some(name) if !value.is_empty() => params.push(name, value),
                Some(_) => {}
                None => tracing::warn!(key = %key, "Ignoring malformed filter key"),
            }
        }

        params
    }

    /// Build parameters describing the given filters
    pub fn from_filters(filters: &EntityFilters) -> Self {
        let mut params = Self::default();
        if let Some(kind) = &filters.kind {
            params.push("kind", kind.to_query_value().to_string());
        }
        if let Some(text) = &filters.text {
            params.push("text", text.pattern().to_string());
        }
        params
    }

    pub fn push(&mut self, name: &str, value: String) {
        self.filters.entry(name.to_string()).or_default().push(value);
    }

    /// Replace all values of a filter with a single value
    pub fn set(&mut self, name: &str, value: String) {
        self.filters.insert(name.to_string(), vec![value]);
    }

    /// All values given for a filter
    pub fn values(&self, name: &str) -> &[String] {
        self.filters.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// First value given for a filter
    pub fn first(&self, name: &str) -> Option<&str> {
        self.values(name).first().map(String::as_str)
    }

    /// Kind requested by the location
    pub fn kind(&self) -> Option<&str> {
        self.first("kind")
    }

    /// Free-text search requested by the location
    pub fn text(&self) -> Option<&str> {
        self.first("text")
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Serialize back to a query string with a leading `?`, or an empty
    /// string when there are no filters
    pub fn to_query_string(&self) -> String {
        let pairs: Vec<String> = self
            .filters
            .iter()
            .flat_map(|(name, values)| {
                values
                    .iter()
                    .map(move |v| format!("filters[{}]={}", name, percent_encode(v)))
            })
            .collect();

        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }
}

/// Extract `name` from `filters[name]`, `filters[name][]` or `filters[name][0]`
fn filter_name(key: &str) -> Option<&str> {
    let rest = key.strip_prefix(FILTERS_PREFIX)?;
    let (name, tail) = rest.split_once(']')?;

    if name.is_empty() {
        return None;
    }

    let tail_ok = tail.is_empty()
        || tail
            .strip_prefix('[')
            .and_then(|t| t.strip_suffix(']'))
            .is_some_and(|idx| idx.chars().all(|c| c.is_ascii_digit()));

    tail_ok.then_some(name)
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .filter(|h| h.bytes().all(|c| c.is_ascii_hexdigit()))
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                match hex {
                    Some(b) => {
                        out.push(b);
                        i += 2;
                    }
                    None => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for b in input.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{EntityKindFilter, EntityTextFilter};

    #[test]
    fn test_parse_kind() {
        let params = QueryParameters::parse("?filters[kind]=api");
        assert_eq!(params.kind(), Some("api"));
        assert_eq!(params.text(), None);
    }

    #[test]
    fn test_first_of_multiple_values() {
        let params = QueryParameters::parse("filters[kind]=system&filters[kind]=api");
        assert_eq!(params.values("kind"), ["system", "api"]);
        assert_eq!(params.kind(), Some("system"));

        let params = QueryParameters::parse("?filters[kind][]=Group&filters[kind][1]=user");
        assert_eq!(params.kind(), Some("Group"));
        assert_eq!(params.values("kind").len(), 2);
    }

    #[test]
    fn test_encoded_brackets_and_values() {
        let params = QueryParameters::parse(
            "/catalog?filters%5Bkind%5D=Resource&filters%5Btext%5D=pay+ment%21",
        );
        assert_eq!(params.kind(), Some("Resource"));
        assert_eq!(params.text(), Some("pay ment!"));
    }

    #[test]
    fn test_malformed_input_degrades() {
        let params =
            QueryParameters::parse("?kind=api&filters[kind&filters[]=x&filters[kind]=&%zz=1&flag");
        assert!(params.is_empty());
        assert_eq!(params.kind(), None);

        assert!(QueryParameters::parse("").is_empty());
        assert!(QueryParameters::parse("?").is_empty());
    }

    #[test]
    fn test_fragment_is_ignored() {
        let params = QueryParameters::parse("?filters[kind]=api#filters[kind]=group");
        assert_eq!(params.values("kind"), ["api"]);
    }

    #[test]
    fn test_trailing_percent_is_literal() {
        let params = QueryParameters::parse("?filters[text]=100%");
        assert_eq!(params.text(), Some("100%"));
    }

    #[test]
    fn test_from_filters_to_query_string() {
        let filters = EntityFilters {
            kind: Some(EntityKindFilter::new("Component")),
            text: Some(EntityTextFilter::new("check out").unwrap()),
        };

        let query = QueryParameters::from_filters(&filters).to_query_string();
        assert_eq!(query, "?filters[kind]=Component&filters[text]=check%20out");

        let parsed = QueryParameters::parse(&query);
        assert_eq!(parsed.kind(), Some("Component"));
        assert_eq!(parsed.text(), Some("check out"));

        assert_eq!(QueryParameters::default().to_query_string(), "");
    }
}
