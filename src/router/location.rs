//! Href parsing and building for navigation targets and redirects.

#[cfg(test)]
#[path = "location_test.rs"]
mod location_test;

/// A navigable location split into path and decoded query pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Location {
    /// Parse `"/path?x=1#frag"`. The fragment is dropped; query values are
    /// percent-decoded, with `+` read as a space.
    pub fn parse(href: &str) -> Self {
        let href = href.split_once('#').map_or(href, |(before, _)| before);
        let (path, query) = match href.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (href, Vec::new()),
        };
        Self { path: normalize_path(path), query }
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn to_href(&self) -> String {
        build_href(&self.path, &self.query)
    }
}

/// Leading slash, no trailing slash, no empty segments.
pub fn normalize_path(path: &str) -> String {
    let joined = path_segments(path).collect::<Vec<_>>().join("/");
    format!("/{joined}")
}

pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Append percent-encoded query pairs to `path`.
pub fn build_href(path: &str, query: &[(String, String)]) -> String {
    if query.is_empty() {
        return path.to_owned();
    }
    let pairs = query
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{pairs}")
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

/// Percent-decode a query component. Invalid UTF-8 escapes leave the raw text.
pub fn decode_component(raw: &str) -> String {
    decode_segment(&raw.replace('+', " "))
}

/// Percent-decode a path segment; `+` stays literal.
pub fn decode_segment(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_owned(),
    }
}
