//! Query-string, cookie and path extraction.
//!
//! Parsing is deliberately forgiving: malformed segments are skipped
//! rather than rejected, since the raw request line already passed the
//! front-end parser.

use percent_encoding::percent_decode_str;

use crate::multimap::MultiMap;

/// Percent-decode a component, replacing invalid sequences lossily
fn decode_component(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Decode an x-www-form-urlencoded component: `+` means space
fn decode_form_component(raw: &str) -> String {
    decode_component(&raw.replace('+', " "))
}

/// Extract query parameters from a request path.
///
/// The query component runs from the first `?` to the first `#` (or the
/// end of the string). Segments are split on `&`; a segment without `=`
/// becomes a key with an empty value. Names and values are
/// form-decoded.
pub fn extract_query_params(path: &str) -> MultiMap {
    let mut params = MultiMap::new();

    let start = match path.find('?') {
        Some(pos) => pos + 1,
        None => return params,
    };
    let query = match path.find('#') {
        Some(pos) if pos < start => return params,
        Some(pos) => &path[start..pos],
        None => &path[start..],
    };

    for segment in query.split('&') {
        if segment.is_empty() {
            continue;
        }
        match segment.split_once('=') {
            Some((name, value)) => {
                params.insert(decode_form_component(name), decode_form_component(value));
            }
            None => {
                params.insert(decode_form_component(segment), String::new());
            }
        }
    }
    params
}

/// Parse a `Cookie` header value into name/value entries.
///
/// Pairs are split on `;`, names and values trimmed of surrounding
/// whitespace, values percent-decoded. A pair without `=` is skipped.
pub fn parse_cookies(header: &str) -> MultiMap {
    let mut cookies = MultiMap::new();
    for pair in header.split(';') {
        if let Some((name, value)) = pair.split_once('=') {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            cookies.insert(name, decode_component(value.trim()));
        }
    }
    cookies
}

/// Strip the query and fragment from a path and percent-decode the rest
pub fn clean_path(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    decode_component(&path[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_query() {
        let params = extract_query_params("/search?q=rust&page=2");
        assert_eq!(params.get("q").map(String::as_str), Some("rust"));
        assert_eq!(params.get("page").map(String::as_str), Some("2"));

        let names: Vec<&str> = params.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["q", "page"]);
    }

    #[test]
    fn test_extraction_is_pure() {
        let path = "/search?q=rust&q=http&page=2";
        assert_eq!(extract_query_params(path), extract_query_params(path));
    }

    #[test]
    fn test_no_query() {
        assert!(extract_query_params("/index.html").is_empty());
    }

    #[test]
    fn test_empty_query() {
        assert!(extract_query_params("/index.html?").is_empty());
    }

    #[test]
    fn test_valueless_key() {
        let params = extract_query_params("/p?debug&x=1");
        assert_eq!(params.get("debug").map(String::as_str), Some(""));
        assert_eq!(params.get("x").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_duplicate_keys_kept() {
        let params = extract_query_params("/p?tag=a&tag=b");
        let tags: Vec<&str> = params.get_all("tag").map(String::as_str).collect();
        assert_eq!(tags, ["a", "b"]);
    }

    #[test]
    fn test_fragment_clipped_from_query() {
        let params = extract_query_params("/a?x=1#frag&y=2");
        assert_eq!(params.get("x").map(String::as_str), Some("1"));
        assert!(!params.contains("y"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_fragment_before_query_marker() {
        assert!(extract_query_params("/a#frag?x=1").is_empty());
    }

    #[test]
    fn test_form_decoding() {
        let params = extract_query_params("/p?msg=hello+world&pct=a%26b");
        assert_eq!(params.get("msg").map(String::as_str), Some("hello world"));
        assert_eq!(params.get("pct").map(String::as_str), Some("a&b"));
    }

    #[test]
    fn test_parse_cookies() {
        let cookies = parse_cookies("session=abc123; theme=dark; lang=en%2DUS");
        assert_eq!(cookies.get("session").map(String::as_str), Some("abc123"));
        assert_eq!(cookies.get("theme").map(String::as_str), Some("dark"));
        assert_eq!(cookies.get("lang").map(String::as_str), Some("en-US"));
    }

    #[test]
    fn test_cookies_skip_malformed_pairs() {
        let cookies = parse_cookies("good=1; nonsense; =empty; other=2");
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies.get("good").map(String::as_str), Some("1"));
        assert_eq!(cookies.get("other").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_cookie_plus_not_decoded() {
        let cookies = parse_cookies("v=a+b");
        assert_eq!(cookies.get("v").map(String::as_str), Some("a+b"));
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("/docs/page?x=1"), "/docs/page");
        assert_eq!(clean_path("/docs/page#top"), "/docs/page");
        assert_eq!(clean_path("/a%20b/c"), "/a b/c");
        assert_eq!(clean_path("/plain"), "/plain");
    }
}
