//! HTML extraction of ASN and prefix links from bgp.he.net pages.
//!
//! Each table row is judged by its first `<a>` element only.

use regex::Regex;
use std::sync::OnceLock;

static ROW_REGEX: OnceLock<Regex> = OnceLock::new();
static LINK_REGEX: OnceLock<Regex> = OnceLock::new();
static HREF_REGEX: OnceLock<Regex> = OnceLock::new();
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_row_regex() -> &'static Regex {
    ROW_REGEX.get_or_init(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr>").expect("Invalid Regex"))
}

fn get_link_regex() -> &'static Regex {
    LINK_REGEX.get_or_init(|| Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a>").expect("Invalid Regex"))
}

fn get_href_regex() -> &'static Regex {
    HREF_REGEX.get_or_init(|| {
        Regex::new(r#"(?i)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("Invalid Regex")
    })
}

fn get_tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid Regex"))
}

/// First link of a table row.
#[derive(Debug, PartialEq, Eq)]
struct RowLink<'a> {
    href: Option<&'a str>,
    text: String,
}

fn first_links(html: &str) -> impl Iterator<Item = RowLink<'_>> {
    get_row_regex().captures_iter(html).filter_map(|row| {
        let row = row.get(1)?.as_str();
        let link = get_link_regex().captures(row)?;
        let attrs = link.get(1).map_or("", |m| m.as_str());
        let href = get_href_regex()
            .captures(attrs)
            .and_then(|c| c.get(1).or_else(|| c.get(2)))
            .map(|m| m.as_str());
        let inner = link.get(2).map_or("", |m| m.as_str());
        let text = get_tag_regex().replace_all(inner, "").trim().to_string();
        Some(RowLink { href, text })
    })
}

/// ASN identifiers (e.g. `AS45102`) listed on a search results page.
pub fn extract_asns(html: &str) -> Vec<String> {
    first_links(html)
        .filter(|link| link.text.contains("AS"))
        .map(|link| link.text)
        .collect()
}

/// Prefix tokens listed on an ASN prefixes page, as raw text.
pub fn extract_prefixes(html: &str) -> Vec<String> {
    first_links(html)
        .filter(|link| link.href.is_some_and(|href| href.contains("/net/")))
        .map(|link| link.text)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_PAGE: &str = include_str!("../tests/test_data/search_alibaba.html");
    const PREFIX_PAGE: &str = include_str!("../tests/test_data/AS45102_prefixes.html");

    #[test]
    fn test_extract_asns() {
        assert_eq!(
            extract_asns(SEARCH_PAGE),
            vec!["AS45102", "AS37963", "AS134963"]
        );
    }

    #[test]
    fn test_extract_prefixes() {
        let prefixes = extract_prefixes(PREFIX_PAGE);
        assert_eq!(
            prefixes,
            vec![
                "47.74.0.0/15",
                "47.74.0.0/18",
                "47.74.64.0/18",
                "8.208.0.0/16",
                "47.76.0.0/14",
                "2401:b180::/32",
                "2401:b180:8000::/33",
                "2408:4000::/22",
            ]
        );
    }

    #[test]
    fn test_first_link_only() {
        let html = r#"<table>
            <tr><td><a href="/AS1">AS1</a></td><td><a href="/net/1.0.0.0/24">1.0.0.0/24</a></td></tr>
            <tr><td>no link</td></tr>
            <tr class="x"><td><A HREF='/net/2.0.0.0/8'><b> 2.0.0.0/8 </b></A></td></tr>
        </table>"#;
        assert_eq!(extract_asns(html), vec!["AS1"]);
        assert_eq!(extract_prefixes(html), vec!["2.0.0.0/8"]);
    }

    #[test]
    fn test_link_without_href() {
        let html = "<tr><td><a name=\"anchor\">AS9</a></td></tr>";
        assert_eq!(extract_asns(html), vec!["AS9"]);
        assert!(extract_prefixes(html).is_empty());
    }

    #[test]
    fn test_empty_page() {
        assert!(extract_asns("").is_empty());
        assert!(extract_prefixes("<html><body>Nothing</body></html>").is_empty());
    }
}
