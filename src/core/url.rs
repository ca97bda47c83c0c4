//! Link resolution for navigation targets.
//!
//! A [`Link`] splits an href into the three parts a navigation cares about,
//! using browser anchor semantics:
//!
//! | Part        | `/about?x=1#team` |
//! |-------------|-------------------|
//! | `path()`    | `/about`          |
//! | `address()` | `/about?x=1`      |
//! | `hash()`    | `#team`           |
//!
//! Scheme and host are dropped, so `https://example.com/a` and `/a` share an
//! address. Addresses are the cache keys and the "same page" comparison.

use std::sync::OnceLock;

use url::Url;

/// Base used to resolve hrefs when no document location is known.
fn default_base() -> &'static Url {
    static BASE: OnceLock<Url> = OnceLock::new();
    BASE.get_or_init(|| Url::parse("http://localhost/").expect("static base url is valid"))
}

/// A resolved link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pathname: String,
    search: String,
    hash: String,
    /// Alternate href (`xlink:href` on SVG links), wins over pathname + search.
    alt_href: Option<String>,
}

impl Link {
    /// Resolve an href against the default base.
    pub fn parse(href: &str) -> Self {
        Self::resolve(href, default_base())
    }

    /// Resolve an href against a document location.
    pub fn resolve(href: &str, base: &Url) -> Self {
        match base.join(href.trim()) {
            Ok(url) => Self {
                pathname: url.path().to_string(),
                search: url
                    .query()
                    .filter(|q| !q.is_empty())
                    .map(|q| format!("?{q}"))
                    .unwrap_or_default(),
                hash: url
                    .fragment()
                    .filter(|f| !f.is_empty())
                    .map(|f| format!("#{f}"))
                    .unwrap_or_default(),
                alt_href: None,
            },
            // Fallback to simple split if url parsing fails
            Err(_) => Self::split(href.trim()),
        }
    }

    /// Resolve an href against a location string such as `http://host/a?b`.
    pub fn resolve_str(href: &str, location: &str) -> Self {
        match Url::parse(location) {
            Ok(base) => Self::resolve(href, &base),
            Err(_) => Self::resolve(href, default_base()),
        }
    }

    /// Attach an alternate href taken from a secondary attribute.
    pub fn with_alt_href(mut self, alt: Option<&str>) -> Self {
        self.alt_href = alt.filter(|s| !s.is_empty()).map(str::to_string);
        self
    }

    fn split(href: &str) -> Self {
        let (rest, hash) = match href.find('#') {
            Some(i) if i + 1 < href.len() => (&href[..i], href[i..].to_string()),
            Some(i) => (&href[..i], String::new()),
            None => (href, String::new()),
        };
        let (pathname, search) = match rest.find('?') {
            Some(i) if i + 1 < rest.len() => (&rest[..i], rest[i..].to_string()),
            Some(i) => (&rest[..i], String::new()),
            None => (rest, String::new()),
        };
        Self {
            pathname: pathname.to_string(),
            search,
            hash,
            alt_href: None,
        }
    }

    /// Pathname only, always starting with `/`.
    pub fn path(&self) -> String {
        with_leading_slash(&self.pathname)
    }

    /// Pathname plus query string, always starting with `/`.
    pub fn address(&self) -> String {
        match &self.alt_href {
            Some(alt) => with_leading_slash(alt),
            None => with_leading_slash(&format!("{}{}", self.pathname, self.search)),
        }
    }

    /// Fragment including the leading `#`, or empty.
    #[inline]
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

/// Exactly one leading `/`: `//docs/a` would re-parse as a host.
fn with_leading_slash(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Normalize a URL into its cache key form (pathname + query).
pub fn normalize_url(url: &str) -> String {
    Link::parse(url).address()
}

/// Turn arbitrary text into a class-name-safe slug.
///
/// `/blog/Hello World` -> `blog-hello-world`, empty -> `homepage`.
pub fn classify(text: &str) -> String {
    let ascii = deunicode::deunicode(text).to_lowercase();

    let mut out = String::with_capacity(ascii.len());
    for c in ascii.chars() {
        let c = if c.is_whitespace() || c == '/' { '-' } else { c };
        if !(c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            continue;
        }
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }

    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        "homepage".to_string()
    } else {
        trimmed.to_string()
    }
}
