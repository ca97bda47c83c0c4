//! HTML helpers built on `tl`.
//!
//! - `for_each_element()` - depth-first walk with ancestor paths
//! - `title()` - document title text
//! - `unescape()` - HTML entity decoding

use std::borrow::Cow;

use crate::selector::ElementData;

// =============================================================================
// Tree Walking
// =============================================================================

/// Walk every element in document order.
///
/// `visit` receives the element path (root first, element last) plus the
/// `tl` tag and parser for markup access. Returns false if `html` could not
/// be parsed.
pub fn for_each_element<F>(html: &str, mut visit: F) -> bool
where
    F: FnMut(&[&ElementData], &tl::HTMLTag<'_>, &tl::Parser<'_>),
{
    let Ok(dom) = tl::parse(html, tl::ParserOptions::default()) else {
        return false;
    };
    let parser = dom.parser();
    let mut path = Vec::new();
    for handle in dom.children() {
        walk(*handle, parser, &mut path, &mut visit);
    }
    true
}

fn walk<F>(handle: tl::NodeHandle, parser: &tl::Parser<'_>, path: &mut Vec<ElementData>, visit: &mut F)
where
    F: FnMut(&[&ElementData], &tl::HTMLTag<'_>, &tl::Parser<'_>),
{
    let Some(tl::Node::Tag(tag)) = handle.get(parser) else {
        return;
    };

    path.push(element_data(tag));
    {
        let refs: Vec<&ElementData> = path.iter().collect();
        visit(&refs, tag, parser);
    }
    for child in tag.children().top().iter() {
        walk(*child, parser, path, visit);
    }
    path.pop();
}

/// Tag name and attributes of a `tl` tag.
pub fn element_data(tag: &tl::HTMLTag<'_>) -> ElementData {
    let mut data = ElementData::new(tag.name().as_utf8_str().to_string());
    for (key, value) in tag.attributes().iter() {
        let key_str: &str = key.as_ref();
        let value_str = value.map(|v| unescape(&v).into_owned()).unwrap_or_default();
        data.set_attr(key_str, &value_str);
    }
    data
}

/// Text of the first `<title>` element.
pub fn title(html: &str) -> Option<String> {
    let mut found = None;
    for_each_element(html, |path, tag, parser| {
        if found.is_none() && path.last().is_some_and(|el| el.tag == "title") {
            found = Some(unescape(tag.inner_text(parser).trim()).into_owned());
        }
    });
    found
}

// =============================================================================
// Entities
// =============================================================================

/// Unescape HTML entities back to characters.
///
/// Handles common named entities and numeric character references.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        // Entities longer than 10 chars are not entities
        let Some(semi) = after.find(';').filter(|&i| i > 0 && i <= 10) else {
            result.push('&');
            rest = after;
            continue;
        };

        let entity = &after[..semi];
        let decoded = match entity {
            "lt" => Some('<'),
            "gt" => Some('>'),
            "amp" => Some('&'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{00A0}'),
            s if s.starts_with("#x") || s.starts_with("#X") => {
                u32::from_str_radix(&s[2..], 16).ok().and_then(char::from_u32)
            }
            s if s.starts_with('#') => s[1..].parse().ok().and_then(char::from_u32),
            _ => None,
        };

        match decoded {
            Some(c) => result.push(c),
            None => {
                result.push('&');
                result.push_str(entity);
                result.push(';');
            }
        }
        rest = &after[semi + 1..];
    }
    result.push_str(rest);

    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::Selector;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head><title>About &amp; Contact</title></head>
  <body>
    <nav id="nav"><a href="/">Home</a></nav>
    <main id="swup" class="transition-fade"><h1>About</h1></main>
    <aside class="transition-slide">Side</aside>
  </body>
</html>"#;

    #[test]
    fn test_title() {
        assert_eq!(title(PAGE).as_deref(), Some("About & Contact"));
        assert_eq!(title("<p>no title</p>"), None);
    }

    #[test]
    fn test_walk_paths() {
        let sel = Selector::parse("body [class*=\"transition-\"]").unwrap();
        let mut tags = Vec::new();
        for_each_element(PAGE, |path, _, _| {
            if sel.matches(path) {
                tags.push(path.last().unwrap().tag.clone());
            }
        });
        assert_eq!(tags, ["main", "aside"]);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("plain"), "plain");
        assert_eq!(unescape("a &lt;b&gt; &amp; &#39;c&#x27;"), "a <b> & 'c'");
        assert_eq!(unescape("AT&T"), "AT&T");
        assert_eq!(unescape("&unknown;"), "&unknown;");
    }
}
