//! Minimal CSS selector matching.
//!
//! Supports what swap-container, animation and link selectors use in practice:
//!
//! - type, universal, `#id`, `.class`
//! - attributes: `[a]`, `[a=v]`, `[a^=v]`, `[a$=v]`, `[a*=v]`, `[a~=v]`
//! - `:not(<compound>)`
//! - descendant (` `) and child (`>`) combinators
//! - selector lists (`,`)
//!
//! Matching works on an element path (root first, element last), so the
//! same code serves the extractor and the headless document.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid selector `{selector}`: {reason}")]
pub struct SelectorError {
    pub selector: String,
    pub reason: String,
}

/// Tag name plus attributes; enough to evaluate a selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementData {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|c| c.split_ascii_whitespace().any(|c| c == class))
    }
}

// =============================================================================
// Selector AST
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals,
    Prefix,
    Suffix,
    Contains,
    Word,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrSelector {
    name: String,
    op: AttrOp,
    value: String,
}

impl AttrSelector {
    fn matches(&self, el: &ElementData) -> bool {
        let Some(actual) = el.attr(&self.name) else {
            return false;
        };
        match self.op {
            AttrOp::Exists => true,
            AttrOp::Equals => actual == self.value,
            // Empty value never matches for substring operators
            AttrOp::Prefix => !self.value.is_empty() && actual.starts_with(&self.value),
            AttrOp::Suffix => !self.value.is_empty() && actual.ends_with(&self.value),
            AttrOp::Contains => !self.value.is_empty() && actual.contains(&self.value),
            AttrOp::Word => actual.split_ascii_whitespace().any(|w| w == self.value),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
    nots: Vec<Compound>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.ids.is_empty()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.nots.is_empty()
    }

    fn matches(&self, el: &ElementData) -> bool {
        if let Some(tag) = &self.tag
            && tag != "*"
            && !tag.eq_ignore_ascii_case(&el.tag)
        {
            return false;
        }
        self.ids.iter().all(|id| el.id() == Some(id))
            && self.classes.iter().all(|c| el.has_class(c))
            && self.attrs.iter().all(|a| a.matches(el))
            && !self.nots.iter().any(|n| n.matches(el))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// Compounds left to right; `links[i]` joins `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    links: Vec<Combinator>,
}

impl Complex {
    fn matches(&self, path: &[&ElementData]) -> bool {
        let Some((el, ancestors)) = path.split_last() else {
            return false;
        };
        let last = self.compounds.len() - 1;
        self.compounds[last].matches(el) && self.match_ancestors(last, ancestors)
    }

    /// Match `compounds[..idx]` against `ancestors` (root first).
    fn match_ancestors(&self, idx: usize, ancestors: &[&ElementData]) -> bool {
        if idx == 0 {
            return true;
        }
        let compound = &self.compounds[idx - 1];
        match self.links[idx - 1] {
            Combinator::Child => match ancestors.split_last() {
                Some((parent, rest)) => {
                    compound.matches(parent) && self.match_ancestors(idx - 1, rest)
                }
                None => false,
            },
            Combinator::Descendant => (0..ancestors.len()).rev().any(|i| {
                compound.matches(ancestors[i]) && self.match_ancestors(idx - 1, &ancestors[..i])
            }),
        }
    }
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser {
            chars: source.chars().collect(),
            pos: 0,
            source,
        };
        let alternatives = parser.selector_list()?;
        Ok(Self {
            source: source.to_string(),
            alternatives,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match the last element of `path`; earlier entries are its ancestors.
    pub fn matches(&self, path: &[&ElementData]) -> bool {
        self.alternatives.iter().any(|c| c.matches(path))
    }

    /// Match a lone element with no ancestor context.
    pub fn matches_element(&self, el: &ElementData) -> bool {
        self.matches(&[el])
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =============================================================================
// Parser
// =============================================================================

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    source: &'a str,
}

impl Parser<'_> {
    fn error(&self, reason: impl Into<String>) -> SelectorError {
        SelectorError {
            selector: self.source.to_string(),
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn expect(&mut self, c: char) -> Result<(), SelectorError> {
        match self.bump() {
            Some(got) if got == c => Ok(()),
            Some(got) => Err(self.error(format!("expected `{c}`, found `{got}`"))),
            None => Err(self.error(format!("expected `{c}`, found end of input"))),
        }
    }

    fn selector_list(&mut self) -> Result<Vec<Complex>, SelectorError> {
        let mut list = vec![self.complex()?];
        while self.peek() == Some(',') {
            self.bump();
            list.push(self.complex()?);
        }
        if let Some(c) = self.peek() {
            return Err(self.error(format!("unexpected `{c}`")));
        }
        Ok(list)
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        self.skip_ws();
        let mut compounds = vec![self.compound()?];
        let mut links = Vec::new();

        loop {
            let had_ws = self.skip_ws();
            match self.peek() {
                None | Some(',') | Some(')') => break,
                Some('>') => {
                    self.bump();
                    self.skip_ws();
                    links.push(Combinator::Child);
                }
                Some(_) if had_ws => links.push(Combinator::Descendant),
                Some(c) => return Err(self.error(format!("unexpected `{c}`"))),
            }
            compounds.push(self.compound()?);
        }

        Ok(Complex { compounds, links })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();

        if self.peek() == Some('*') {
            self.bump();
            compound.tag = Some("*".into());
        } else if self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.ident()?.to_ascii_lowercase());
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    compound.ids.push(self.ident()?);
                }
                Some('.') => {
                    self.bump();
                    compound.classes.push(self.ident()?);
                }
                Some('[') => compound.attrs.push(self.attribute()?),
                Some(':') => {
                    self.bump();
                    let name = self.ident()?;
                    if !name.eq_ignore_ascii_case("not") {
                        return Err(self.error(format!("unsupported pseudo-class `:{name}`")));
                    }
                    self.expect('(')?;
                    self.skip_ws();
                    let inner = self.compound()?;
                    self.skip_ws();
                    self.expect(')')?;
                    compound.nots.push(inner);
                }
                _ => break,
            }
        }

        if compound.is_empty() {
            return Err(match self.peek() {
                Some(c) => self.error(format!("unexpected `{c}`")),
                None => self.error("empty selector"),
            });
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<AttrSelector, SelectorError> {
        self.expect('[')?;
        self.skip_ws();
        let name = self.ident()?;
        self.skip_ws();

        let op = match self.bump() {
            Some(']') => {
                return Ok(AttrSelector {
                    name,
                    op: AttrOp::Exists,
                    value: String::new(),
                });
            }
            Some('=') => AttrOp::Equals,
            Some(c @ ('^' | '$' | '*' | '~')) => {
                self.expect('=')?;
                match c {
                    '^' => AttrOp::Prefix,
                    '$' => AttrOp::Suffix,
                    '*' => AttrOp::Contains,
                    _ => AttrOp::Word,
                }
            }
            Some(c) => return Err(self.error(format!("unexpected `{c}` in attribute selector"))),
            None => return Err(self.error("unterminated attribute selector")),
        };

        self.skip_ws();
        let value = match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.bump();
                let mut value = String::new();
                loop {
                    match self.bump() {
                        Some('\\') => value.extend(self.bump()),
                        Some(c) if c == q => break,
                        Some(c) => value.push(c),
                        None => return Err(self.error("unterminated string")),
                    }
                }
                value
            }
            _ => self.ident()?,
        };
        self.skip_ws();
        self.expect(']')?;

        Ok(AttrSelector { name, op, value })
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                match self.bump() {
                    Some(escaped) => out.push(escaped),
                    None => return Err(self.error("dangling escape")),
                }
            } else if is_ident_char(c) {
                self.bump();
                out.push(c);
            } else {
                break;
            }
        }
        if out.is_empty() {
            return Err(match self.peek() {
                Some(c) => self.error(format!("expected identifier, found `{c}`")),
                None => self.error("expected identifier, found end of input"),
            });
        }
        Ok(out)
    }
}

#[inline]
fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || c == '\\' || !c.is_ascii()
}
