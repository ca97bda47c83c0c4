//! In-memory element tree for the headless browser.
//!
//! Built from HTML with `tl`, then owned and mutated here: `tl` documents
//! borrow their source and cannot be edited in place.

use crate::html;
use crate::selector::{ElementData, Selector};

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Attribute carrying a swap-container block index.
pub const BLOCK_ATTR: &str = "data-swup";

#[derive(Debug, Clone)]
enum Child {
    Element(usize),
    /// Raw (still escaped) text
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: ElementData,
    parent: Option<usize>,
    children: Vec<Child>,
}

/// Mutable element tree. Index 0 is always the `<html>` root.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    const ROOT: usize = 0;

    /// Build a document from HTML. Content outside `<html>` is adopted by the root.
    pub fn parse(source: &str) -> Self {
        let mut doc = Self {
            nodes: vec![Node {
                data: ElementData::new("html"),
                parent: None,
                children: Vec::new(),
            }],
        };

        let Ok(dom) = tl::parse(source, tl::ParserOptions::default()) else {
            return doc;
        };
        let parser = dom.parser();
        for handle in dom.children() {
            if let Some(tl::Node::Tag(tag)) = handle.get(parser)
                && tag.name().as_utf8_str().eq_ignore_ascii_case("html")
            {
                doc.nodes[Self::ROOT].data = html::element_data(tag);
                for child in tag.children().top().iter() {
                    doc.adopt(*child, parser, Self::ROOT);
                }
                continue;
            }
            doc.adopt(*handle, parser, Self::ROOT);
        }
        doc
    }

    fn adopt(&mut self, handle: tl::NodeHandle, parser: &tl::Parser<'_>, parent: usize) {
        if let Some(child) = self.import(handle, parser, parent) {
            self.nodes[parent].children.push(child);
        }
    }

    /// Copy a `tl` node (and its subtree) in, without attaching it.
    fn import(
        &mut self,
        handle: tl::NodeHandle,
        parser: &tl::Parser<'_>,
        parent: usize,
    ) -> Option<Child> {
        match handle.get(parser)? {
            tl::Node::Tag(tag) => {
                let data = html::element_data(tag);
                // doctype and friends
                if data.tag.starts_with('!') {
                    return None;
                }
                let index = self.nodes.len();
                self.nodes.push(Node {
                    data,
                    parent: Some(parent),
                    children: Vec::new(),
                });
                for child in tag.children().top().iter() {
                    self.adopt(*child, parser, index);
                }
                Some(Child::Element(index))
            }
            tl::Node::Raw(bytes) => Some(Child::Text(bytes.as_utf8_str().into_owned())),
            _ => None,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn root(&self) -> usize {
        Self::ROOT
    }

    pub fn data(&self, index: usize) -> Option<&ElementData> {
        self.nodes.get(index).map(|n| &n.data)
    }

    pub fn parent(&self, index: usize) -> Option<usize> {
        self.nodes.get(index)?.parent
    }

    /// Whether `ancestor` is `index` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: usize, index: usize) -> bool {
        let mut current = Some(index);
        while let Some(i) = current {
            if i == ancestor {
                return true;
            }
            current = self.parent(i);
        }
        false
    }

    /// Attached elements in document order, with their ancestor paths.
    fn walk(&self, mut visit: impl FnMut(usize, &[&ElementData]) -> bool) {
        fn go<'a>(
            doc: &'a Document,
            index: usize,
            path: &mut Vec<&'a ElementData>,
            visit: &mut impl FnMut(usize, &[&ElementData]) -> bool,
        ) -> bool {
            let node = &doc.nodes[index];
            path.push(&node.data);
            let mut keep_going = visit(index, path);
            for child in &node.children {
                if !keep_going {
                    break;
                }
                if let Child::Element(i) = child {
                    keep_going = go(doc, *i, path, visit);
                }
            }
            path.pop();
            keep_going
        }
        go(self, Self::ROOT, &mut Vec::new(), &mut visit);
    }

    pub fn select(&self, selector: &Selector) -> Vec<usize> {
        let mut found = Vec::new();
        self.walk(|index, path| {
            if selector.matches(path) {
                found.push(index);
            }
            true
        });
        found
    }

    /// First attached element satisfying `pred`.
    pub fn find(&self, pred: impl Fn(&ElementData) -> bool) -> Option<usize> {
        let mut found = None;
        self.walk(|index, path| {
            let el = path[path.len() - 1];
            if pred(el) {
                found = Some(index);
                return false;
            }
            true
        });
        found
    }

    /// Element tagged with block `index`.
    pub fn block(&self, index: usize) -> Option<usize> {
        let value = index.to_string();
        self.find(|el| el.attr(BLOCK_ATTR) == Some(value.as_str()))
    }

    /// Value of an inline `style` declaration.
    pub fn inline_style(&self, index: usize, property: &str) -> Option<String> {
        let style = self.data(index)?.attr("style")?;
        style.split(';').find_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case(property)
                .then(|| value.trim().to_string())
        })
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    pub fn set_attr(&mut self, index: usize, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.data.set_attr(name, value);
        }
    }

    pub fn remove_attr(&mut self, index: usize, name: &str) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.data.remove_attr(name);
        }
    }

    /// Classes on the root element.
    pub fn root_classes(&self) -> Vec<String> {
        self.nodes[Self::ROOT]
            .data
            .attr("class")
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    fn set_root_classes(&mut self, classes: &[String]) {
        if classes.is_empty() {
            self.remove_attr(Self::ROOT, "class");
        } else {
            self.set_attr(Self::ROOT, "class", &classes.join(" "));
        }
    }

    pub fn add_root_class(&mut self, class: &str) {
        let mut classes = self.root_classes();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
            self.set_root_classes(&classes);
        }
    }

    pub fn remove_root_class(&mut self, class: &str) {
        let mut classes = self.root_classes();
        let before = classes.len();
        classes.retain(|c| c != class);
        if classes.len() != before {
            self.set_root_classes(&classes);
        }
    }

    /// Swap an element for parsed markup. The first new element inherits
    /// `tag_attr` (name, value) so the swap can be repeated.
    pub fn replace_with_markup(
        &mut self,
        index: usize,
        markup: &str,
        tag_attr: (&str, &str),
    ) -> bool {
        let Some(parent) = self.parent(index) else {
            return false;
        };
        let Ok(dom) = tl::parse(markup, tl::ParserOptions::default()) else {
            return false;
        };
        let parser = dom.parser();

        let fresh: Vec<Child> = dom
            .children()
            .iter()
            .filter_map(|handle| self.import(*handle, parser, parent))
            .collect();
        if let Some(first) = fresh.iter().find_map(|c| match c {
            Child::Element(i) => Some(*i),
            Child::Text(_) => None,
        }) {
            self.set_attr(first, tag_attr.0, tag_attr.1);
        }

        let siblings = &mut self.nodes[parent].children;
        let Some(position) = siblings
            .iter()
            .position(|c| matches!(c, Child::Element(i) if *i == index))
        else {
            return false;
        };
        siblings.splice(position..=position, fresh);
        self.nodes[index].parent = None;
        true
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    pub fn outer_html(&self, index: usize) -> String {
        let mut out = String::new();
        self.write_node(index, &mut out);
        out
    }

    pub fn inner_text(&self, index: usize) -> String {
        let mut out = String::new();
        self.write_text(index, &mut out);
        html::unescape(out.trim()).into_owned()
    }

    fn write_text(&self, index: usize, out: &mut String) {
        for child in &self.nodes[index].children {
            match child {
                Child::Text(text) => out.push_str(text),
                Child::Element(i) => self.write_text(*i, out),
            }
        }
    }

    fn write_node(&self, index: usize, out: &mut String) {
        let node = &self.nodes[index];
        out.push('<');
        out.push_str(&node.data.tag);
        for (name, value) in &node.data.attrs {
            out.push(' ');
            out.push_str(name);
            if !value.is_empty() {
                out.push_str("=\"");
                out.push_str(&value.replace('&', "&amp;").replace('"', "&quot;"));
                out.push('"');
            }
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&node.data.tag.as_str()) {
            return;
        }
        for child in &node.children {
            match child {
                Child::Text(text) => out.push_str(text),
                Child::Element(i) => self.write_node(*i, out),
            }
        }
        out.push_str("</");
        out.push_str(&node.data.tag);
        out.push('>');
    }
}
