//! Page accessors: read-only views over a document that the extractor
//! traverses with CSS selectors.

use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};

/// Read-only selector queries over a document
///
/// All queries return elements in document order. A selector that cannot
/// be evaluated matches nothing.
pub trait PageAccessor {
    type Element<'a>: Copy
    where
        Self: 'a;

    /// Every element in the document matching `selector`
    fn find_containers(&self, selector: &str) -> Vec<Self::Element<'_>>;

    /// Descendants of `element` (excluding itself) matching `selector`
    fn find_nested<'a>(&'a self, element: Self::Element<'a>, selector: &str) -> Vec<Self::Element<'a>>;

    /// Concatenated text of the element and its descendants
    fn text_content<'a>(&'a self, element: Self::Element<'a>) -> String;

    /// Attribute value, if present
    fn attribute<'a>(&'a self, element: Self::Element<'a>, name: &str) -> Option<String>;
}

/// A parsed HTML document
pub struct HtmlPage {
    document: Html,
}

impl HtmlPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(sel) => Some(sel),
        Err(e) => {
            tracing::warn!(selector, error = ?e, "invalid selector, matching nothing");
            None
        }
    }
}

impl PageAccessor for HtmlPage {
    type Element<'a> = ElementRef<'a>;

    fn find_containers(&self, selector: &str) -> Vec<ElementRef<'_>> {
        parse_selector(selector)
            .map(|sel| self.document.select(&sel).collect())
            .unwrap_or_default()
    }

    fn find_nested<'a>(&'a self, element: ElementRef<'a>, selector: &str) -> Vec<ElementRef<'a>> {
        parse_selector(selector)
            .map(|sel| element.select(&sel).collect())
            .unwrap_or_default()
    }

    fn text_content<'a>(&'a self, element: ElementRef<'a>) -> String {
        element.text().collect()
    }

    fn attribute<'a>(&'a self, element: ElementRef<'a>, name: &str) -> Option<String> {
        element.value().attr(name).map(String::from)
    }
}

/// One node of a [`MemoryPage`]
#[derive(Debug, Clone, Default)]
pub struct MemoryNode {
    /// Selectors this node answers to
    pub matches: Vec<String>,
    pub attrs: HashMap<String, String>,
    /// Text directly owned by this node
    pub text: String,
    children: Vec<usize>,
}

impl MemoryNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matching(mut self, selector: &str) -> Self {
        self.matches.push(selector.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }
}

/// In-memory document tree where each node lists the selectors it matches
///
/// Lets the extractor run without an HTML parser or a live browser.
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    nodes: Vec<MemoryNode>,
    roots: Vec<usize>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a top-level node, returning its id
    pub fn add_root(&mut self, node: MemoryNode) -> usize {
        let id = self.push(node);
        self.roots.push(id);
        id
    }

    /// Append a child under `parent`, returning its id
    ///
    /// Panics if `parent` is not an id returned by this page.
    pub fn add_child(&mut self, parent: usize, node: MemoryNode) -> usize {
        let id = self.push(node);
        self.nodes[parent].children.push(id);
        id
    }

    fn push(&mut self, node: MemoryNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Pre-order walk of the subtree below `id`
    fn descendants(&self, id: usize, out: &mut Vec<usize>) {
        for &child in &self.nodes[id].children {
            out.push(child);
            self.descendants(child, out);
        }
    }

    fn document_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            order.push(root);
            self.descendants(root, &mut order);
        }
        order
    }

    fn node_matches(&self, id: usize, selector: &str) -> bool {
        self.nodes[id].matches.iter().any(|m| m == selector)
    }
}

impl PageAccessor for MemoryPage {
    type Element<'a> = usize;

    fn find_containers(&self, selector: &str) -> Vec<usize> {
        self.document_order()
            .into_iter()
            .filter(|&id| self.node_matches(id, selector))
            .collect()
    }

    fn find_nested<'a>(&'a self, element: usize, selector: &str) -> Vec<usize> {
        let mut below = Vec::new();
        self.descendants(element, &mut below);
        below
            .into_iter()
            .filter(|&id| self.node_matches(id, selector))
            .collect()
    }

    fn text_content<'a>(&'a self, element: usize) -> String {
        let mut below = Vec::new();
        self.descendants(element, &mut below);
        std::iter::once(element)
            .chain(below)
            .map(|id| self.nodes[id].text.as_str())
            .collect()
    }

    fn attribute<'a>(&'a self, element: usize, name: &str) -> Option<String> {
        self.nodes[element].attrs.get(name).cloned()
    }
}
