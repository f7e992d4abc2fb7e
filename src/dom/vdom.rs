use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::dom::tree::{DocumentTree, Float};

lazy_static! {
    static ref FLOAT_REGEX: Regex = Regex::new(r"(?i)(?:^|;)\s*float\s*:\s*(left|right|none)\b").unwrap();
}

/// Attribute a snapshot can carry to pin an element's vertical offset
pub const OFFSET_TOP_ATTRIBUTE: &str = "data-offset-top";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    // Source order is kept so serialization round-trips stay stable
    pub(crate) attrs: Vec<(String, String)>,
}

impl Element {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Document,
    Doctype(String),
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
}

/// Arena-backed in-memory document.
///
/// Nodes are never freed; detaching a node only unlinks it from its
/// parent. Layout is not computed: vertical offsets come from
/// [`VDom::set_offset_top`] or a `data-offset-top` attribute and default to 0.
#[derive(Debug, Clone)]
pub struct VDom {
    pub(crate) nodes: Vec<Node>,
    root: NodeId,
    offsets: HashMap<NodeId, f64>,
}

impl Default for VDom {
    fn default() -> Self {
        Self::new()
    }
}

impl VDom {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            root: NodeId(0),
            offsets: HashMap::new(),
        }
    }

    pub(crate) fn push_node(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            kind,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Pin the layout offset of an element, overriding any snapshot attribute
    pub fn set_offset_top(&mut self, node: NodeId, offset: f64) {
        self.offsets.insert(node, offset);
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old_parent) = self.nodes[child.0].parent.take() {
            self.nodes[old_parent.0].children.retain(|c| *c != child);
        }
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == candidate {
                return true;
            }
            cursor = self.nodes[current.0].parent;
        }
        false
    }
}

impl DocumentTree for VDom {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        self.root
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node.0].children.clone()
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag_name.as_str())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|e| e.attr(name))
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(element) = self.element_mut(node) else {
            return;
        };
        let name = name.to_ascii_lowercase();
        match element.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => element.attrs.push((name, value.to_string())),
        }
    }

    fn text_content(&self, node: NodeId) -> String {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Document | NodeKind::Element(_) => {
                let mut out = String::new();
                for child in &self.nodes[node.0].children {
                    out.push_str(&self.text_content(*child));
                }
                out
            }
            NodeKind::Doctype(_) | NodeKind::Comment(_) => String::new(),
        }
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(
            None,
            NodeKind::Element(Element {
                tag_name: tag.to_ascii_lowercase(),
                attrs: Vec::new(),
            }),
        )
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(None, NodeKind::Text(text.to_string()))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        // A node cannot become its own descendant
        if self.is_ancestor_or_self(child, parent) {
            return;
        }
        self.detach(child);
        let siblings = &mut self.nodes[parent.0].children;
        let position = reference
            .and_then(|r| siblings.iter().position(|c| *c == r))
            .unwrap_or(siblings.len());
        siblings.insert(position, child);
        self.nodes[child.0].parent = Some(parent);
    }

    fn offset_top(&self, node: NodeId) -> f64 {
        if let Some(offset) = self.offsets.get(&node) {
            return *offset;
        }
        self.attribute(node, OFFSET_TOP_ATTRIBUTE)
            .and_then(|value| value.trim().trim_end_matches("px").parse::<f64>().ok())
            .unwrap_or(0.0)
    }

    fn float_direction(&self, node: NodeId) -> Option<Float> {
        let style = self.attribute(node, "style")?;
        let caps = FLOAT_REGEX.captures(style)?;
        match caps[1].to_ascii_lowercase().as_str() {
            "left" => Some(Float::Left),
            "right" => Some(Float::Right),
            _ => Some(Float::None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_and_query() {
        let mut dom = VDom::new();
        let body = dom.create_element("BODY");
        dom.append_child(dom.root(), body);
        let p = dom.create_element("p");
        let text = dom.create_text("hello");
        dom.append_child(p, text);
        dom.append_child(body, p);

        assert_eq!(dom.tag_name(body), Some("body"));
        assert_eq!(dom.text_content(dom.root()), "hello");
        assert_eq!(dom.first_child(body), Some(p));
        assert_eq!(dom.parent(p), Some(body));
    }

    #[test]
    fn test_insert_before_reference() {
        let mut dom = VDom::new();
        let a = dom.create_element("a");
        dom.append_child(dom.root(), a);
        let arrow = dom.create_text("→");
        dom.append_child(a, arrow);
        let span = dom.create_element("span");
        dom.insert_before(a, span, dom.first_child(a));

        assert_eq!(dom.children(a), vec![span, arrow]);
    }

    #[test]
    fn test_reparent_moves_node() {
        let mut dom = VDom::new();
        let first = dom.create_element("div");
        let second = dom.create_element("div");
        let leaf = dom.create_element("span");
        dom.append_child(dom.root(), first);
        dom.append_child(dom.root(), second);
        dom.append_child(first, leaf);
        dom.append_child(second, leaf);

        assert!(dom.children(first).is_empty());
        assert_eq!(dom.children(second), vec![leaf]);
    }

    #[test]
    fn test_cycle_is_refused() {
        let mut dom = VDom::new();
        let outer = dom.create_element("div");
        let inner = dom.create_element("div");
        dom.append_child(dom.root(), outer);
        dom.append_child(outer, inner);
        dom.append_child(inner, outer);

        assert_eq!(dom.parent(outer), Some(dom.root()));
    }

    #[test]
    fn test_class_helpers() {
        let mut dom = VDom::new();
        let a = dom.create_element("a");
        dom.add_class(a, "active");
        dom.add_class(a, "active");
        assert_eq!(dom.attribute(a, "class"), Some("active"));

        dom.set_attribute(a, "class", "next  active");
        dom.remove_class(a, "active");
        assert_eq!(dom.attribute(a, "class"), Some("next"));
        assert!(dom.has_class(a, "next"));
    }

    #[test]
    fn test_layout_from_attributes() {
        let mut dom = VDom::new();
        let h = dom.create_element("h2");
        dom.set_attribute(h, OFFSET_TOP_ATTRIBUTE, "420px");
        dom.set_attribute(h, "style", "color: red; float: Right");
        assert_eq!(dom.offset_top(h), 420.0);
        assert_eq!(dom.float_direction(h), Some(Float::Right));

        dom.set_offset_top(h, 12.5);
        assert_eq!(dom.offset_top(h), 12.5);

        let plain = dom.create_element("a");
        assert_eq!(dom.offset_top(plain), 0.0);
        assert_eq!(dom.float_direction(plain), None);
    }
}
