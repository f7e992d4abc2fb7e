use crate::dom::parser::{is_raw_text_element, is_void_element};
use crate::dom::tree::DocumentTree;
use crate::dom::vdom::{NodeId, NodeKind, VDom};

impl VDom {
    /// Serialize the whole document back to HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in &self.node(self.root()).children {
            self.write_node(*child, &mut out);
        }
        out
    }

    /// Serialize a single node and its subtree
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        match &node.kind {
            NodeKind::Document => {
                for child in &node.children {
                    self.write_node(*child, out);
                }
            }
            NodeKind::Doctype(name) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(name);
                out.push('>');
            }
            NodeKind::Comment(body) => {
                out.push_str("<!--");
                out.push_str(body);
                out.push_str("-->");
            }
            NodeKind::Text(text) => {
                let raw_parent = node
                    .parent
                    .and_then(|p| self.tag_name(p))
                    .map_or(false, is_raw_text_element);
                if raw_parent {
                    out.push_str(text);
                } else {
                    out.push_str(&html_escape::encode_text(text));
                }
            }
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.tag_name);
                for (name, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(name);
                    if !value.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&html_escape::encode_double_quoted_attribute(value));
                        out.push('"');
                    }
                }
                out.push('>');
                if is_void_element(&element.tag_name) {
                    return;
                }
                for child in &node.children {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(&element.tag_name);
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::{DocumentTree, VDom};

    #[test]
    fn test_round_trip_keeps_markup() {
        let html = "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"></head><body><!-- note --><p class=\"a b\" hidden>x &amp; y</p></body></html>";
        let dom = VDom::parse(html).unwrap();
        assert_eq!(dom.to_html(), html);
    }

    #[test]
    fn test_script_is_not_escaped() {
        let html = "<script>if (a < b) {}</script>";
        let dom = VDom::parse(html).unwrap();
        assert_eq!(dom.to_html(), html);
    }

    #[test]
    fn test_created_nodes_are_escaped() {
        let mut dom = VDom::new();
        let span = dom.create_element("span");
        dom.set_attribute(span, "title", "\"quoted\"");
        let text = dom.create_text("<Next>");
        dom.append_child(span, text);
        dom.append_child(dom.root(), span);

        assert_eq!(
            dom.outer_html(span),
            "<span title=\"&quot;quoted&quot;\">&lt;Next&gt;</span>"
        );
    }
}
