use crate::dom::vdom::{Element, NodeId, NodeKind, VDom};
use crate::dom::tree::DocumentTree;
use crate::utils::error::PagetocError;

/// Elements that never have children or an end tag
pub(crate) const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is kept verbatim
pub(crate) const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

pub(crate) fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub(crate) fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

impl VDom {
    /// Parse an HTML document or fragment.
    ///
    /// The parser is tolerant in the way rendered documentation needs:
    /// stray end tags are dropped, unclosed elements are closed at end of
    /// input, and entities in text and attribute values are decoded. It does
    /// not implement the HTML5 tree-construction rules (no implied `<p>`
    /// closing, no foster parenting).
    pub fn parse(html: &str) -> Result<VDom, PagetocError> {
        let mut dom = VDom::new();
        let mut stack = vec![dom.root()];
        let bytes = html.as_bytes();
        let mut i = 0usize;

        while i < bytes.len() {
            let parent = *stack.last().unwrap_or(&dom.root());

            if bytes[i] != b'<' {
                let start = i;
                while i < bytes.len() && bytes[i] != b'<' {
                    i += 1;
                }
                push_text(&mut dom, parent, &html[start..i]);
                continue;
            }

            if html[i..].starts_with("<!--") {
                let end = html[i + 4..]
                    .find("-->")
                    .ok_or_else(|| PagetocError::Html("unclosed comment".to_string()))?;
                let body = &html[i + 4..i + 4 + end];
                dom.push_node(Some(parent), NodeKind::Comment(body.to_string()));
                i += 4 + end + 3;
                continue;
            }

            if html[i..].starts_with("<!") || html[i..].starts_with("<?") {
                let end = html[i..]
                    .find('>')
                    .ok_or_else(|| PagetocError::Html("unclosed declaration".to_string()))?;
                let decl = &html[i + 2..i + end];
                if decl.get(..7).map_or(false, |p| p.eq_ignore_ascii_case("doctype")) {
                    let name = decl.get(7..).unwrap_or("").trim();
                    dom.push_node(Some(parent), NodeKind::Doctype(name.to_string()));
                }
                i += end + 1;
                continue;
            }

            if html[i..].starts_with("</") {
                let (tag, next) = parse_end_tag(html, i)?;
                i = next;
                close_element(&dom, &mut stack, &tag);
                continue;
            }

            // A lone '<' that does not open a tag is plain text
            if !bytes.get(i + 1).map_or(false, |b| b.is_ascii_alphabetic()) {
                push_text(&mut dom, parent, "<");
                i += 1;
                continue;
            }

            let (tag, attrs, self_closing, next) = parse_start_tag(html, i)?;
            i = next;
            let node = dom.push_node(
                Some(parent),
                NodeKind::Element(Element {
                    tag_name: tag.clone(),
                    attrs,
                }),
            );

            if is_raw_text_element(&tag) && !self_closing {
                let close = find_raw_text_end(html, i, &tag);
                if close > i {
                    dom.push_node(Some(node), NodeKind::Text(html[i..close].to_string()));
                }
                i = close;
                if i < bytes.len() {
                    let (_, after) = parse_end_tag(html, i)?;
                    i = after;
                }
                continue;
            }

            if !self_closing && !is_void_element(&tag) {
                stack.push(node);
            }
        }

        Ok(dom)
    }
}

fn push_text(dom: &mut VDom, parent: NodeId, raw: &str) {
    if raw.is_empty() {
        return;
    }
    let decoded = html_escape::decode_html_entities(raw).into_owned();
    dom.push_node(Some(parent), NodeKind::Text(decoded));
}

/// Pop the stack up to and including the nearest open `tag`; ignore the end
/// tag when no such element is open.
fn close_element(dom: &VDom, stack: &mut Vec<NodeId>, tag: &str) {
    let Some(depth) = stack
        .iter()
        .rposition(|node| dom.tag_name(*node) == Some(tag))
    else {
        return;
    };
    stack.truncate(depth.max(1));
}

fn is_tag_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b':' || b == b'_'
}

fn is_attr_name_char(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'/' | b'>' | b'=' | b'"' | b'\'' | b'<')
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn parse_start_tag(
    html: &str,
    at: usize,
) -> Result<(String, Vec<(String, String)>, bool, usize), PagetocError> {
    let bytes = html.as_bytes();
    let mut i = at + 1;

    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    let tag = html[tag_start..i].to_ascii_lowercase();

    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut self_closing = false;

    loop {
        skip_ws(bytes, &mut i);
        if i >= bytes.len() {
            return Err(PagetocError::Html(format!("unclosed start tag <{}>", tag)));
        }
        match bytes[i] {
            b'>' => {
                i += 1;
                break;
            }
            b'/' => {
                i += 1;
                if bytes.get(i) == Some(&b'>') {
                    self_closing = true;
                    i += 1;
                    break;
                }
                continue;
            }
            _ => {}
        }

        let name_start = i;
        while i < bytes.len() && is_attr_name_char(bytes[i]) {
            i += 1;
        }
        if i == name_start {
            // Skip a stray quote or '<' inside the tag
            i += 1;
            continue;
        }
        let name = html[name_start..i].to_ascii_lowercase();

        skip_ws(bytes, &mut i);
        let value = if bytes.get(i) == Some(&b'=') {
            i += 1;
            skip_ws(bytes, &mut i);
            parse_attr_value(html, &mut i, &tag)?
        } else {
            String::new()
        };

        // First occurrence wins, as in browsers
        if !attrs.iter().any(|(key, _)| *key == name) {
            attrs.push((name, value));
        }
    }

    Ok((tag, attrs, self_closing, i))
}

fn parse_attr_value(html: &str, i: &mut usize, tag: &str) -> Result<String, PagetocError> {
    let bytes = html.as_bytes();
    let raw = match bytes.get(*i) {
        Some(&quote) if quote == b'"' || quote == b'\'' => {
            let start = *i + 1;
            let len = html[start..]
                .find(quote as char)
                .ok_or_else(|| PagetocError::Html(format!("unterminated attribute value in <{}>", tag)))?;
            *i = start + len + 1;
            &html[start..start + len]
        }
        _ => {
            let start = *i;
            while *i < bytes.len() && !bytes[*i].is_ascii_whitespace() && bytes[*i] != b'>' {
                *i += 1;
            }
            &html[start..*i]
        }
    };
    Ok(html_escape::decode_html_entities(raw).into_owned())
}

fn parse_end_tag(html: &str, at: usize) -> Result<(String, usize), PagetocError> {
    let bytes = html.as_bytes();
    let mut i = at + 2;
    skip_ws(bytes, &mut i);

    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    let tag = html[tag_start..i].to_ascii_lowercase();

    let close = html[i..]
        .find('>')
        .ok_or_else(|| PagetocError::Html(format!("unclosed end tag </{}>", tag)))?;
    Ok((tag, i + close + 1))
}

/// Offset of the `</tag` that ends a raw-text element, or end of input
fn find_raw_text_end(html: &str, from: usize, tag: &str) -> usize {
    let needle = format!("</{}", tag);
    let lower = html[from..].to_ascii_lowercase();
    lower.find(&needle).map(|pos| from + pos).unwrap_or(html.len())
}
