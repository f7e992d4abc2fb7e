use std::fmt;
use std::str::FromStr;

use crate::dom::tree::DocumentTree;
use crate::utils::error::PagetocError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrCondition {
    Exists(String),
    Equals(String, String),
}

/// One compound selector such as `a.next[rel="next"]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Part {
    compound: Compound,
    // Relation to the part on the left; ignored for the first part
    combinator: Combinator,
}

/// A compiled CSS selector.
///
/// Supports type and universal selectors, `#id`, `.class`, `[attr]` and
/// `[attr="value"]`, the descendant and child combinators, and
/// comma-separated groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    groups: Vec<Vec<Part>>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, PagetocError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(PagetocError::Selector("empty selector".to_string()));
        }

        let mut groups = Vec::new();
        for group in split_groups(trimmed)? {
            groups.push(parse_group(&group, trimmed)?);
        }

        Ok(Self {
            source: trimmed.to_string(),
            groups,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// This selector restricted to descendants of `ancestor`, i.e. `ancestor self`
    /// for every pair of groups
    pub fn within(&self, ancestor: &Selector) -> Selector {
        let mut groups = Vec::with_capacity(ancestor.groups.len() * self.groups.len());
        let mut sources = Vec::with_capacity(groups.capacity());
        for outer in &ancestor.groups {
            for inner in &self.groups {
                let mut parts = outer.clone();
                let mut tail = inner.clone();
                tail[0].combinator = Combinator::Descendant;
                parts.extend(tail);
                sources.push(render_parts(&parts));
                groups.push(parts);
            }
        }
        Selector {
            source: sources.join(", "),
            groups,
        }
    }

    /// Whether `node` matches any group of this selector
    pub fn matches<T: DocumentTree>(&self, tree: &T, node: T::Node) -> bool {
        if !tree.is_element(node) {
            return false;
        }
        self.groups
            .iter()
            .any(|parts| matches_parts(tree, node, parts, parts.len() - 1))
    }
}

impl FromStr for Selector {
    type Err = PagetocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn render_parts(parts: &[Part]) -> String {
    let mut out = String::new();
    for (idx, part) in parts.iter().enumerate() {
        if idx > 0 {
            out.push_str(match part.combinator {
                Combinator::Descendant => " ",
                Combinator::Child => " > ",
            });
        }
        let compound = &part.compound;
        match &compound.tag {
            Some(tag) => out.push_str(tag),
            None if compound.id.is_none() && compound.classes.is_empty() && compound.attrs.is_empty() => {
                out.push('*')
            }
            None => {}
        }
        if let Some(id) = &compound.id {
            out.push('#');
            out.push_str(id);
        }
        for class in &compound.classes {
            out.push('.');
            out.push_str(class);
        }
        for condition in &compound.attrs {
            match condition {
                AttrCondition::Exists(name) => out.push_str(&format!("[{}]", name)),
                AttrCondition::Equals(name, value) => out.push_str(&format!("[{}=\"{}\"]", name, value)),
            }
        }
    }
    out
}

fn matches_parts<T: DocumentTree>(tree: &T, node: T::Node, parts: &[Part], idx: usize) -> bool {
    if !matches_compound(tree, node, &parts[idx].compound) {
        return false;
    }
    if idx == 0 {
        return true;
    }

    match parts[idx].combinator {
        Combinator::Child => match tree.parent(node) {
            Some(parent) if tree.is_element(parent) => matches_parts(tree, parent, parts, idx - 1),
            _ => false,
        },
        Combinator::Descendant => {
            let mut cursor = tree.parent(node);
            while let Some(ancestor) = cursor {
                if !tree.is_element(ancestor) {
                    break;
                }
                if matches_parts(tree, ancestor, parts, idx - 1) {
                    return true;
                }
                cursor = tree.parent(ancestor);
            }
            false
        }
    }
}

fn matches_compound<T: DocumentTree>(tree: &T, node: T::Node, compound: &Compound) -> bool {
    let Some(tag) = tree.tag_name(node) else {
        return false;
    };
    if let Some(expected) = &compound.tag {
        if !tag.eq_ignore_ascii_case(expected) {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if tree.attribute(node, "id") != Some(id.as_str()) {
            return false;
        }
    }
    if !compound.classes.iter().all(|class| tree.has_class(node, class)) {
        return false;
    }
    compound.attrs.iter().all(|condition| match condition {
        AttrCondition::Exists(name) => tree.attribute(node, name).is_some(),
        AttrCondition::Equals(name, value) => tree.attribute(node, name) == Some(value.as_str()),
    })
}

/// Split on top-level commas, leaving commas inside brackets or quotes alone
fn split_groups(selector: &str) -> Result<Vec<String>, PagetocError> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_brackets = false;

    for ch in selector.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(ch),
            (None, '[') => in_brackets = true,
            (None, ']') => in_brackets = false,
            (None, ',') if !in_brackets => {
                groups.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    groups.push(current);

    if groups.iter().any(|g| g.trim().is_empty()) {
        return Err(PagetocError::Selector(format!("empty group in '{}'", selector)));
    }
    Ok(groups)
}

fn parse_group(group: &str, full: &str) -> Result<Vec<Part>, PagetocError> {
    let invalid = || PagetocError::Selector(format!("cannot parse '{}'", full));
    let chars: Vec<char> = group.trim().chars().collect();
    let mut parts = Vec::new();
    let mut pending = Combinator::Descendant;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if ch.is_whitespace() {
            i += 1;
            continue;
        }
        if ch == '>' {
            if parts.is_empty() || pending == Combinator::Child {
                return Err(invalid());
            }
            pending = Combinator::Child;
            i += 1;
            continue;
        }

        let (compound, next) = parse_compound(&chars, i).ok_or_else(invalid)?;
        parts.push(Part {
            compound,
            combinator: pending,
        });
        pending = Combinator::Descendant;
        i = next;
    }

    if parts.is_empty() || pending == Combinator::Child {
        return Err(invalid());
    }
    Ok(parts)
}

fn parse_compound(chars: &[char], start: usize) -> Option<(Compound, usize)> {
    let mut compound = Compound::default();
    let mut universal = false;
    let mut i = start;

    while i < chars.len() {
        match chars[i] {
            c if c.is_whitespace() || c == '>' => break,
            '*' => {
                if universal || compound.tag.is_some() || i != start {
                    return None;
                }
                universal = true;
                i += 1;
            }
            '#' => {
                let (ident, next) = parse_ident(chars, i + 1)?;
                if compound.id.replace(ident).is_some() {
                    return None;
                }
                i = next;
            }
            '.' => {
                let (ident, next) = parse_ident(chars, i + 1)?;
                compound.classes.push(ident);
                i = next;
            }
            '[' => {
                let (condition, next) = parse_attr(chars, i + 1)?;
                compound.attrs.push(condition);
                i = next;
            }
            _ => {
                if i != start {
                    return None;
                }
                let (ident, next) = parse_ident(chars, i)?;
                compound.tag = Some(ident.to_ascii_lowercase());
                i = next;
            }
        }
    }

    if i == start {
        return None;
    }
    Some((compound, i))
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn parse_ident(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut i = start;
    while i < chars.len() && is_ident_char(chars[i]) {
        i += 1;
    }
    if i == start {
        return None;
    }
    Some((chars[start..i].iter().collect(), i))
}

fn parse_attr(chars: &[char], start: usize) -> Option<(AttrCondition, usize)> {
    let mut i = start;
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    let (name, next) = parse_ident(chars, i)?;
    let name = name.to_ascii_lowercase();
    i = next;
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }

    match chars.get(i)? {
        ']' => Some((AttrCondition::Exists(name), i + 1)),
        '=' => {
            i += 1;
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            let value;
            match chars.get(i)? {
                q @ ('"' | '\'') => {
                    let close = chars[i + 1..].iter().position(|c| c == q)? + i + 1;
                    value = chars[i + 1..close].iter().collect::<String>();
                    i = close + 1;
                }
                _ => {
                    let (ident, next) = parse_ident(chars, i)?;
                    value = ident;
                    i = next;
                }
            }
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            if chars.get(i) != Some(&']') {
                return None;
            }
            Some((AttrCondition::Equals(name, value), i + 1))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::VDom;

    fn ids<T: DocumentTree>(tree: &T, nodes: Vec<T::Node>) -> Vec<String> {
        nodes
            .into_iter()
            .map(|n| tree.attribute(n, "id").unwrap_or("").to_string())
            .collect()
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("a,").is_err());
        assert!(Selector::parse("> a").is_err());
        assert!(Selector::parse("a >").is_err());
        assert!(Selector::parse("a[href").is_err());
        assert!(Selector::parse("a..b").is_err());
    }

    #[test]
    fn test_heading_group_in_document_order() {
        let dom = VDom::parse(
            "<main><h2 id=\"a\">A</h2><p><h1 id=\"b\">B</h1></p><h4 id=\"c\">C</h4><h5 id=\"d\">D</h5></main>",
        )
        .unwrap();
        let selector = Selector::parse("h1, h2, h3, h4").unwrap();
        let found = dom.query_selector_all(dom.root(), &selector);
        assert_eq!(ids(&dom, found), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_descendant_and_child_combinators() {
        let dom = VDom::parse(
            "<div class=\"sidebar\"><ol><li><a id=\"deep\" href=\"x.html\">X</a></li></ol><a id=\"top\" href=\"y.html\">Y</a></div>",
        )
        .unwrap();

        let descendant = Selector::parse(".sidebar a").unwrap();
        assert_eq!(ids(&dom, dom.query_selector_all(dom.root(), &descendant)), vec!["deep", "top"]);

        let child = Selector::parse(".sidebar > a").unwrap();
        assert_eq!(ids(&dom, dom.query_selector_all(dom.root(), &child)), vec!["top"]);
    }

    #[test]
    fn test_attribute_conditions() {
        let dom = VDom::parse(
            "<nav><a id=\"p\" rel=\"prev\" href=\"a.html\">&lt;</a><a id=\"n\" rel=\"next\" href=\"b.html\">&gt;</a></nav>",
        )
        .unwrap();

        let rel = Selector::parse("a[rel=\"next\"]").unwrap();
        assert_eq!(ids(&dom, dom.query_selector_all(dom.root(), &rel)), vec!["n"]);

        let href = Selector::parse("nav a[href='a.html']").unwrap();
        assert_eq!(ids(&dom, dom.query_selector_all(dom.root(), &href)), vec!["p"]);

        let exists = Selector::parse("[rel]").unwrap();
        assert_eq!(dom.query_selector_all(dom.root(), &exists).len(), 2);
    }

    #[test]
    fn test_within_scopes_every_group() {
        let dom = VDom::parse(
            "<div class=\"sidebar\"><a id=\"s\" href=\"a.html\">A</a></div>\
             <nav id=\"menu\"><a id=\"m\" href=\"b.html\">B</a></nav><a id=\"o\" href=\"c.html\">C</a>",
        )
        .unwrap();
        let regions = Selector::parse(".sidebar, #menu").unwrap();
        let links = Selector::parse("a").unwrap().within(&regions);

        assert_eq!(links.as_str(), ".sidebar a, #menu a");
        assert_eq!(ids(&dom, dom.query_selector_all(dom.root(), &links)), vec!["s", "m"]);
    }

    #[test]
    fn test_id_and_class_compound() {
        let dom = VDom::parse("<div id=\"toc-nav\" class=\"a b\"></div><div class=\"a\"></div>").unwrap();
        let selector: Selector = "div#toc-nav.a.b".parse().unwrap();
        assert_eq!(dom.query_selector_all(dom.root(), &selector).len(), 1);
        assert_eq!(selector.to_string(), "div#toc-nav.a.b");
    }
}
