//! HTML serialization of live nodes.

use crate::{Document, NodeData, NodeId, is_void_element};

/// Serializes `node` and its subtree. Tag names are written as stored.
pub fn outer_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, node, &mut out);
    out
}

/// Serializes a sequence of sibling roots, e.g. the result of a template's
/// `create()`.
pub fn to_html(doc: &Document, nodes: &[NodeId]) -> String {
    let mut out = String::new();
    for n in nodes {
        write_node(doc, *n, &mut out);
    }
    out
}

/// Concatenated text of `node` and its descendants, markup ignored.
pub fn text_content(doc: &Document, node: NodeId) -> String {
    fn walk(doc: &Document, node: NodeId, out: &mut String) {
        match doc.data(node) {
            NodeData::Text(t) => out.push_str(t),
            NodeData::Element { children, .. } => {
                for c in children {
                    walk(doc, *c, out);
                }
            }
        }
    }
    let mut out = String::new();
    walk(doc, node, &mut out);
    out
}

fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    match doc.data(node) {
        NodeData::Text(t) => out.push_str(t),
        NodeData::Element {
            tag,
            attrs,
            children,
        } => {
            out.push('<');
            out.push_str(tag);
            for (k, v) in attrs {
                out.push(' ');
                out.push_str(k);
                out.push_str("=\"");
                escape_attr_into(v, out);
                out.push('"');
            }
            out.push('>');
            if is_void_element(tag) {
                return;
            }
            for c in children {
                write_node(doc, *c, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

// Text and attribute values hold source text as written (character
// references undecoded), so only the delimiting quote is escaped.
fn escape_attr_into(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
