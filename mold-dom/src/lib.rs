//! In-memory live tree used as the host for mold templates.
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]. The [`HostTree`] trait is the small capability set the template
//! engine needs; any tree able to create nodes, append children and read and
//! write text and attribute content can stand in for `Document`.

pub mod mutation;
pub mod serialize;

use mutation::{ListenerId, Mutation, MutationRegistry};

/// Elements that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "AREA", "BASE", "BR", "COL", "EMBED", "HR", "IMG", "INPUT", "LINK", "META", "PARAM", "SOURCE",
    "TRACK", "WBR",
];

/// Name reported by [`Document::node_name`] for text nodes.
pub const TEXT_NODE_NAME: &str = "#text";

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

/// Capabilities a live tree must provide to host a template.
///
/// Reading back a value that was just written must return the identical
/// string; the engine relies on exact equality to skip redundant writes.
pub trait HostTree {
    type Node: Copy + Eq + std::fmt::Debug;

    fn create_element(&mut self, tag: &str) -> Self::Node;
    fn create_text_node(&mut self, data: &str) -> Self::Node;
    fn append_child(&mut self, parent: Self::Node, child: Self::Node);
    fn get_attribute(&self, element: Self::Node, name: &str) -> Option<&str>;
    fn set_attribute(&mut self, element: Self::Node, name: &str, value: &str);
    fn node_value(&self, node: Self::Node) -> Option<&str>;
    fn set_node_value(&mut self, node: Self::Node, data: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<NodeId>,
    },
    Text(String),
}

#[derive(Debug)]
struct NodeEntry {
    data: NodeData,
    parent: Option<NodeId>,
}

/// Arena of live nodes plus the mutation listeners attached to them.
///
/// `NodeId`s are only meaningful for the document that issued them.
#[derive(Default)]
pub struct Document {
    nodes: Vec<NodeEntry>,
    observers: MutationRegistry,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeEntry { data, parent: None });
        id
    }

    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Element {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        })
    }

    pub fn create_text_node(&mut self, data: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Text(data.into()))
    }

    pub fn data(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.0].data
    }

    /// Tag name for elements, `#text` for text nodes.
    pub fn node_name(&self, node: NodeId) -> &str {
        match &self.nodes[node.0].data {
            NodeData::Element { tag, .. } => tag,
            NodeData::Text(_) => TEXT_NODE_NAME,
        }
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.nodes[node.0].data, NodeData::Text(_))
    }

    /// Text content of a text node; `None` for elements.
    pub fn node_value(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].data {
            NodeData::Text(t) => Some(t),
            NodeData::Element { .. } => None,
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn child_nodes(&self, node: NodeId) -> &[NodeId] {
        match &self.nodes[node.0].data {
            NodeData::Element { children, .. } => children,
            NodeData::Text(_) => &[],
        }
    }

    pub fn attributes(&self, node: NodeId) -> &[(String, String)] {
        match &self.nodes[node.0].data {
            NodeData::Element { attrs, .. } => attrs,
            NodeData::Text(_) => &[],
        }
    }

    pub fn get_attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        self.attributes(element)
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Appends `child` as the last child of `parent`, detaching it from any
    /// previous parent first. Appending to a text node is ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.is_text(parent) {
            log::debug!("append_child: ignoring child {child:?} for text node {parent:?}");
            return;
        }
        self.detach(child);
        if let NodeData::Element { children, .. } = &mut self.nodes[parent.0].data {
            children.push(child);
        }
        self.nodes[child.0].parent = Some(parent);
    }

    /// Removes `node` from its parent's child list. The node stays in the
    /// arena and can be appended elsewhere.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes[node.0].parent.take() else {
            return;
        };
        if let NodeData::Element { children, .. } = &mut self.nodes[parent.0].data {
            children.retain(|c| *c != node);
        }
    }

    /// Sets an attribute, notifying observers even when the value is unchanged.
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) {
        let old = match &mut self.nodes[element.0].data {
            NodeData::Element { attrs, .. } => match attrs.iter_mut().find(|(k, _)| k == name) {
                Some((_, v)) => Some(std::mem::replace(v, value.to_string())),
                None => {
                    attrs.push((name.to_string(), value.to_string()));
                    None
                }
            },
            NodeData::Text(_) => {
                log::debug!("set_attribute: {element:?} is a text node, ignoring {name}");
                return;
            }
        };
        self.notify(Mutation::Attribute {
            target: element,
            name: name.to_string(),
            old,
            new: value.to_string(),
        });
    }

    /// Replaces the content of a text node, notifying observers even when the
    /// value is unchanged. Elements are left alone.
    pub fn set_node_value(&mut self, node: NodeId, data: &str) {
        let old = match &mut self.nodes[node.0].data {
            NodeData::Text(t) => std::mem::replace(t, data.to_string()),
            NodeData::Element { .. } => return,
        };
        self.notify(Mutation::CharacterData {
            target: node,
            old,
            new: data.to_string(),
        });
    }

    /// Registers `listener` for mutations on `node` and its descendants.
    pub fn observe<F>(&mut self, node: NodeId, listener: F) -> ListenerId
    where
        F: FnMut(&Mutation) + 'static,
    {
        self.observers.on(node, listener)
    }

    pub fn unobserve(&mut self, id: ListenerId) -> bool {
        self.observers.remove(id)
    }

    fn notify(&mut self, mutation: Mutation) {
        if self.observers.is_empty() {
            return;
        }
        let mut path = Vec::new();
        let mut cur = Some(mutation.target());
        while let Some(n) = cur {
            path.push(n);
            cur = self.nodes[n.0].parent;
        }
        self.observers.dispatch(&path, &mutation);
    }
}

impl HostTree for Document {
    type Node = NodeId;

    fn create_element(&mut self, tag: &str) -> NodeId {
        Document::create_element(self, tag)
    }
    fn create_text_node(&mut self, data: &str) -> NodeId {
        Document::create_text_node(self, data)
    }
    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        Document::append_child(self, parent, child)
    }
    fn get_attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        Document::get_attribute(self, element, name)
    }
    fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) {
        Document::set_attribute(self, element, name, value)
    }
    fn node_value(&self, node: NodeId) -> Option<&str> {
        Document::node_value(self, node)
    }
    fn set_node_value(&mut self, node: NodeId, data: &str) {
        Document::set_node_value(self, node, data)
    }
}
