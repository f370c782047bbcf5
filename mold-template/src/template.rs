use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;

use mold_dom::{HostTree, NodeId};

use crate::bindings::{Binding, Bindings};
use crate::error::TemplateError;
use crate::options::ParseOptions;
use crate::template_ast::{Descriptor, Segment, TextDescriptor};
use crate::template_parse::parse_template_with_options;

/// Where a tracked text run lives in the live tree.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RunTarget<N> {
    Text(N),
    Attr { element: N, name: String },
}

/// A text descriptor that contains placeholders, bound to its live location.
#[derive(Debug)]
struct Run<N> {
    target: RunTarget<N>,
    text: TextDescriptor,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    run: usize,
    segment: usize,
}

/// A placeholder occurrence in the live tree, as reported by
/// [`Template::slots`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotLocation<N> {
    Text { node: N, segment: usize },
    Attribute { element: N, name: String, segment: usize },
}

#[derive(Debug)]
struct SlotIndex<N> {
    runs: Vec<Run<N>>,
    by_name: HashMap<String, Vec<Slot>>,
}

impl<N> Default for SlotIndex<N> {
    fn default() -> Self {
        Self {
            runs: Vec::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<N> SlotIndex<N> {
    fn register(&mut self, target: RunTarget<N>, text: &TextDescriptor) {
        if !text.has_placeholders() {
            return;
        }
        let run = self.runs.len();
        for (segment, seg) in text.segments.iter().enumerate() {
            if let Segment::Placeholder(name) = seg {
                self.by_name
                    .entry(name.clone())
                    .or_default()
                    .push(Slot { run, segment });
            }
        }
        self.runs.push(Run {
            target,
            text: text.clone(),
        });
    }
}

/// A parsed template that can be materialized once into a host tree and then
/// updated in place.
///
/// The template owns the placeholder index and the content of the text nodes
/// and attributes it tracks. The caller owns the nodes returned by
/// [`create`](Template::create) and may move them around, but must not write
/// tracked content itself; later updates would compare against the foreign
/// value.
#[derive(Debug)]
pub struct Template<N = NodeId> {
    forest: Vec<Descriptor>,
    bindings: HashMap<String, String>,
    index: SlotIndex<N>,
    created: bool,
}

impl Template<NodeId> {
    /// Parses `source` for use with [`mold_dom::Document`].
    pub fn new(source: &str) -> Result<Self, TemplateError> {
        Self::for_host(source, &ParseOptions::default())
    }

    pub fn with_options(source: &str, opts: &ParseOptions) -> Result<Self, TemplateError> {
        Self::for_host(source, opts)
    }
}

impl<N: Copy + Eq + Debug> Template<N> {
    /// Parses `source` for any host whose node handle is `N`.
    pub fn for_host(source: &str, opts: &ParseOptions) -> Result<Self, TemplateError> {
        let forest = parse_template_with_options(source, opts)?;
        Ok(Self::from_descriptors(forest))
    }

    pub fn from_descriptors(forest: Vec<Descriptor>) -> Self {
        Self {
            forest,
            bindings: HashMap::new(),
            index: SlotIndex::default(),
            created: false,
        }
    }

    pub fn descriptors(&self) -> &[Descriptor] {
        &self.forest
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    /// Distinct placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for d in &self.forest {
            d.for_each_placeholder(&mut |name| {
                if !seen.contains(&name) {
                    seen.push(name);
                }
            });
        }
        seen
    }

    /// Current persistent value of `name`, if one is bound.
    pub fn binding(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    /// Live locations of every occurrence of `name`. Empty before `create()`.
    pub fn slots(&self, name: &str) -> Vec<SlotLocation<N>> {
        let Some(slots) = self.index.by_name.get(name) else {
            return Vec::new();
        };
        slots
            .iter()
            .map(|slot| match &self.index.runs[slot.run].target {
                RunTarget::Text(node) => SlotLocation::Text {
                    node: *node,
                    segment: slot.segment,
                },
                RunTarget::Attr { element, name } => SlotLocation::Attribute {
                    element: *element,
                    name: name.clone(),
                    segment: slot.segment,
                },
            })
            .collect()
    }

    /// Builds the live tree and returns its top-level nodes, one per root
    /// descriptor. Placeholders render with their current bindings (empty if
    /// unbound). A second call fails with [`TemplateError::AlreadyCreated`]
    /// and leaves the first tree and its index untouched.
    pub fn create<H>(&mut self, host: &mut H) -> Result<Vec<N>, TemplateError>
    where
        H: HostTree<Node = N>,
    {
        if self.created {
            return Err(TemplateError::AlreadyCreated);
        }
        let Self {
            forest,
            bindings,
            index,
            ..
        } = &mut *self;
        let roots: Vec<N> = forest
            .iter()
            .map(|d| materialize(d, host, index, bindings))
            .collect();
        self.created = true;
        log::debug!(
            "materialized {} root(s), tracking {} run(s) for {} placeholder(s)",
            roots.len(),
            self.index.runs.len(),
            self.index.by_name.len()
        );
        Ok(roots)
    }

    /// Merges `bindings` into the persistent values and rewrites every
    /// tracked run that mentions one of the supplied names, skipping writes
    /// whose rendered text already matches the live content.
    ///
    /// Names the template does not use are ignored. Returns the number of
    /// writes issued to the host.
    pub fn update<H>(&mut self, host: &mut H, bindings: &Bindings) -> usize
    where
        H: HostTree<Node = N>,
    {
        let mut touched: BTreeSet<usize> = BTreeSet::new();
        for (name, binding) in bindings.iter() {
            match binding {
                Binding::Value(v) => {
                    self.bindings.insert(name.to_string(), v.clone());
                }
                Binding::Cleared => {
                    self.bindings.remove(name);
                }
            }
            if let Some(slots) = self.index.by_name.get(name) {
                touched.extend(slots.iter().map(|s| s.run));
            }
        }

        let mut writes = 0;
        for run_id in touched {
            let run = &self.index.runs[run_id];
            let rendered = render(&run.text, &self.bindings);
            match &run.target {
                RunTarget::Text(node) => {
                    if host.node_value(*node) != Some(rendered.as_str()) {
                        log::trace!("text {node:?} <- {rendered:?}");
                        host.set_node_value(*node, &rendered);
                        writes += 1;
                    }
                }
                RunTarget::Attr { element, name } => {
                    if host.get_attribute(*element, name) != Some(rendered.as_str()) {
                        log::trace!("{element:?}[{name}] <- {rendered:?}");
                        host.set_attribute(*element, name, &rendered);
                        writes += 1;
                    }
                }
            }
        }
        log::debug!(
            "update with {} binding(s) issued {} write(s)",
            bindings.len(),
            writes
        );
        writes
    }
}

fn render(text: &TextDescriptor, bindings: &HashMap<String, String>) -> String {
    text.render(|name| bindings.get(name).map(String::as_str))
}

fn materialize<H: HostTree>(
    desc: &Descriptor,
    host: &mut H,
    index: &mut SlotIndex<H::Node>,
    bindings: &HashMap<String, String>,
) -> H::Node {
    match desc {
        Descriptor::Text(text) => {
            let node = host.create_text_node(&render(text, bindings));
            index.register(RunTarget::Text(node), text);
            node
        }
        Descriptor::Element {
            tag,
            attrs,
            children,
        } => {
            let element = host.create_element(tag);
            for attr in attrs {
                host.set_attribute(element, &attr.name, &render(&attr.value, bindings));
                index.register(
                    RunTarget::Attr {
                        element,
                        name: attr.name.clone(),
                    },
                    &attr.value,
                );
            }
            for child in children {
                let node = materialize(child, host, index, bindings);
                host.append_child(element, node);
            }
            element
        }
    }
}
