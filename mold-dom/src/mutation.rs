use std::collections::HashMap;

use crate::NodeId;

/// A write to live content, delivered to listeners on the target and on each
/// of its ancestors.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CharacterData {
        target: NodeId,
        old: String,
        new: String,
    },
    Attribute {
        target: NodeId,
        name: String,
        old: Option<String>,
        new: String,
    },
}

impl Mutation {
    pub fn target(&self) -> NodeId {
        match self {
            Mutation::CharacterData { target, .. } | Mutation::Attribute { target, .. } => *target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

type Listener = Box<dyn FnMut(&Mutation)>;

#[derive(Default)]
pub(crate) struct MutationRegistry {
    handlers: HashMap<NodeId, Vec<(ListenerId, Listener)>>,
    next_id: usize,
}

impl MutationRegistry {
    pub(crate) fn on<F: FnMut(&Mutation) + 'static>(&mut self, node: NodeId, f: F) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.handlers.entry(node).or_default().push((id, Box::new(f)));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let mut removed = false;
        self.handlers.retain(|_, list| {
            let before = list.len();
            list.retain(|(lid, _)| *lid != id);
            removed |= list.len() != before;
            !list.is_empty()
        });
        removed
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invokes listeners registered on each node of `path`, target first.
    /// Returns the number of callbacks invoked.
    pub(crate) fn dispatch(&mut self, path: &[NodeId], mutation: &Mutation) -> usize {
        let mut invoked = 0;
        for node in path {
            if let Some(list) = self.handlers.get_mut(node) {
                for (_, cb) in list.iter_mut() {
                    cb(mutation);
                    invoked += 1;
                }
            }
        }
        invoked
    }
}
