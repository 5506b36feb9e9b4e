//! Named, ordered collection of the droplets the operator has handed out.
use crate::droplet::SlotId;

/// Direct children are kept in insertion order, which is also the scan
/// order used by the merge search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropletContainer {
    name: String,
    children: Vec<SlotId>,
}

impl DropletContainer {
    /// Creates an empty container.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Container name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Children in insertion order.
    #[must_use]
    pub fn children(&self) -> &[SlotId] {
        &self.children
    }

    /// Whether `slot` is a child.
    #[must_use]
    pub fn contains(&self, slot: SlotId) -> bool {
        self.children.contains(&slot)
    }

    /// Number of children.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the container has no children.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn push(&mut self, slot: SlotId) {
        if !self.contains(slot) {
            self.children.push(slot);
        }
    }

    pub(crate) fn remove(&mut self, slot: SlotId) -> bool {
        let before = self.children.len();
        self.children.retain(|child| *child != slot);
        self.children.len() != before
    }
}
