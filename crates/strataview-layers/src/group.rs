//! Group delegate: ordered children of a group or view.

use serde::{Deserialize, Serialize};
use strataview_core::pubsub::{Outbox, PublishSubscribe, SnapshotSource, Topic};
use strataview_core::{ItemId, StructuralError};

/// Groups and views share one delegate; a view is a top-level group that a
/// viewer renders as one canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    Group,
    View,
}

/// Topics published by a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupTopic {
    Children,
}

/// The child list changed.
pub struct ChildrenChanged;
impl Topic for ChildrenChanged {
    type Key = GroupTopic;
    type Payload = Vec<ItemId>;
    const KEY: GroupTopic = GroupTopic::Children;
}

#[derive(Debug)]
pub struct GroupDelegate {
    kind: GroupKind,
    children: Vec<ItemId>,
    publisher: PublishSubscribe<GroupTopic>,
}

impl GroupDelegate {
    pub fn new(kind: GroupKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            publisher: PublishSubscribe::new(),
        }
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    pub fn index_of(&self, child: ItemId) -> Option<usize> {
        self.children.iter().position(|c| *c == child)
    }

    pub fn publisher(&self) -> &PublishSubscribe<GroupTopic> {
        &self.publisher
    }

    pub(crate) fn insert(
        &mut self,
        index: usize,
        child: ItemId,
        outbox: &mut Outbox,
    ) -> Result<(), StructuralError> {
        if index > self.children.len() {
            return Err(StructuralError::InvalidIndex {
                index,
                len: self.children.len(),
            });
        }
        self.children.insert(index, child);
        outbox.post(&self.publisher, GroupTopic::Children);
        Ok(())
    }

    /// Remove without notifying; the caller posts once for the whole operation.
    pub(crate) fn take(&mut self, child: ItemId) -> Option<usize> {
        let index = self.index_of(child)?;
        self.children.remove(index);
        Some(index)
    }

    pub(crate) fn remove(&mut self, child: ItemId, outbox: &mut Outbox) -> Option<usize> {
        let index = self.take(child)?;
        outbox.post(&self.publisher, GroupTopic::Children);
        Some(index)
    }

    pub(crate) fn move_to(
        &mut self,
        child: ItemId,
        index: usize,
        group: ItemId,
        outbox: &mut Outbox,
    ) -> Result<(), StructuralError> {
        let len = self.children.len();
        let Some(current) = self.index_of(child) else {
            return Err(StructuralError::NotAChild { item: child, group });
        };
        if index >= len {
            return Err(StructuralError::InvalidIndex { index, len });
        }
        let child = self.children.remove(current);
        self.children.insert(index, child);
        outbox.post(&self.publisher, GroupTopic::Children);
        Ok(())
    }
}

impl SnapshotSource<ChildrenChanged> for GroupDelegate {
    fn snapshot(&self) -> Vec<ItemId> {
        self.children.clone()
    }
}
