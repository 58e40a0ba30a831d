//! Item delegate: identity, name, visibility and ownership links.

use strataview_core::pubsub::{Outbox, PublishSubscribe, SnapshotSource, Topic};
use strataview_core::{ItemId, ManagerId};

/// Topics published by every item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemTopic {
    Name,
    Visibility,
}

/// The item was renamed.
pub struct NameChanged;
impl Topic for NameChanged {
    type Key = ItemTopic;
    type Payload = String;
    const KEY: ItemTopic = ItemTopic::Name;
}

/// The item was shown or hidden.
pub struct VisibilityChanged;
impl Topic for VisibilityChanged {
    type Key = ItemTopic;
    type Payload = bool;
    const KEY: ItemTopic = ItemTopic::Visibility;
}

/// Identity and ownership links shared by groups, layers and shared settings.
///
/// `parent` and `manager` are id references into the owning tree. They are
/// rewritten by the tree on every ownership change.
#[derive(Debug)]
pub struct ItemDelegate {
    id: ItemId,
    name: String,
    visible: bool,
    parent: Option<ItemId>,
    manager: Option<ManagerId>,
    publisher: PublishSubscribe<ItemTopic>,
}

impl ItemDelegate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            visible: true,
            parent: None,
            manager: None,
            publisher: PublishSubscribe::new(),
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    pub fn manager(&self) -> Option<ManagerId> {
        self.manager
    }

    pub fn publisher(&self) -> &PublishSubscribe<ItemTopic> {
        &self.publisher
    }

    pub fn set_name(&mut self, name: impl Into<String>, outbox: &mut Outbox) {
        let name = name.into();
        if self.name == name {
            return;
        }
        self.name = name;
        outbox.post(&self.publisher, ItemTopic::Name);
    }

    pub fn set_visible(&mut self, visible: bool, outbox: &mut Outbox) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        outbox.post(&self.publisher, ItemTopic::Visibility);
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ItemId>) {
        self.parent = parent;
    }

    pub(crate) fn set_manager(&mut self, manager: Option<ManagerId>) {
        self.manager = manager;
    }
}

impl SnapshotSource<NameChanged> for ItemDelegate {
    fn snapshot(&self) -> String {
        self.name.clone()
    }
}

impl SnapshotSource<VisibilityChanged> for ItemDelegate {
    fn snapshot(&self) -> bool {
        self.visible
    }
}
