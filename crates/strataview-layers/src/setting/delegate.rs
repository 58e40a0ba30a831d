//! Setting delegate
//!
//! Holds one setting's local value, candidate list, override and loading flag.

use strataview_core::pubsub::{Outbox, PublishSubscribe, SnapshotSource, Topic};

use super::value::{SettingType, SettingValue};

/// Topics published by a [`SettingDelegate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingTopic {
    ValueChanged,
    AvailableValuesChanged,
    OverriddenChanged,
    LoadingStateChanged,
}

/// The effective value changed.
pub struct ValueChanged;
impl Topic for ValueChanged {
    type Key = SettingTopic;
    type Payload = SettingValue;
    const KEY: SettingTopic = SettingTopic::ValueChanged;
}

/// The candidate list changed.
pub struct AvailableValuesChanged;
impl Topic for AvailableValuesChanged {
    type Key = SettingTopic;
    type Payload = Vec<SettingValue>;
    const KEY: SettingTopic = SettingTopic::AvailableValuesChanged;
}

/// The override was set or cleared.
pub struct OverriddenChanged;
impl Topic for OverriddenChanged {
    type Key = SettingTopic;
    type Payload = Option<SettingValue>;
    const KEY: SettingTopic = SettingTopic::OverriddenChanged;
}

/// The loading flag flipped.
pub struct LoadingStateChanged;
impl Topic for LoadingStateChanged {
    type Key = SettingTopic;
    type Payload = bool;
    const KEY: SettingTopic = SettingTopic::LoadingStateChanged;
}

/// One user-controllable parameter.
///
/// An override, when present, shadows the local value without replacing it:
/// clearing the override reveals the last locally set value.
///
/// Mutators post their notifications to an [`Outbox`] so that the owner can
/// deliver them once its own borrow has ended.
#[derive(Debug)]
pub struct SettingDelegate {
    setting_type: SettingType,
    value: SettingValue,
    available: Vec<SettingValue>,
    overridden: Option<SettingValue>,
    loading: bool,
    publisher: PublishSubscribe<SettingTopic>,
}

impl SettingDelegate {
    pub fn new(setting_type: SettingType, value: SettingValue) -> Self {
        Self {
            setting_type,
            value,
            available: Vec::new(),
            overridden: None,
            loading: false,
            publisher: PublishSubscribe::new(),
        }
    }

    pub fn setting_type(&self) -> SettingType {
        self.setting_type
    }

    /// Effective value: the override if set, else the local value.
    pub fn value(&self) -> &SettingValue {
        self.overridden.as_ref().unwrap_or(&self.value)
    }

    /// The local value, ignoring any override.
    pub fn local_value(&self) -> &SettingValue {
        &self.value
    }

    pub fn available_values(&self) -> &[SettingValue] {
        &self.available
    }

    pub fn overridden_value(&self) -> Option<&SettingValue> {
        self.overridden.as_ref()
    }

    pub fn is_overridden(&self) -> bool {
        self.overridden.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the local value is one of the available values.
    pub fn is_local_value_available(&self) -> bool {
        self.available.contains(&self.value)
    }

    pub fn publisher(&self) -> &PublishSubscribe<SettingTopic> {
        &self.publisher
    }

    /// Set the local value. Notifies even while overridden.
    pub fn set_value(&mut self, value: SettingValue, outbox: &mut Outbox) {
        self.value = value;
        outbox.post(&self.publisher, SettingTopic::ValueChanged);
    }

    /// Replace the candidate list. Does not reconcile the value.
    pub fn set_available_values(&mut self, available: Vec<SettingValue>, outbox: &mut Outbox) {
        self.available = available;
        outbox.post(&self.publisher, SettingTopic::AvailableValuesChanged);
    }

    /// Set or clear the override. Returns true if it changed.
    pub fn set_overridden_value(
        &mut self,
        overridden: Option<SettingValue>,
        outbox: &mut Outbox,
    ) -> bool {
        if self.overridden == overridden {
            return false;
        }
        let was_overridden = self.overridden.is_some();
        self.overridden = overridden;
        outbox.post(&self.publisher, SettingTopic::OverriddenChanged);
        if self.overridden.is_some() || was_overridden {
            outbox.post(&self.publisher, SettingTopic::ValueChanged);
        }
        true
    }

    pub fn set_loading(&mut self, loading: bool, outbox: &mut Outbox) {
        if self.loading == loading {
            return;
        }
        self.loading = loading;
        outbox.post(&self.publisher, SettingTopic::LoadingStateChanged);
    }
}

impl SnapshotSource<ValueChanged> for SettingDelegate {
    fn snapshot(&self) -> SettingValue {
        self.value().clone()
    }
}

impl SnapshotSource<AvailableValuesChanged> for SettingDelegate {
    fn snapshot(&self) -> Vec<SettingValue> {
        self.available.clone()
    }
}

impl SnapshotSource<OverriddenChanged> for SettingDelegate {
    fn snapshot(&self) -> Option<SettingValue> {
        self.overridden.clone()
    }
}

impl SnapshotSource<LoadingStateChanged> for SettingDelegate {
    fn snapshot(&self) -> bool {
        self.loading
    }
}
