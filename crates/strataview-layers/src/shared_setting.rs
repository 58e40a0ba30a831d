//! Shared setting: one setting whose value overrides the same setting type
//! on every layer it can see.

use strataview_core::pubsub::Outbox;

use crate::setting::{SettingDelegate, SettingType, SettingValue};

#[derive(Debug)]
pub struct SharedSettingDelegate {
    setting: SettingDelegate,
}

impl SharedSettingDelegate {
    pub fn new(setting_type: SettingType) -> Self {
        Self {
            setting: SettingDelegate::new(setting_type, SettingValue::Null),
        }
    }

    pub fn setting_type(&self) -> SettingType {
        self.setting.setting_type()
    }

    pub fn setting(&self) -> &SettingDelegate {
        &self.setting
    }

    pub fn setting_mut(&mut self) -> &mut SettingDelegate {
        &mut self.setting
    }

    /// The value pushed to layers, `None` while the shared value is null.
    pub fn override_value(&self) -> Option<&SettingValue> {
        let value = self.setting.value();
        (!value.is_null()).then_some(value)
    }

    /// Install a new intersection. Returns `(available_changed, value_changed)`.
    ///
    /// Nothing is published when the list is unchanged, which is what bounds
    /// the propagation between shared settings and layers.
    pub fn apply_available_values(
        &mut self,
        available: Vec<SettingValue>,
        outbox: &mut Outbox,
    ) -> (bool, bool) {
        if self.setting.available_values() == available.as_slice() {
            return (false, false);
        }
        self.setting.set_available_values(available, outbox);
        if self.setting.is_local_value_available() {
            return (true, false);
        }
        let fallback = self
            .setting
            .available_values()
            .first()
            .cloned()
            .unwrap_or(SettingValue::Null);
        if self.setting.local_value() == &fallback {
            return (true, false);
        }
        self.setting.set_value(fallback, outbox);
        (true, true)
    }
}

/// Intersect candidate lists.
///
/// The first list seeds the result, later lists filter it; the result keeps
/// the seed's order. No lists gives an empty result.
pub fn intersect_available_values<'a, I>(lists: I) -> Vec<SettingValue>
where
    I: IntoIterator<Item = &'a [SettingValue]>,
{
    let mut lists = lists.into_iter();
    let Some(seed) = lists.next() else {
        return Vec::new();
    };
    let mut result = seed.to_vec();
    for list in lists {
        result.retain(|value| list.contains(value));
    }
    result
}
