//! Ordered settings snapshot.

use serde::{Deserialize, Serialize};

use crate::setting::{SettingType, SettingValue};

/// The effective value of every setting of one context, in dependency order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    entries: Vec<(SettingType, SettingValue)>,
}

impl SettingsSnapshot {
    pub fn new(entries: Vec<(SettingType, SettingValue)>) -> Self {
        Self { entries }
    }

    /// Value for `key`, `Null` when the key is absent.
    pub fn get(&self, key: SettingType) -> &SettingValue {
        const NULL: &SettingValue = &SettingValue::Null;
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(NULL, |(_, v)| v)
    }

    pub fn contains(&self, key: SettingType) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = SettingType> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SettingType, &SettingValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy with only the listed keys, in their original order.
    pub fn restricted_to(&self, keys: &[SettingType]) -> SettingsSnapshot {
        SettingsSnapshot {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| keys.contains(k))
                .cloned()
                .collect(),
        }
    }

    pub(crate) fn push(&mut self, key: SettingType, value: SettingValue) {
        self.entries.push((key, value));
    }
}
