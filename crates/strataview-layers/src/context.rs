//! Settings context
//!
//! The complete parameter set of one layer: one [`SettingDelegate`] per key of
//! the layer kind, in dependency order. The context owns two algorithms:
//!
//! - **Fixup** pushes candidate values into every setting, top to bottom, and
//!   replaces local values that are no longer available
//! - **Change detection** compares the effective values against the cached
//!   snapshot and asks the layer kind whether the difference needs a refetch

use strataview_core::pubsub::{Outbox, PublishSubscribe, SnapshotSource, Topic};
use strataview_settings::Config;

use crate::data::LayerMetadata;
use crate::providers::{FixupInputs, LayerProvider};
use crate::query::QueryKey;
use crate::session::EnsembleSession;
use crate::setting::{SettingDelegate, SettingType, SettingValue};
use crate::snapshot::SettingsSnapshot;

/// Topics published by a [`SettingsContextDelegate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextTopic {
    SettingsChanged,
    RefetchRequired,
    AvailableSettingsChanged,
}

/// The effective values changed.
pub struct SettingsChanged;
impl Topic for SettingsChanged {
    type Key = ContextTopic;
    type Payload = SettingsSnapshot;
    const KEY: ContextTopic = ContextTopic::SettingsChanged;
}

/// Candidate lists changed.
pub struct AvailableSettingsChanged;
impl Topic for AvailableSettingsChanged {
    type Key = ContextTopic;
    type Payload = Vec<(SettingType, Vec<SettingValue>)>;
    const KEY: ContextTopic = ContextTopic::AvailableSettingsChanged;
}

/// Outcome of [`SettingsContextDelegate::detect_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeOutcome {
    pub changed: bool,
    pub refetch_required: bool,
}

#[derive(Debug)]
pub struct SettingsContextDelegate {
    settings: Vec<SettingDelegate>,
    cached: SettingsSnapshot,
    publisher: PublishSubscribe<ContextTopic>,
}

impl SettingsContextDelegate {
    /// Build the settings of `provider` with their default values.
    pub fn new(provider: &dyn LayerProvider, config: &Config) -> Self {
        let settings: Vec<SettingDelegate> = provider
            .setting_types()
            .iter()
            .map(|key| SettingDelegate::new(*key, provider.default_value(*key, config)))
            .collect();
        let mut context = Self {
            settings,
            cached: SettingsSnapshot::default(),
            publisher: PublishSubscribe::new(),
        };
        context.cached = context.values();
        context
    }

    pub fn publisher(&self) -> &PublishSubscribe<ContextTopic> {
        &self.publisher
    }

    pub fn settings(&self) -> &[SettingDelegate] {
        &self.settings
    }

    pub fn setting(&self, key: SettingType) -> Option<&SettingDelegate> {
        self.settings.iter().find(|s| s.setting_type() == key)
    }

    pub fn setting_mut(&mut self, key: SettingType) -> Option<&mut SettingDelegate> {
        self.settings.iter_mut().find(|s| s.setting_type() == key)
    }

    pub fn has_setting(&self, key: SettingType) -> bool {
        self.setting(key).is_some()
    }

    /// Effective values of every setting.
    pub fn values(&self) -> SettingsSnapshot {
        SettingsSnapshot::new(
            self.settings
                .iter()
                .map(|s| (s.setting_type(), s.value().clone()))
                .collect(),
        )
    }

    /// Snapshot taken at the last detected change.
    pub fn cached_values(&self) -> &SettingsSnapshot {
        &self.cached
    }

    /// Whether any setting is waiting for candidate values.
    pub fn is_loading(&self) -> bool {
        self.settings.iter().any(SettingDelegate::is_loading)
    }

    /// Set a local value. Returns false when the key is unknown.
    pub fn set_value(&mut self, key: SettingType, value: SettingValue, outbox: &mut Outbox) -> bool {
        match self.setting_mut(key) {
            Some(setting) => {
                setting.set_value(value, outbox);
                true
            }
            None => false,
        }
    }

    /// Replace the candidate list of `key`. Returns false when the key is
    /// unknown.
    pub fn set_available_values(
        &mut self,
        key: SettingType,
        available: Vec<SettingValue>,
        outbox: &mut Outbox,
    ) -> bool {
        let Some(setting) = self.setting_mut(key) else {
            return false;
        };
        setting.set_available_values(available, outbox);
        outbox.post(&self.publisher, ContextTopic::AvailableSettingsChanged);
        true
    }

    /// Apply overrides to the listed keys; keys not listed are cleared.
    ///
    /// Returns true if any override changed.
    pub fn set_overridden_values(
        &mut self,
        overrides: &[(SettingType, SettingValue)],
        outbox: &mut Outbox,
    ) -> bool {
        let mut changed = false;
        for setting in &mut self.settings {
            let overridden = overrides
                .iter()
                .find(|(key, _)| *key == setting.setting_type())
                .map(|(_, value)| value.clone());
            changed |= setting.set_overridden_value(overridden, outbox);
        }
        changed
    }

    pub fn set_loading(&mut self, keys: &[SettingType], loading: bool, outbox: &mut Outbox) {
        for setting in &mut self.settings {
            if keys.contains(&setting.setting_type()) {
                setting.set_loading(loading, outbox);
            }
        }
    }

    /// One top-to-bottom fixup pass.
    ///
    /// `metadata` is the last fetched metadata with the key it was fetched
    /// for. It is only shown to the provider while that key still matches
    /// the values fixed so far, so a stale directory never selects values.
    /// Returns true if any candidate list or local value changed.
    pub fn fixup(
        &mut self,
        provider: &dyn LayerProvider,
        session: &dyn EnsembleSession,
        metadata: Option<(&QueryKey, &LayerMetadata)>,
        outbox: &mut Outbox,
    ) -> bool {
        let mut fixed = SettingsSnapshot::default();
        let mut available_changed = false;
        let mut value_changed = false;

        for setting in &mut self.settings {
            let key = setting.setting_type();
            let current_metadata = metadata.and_then(|(stored_key, metadata)| {
                (provider.metadata_query(&fixed).as_ref() == Some(stored_key)).then_some(metadata)
            });
            let inputs = FixupInputs {
                session,
                metadata: current_metadata,
            };

            if let Some(available) = provider.available_values(key, &fixed, &inputs) {
                if setting.available_values() != available.as_slice() {
                    setting.set_available_values(available, outbox);
                    available_changed = true;
                }
                if !setting.is_local_value_available() {
                    let fallback = setting
                        .available_values()
                        .first()
                        .cloned()
                        .unwrap_or(SettingValue::Null);
                    if setting.local_value() != &fallback {
                        tracing::debug!("Fixup {} -> {}", key.label(), fallback);
                        setting.set_value(fallback, outbox);
                        value_changed = true;
                    }
                }
            }

            fixed.push(key, setting.value().clone());
        }

        if available_changed {
            outbox.post(&self.publisher, ContextTopic::AvailableSettingsChanged);
        }
        available_changed || value_changed
    }

    /// Compare current values with the cached snapshot.
    ///
    /// On a difference, posts REFETCH_REQUIRED when the provider asks for
    /// it, then SETTINGS_CHANGED, and caches the new snapshot.
    pub fn detect_change(&mut self, provider: &dyn LayerProvider, outbox: &mut Outbox) -> ChangeOutcome {
        let current = self.values();
        if current == self.cached {
            return ChangeOutcome::default();
        }
        let refetch_required = provider.refetch_required(&self.cached, &current);
        if refetch_required {
            outbox.post(&self.publisher, ContextTopic::RefetchRequired);
        }
        outbox.post(&self.publisher, ContextTopic::SettingsChanged);
        self.cached = current;
        ChangeOutcome {
            changed: true,
            refetch_required,
        }
    }
}

impl SnapshotSource<SettingsChanged> for SettingsContextDelegate {
    fn snapshot(&self) -> SettingsSnapshot {
        self.values()
    }
}

impl SnapshotSource<AvailableSettingsChanged> for SettingsContextDelegate {
    fn snapshot(&self) -> Vec<(SettingType, Vec<SettingValue>)> {
        self.settings
            .iter()
            .map(|s| (s.setting_type(), s.available_values().to_vec()))
            .collect()
    }
}
