//! Settings: typed values and the per-setting delegate.

mod delegate;
mod value;

pub use delegate::{
    AvailableValuesChanged, LoadingStateChanged, OverriddenChanged, SettingDelegate, SettingTopic,
    ValueChanged,
};
pub use value::{time_or_interval_label, EnsembleIdent, SettingType, SettingValue, NO_TIME};
