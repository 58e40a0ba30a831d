//! Readout box and highlight markers.
//!
//! Both overlays are pure functions of the latest hit list handed to them:
//! every new list replaces the previous one wholesale.

mod highlight;
mod readout;

pub use highlight::{HighlightItem, HighlightMarker, HighlightOverlay, HighlightShape};
pub use readout::{ReadoutEntry, ReadoutItem, ReadoutOverlay};
