use strataview_core::constants::DEFAULT_READOUT_MAX_ITEMS;

use crate::geometry::Point2;

/// One hit as shown in the readout box.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadoutItem {
    pub color: String,
    pub label: String,
    pub md: Option<f64>,
    pub polygon_index: Option<usize>,
    pub property: Option<f64>,
    pub point: Point2,
}

impl ReadoutItem {
    /// Text lines of the item: label, then measured depth, polygon index and
    /// property value when present, then the coordinates.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.label.clone()];
        if let Some(md) = self.md {
            lines.push(format!("MD: {:.2}", md));
        }
        if let Some(index) = self.polygon_index {
            lines.push(format!("Polygon index: {}", index));
        }
        if let Some(property) = self.property {
            lines.push(format!("Property value: {:.2}", property));
        }
        lines.push(format!("X: {:.2}, Y: {:.2}", self.point.x, self.point.y));
        lines
    }
}

/// A rendered row of the readout box.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadoutEntry {
    pub color: String,
    pub lines: Vec<String>,
}

/// Lists the first hits under the pointer and summarises the rest.
#[derive(Debug, Clone)]
pub struct ReadoutOverlay {
    max_items: usize,
    items: Vec<ReadoutItem>,
}

impl ReadoutOverlay {
    pub fn new(max_items: usize) -> Self {
        Self {
            max_items,
            items: Vec::new(),
        }
    }

    pub fn set_items(&mut self, items: Vec<ReadoutItem>) {
        self.items = items;
    }

    pub fn items(&self) -> &[ReadoutItem] {
        &self.items
    }

    /// Hidden while there is nothing under the pointer.
    pub fn is_visible(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn entries(&self) -> Vec<ReadoutEntry> {
        self.items
            .iter()
            .take(self.max_items)
            .map(|item| ReadoutEntry {
                color: item.color.clone(),
                lines: item.lines(),
            })
            .collect()
    }

    /// "... and k more" when hits were left out.
    pub fn summary(&self) -> Option<String> {
        let hidden = self.items.len().saturating_sub(self.max_items);
        (hidden > 0).then(|| format!("... and {} more", hidden))
    }

    /// Whole readout as plain text, one line per row.
    pub fn text(&self) -> String {
        let mut lines: Vec<String> = self
            .entries()
            .into_iter()
            .flat_map(|entry| entry.lines)
            .collect();
        lines.extend(self.summary());
        lines.join("\n")
    }
}

impl Default for ReadoutOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_READOUT_MAX_ITEMS)
    }
}
