//! Presentation state that depends only on the page, not on the order.

use std::collections::HashSet;

use crate::OrderType;

/// Vertical scroll offsets (in CSS pixels) that switch page chrome styles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollThresholds {
    /// Offset past which the navbar switches to its compact style
    pub compact_navbar_px: f64,
    /// Offset past which the back-to-top control is shown
    pub back_to_top_px: f64,
}

impl Default for ScrollThresholds {
    fn default() -> Self {
        Self {
            compact_navbar_px: 40.0,
            back_to_top_px: 450.0,
        }
    }
}

/// Chrome styles derived from a single scroll offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollEffects {
    pub compact_navbar: bool,
    pub show_back_to_top: bool,
}

impl ScrollEffects {
    pub fn at(offset: f64, thresholds: &ScrollThresholds) -> Self {
        Self {
            compact_navbar: offset > thresholds.compact_navbar_px,
            show_back_to_top: offset > thresholds.back_to_top_px,
        }
    }
}

/// One card's visibility as reported by the viewport observer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardVisibility {
    pub card: usize,
    pub intersecting: bool,
}

/// Tracks which cards have already played their reveal animation.
///
/// Reveal is one-shot: a card is reported at most once no matter how many
/// intersection events arrive for it.
#[derive(Debug, Default)]
pub struct RevealTracker {
    revealed: HashSet<usize>,
}

impl RevealTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a card revealed. Returns false if it already was.
    pub fn mark(&mut self, card: usize) -> bool {
        self.revealed.insert(card)
    }

    /// Cards in `entries` that became visible for the first time, in report order
    pub fn observe(&mut self, entries: &[CardVisibility]) -> Vec<usize> {
        entries
            .iter()
            .filter(|entry| entry.intersecting)
            .filter_map(|entry| self.mark(entry.card).then_some(entry.card))
            .collect()
    }

    #[cfg(test)]
    pub fn is_revealed(&self, card: usize) -> bool {
        self.revealed.contains(&card)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }
}

/// Map an Alt+digit key press to the order type it selects
pub fn shortcut_for(alt_key: bool, key: &str) -> Option<OrderType> {
    if !alt_key {
        return None;
    }
    match key {
        "1" => Some(OrderType::DineIn),
        "2" => Some(OrderType::TakeAway),
        _ => None,
    }
}
