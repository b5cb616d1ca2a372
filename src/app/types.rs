//! Type definitions for the application state.
//!
//! - [`Focus`] - Which UI component has focus
//! - [`StatusLine`] - Transient status/error line
//! - [`DeliveredIds`] - Recently applied message ids

use std::collections::{HashSet, VecDeque};

/// Represents which UI component has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The screen's list (channels, messages or replies)
    #[default]
    List,
    Composer,
}

/// Longest composer input, in characters.
pub const COMPOSER_MAX_CHARS: usize = 4_000;

/// Ticks a status line stays visible (100 ms per tick).
pub const STATUS_TTL_TICKS: u64 = 50;

/// A transient line shown above the key hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
    /// Tick after which the line is dropped
    pub expires_at: u64,
}

impl StatusLine {
    pub fn info(text: impl Into<String>, now: u64) -> Self {
        Self {
            text: text.into(),
            is_error: false,
            expires_at: now + STATUS_TTL_TICKS,
        }
    }

    pub fn error(text: impl Into<String>, now: u64) -> Self {
        Self {
            is_error: true,
            ..Self::info(text, now)
        }
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}

/// Ids of messages already folded into the app state, oldest evicted first.
///
/// A sent message arrives twice (send result and socket echo), possibly
/// after the screen that showed it is gone.
#[derive(Debug, Clone)]
pub struct DeliveredIds {
    order: VecDeque<String>,
    ids: HashSet<String>,
    capacity: usize,
}

impl DeliveredIds {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            ids: HashSet::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Record `id`. Returns false when it was already recorded.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.ids.remove(&oldest);
            }
        }
        self.order.push_back(id.to_string());
        self.ids.insert(id.to_string());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
