//! Threat feed items and the visible feed list
//!
//! The feed is the only log the dashboard keeps. It holds what is on
//! screen and nothing more: older entries fall off the end.

use super::{Id, Severity};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of items kept in the visible feed
pub const FEED_CAPACITY: usize = 10;

/// Source tags used by the dashboard's own components
pub mod sources {
    pub const TERMINAL: &str = "TERMINAL";
    pub const SYSTEM: &str = "SYSTEM";
    pub const COMM_SEC: &str = "COMM-SEC";
    pub const CLIPBOARD: &str = "CLIPBOARD";
    pub const TOOL_EXEC: &str = "TOOL-EXEC";
}

/// A single line in the threat feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: Id,
    pub timestamp: DateTime<Local>,
    pub source: String,
    pub message: String,
    pub severity: Severity,
}

impl FeedItem {
    pub fn new(
        timestamp: DateTime<Local>,
        source: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            id: Id::new(),
            timestamp,
            source: source.into(),
            message: message.into(),
            severity,
        }
    }

    /// Timestamp as shown in the feed panel
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format("%m/%d/%Y, %H:%M:%S").to_string()
    }
}

/// The visible feed, newest first
#[derive(Debug, Clone, Default)]
pub struct Feed {
    items: VecDeque<FeedItem>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an item and drop whatever no longer fits
    pub fn push(&mut self, item: FeedItem) {
        self.items.push_front(item);
        self.trim();
    }

    fn trim(&mut self) {
        self.items.truncate(FEED_CAPACITY);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Newest item, if any
    pub fn latest(&self) -> Option<&FeedItem> {
        self.items.front()
    }

    /// Items newest-first
    pub fn iter(&self) -> impl Iterator<Item = &FeedItem> {
        self.items.iter()
    }

    /// Items from a given source, newest-first
    pub fn from_source<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a FeedItem> + 'a {
        self.items.iter().filter(move |item| item.source == source)
    }
}
