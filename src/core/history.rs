// File: src/core/history.rs
use crate::core::types::ConfigurationOptions;
use std::collections::VecDeque;

/// Undo stack of configurations that were replaced.
#[derive(Debug, Clone, Default)]
pub struct ConfigHistory {
    /// Oldest first.
    snapshots: VecDeque<ConfigurationOptions>,
    limit: Option<usize>,
}

impl ConfigHistory {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            snapshots: VecDeque::new(),
            limit,
        }
    }

    /// Snapshots `current` before a new configuration is applied.
    /// When a limit is set and reached, the oldest snapshot is discarded.
    pub fn push(&mut self, current: &ConfigurationOptions) {
        if let Some(limit) = self.limit {
            if limit == 0 {
                return;
            }
            if self.snapshots.len() == limit {
                self.snapshots.pop_front();
            }
        }
        self.snapshots.push_back(current.clone());
    }

    pub fn pop(&mut self) -> Option<ConfigurationOptions> {
        self.snapshots.pop_back()
    }

    /// Puts a popped snapshot back, e.g. after the undo it was for failed.
    pub fn restore(&mut self, snapshot: ConfigurationOptions) {
        self.snapshots.push_back(snapshot);
    }

    pub fn peek(&self) -> Option<&ConfigurationOptions> {
        self.snapshots.back()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
