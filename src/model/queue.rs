// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Slideshow queue management.
//!
//! This module provides state for the slideshow queue: an ordered list of
//! media items, unique by id, with a cursor pointing at the item currently
//! on screen. The cursor wraps around so the show loops endlessly.

use std::collections::HashSet;

use crate::model::{MediaId, MediaItem};

pub(crate) struct MediaQueue {
    items: Vec<MediaItem>,
    cursor: Option<usize>,
}

impl MediaQueue {
    pub(crate) fn new() -> Self {
        Self {
            items: Vec::new(),
            cursor: None,
        }
    }

    /// Replaces the queue contents and rewinds the cursor to before the
    /// first item. The first occurrence of a duplicated id wins.
    pub(crate) fn initialize(&mut self, items: Vec<MediaItem>) {
        let mut seen = HashSet::new();
        self.items = items.into_iter().filter(|item| seen.insert(item.id)).collect();
        self.cursor = None;
    }

    /// Inserts the items whose id is not already queued directly after the
    /// cursor, keeping their relative order. Returns how many were inserted.
    pub(crate) fn merge(&mut self, items: Vec<MediaItem>) -> usize {
        let mut seen: HashSet<MediaId> = self.ids();
        let fresh: Vec<MediaItem> = items.into_iter().filter(|item| seen.insert(item.id)).collect();

        let count = fresh.len();
        let at = self.cursor.map_or(0, |cursor| cursor + 1);
        self.items.splice(at..at, fresh);

        count
    }

    /// Removes the current item and steps the cursor back, so the next
    /// [`advance`](Self::advance) lands on the item that followed it.
    pub(crate) fn remove_current(&mut self) -> Option<MediaItem> {
        let cursor = self.cursor?;
        let removed = self.items.remove(cursor);
        self.cursor = cursor.checked_sub(1);

        Some(removed)
    }

    /// Moves the cursor to the next item, wrapping to the start. Returns the
    /// new index, or `None` when there is nothing to play.
    pub(crate) fn advance(&mut self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }

        let next = self.cursor.map_or(0, |cursor| (cursor + 1) % self.items.len());
        self.cursor = Some(next);

        Some(next)
    }

    pub(crate) fn current(&self) -> Option<&MediaItem> {
        self.cursor.and_then(|cursor| self.items.get(cursor))
    }

    pub(crate) fn current_mut(&mut self) -> Option<&mut MediaItem> {
        self.cursor.and_then(|cursor| self.items.get_mut(cursor))
    }

    pub(crate) fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn contains(&self, id: MediaId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub(crate) fn ids(&self) -> HashSet<MediaId> {
        self.items.iter().map(|item| item.id).collect()
    }

    pub(crate) fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// The items that will play after the current one, in order, wrapping
    /// around the end of the queue. Never yields the current item.
    pub(crate) fn upcoming(&self, limit: usize) -> Vec<&MediaItem> {
        let len = self.items.len();
        if len == 0 {
            return Vec::new();
        }

        let start = self.cursor.map_or(0, |cursor| cursor + 1);
        let available = if self.cursor.is_some() { len - 1 } else { len };

        (0..available.min(limit))
            .map(|offset| &self.items[(start + offset) % len])
            .collect()
    }
}
