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

//! Background feed refresh and queue merging.
//!
//! The [`FetchAgent`] pulls the newest page of the feed and splices the items
//! the queue has never seen in right after the playing item. At most one
//! refresh is outstanding; a refresh requested while another is in flight is
//! dropped, not queued. Failures are logged and forgotten, the next
//! checkpoint simply asks again.

use tracing::{debug, info, warn};

use crate::{
    model::{FeedPage, FeedQuery, queue::MediaQueue},
    slideshow::{FeedPort, FeedPurpose, FeedRequest},
};

pub(crate) struct FetchAgent {
    limit: usize,
    in_flight: bool,
}

impl FetchAgent {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            limit,
            in_flight: false,
        }
    }

    pub(crate) fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Issues a refresh request unless one is already pending. Returns
    /// whether a request was sent.
    pub(crate) fn refresh(&mut self, port: &mut impl FeedPort, epoch: u64) -> bool {
        if self.in_flight {
            debug!("Refresh already in flight, skipping");
            return false;
        }

        self.in_flight = true;
        port.request_feed(FeedRequest {
            purpose: FeedPurpose::Refresh,
            query: FeedQuery::newest(self.limit),
            epoch,
        });

        true
    }

    /// Completes the pending refresh, merging unseen items into `queue`.
    /// Returns the number of items added.
    pub(crate) fn complete(&mut self, queue: &mut MediaQueue, result: Result<FeedPage, String>) -> usize {
        self.in_flight = false;

        match result {
            Ok(page) => {
                let known = queue.ids();
                let fresh: Vec<_> = page.items.into_iter().filter(|item| !known.contains(&item.id)).collect();

                let added = queue.merge(fresh);
                if added > 0 {
                    info!(added, queue_len = queue.len(), "Merged new feed items");
                }

                added
            }
            Err(e) => {
                warn!(error = %e, "Feed refresh failed");
                0
            }
        }
    }

    /// Forgets any pending request; its response will be discarded by epoch.
    pub(crate) fn reset(&mut self) {
        self.in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::queue::tests::photo;

    #[derive(Default)]
    struct RecordingPort {
        requests: Vec<FeedRequest>,
    }

    impl FeedPort for RecordingPort {
        fn request_feed(&mut self, request: FeedRequest) {
            self.requests.push(request);
        }
    }

    fn page(ids: &[i64]) -> FeedPage {
        FeedPage {
            items: ids.iter().map(|id| photo(*id)).collect(),
            next_cursor: None,
        }
    }

    #[test]
    fn concurrent_refreshes_issue_one_request() {
        let mut agent = FetchAgent::new(20);
        let mut port = RecordingPort::default();

        assert!(agent.refresh(&mut port, 3));
        assert!(!agent.refresh(&mut port, 3));

        assert_eq!(port.requests.len(), 1);
        let request = &port.requests[0];
        assert_eq!(request.purpose, FeedPurpose::Refresh);
        assert_eq!(request.query, FeedQuery::newest(20));
        assert_eq!(request.epoch, 3);
    }

    #[test]
    fn completion_allows_next_refresh() {
        let mut agent = FetchAgent::new(20);
        let mut port = RecordingPort::default();
        let mut queue = MediaQueue::new();

        agent.refresh(&mut port, 0);
        agent.complete(&mut queue, Ok(FeedPage::default()));
        agent.refresh(&mut port, 0);

        assert_eq!(port.requests.len(), 2);
    }

    #[test]
    fn merges_only_unseen_items_after_cursor() {
        let mut agent = FetchAgent::new(20);
        let mut port = RecordingPort::default();
        let mut queue = MediaQueue::new();
        queue.initialize(vec![photo(1), photo(2), photo(3)]);
        queue.advance();

        agent.refresh(&mut port, 0);
        let added = agent.complete(&mut queue, Ok(page(&[5, 3, 4, 1])));

        assert_eq!(added, 2);
        let ids: Vec<i64> = queue.items().iter().map(|item| item.id.0).collect();
        assert_eq!(ids, vec![1, 5, 4, 2, 3]);
    }

    #[test]
    fn failure_is_swallowed_and_clears_flag() {
        let mut agent = FetchAgent::new(20);
        let mut port = RecordingPort::default();
        let mut queue = MediaQueue::new();
        queue.initialize(vec![photo(1)]);

        agent.refresh(&mut port, 0);
        let added = agent.complete(&mut queue, Err("connection refused".to_string()));

        assert_eq!(added, 0);
        assert!(!agent.in_flight());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn reset_clears_in_flight_flag() {
        let mut agent = FetchAgent::new(20);
        let mut port = RecordingPort::default();

        agent.refresh(&mut port, 0);
        agent.reset();

        assert!(!agent.in_flight());
        assert!(agent.refresh(&mut port, 1));
    }
}
