//! # Poll Directory Service
//!
//! Feed browsing, poll creation and deletion, and results lookup on top of a
//! [`PollDirectoryGateway`].

use parking_lot::RwLock;
use shared_types::{PollDetails, PollId, PollResults, PollView};
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::{PollDraft, PollFeed, PollListQuery};
use crate::error::{DirectoryError, DirectoryResult};
use crate::ports::PollDirectoryGateway;

pub struct PollDirectory<G: PollDirectoryGateway> {
    gateway: Arc<G>,
    feed: RwLock<PollFeed>,
}

impl<G: PollDirectoryGateway> PollDirectory<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            feed: RwLock::new(PollFeed::new(PollListQuery::default())),
        }
    }

    /// Snapshot of the loaded feed.
    pub fn feed(&self) -> PollFeed {
        self.feed.read().clone()
    }

    /// Switch the feed to `query` and load its first page.
    ///
    /// Already loaded pages are kept when only the page number differs.
    pub async fn load(&self, query: PollListQuery) -> DirectoryResult<PollFeed> {
        let needs_first_page = {
            let mut feed = self.feed.write();
            feed.reset(query);
            feed.loaded_page() == 0
        };
        if needs_first_page {
            self.load_more().await?;
        }
        Ok(self.feed())
    }

    /// Fetch the next page. Returns `false` when nothing was appended.
    pub async fn load_more(&self) -> DirectoryResult<bool> {
        let next = self.feed.read().next_request();
        let Some(request) = next else {
            debug!("feed exhausted");
            return Ok(false);
        };

        let page = self.gateway.list_polls(&request).await?;
        let count = page.polls.len();
        let applied = self.feed.write().apply_page(&request, page);
        if applied {
            debug!(page = request.page, count, "feed page loaded");
        }
        Ok(applied)
    }

    /// Validate `draft` and publish it. The feed starts over so the new poll
    /// shows up on the next load.
    pub async fn create_poll(&self, draft: &PollDraft) -> DirectoryResult<PollDetails> {
        let request = draft.to_request().map_err(DirectoryError::InvalidDraft)?;
        let created = self.gateway.create_poll(request).await?;
        info!(poll_id = %created.poll_id, title = %created.title, "poll created");

        let query = self.feed.read().query().clone();
        *self.feed.write() = PollFeed::new(query);
        Ok(created)
    }

    pub async fn delete_poll(&self, poll_id: PollId) -> DirectoryResult<()> {
        self.gateway
            .delete_poll(poll_id)
            .await
            .map_err(|e| DirectoryError::for_poll(poll_id, e))?;
        info!(%poll_id, "poll deleted");

        let query = self.feed.read().query().clone();
        *self.feed.write() = PollFeed::new(query);
        Ok(())
    }

    pub async fn poll(&self, poll_id: PollId) -> DirectoryResult<PollView> {
        self.gateway
            .get_poll(poll_id)
            .await
            .map_err(|e| DirectoryError::for_poll(poll_id, e))
    }

    /// Results of a poll. A poll nobody voted on yet has zero tallies.
    pub async fn results(&self, poll_id: PollId) -> DirectoryResult<PollResults> {
        Ok(self.poll(poll_id).await?.results_or_empty())
    }
}
