//! In-memory event source
//!
//! Replays a prepared list of events, optionally interleaved with failures,
//! behind the same [`LseSource`] seam a decoder would use.

use std::collections::VecDeque;
use thiserror::Error;

use crate::lse::{LseEvent, LseHeader, LseSource};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("Injected failure: {0}")]
    Injected(String),
}

#[derive(Debug, Default)]
pub struct ReplaySource {
    header: LseHeader,
    queue: VecDeque<Result<LseEvent, ReplayError>>,
}

impl ReplaySource {
    pub fn new(header: LseHeader) -> Self {
        Self {
            header,
            queue: VecDeque::new(),
        }
    }

    /// Source that replays `events` in order; the header's event count is
    /// taken from the list
    pub fn from_events(run_id: u32, events: impl IntoIterator<Item = LseEvent>) -> Self {
        let queue: VecDeque<_> = events.into_iter().map(Ok).collect();
        let header = LseHeader {
            event_count: queue.len() as u64,
            run_id,
            ..LseHeader::default()
        };
        Self { header, queue }
    }

    pub fn push(&mut self, event: LseEvent) {
        self.queue.push_back(Ok(event));
    }

    /// Queue a failure at the current end of the replay
    pub fn push_failure(&mut self, message: impl Into<String>) {
        self.queue
            .push_back(Err(ReplayError::Injected(message.into())));
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl LseSource for ReplaySource {
    type Error = ReplayError;

    fn read_event(&mut self) -> Result<Option<LseEvent>, Self::Error> {
        self.queue.pop_front().transpose()
    }

    fn header(&self) -> &LseHeader {
        &self.header
    }
}
