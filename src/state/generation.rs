use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Independent streams of requests whose responses may arrive out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestChannel {
    /// Loading the next question or a deck
    Question,
    /// Translating the displayed question
    Translation,
    /// Checking an answer or re-fetching a verdict
    Verdict,
    Hints,
    Browse,
}

impl RequestChannel {
    const COUNT: usize = 5;

    fn slot(self) -> usize {
        match self {
            RequestChannel::Question => 0,
            RequestChannel::Translation => 1,
            RequestChannel::Verdict => 2,
            RequestChannel::Hints => 3,
            RequestChannel::Browse => 4,
        }
    }
}

/// Generation stamp handed out when a request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    pub channel: RequestChannel,
    pub generation: u64,
}

/// Hands out monotonically increasing generation tokens per request channel.
///
/// Only a response carrying the latest token of its channel may be applied to the
/// state; anything older was superseded by a newer request or an invalidation
/// (navigation, language switch, session reset).
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    generations: Arc<[AtomicU64; RequestChannel::COUNT]>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request on `channel`, superseding any request still in flight.
    pub fn issue(&self, channel: RequestChannel) -> RequestToken {
        let generation = self.generations[channel.slot()].fetch_add(1, Ordering::SeqCst) + 1;
        RequestToken {
            channel,
            generation,
        }
    }

    /// Whether `token` is still the latest request of its channel.
    pub fn is_current(&self, token: &RequestToken) -> bool {
        self.generations[token.channel.slot()].load(Ordering::SeqCst) == token.generation
    }

    /// Make every in-flight request on `channel` stale.
    pub fn invalidate(&self, channel: RequestChannel) {
        self.generations[channel.slot()].fetch_add(1, Ordering::SeqCst);
    }

    /// Make every in-flight request stale, on all channels.
    pub fn invalidate_all(&self) {
        for generation in self.generations.iter() {
            generation.fetch_add(1, Ordering::SeqCst);
        }
    }
}
