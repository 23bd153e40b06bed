//! Fetch tokens: monotonic compare-and-discard.
//!
//! Every outgoing request is minted a token; only the response carrying
//! the most recently issued token of its class mutates state. This is the
//! sole concurrency-control mechanism in the subsystem: logical
//! cancellation, not locking. `poll` and `nav` are independent classes, so
//! a background poll cannot invalidate a navigation and vice versa.

/// Request class a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchClass {
    /// Background tail fetch, valid only on page 1.
    Poll,
    /// User-triggered page/page-size/app/level fetch.
    Nav,
}

impl std::fmt::Display for FetchClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Poll => f.write_str("poll"),
            Self::Nav => f.write_str("nav"),
        }
    }
}

/// Opaque sequence number minted per outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchToken {
    class: FetchClass,
    seq: u64,
}

impl FetchToken {
    #[must_use]
    pub fn class(&self) -> FetchClass {
        self.class
    }
}

/// Issues tokens and remembers the latest per class.
#[derive(Debug, Default)]
pub struct TokenLedger {
    next_seq: u64,
    latest_poll: Option<u64>,
    latest_nav: Option<u64>,
}

impl TokenLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next token for `class`, superseding any in-flight request
    /// of the same class.
    pub fn issue(&mut self, class: FetchClass) -> FetchToken {
        self.next_seq += 1;
        let seq = self.next_seq;
        match class {
            FetchClass::Poll => self.latest_poll = Some(seq),
            FetchClass::Nav => self.latest_nav = Some(seq),
        }
        FetchToken { class, seq }
    }

    /// Whether a response carrying `token` is still the latest of its
    /// class. A stale token means the response must be discarded without
    /// touching state.
    #[must_use]
    pub fn is_current(&self, token: FetchToken) -> bool {
        let latest = match token.class {
            FetchClass::Poll => self.latest_poll,
            FetchClass::Nav => self.latest_nav,
        };
        latest == Some(token.seq)
    }

    /// Invalidate all outstanding tokens of `class`, e.g. when polling
    /// stops on disconnect.
    pub fn invalidate(&mut self, class: FetchClass) {
        match class {
            FetchClass::Poll => self.latest_poll = None,
            FetchClass::Nav => self.latest_nav = None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
