//! Pairwise confirm aggregation for management primitives.
//!
//! Reset, scan and start requests fan out to both media and the two
//! asynchronous confirms must fold into exactly one upward result. The
//! aggregator holds the first status until the second arrives, then combines
//! them by rule.

use crate::types::Status;

/// How two per-medium statuses combine into the upward status
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CombineRule {
    /// Success only if both media succeeded; otherwise the first-received
    /// failure wins. Used for reset and start.
    AllMustSucceed,
    /// Success if either medium succeeded; otherwise the most recently
    /// received status wins. Used for scan.
    AnySucceeds,
}

/// Wait-for-second-confirm state for one management primitive.
///
/// Lives for the whole process; `begin` re-arms it for each new request.
/// The combined confirm does not clear the stored status, only `begin` does.
#[derive(Debug)]
pub struct ConfirmAggregator {
    rule: CombineRule,
    first: Option<Status>,
}

impl ConfirmAggregator {
    pub const fn new(rule: CombineRule) -> Self {
        Self { rule, first: None }
    }

    /// Start a new request; forget any stored confirm.
    pub fn begin(&mut self) {
        self.first = None;
    }

    /// Feed one per-medium confirm.
    ///
    /// Returns `None` while waiting for the partner confirm, and the
    /// combined status once both have arrived.
    pub fn on_confirm(&mut self, status: Status) -> Option<Status> {
        match self.first {
            None => {
                self.first = Some(status);
                None
            }
            Some(first) => Some(self.combine(first, status)),
        }
    }

    fn combine(&self, first: Status, second: Status) -> Status {
        match self.rule {
            CombineRule::AllMustSucceed => {
                if first == Status::Success && second == Status::Success {
                    Status::Success
                } else if first != Status::Success {
                    first
                } else {
                    second
                }
            }
            CombineRule::AnySucceeds => {
                if first == Status::Success || second == Status::Success {
                    Status::Success
                } else {
                    second
                }
            }
        }
    }
}
