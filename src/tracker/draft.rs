//! Auto-fill draft slot
//!
//! Holds the most recent lookup result for review. Every lookup takes a
//! ticket; only the newest ticket may write the slot, so a slow response
//! can't overwrite a newer one.

use serde::Serialize;

use crate::models::FoodItemDraft;

/// Identifies one lookup request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct DraftSlot {
    issued: u64,
    in_flight: Option<u64>,
    draft: Option<FoodItemDraft>,
}

impl DraftSlot {
    /// Start a request. Any request still in flight becomes stale.
    pub fn begin(&mut self) -> RequestTicket {
        self.issued += 1;
        self.in_flight = Some(self.issued);
        RequestTicket(self.issued)
    }

    /// Whether a lookup is outstanding
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether `ticket` is the newest request issued
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Store a successful result. Returns false, leaving the slot untouched,
    /// when the ticket is stale.
    pub fn complete(&mut self, ticket: RequestTicket, draft: FoodItemDraft) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.in_flight = None;
        self.draft = Some(draft);
        true
    }

    /// Record a failed request. Returns false when the ticket is stale.
    pub fn fail(&mut self, ticket: RequestTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.in_flight = None;
        true
    }

    pub fn draft(&self) -> Option<&FoodItemDraft> {
        self.draft.as_ref()
    }

    pub fn clear(&mut self) {
        self.draft = None;
    }
}
