//! Bounded pool of in-flight data requests.
//!
//! Each accepted send occupies one slot until exactly one upward confirm has
//! been produced for it. The pool is a fixed arena; handles carry the slot
//! generation so a handle kept across a release cannot touch the slot's next
//! occupant.

use log::trace;

use crate::types::{DataRequest, MediaPolicy, Status};

/// Number of concurrently outstanding data requests
pub const DATA_REQUEST_QUEUE_SIZE: usize = 2;

/// Validated reference to an in-flight request slot
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlotHandle {
    index: u8,
    generation: u16,
}

/// State of one outstanding send
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveRequest {
    /// Accepted request parameters, payload owned
    pub request: DataRequest,
    /// Effective policy (broadcast requests are overridden to `Both`)
    pub policy: MediaPolicy,
    /// First of two confirms when waiting on both media
    pub first_confirm_status: Option<Status>,
    /// Acceptance time in ms, for the optional expiry sweep
    pub accepted_at: u64,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u16,
    active: Option<ActiveRequest>,
}

/// Fixed-capacity arena of request slots
#[derive(Debug, Default)]
pub struct RequestSlotPool {
    slots: [Slot; DATA_REQUEST_QUEUE_SIZE],
}

impl RequestSlotPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a free slot for an accepted request.
    ///
    /// Returns `None` when every slot is occupied; the caller reports queue
    /// exhaustion upward, no request state is stored.
    pub fn acquire(
        &mut self,
        request: DataRequest,
        policy: MediaPolicy,
        now: u64,
    ) -> Option<SlotHandle> {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.active.is_none() {
                trace!("Using free request slot {}", index);
                slot.active = Some(ActiveRequest {
                    request,
                    policy,
                    first_confirm_status: None,
                    accepted_at: now,
                });
                return Some(SlotHandle {
                    index: index as u8,
                    generation: slot.generation,
                });
            }
        }

        None
    }

    /// Free a slot, returning its state.
    ///
    /// A stale handle (generation mismatch or already released) is refused.
    pub fn release(&mut self, handle: SlotHandle) -> Option<ActiveRequest> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }

        let active = slot.active.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        Some(active)
    }

    /// Locate the slot whose outgoing request carried `msdu_handle`
    pub fn find_by_msdu_handle(&self, msdu_handle: u8) -> Option<SlotHandle> {
        self.slots.iter().enumerate().find_map(|(index, slot)| {
            slot.active
                .as_ref()
                .filter(|a| a.request.msdu_handle == msdu_handle)
                .map(|_| SlotHandle {
                    index: index as u8,
                    generation: slot.generation,
                })
        })
    }

    /// Access an in-flight request, refusing stale handles
    pub fn get_mut(&mut self, handle: SlotHandle) -> Option<&mut ActiveRequest> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.active.as_mut()
    }

    /// Oldest slot that has waited longer than `timeout_ms` at `now`
    pub fn next_expired(&self, now: u64, timeout_ms: u64) -> Option<SlotHandle> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.active.as_ref().map(|a| (index, slot.generation, a.accepted_at))
            })
            .filter(|(_, _, accepted_at)| now.saturating_sub(*accepted_at) > timeout_ms)
            .min_by_key(|(_, _, accepted_at)| *accepted_at)
            .map(|(index, generation, _)| SlotHandle {
                index: index as u8,
                generation,
            })
    }

    /// Number of occupied slots
    pub fn in_use(&self) -> usize {
        self.slots.iter().filter(|s| s.active.is_some()).count()
    }
}
