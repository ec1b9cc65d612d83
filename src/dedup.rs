//! Cross-medium duplicate suppression.
//!
//! A frame relayed over both media must reach the upper layer once. Each
//! accepted frame leaves a fingerprint record; a later frame matching an
//! existing record from the *other* medium is a duplicate and is dropped.
//! The same frame seen twice on one medium is not suppressed, that is the
//! medium's own retransmission behaviour and not ours to filter.

use log::trace;

use heapless::Vec;

use crate::crc;
use crate::types::{Address, Medium, ShortAddress};

/// Capacity of the most-recently-seen table
pub const DUPLICATES_TABLE_SIZE: usize = 3;

#[derive(Clone, Debug, PartialEq)]
struct DuplicateRecord {
    src_addr: ShortAddress,
    msdu_len: u16,
    crc: u16,
    medium: Medium,
}

/// Bounded most-recently-seen-first table of received frame fingerprints.
///
/// Entries are only ever displaced by newer ones; there is no explicit
/// deletion.
#[derive(Debug, Default)]
pub struct DuplicateSuppressor {
    entries: Vec<DuplicateRecord, DUPLICATES_TABLE_SIZE>,
}

impl DuplicateSuppressor {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check an incoming frame against recent history.
    ///
    /// Returns true if the same frame already arrived via the other medium,
    /// in which case the caller must drop the indication. Broadcast
    /// destinations are never suppressed: duplicates across media are
    /// expected and wanted there.
    pub fn is_duplicate(
        &mut self,
        dst_addr: &Address,
        src_addr: ShortAddress,
        msdu: &[u8],
        medium: Medium,
    ) -> bool {
        if matches!(dst_addr, Address::Short(_, s) if *s == ShortAddress::broadcast()) {
            return false;
        }

        let fingerprint = crc::fingerprint(msdu);
        let msdu_len = msdu.len() as u16;

        let duplicate = self.entries.iter().any(|e| {
            e.src_addr == src_addr
                && e.msdu_len == msdu_len
                && e.crc == fingerprint
                && e.medium != medium
        });

        if duplicate {
            trace!(
                "Frame from {:?} ({} bytes) already seen on {:?}",
                src_addr,
                msdu_len,
                medium.other()
            );
            return true;
        }

        // Not seen before, record it at the front, dropping the oldest
        if self.entries.is_full() {
            self.entries.pop();
        }
        let _ = self.entries.insert(
            0,
            DuplicateRecord {
                src_addr,
                msdu_len,
                crc: fingerprint,
                medium,
            },
        );

        false
    }
}
