//! Capability seams between the coordinator and its collaborators.
//!
//! Each medium MAC instance implements [`MediumMac`]; the layer above
//! implements [`Notifications`]. Both media expose an identical primitive
//! set, the coordinator never needs to know which chip is behind a seam.

use crate::types::*;

/// Event surfaced by a medium MAC from its event processing.
///
/// Events are produced synchronously while the medium is polled and carry
/// owned data, nothing in them borrows from the medium.
#[derive(Clone, Debug, PartialEq)]
pub enum MacEvent {
    DataConfirm(DataConfirm),
    DataIndication(DataIndication),
    GetConfirm(GetConfirm),
    SetConfirm(SetConfirm),
    ResetConfirm(ResetConfirm),
    ScanConfirm(ScanConfirm),
    StartConfirm(StartConfirm),
    BeaconNotify(BeaconNotifyIndication),
    CommStatus(CommStatusIndication),
    Sniffer(SnifferIndication),
}

/// Capability interface required identically from each medium MAC instance.
///
/// Send-type primitives are asynchronous, completion arrives later as the
/// matching confirm event. The synchronous PIB accessors query in-memory
/// medium state and complete within the call.
pub trait MediumMac {
    /// Request transmission of an MSDU; completion arrives as
    /// [`MacEvent::DataConfirm`] carrying the request's handle
    fn data_request(&mut self, request: &DataRequest);

    /// Read a PIB attribute asynchronously
    fn get_request(&mut self, attribute: u32, index: u16);

    /// Read a PIB attribute from in-memory state
    fn get_request_sync(&mut self, attribute: u32, index: u16) -> Result<PibValue, Status>;

    /// Write a PIB attribute asynchronously
    fn set_request(&mut self, attribute: u32, index: u16, value: &PibValue);

    /// Write a PIB attribute to in-memory state
    fn set_request_sync(&mut self, attribute: u32, index: u16, value: &PibValue)
        -> Result<(), Status>;

    /// Reset the MAC sublayer, optionally restoring PIB defaults
    fn reset_request(&mut self, set_default_pib: bool);

    /// Scan for PANs for `duration` seconds
    fn scan_request(&mut self, duration: u16);

    /// Start a PAN with the given identifier
    fn start_request(&mut self, pan_id: PanId);

    /// Drive the medium's own event processing and return the next pending
    /// event, if any
    fn poll(&mut self) -> Option<MacEvent>;

    /// Number of entries in this medium's neighbour table
    fn neighbour_table_size(&self) -> u16 {
        0
    }
}

/// Upward notification surface.
///
/// Every method has an empty default body: an implementation overrides only
/// the events it cares about, anything unhandled is silently dropped after
/// the coordinator's own bookkeeping has run.
pub trait Notifications {
    /// Exactly one data confirm per accepted request, tagged with how the
    /// result was obtained
    fn data_confirm(&mut self, _confirm: &DataConfirm, _media: MediaType) {}

    /// Received frame, delivered at most once across both media
    fn data_indication(&mut self, _indication: &DataIndication, _medium: Medium) {}

    fn get_confirm(&mut self, _confirm: &GetConfirm, _medium: Medium) {}

    fn set_confirm(&mut self, _confirm: &SetConfirm, _medium: Medium) {}

    /// Combined result of a reset on both media
    fn reset_confirm(&mut self, _confirm: &ResetConfirm) {}

    /// Combined result of a scan on both media
    fn scan_confirm(&mut self, _confirm: &ScanConfirm) {}

    /// Combined result of a start on both media
    fn start_confirm(&mut self, _confirm: &StartConfirm) {}

    fn beacon_notify(&mut self, _indication: &BeaconNotifyIndication, _medium: Medium) {}

    fn comm_status(&mut self, _indication: &CommStatusIndication, _medium: Medium) {}

    fn sniffer_indication(&mut self, _indication: &SnifferIndication, _medium: Medium) {}
}

#[cfg(any(test, feature = "mocks"))]
pub mod mock {
    use std::collections::VecDeque;
    use std::vec::Vec;

    use super::*;
    use crate::pib;

    /// Scripted medium MAC to assist with testing.
    ///
    /// Records every request it receives and plays back queued events from
    /// `poll`. Synchronous POS-table reads answer from `pos_neighbours`.
    #[derive(Debug)]
    pub struct MockMac {
        pub medium: Medium,

        pub sent: Vec<DataRequest>,
        pub gets: Vec<(u32, u16)>,
        pub sets: Vec<(u32, u16, PibValue)>,
        pub resets: Vec<bool>,
        pub scans: Vec<u16>,
        pub starts: Vec<PanId>,

        /// Short addresses with a POS table entry on this medium
        pub pos_neighbours: Vec<ShortAddress>,
        /// Reported neighbour table size
        pub neighbours: u16,

        events: VecDeque<MacEvent>,
    }

    impl MockMac {
        pub fn new(medium: Medium) -> Self {
            Self {
                medium,
                sent: Vec::new(),
                gets: Vec::new(),
                sets: Vec::new(),
                resets: Vec::new(),
                scans: Vec::new(),
                starts: Vec::new(),
                pos_neighbours: Vec::new(),
                neighbours: 0,
                events: VecDeque::new(),
            }
        }

        /// Queue an event for the next `poll`
        pub fn push_event(&mut self, event: MacEvent) {
            self.events.push_back(event);
        }
    }

    impl MediumMac for MockMac {
        fn data_request(&mut self, request: &DataRequest) {
            self.sent.push(request.clone());
        }

        fn get_request(&mut self, attribute: u32, index: u16) {
            self.gets.push((attribute, index));
        }

        fn get_request_sync(&mut self, attribute: u32, index: u16) -> Result<PibValue, Status> {
            self.gets.push((attribute, index));

            let is_pos = attribute == pib::PIB_MANUF_POS_TABLE_ELEMENT_PLC
                || attribute == pib::PIB_MANUF_POS_TABLE_ELEMENT_RF;
            if is_pos && !self.pos_neighbours.contains(&ShortAddress(index)) {
                return Err(Status::InvalidIndex);
            }

            Ok(PibValue::new())
        }

        fn set_request(&mut self, attribute: u32, index: u16, value: &PibValue) {
            self.sets.push((attribute, index, value.clone()));
        }

        fn set_request_sync(
            &mut self,
            attribute: u32,
            index: u16,
            value: &PibValue,
        ) -> Result<(), Status> {
            self.sets.push((attribute, index, value.clone()));
            Ok(())
        }

        fn reset_request(&mut self, set_default_pib: bool) {
            self.resets.push(set_default_pib);
        }

        fn scan_request(&mut self, duration: u16) {
            self.scans.push(duration);
        }

        fn start_request(&mut self, pan_id: PanId) {
            self.starts.push(pan_id);
        }

        fn poll(&mut self) -> Option<MacEvent> {
            self.events.pop_front()
        }

        fn neighbour_table_size(&self) -> u16 {
            self.neighbours
        }
    }
}
