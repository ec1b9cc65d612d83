//! The hybrid coordinator.
//!
//! Owns both medium MAC instances and presents them as one logical MAC:
//! outgoing data requests are placed into a bounded slot pool and issued per
//! their media policy, per-medium confirms drive each slot's completion or
//! backup retry, received frames are duplicate-filtered across media, and
//! management primitives fan out to both media with their confirms folded
//! into one.
//!
//! Single-threaded and poll-driven: `poll` drains each medium's pending
//! events and dispatches them synchronously, nothing here blocks except the
//! in-memory POS-table lookup used for backup-viability checks.

use log::{debug, error, info, trace, warn};

use crate::aggregate::{CombineRule, ConfirmAggregator};
use crate::dedup::DuplicateSuppressor;
use crate::mac::{MacEvent, MediumMac, Notifications};
use crate::pib;
use crate::slot::{RequestSlotPool, SlotHandle};
use crate::timer::Timer;
use crate::types::*;

/// Coordinator configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Expire a slot whose confirm never arrives after this many
    /// milliseconds, reporting `TransactionExpired` upward.
    ///
    /// `None` keeps the legacy behaviour: a lost confirm occupies its slot
    /// forever.
    pub data_confirm_timeout_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_confirm_timeout_ms: None,
        }
    }
}

/// Hybrid abstraction layer coordinator.
///
/// Generic over the PLC medium (P), RF medium (R), upward notification
/// surface (N) and timer (T).
pub struct Coordinator<P, R, N, T> {
    config: Config,

    plc: P,
    rf: R,
    notifications: N,
    timer: T,

    slots: RequestSlotPool,
    dedup: DuplicateSuppressor,

    reset: ConfirmAggregator,
    scan: ConfirmAggregator,
    start: ConfirmAggregator,
}

impl<P, R, N, T> Coordinator<P, R, N, T>
where
    P: MediumMac,
    R: MediumMac,
    N: Notifications,
    T: Timer,
{
    pub fn new(plc: P, rf: R, notifications: N, timer: T, config: Config) -> Self {
        Self {
            config,
            plc,
            rf,
            notifications,
            timer,
            slots: RequestSlotPool::new(),
            dedup: DuplicateSuppressor::new(),
            reset: ConfirmAggregator::new(CombineRule::AllMustSucceed),
            scan: ConfirmAggregator::new(CombineRule::AnySucceeds),
            start: ConfirmAggregator::new(CombineRule::AllMustSucceed),
        }
    }

    /// Drive both media and dispatch everything they produced.
    ///
    /// Must be called periodically; medium events are handled synchronously
    /// within this call.
    pub fn poll(&mut self) {
        loop {
            match self.plc.poll() {
                Some(event) => self.handle_event(Medium::Plc, event),
                None => break,
            }
        }
        loop {
            match self.rf.poll() {
                Some(event) => self.handle_event(Medium::Rf, event),
                None => break,
            }
        }

        if let Some(timeout_ms) = self.config.data_confirm_timeout_ms {
            self.expire_slots(timeout_ms);
        }
    }

    /// Dispatch one event received from a medium
    pub fn handle_event(&mut self, medium: Medium, event: MacEvent) {
        match event {
            MacEvent::DataConfirm(c) => self.handle_data_confirm(medium, c),
            MacEvent::DataIndication(i) => self.handle_data_indication(medium, i),
            MacEvent::GetConfirm(c) => self.notifications.get_confirm(&c, medium),
            MacEvent::SetConfirm(c) => self.notifications.set_confirm(&c, medium),
            MacEvent::ResetConfirm(c) => {
                trace!("Reset confirm on {:?}: {:?}", medium, c.status);
                if let Some(status) = self.reset.on_confirm(c.status) {
                    self.notifications.reset_confirm(&ResetConfirm { status });
                }
            }
            MacEvent::ScanConfirm(c) => {
                trace!("Scan confirm on {:?}: {:?}", medium, c.status);
                if let Some(status) = self.scan.on_confirm(c.status) {
                    self.notifications.scan_confirm(&ScanConfirm { status });
                }
            }
            MacEvent::StartConfirm(c) => {
                trace!("Start confirm on {:?}: {:?}", medium, c.status);
                if let Some(status) = self.start.on_confirm(c.status) {
                    self.notifications.start_confirm(&StartConfirm { status });
                }
            }
            MacEvent::BeaconNotify(i) => self.notifications.beacon_notify(&i, medium),
            MacEvent::CommStatus(i) => self.notifications.comm_status(&i, medium),
            MacEvent::Sniffer(i) => self.notifications.sniffer_indication(&i, medium),
        }
    }

    /// Accept a data-send request.
    ///
    /// The payload is snapshotted into the slot; exactly one data confirm is
    /// produced for the request's handle. Pool exhaustion is reported as an
    /// immediate `QueueFull` confirm without touching either medium.
    pub fn data_request(&mut self, request: DataRequest) {
        let msdu_handle = request.msdu_handle;

        // Broadcast goes out on both media, whatever the caller asked for
        let policy = if request.is_broadcast() {
            MediaPolicy::Both
        } else {
            request.policy
        };

        debug!(
            "Data request, handle 0x{:02X} ({} bytes), policy {:?}",
            msdu_handle,
            request.msdu.len(),
            policy
        );

        let now = self.timer.ticks_ms();
        let handle = match self.slots.acquire(request, policy, now) {
            Some(h) => h,
            None => {
                warn!("No free request slot for handle 0x{:02X}", msdu_handle);
                let confirm = DataConfirm {
                    msdu_handle,
                    status: Status::QueueFull,
                    timestamp: 0,
                };
                self.notifications.data_confirm(&confirm, policy.media_type());
                return;
            }
        };

        if let Some(active) = self.slots.get_mut(handle) {
            match policy {
                MediaPolicy::Both => {
                    self.plc.data_request(&active.request);
                    self.rf.data_request(&active.request);
                }
                MediaPolicy::PlcPrimaryRfBackup | MediaPolicy::PlcOnly => {
                    self.plc.data_request(&active.request);
                }
                MediaPolicy::RfPrimaryPlcBackup | MediaPolicy::RfOnly => {
                    self.rf.data_request(&active.request);
                }
            }
        }
    }

    /// Reset both MAC sublayers; one combined confirm follows
    pub fn reset_request(&mut self, set_default_pib: bool) {
        debug!("Reset request, set default PIB: {}", set_default_pib);

        self.reset.begin();
        self.plc.reset_request(set_default_pib);
        self.rf.reset_request(set_default_pib);
    }

    /// Scan for PANs on both media; one combined confirm follows
    pub fn scan_request(&mut self, duration: u16) {
        debug!("Scan request, duration {} s", duration);

        self.scan.begin();
        self.plc.scan_request(duration);
        self.rf.scan_request(duration);
    }

    /// Start a PAN on both media; one combined confirm follows
    pub fn start_request(&mut self, pan_id: PanId) {
        debug!("Start request, PAN ID 0x{:04X}", pan_id.0);

        self.start.begin();
        self.plc.start_request(pan_id);
        self.rf.start_request(pan_id);
    }

    /// Read a PIB attribute from the medium that owns it
    pub fn get_request(&mut self, attribute: u32, index: u16) {
        trace!("Get request, attribute 0x{:08X} index {}", attribute, index);

        match pib::route(attribute) {
            Medium::Plc => self.plc.get_request(attribute, index),
            Medium::Rf => self.rf.get_request(attribute, index),
        }
    }

    /// Synchronous PIB read, routed like `get_request`
    pub fn get_request_sync(&mut self, attribute: u32, index: u16) -> Result<PibValue, Status> {
        trace!("Get request sync, attribute 0x{:08X} index {}", attribute, index);

        match pib::route(attribute) {
            Medium::Plc => self.plc.get_request_sync(attribute, index),
            Medium::Rf => self.rf.get_request_sync(attribute, index),
        }
    }

    /// Write a PIB attribute to the medium that owns it
    pub fn set_request(&mut self, attribute: u32, index: u16, value: &PibValue) {
        trace!("Set request, attribute 0x{:08X} index {}", attribute, index);

        match pib::route(attribute) {
            Medium::Plc => self.plc.set_request(attribute, index, value),
            Medium::Rf => self.rf.set_request(attribute, index, value),
        }
    }

    /// Synchronous PIB write, routed like `set_request`
    pub fn set_request_sync(
        &mut self,
        attribute: u32,
        index: u16,
        value: &PibValue,
    ) -> Result<(), Status> {
        trace!("Set request sync, attribute 0x{:08X} index {}", attribute, index);

        match pib::route(attribute) {
            Medium::Plc => self.plc.set_request_sync(attribute, index, value),
            Medium::Rf => self.rf.set_request_sync(attribute, index, value),
        }
    }

    /// Size of the PLC neighbour table
    pub fn neighbour_table_size(&self) -> u16 {
        self.plc.neighbour_table_size()
    }

    pub fn plc(&self) -> &P {
        &self.plc
    }

    pub fn plc_mut(&mut self) -> &mut P {
        &mut self.plc
    }

    pub fn rf(&self) -> &R {
        &self.rf
    }

    pub fn rf_mut(&mut self) -> &mut R {
        &mut self.rf
    }

    pub fn notifications(&self) -> &N {
        &self.notifications
    }

    fn handle_data_confirm(&mut self, medium: Medium, confirm: DataConfirm) {
        debug!(
            "Data confirm on {:?}, handle 0x{:02X}, status {:?}",
            medium, confirm.msdu_handle, confirm.status
        );

        let handle = match self.slots.find_by_msdu_handle(confirm.msdu_handle) {
            Some(h) => h,
            None => {
                error!(
                    "Data confirm for handle 0x{:02X} does not match any outstanding request",
                    confirm.msdu_handle
                );
                return;
            }
        };

        let (policy, first) = match self.slots.get_mut(handle) {
            Some(active) => (active.policy, active.first_confirm_status),
            None => return,
        };

        match (policy, medium) {
            (MediaPolicy::PlcOnly, Medium::Plc) => {
                self.complete(handle, confirm, MediaType::Plc);
            }
            (MediaPolicy::RfOnly, Medium::Rf) => {
                self.complete(handle, confirm, MediaType::Rf);
            }
            (MediaPolicy::PlcOnly, Medium::Rf) | (MediaPolicy::RfOnly, Medium::Plc) => {
                // That medium was never asked to send for this slot; a
                // confirm from it is a collaborator bug, not ours to forward
                warn!(
                    "Unexpected {:?} confirm for handle 0x{:02X}, ignoring",
                    medium, confirm.msdu_handle
                );
            }
            (MediaPolicy::PlcPrimaryRfBackup, Medium::Plc) => {
                if confirm.status == Status::Success {
                    self.complete(handle, confirm, MediaType::Plc);
                } else {
                    self.try_backup(handle, confirm, Medium::Rf);
                }
            }
            (MediaPolicy::PlcPrimaryRfBackup, Medium::Rf) => {
                // RF was used as the backup medium
                self.complete(handle, confirm, MediaType::RfAsBackup);
            }
            (MediaPolicy::RfPrimaryPlcBackup, Medium::Rf) => {
                if confirm.status == Status::Success {
                    self.complete(handle, confirm, MediaType::Rf);
                } else {
                    self.try_backup(handle, confirm, Medium::Plc);
                }
            }
            (MediaPolicy::RfPrimaryPlcBackup, Medium::Plc) => {
                // PLC was used as the backup medium
                self.complete(handle, confirm, MediaType::PlcAsBackup);
            }
            (MediaPolicy::Both, _) => match first {
                None => {
                    trace!(
                        "First confirm for handle 0x{:02X}, waiting for second",
                        confirm.msdu_handle
                    );
                    if let Some(active) = self.slots.get_mut(handle) {
                        active.first_confirm_status = Some(confirm.status);
                    }
                }
                Some(first) => {
                    // Either success wins; otherwise report the most recent
                    let status = if first == Status::Success || confirm.status == Status::Success {
                        Status::Success
                    } else {
                        confirm.status
                    };
                    let combined = DataConfirm { status, ..confirm };
                    self.complete(handle, combined, MediaType::Both);
                }
            },
        }
    }

    /// Emit the single upward confirm for a slot and free it.
    ///
    /// The slot is released first so the notification handler may
    /// immediately issue a new request into it.
    fn complete(&mut self, handle: SlotHandle, confirm: DataConfirm, media: MediaType) {
        if self.slots.release(handle).is_some() {
            self.notifications.data_confirm(&confirm, media);
        }
    }

    /// Primary-medium send failed; retry on the backup medium if the
    /// destination is plausibly reachable there, otherwise forward the
    /// primary failure.
    fn try_backup(&mut self, handle: SlotHandle, confirm: DataConfirm, backup: Medium) {
        let dst_addr = match self.slots.get_mut(handle) {
            Some(active) => active.request.dst_addr,
            None => return,
        };

        let viable = match dst_addr {
            Address::Extended(_, _) => {
                debug!("Extended destination, backup medium allowed");
                true
            }
            Address::Short(_, short) => {
                // Reachability over the backup medium is decided by its own
                // POS table
                debug!("Checking {:?} POS table for 0x{:04X}", backup, short.0);
                match backup {
                    Medium::Plc => self
                        .plc
                        .get_request_sync(pib::PIB_MANUF_POS_TABLE_ELEMENT_PLC, short.0)
                        .is_ok(),
                    Medium::Rf => self
                        .rf
                        .get_request_sync(pib::PIB_MANUF_POS_TABLE_ELEMENT_RF, short.0)
                        .is_ok(),
                }
            }
            Address::None => false,
        };

        if viable {
            info!(
                "Retrying handle 0x{:02X} on backup medium {:?}",
                confirm.msdu_handle, backup
            );
            if let Some(active) = self.slots.get_mut(handle) {
                // The slot's payload snapshot is re-sent; the caller's
                // original buffer is long gone
                match backup {
                    Medium::Plc => self.plc.data_request(&active.request),
                    Medium::Rf => self.rf.data_request(&active.request),
                }
            }
        } else {
            debug!(
                "No POS entry for handle 0x{:02X}, discarding backup medium",
                confirm.msdu_handle
            );
            let media = match backup.other() {
                Medium::Plc => MediaType::Plc,
                Medium::Rf => MediaType::Rf,
            };
            self.complete(handle, confirm, media);
        }
    }

    fn handle_data_indication(&mut self, medium: Medium, indication: DataIndication) {
        if self.dedup.is_duplicate(
            &indication.dst_addr,
            indication.src_short(),
            &indication.msdu,
            medium,
        ) {
            debug!(
                "Same frame was received on {:?}, dropping {:?} indication",
                medium.other(),
                medium
            );
            return;
        }

        self.notifications.data_indication(&indication, medium);
    }

    fn expire_slots(&mut self, timeout_ms: u64) {
        let now = self.timer.ticks_ms();

        while let Some(handle) = self.slots.next_expired(now, timeout_ms) {
            let (msdu_handle, media) = match self.slots.get_mut(handle) {
                Some(active) => (active.request.msdu_handle, active.policy.media_type()),
                None => break,
            };

            warn!(
                "No confirm for handle 0x{:02X} within {} ms, expiring slot",
                msdu_handle, timeout_ms
            );

            let confirm = DataConfirm {
                msdu_handle,
                status: Status::TransactionExpired,
                timestamp: 0,
            };
            self.complete(handle, confirm, media);
        }
    }
}

#[cfg(test)]
mod test {
    use std::vec::Vec;

    use super::*;
    use crate::mac::mock::MockMac;
    use crate::timer::mock::MockTimer;

    #[derive(Default)]
    struct Recorder {
        data_confirms: Vec<(DataConfirm, MediaType)>,
        data_indications: Vec<(DataIndication, Medium)>,
        reset_confirms: Vec<ResetConfirm>,
        scan_confirms: Vec<ScanConfirm>,
        start_confirms: Vec<StartConfirm>,
        beacons: Vec<(BeaconNotifyIndication, Medium)>,
    }

    impl Notifications for Recorder {
        fn data_confirm(&mut self, confirm: &DataConfirm, media: MediaType) {
            self.data_confirms.push((confirm.clone(), media));
        }

        fn data_indication(&mut self, indication: &DataIndication, medium: Medium) {
            self.data_indications.push((indication.clone(), medium));
        }

        fn reset_confirm(&mut self, confirm: &ResetConfirm) {
            self.reset_confirms.push(confirm.clone());
        }

        fn scan_confirm(&mut self, confirm: &ScanConfirm) {
            self.scan_confirms.push(confirm.clone());
        }

        fn start_confirm(&mut self, confirm: &StartConfirm) {
            self.start_confirms.push(confirm.clone());
        }

        fn beacon_notify(&mut self, indication: &BeaconNotifyIndication, medium: Medium) {
            self.beacons.push((indication.clone(), medium));
        }
    }

    type TestCoordinator = Coordinator<MockMac, MockMac, Recorder, MockTimer>;

    fn coordinator(config: Config) -> (TestCoordinator, MockTimer) {
        let _ = simplelog::SimpleLogger::init(
            log::LevelFilter::Debug,
            simplelog::Config::default(),
        );

        let timer = MockTimer::new();
        let c = Coordinator::new(
            MockMac::new(Medium::Plc),
            MockMac::new(Medium::Rf),
            Recorder::default(),
            timer.clone(),
            config,
        );
        (c, timer)
    }

    fn short(addr: u16) -> Address {
        Address::Short(PanId(0x781D), ShortAddress(addr))
    }

    fn extended() -> Address {
        Address::Extended(PanId(0x781D), ExtendedAddress(0x1122334455667788))
    }

    fn request(msdu_handle: u8, dst_addr: Address, policy: MediaPolicy) -> DataRequest {
        DataRequest {
            src_addr_mode: AddressMode::Short,
            dst_addr,
            msdu: Msdu::from_slice(&[0x40, 0x02, 0x18, 0x00]).unwrap(),
            msdu_handle,
            ack_request: true,
            security_level: SecurityLevel::EncMic32,
            key_index: 0,
            quality_of_service: QualityOfService::Normal,
            policy,
        }
    }

    fn confirm(msdu_handle: u8, status: Status) -> MacEvent {
        MacEvent::DataConfirm(DataConfirm {
            msdu_handle,
            status,
            timestamp: 42,
        })
    }

    fn indication(src: u16, dst_addr: Address, payload: &[u8]) -> MacEvent {
        MacEvent::DataIndication(DataIndication {
            src_addr: short(src),
            dst_addr,
            msdu: Msdu::from_slice(payload).unwrap(),
            mpdu_link_quality: 100,
            dsn: 0x55,
            timestamp: 0,
            security_level: SecurityLevel::None,
            key_index: 0,
            quality_of_service: QualityOfService::Normal,
        })
    }

    #[test]
    fn plc_only_round_trip() {
        let (mut c, _) = coordinator(Config::default());

        c.data_request(request(0x10, short(0x002A), MediaPolicy::PlcOnly));
        assert_eq!(c.plc().sent.len(), 1);
        assert!(c.rf().sent.is_empty());

        c.handle_event(Medium::Plc, confirm(0x10, Status::Success));

        let confirms = &c.notifications().data_confirms;
        assert_eq!(confirms.len(), 1);
        assert_eq!(confirms[0].0.msdu_handle, 0x10);
        assert_eq!(confirms[0].0.status, Status::Success);
        assert_eq!(confirms[0].1, MediaType::Plc);
    }

    #[test]
    fn rf_only_round_trip() {
        let (mut c, _) = coordinator(Config::default());

        c.data_request(request(0x11, short(0x002A), MediaPolicy::RfOnly));
        assert!(c.plc().sent.is_empty());
        assert_eq!(c.rf().sent.len(), 1);

        c.handle_event(Medium::Rf, confirm(0x11, Status::NoAck));

        let confirms = &c.notifications().data_confirms;
        assert_eq!(confirms.len(), 1);
        assert_eq!(confirms[0].0.status, Status::NoAck);
        assert_eq!(confirms[0].1, MediaType::Rf);
    }

    #[test]
    fn unexpected_medium_confirm_dropped() {
        let (mut c, _) = coordinator(Config::default());

        c.data_request(request(0x12, short(0x002A), MediaPolicy::PlcOnly));

        // RF was never asked; its confirm must not complete the slot
        c.handle_event(Medium::Rf, confirm(0x12, Status::Success));
        assert!(c.notifications().data_confirms.is_empty());

        c.handle_event(Medium::Plc, confirm(0x12, Status::Success));
        assert_eq!(c.notifications().data_confirms.len(), 1);
    }

    #[test]
    fn unmatched_confirm_dropped() {
        let (mut c, _) = coordinator(Config::default());

        c.handle_event(Medium::Plc, confirm(0x77, Status::Success));
        assert!(c.notifications().data_confirms.is_empty());
    }

    #[test]
    fn queue_full_reported_without_side_effects() {
        let (mut c, _) = coordinator(Config::default());

        c.data_request(request(1, short(0x002A), MediaPolicy::PlcOnly));
        c.data_request(request(2, short(0x002B), MediaPolicy::PlcOnly));
        c.data_request(request(3, short(0x002C), MediaPolicy::PlcOnly));

        // The third request got an immediate QueueFull and never reached a
        // medium
        assert_eq!(c.plc().sent.len(), 2);
        let confirms = &c.notifications().data_confirms;
        assert_eq!(confirms.len(), 1);
        assert_eq!(confirms[0].0.msdu_handle, 3);
        assert_eq!(confirms[0].0.status, Status::QueueFull);

        // Active slots are unaffected and still complete
        c.handle_event(Medium::Plc, confirm(1, Status::Success));
        c.handle_event(Medium::Plc, confirm(2, Status::Success));
        assert_eq!(c.notifications().data_confirms.len(), 3);

        // And the pool is free again
        c.data_request(request(4, short(0x002D), MediaPolicy::PlcOnly));
        assert_eq!(c.plc().sent.len(), 3);
    }

    #[test]
    fn broadcast_overrides_policy_to_both() {
        let (mut c, _) = coordinator(Config::default());

        let dst = Address::Short(PanId(0x781D), ShortAddress::broadcast());
        c.data_request(request(0x20, dst, MediaPolicy::PlcOnly));

        // Both media were used despite the requested PLC-only policy
        assert_eq!(c.plc().sent.len(), 1);
        assert_eq!(c.rf().sent.len(), 1);

        // First confirm is held, second completes
        c.handle_event(Medium::Plc, confirm(0x20, Status::ChannelAccessFailure));
        assert!(c.notifications().data_confirms.is_empty());

        c.handle_event(Medium::Rf, confirm(0x20, Status::Success));
        let confirms = &c.notifications().data_confirms;
        assert_eq!(confirms.len(), 1);
        assert_eq!(confirms[0].0.status, Status::Success);
        assert_eq!(confirms[0].1, MediaType::Both);
    }

    #[test]
    fn both_policy_failures_report_second_status() {
        let (mut c, _) = coordinator(Config::default());

        c.data_request(request(0x21, short(0x002A), MediaPolicy::Both));

        c.handle_event(Medium::Rf, confirm(0x21, Status::NoAck));
        c.handle_event(Medium::Plc, confirm(0x21, Status::ChannelAccessFailure));

        let confirms = &c.notifications().data_confirms;
        assert_eq!(confirms.len(), 1);
        // Neither succeeded: the most recent status is reported
        assert_eq!(confirms[0].0.status, Status::ChannelAccessFailure);
        assert_eq!(confirms[0].1, MediaType::Both);
    }

    #[test]
    fn backup_used_for_extended_destination() {
        let (mut c, _) = coordinator(Config::default());

        c.data_request(request(0x30, extended(), MediaPolicy::PlcPrimaryRfBackup));
        assert_eq!(c.plc().sent.len(), 1);

        c.handle_event(Medium::Plc, confirm(0x30, Status::NoAck));

        // Extended destination: no POS lookup, straight to the backup medium
        assert!(c.rf().gets.is_empty());
        assert_eq!(c.rf().sent.len(), 1);
        // The retry carries the slot's payload snapshot
        assert_eq!(c.rf().sent[0].msdu, c.plc().sent[0].msdu);
        assert!(c.notifications().data_confirms.is_empty());

        c.handle_event(Medium::Rf, confirm(0x30, Status::Success));
        let confirms = &c.notifications().data_confirms;
        assert_eq!(confirms.len(), 1);
        assert_eq!(confirms[0].0.status, Status::Success);
        assert_eq!(confirms[0].1, MediaType::RfAsBackup);
    }

    #[test]
    fn backup_used_after_pos_hit() {
        let (mut c, _) = coordinator(Config::default());
        c.rf_mut().pos_neighbours.push(ShortAddress(0x002A));

        c.data_request(request(0x31, short(0x002A), MediaPolicy::PlcPrimaryRfBackup));
        c.handle_event(Medium::Plc, confirm(0x31, Status::ChannelAccessFailure));

        // POS entry found, retried on RF
        assert_eq!(c.rf().sent.len(), 1);

        // Backup failure is still forwarded tagged as backup
        c.handle_event(Medium::Rf, confirm(0x31, Status::NoAck));
        let confirms = &c.notifications().data_confirms;
        assert_eq!(confirms.len(), 1);
        assert_eq!(confirms[0].0.status, Status::NoAck);
        assert_eq!(confirms[0].1, MediaType::RfAsBackup);
    }

    #[test]
    fn no_backup_route_forwards_primary_failure() {
        let (mut c, _) = coordinator(Config::default());

        c.data_request(request(0x32, short(0x002A), MediaPolicy::PlcPrimaryRfBackup));
        c.handle_event(Medium::Plc, confirm(0x32, Status::NoAck));

        // POS miss: no backup attempt, primary failure goes upward untouched
        assert!(c.rf().sent.is_empty());
        let confirms = &c.notifications().data_confirms;
        assert_eq!(confirms.len(), 1);
        assert_eq!(confirms[0].0.status, Status::NoAck);
        assert_eq!(confirms[0].1, MediaType::Plc);
    }

    #[test]
    fn rf_primary_plc_backup() {
        let (mut c, _) = coordinator(Config::default());
        c.plc_mut().pos_neighbours.push(ShortAddress(0x002A));

        c.data_request(request(0x33, short(0x002A), MediaPolicy::RfPrimaryPlcBackup));
        assert_eq!(c.rf().sent.len(), 1);
        assert!(c.plc().sent.is_empty());

        c.handle_event(Medium::Rf, confirm(0x33, Status::NoAck));
        assert_eq!(c.plc().sent.len(), 1);

        c.handle_event(Medium::Plc, confirm(0x33, Status::Success));
        let confirms = &c.notifications().data_confirms;
        assert_eq!(confirms.len(), 1);
        assert_eq!(confirms[0].1, MediaType::PlcAsBackup);
    }

    #[test]
    fn duplicate_indication_dropped() {
        let (mut c, _) = coordinator(Config::default());

        c.handle_event(Medium::Plc, indication(0x002A, short(0x0001), &[1, 2, 3]));
        c.handle_event(Medium::Rf, indication(0x002A, short(0x0001), &[1, 2, 3]));

        // Second arrival on the other medium was suppressed
        let indications = &c.notifications().data_indications;
        assert_eq!(indications.len(), 1);
        assert_eq!(indications[0].1, Medium::Plc);
    }

    #[test]
    fn broadcast_indication_delivered_from_both_media() {
        let (mut c, _) = coordinator(Config::default());

        let dst = Address::Short(PanId(0x781D), ShortAddress::broadcast());
        c.handle_event(Medium::Plc, indication(0x002A, dst, &[1, 2, 3]));
        c.handle_event(Medium::Rf, indication(0x002A, dst, &[1, 2, 3]));

        assert_eq!(c.notifications().data_indications.len(), 2);
    }

    #[test]
    fn reset_confirms_combined() {
        let (mut c, _) = coordinator(Config::default());

        c.reset_request(true);
        assert_eq!(c.plc().resets, &[true]);
        assert_eq!(c.rf().resets, &[true]);

        c.handle_event(
            Medium::Plc,
            MacEvent::ResetConfirm(ResetConfirm {
                status: Status::Success,
            }),
        );
        assert!(c.notifications().reset_confirms.is_empty());

        c.handle_event(
            Medium::Rf,
            MacEvent::ResetConfirm(ResetConfirm {
                status: Status::Denied,
            }),
        );
        let confirms = &c.notifications().reset_confirms;
        assert_eq!(confirms.len(), 1);
        assert_eq!(confirms[0].status, Status::Denied);
    }

    #[test]
    fn scan_confirms_combined() {
        let (mut c, _) = coordinator(Config::default());

        c.scan_request(15);
        assert_eq!(c.plc().scans, &[15]);
        assert_eq!(c.rf().scans, &[15]);

        // One medium found something: the scan succeeded
        c.handle_event(
            Medium::Plc,
            MacEvent::ScanConfirm(ScanConfirm {
                status: Status::NoBeacon,
            }),
        );
        c.handle_event(
            Medium::Rf,
            MacEvent::ScanConfirm(ScanConfirm {
                status: Status::Success,
            }),
        );

        let confirms = &c.notifications().scan_confirms;
        assert_eq!(confirms.len(), 1);
        assert_eq!(confirms[0].status, Status::Success);
    }

    #[test]
    fn start_confirms_combined() {
        let (mut c, _) = coordinator(Config::default());

        c.start_request(PanId(0x781D));
        assert_eq!(c.plc().starts, &[PanId(0x781D)]);
        assert_eq!(c.rf().starts, &[PanId(0x781D)]);

        c.handle_event(
            Medium::Plc,
            MacEvent::StartConfirm(StartConfirm {
                status: Status::Success,
            }),
        );
        c.handle_event(
            Medium::Rf,
            MacEvent::StartConfirm(StartConfirm {
                status: Status::Denied,
            }),
        );

        let confirms = &c.notifications().start_confirms;
        assert_eq!(confirms.len(), 1);
        assert_eq!(confirms[0].status, Status::Denied);
    }

    #[test]
    fn pib_access_routed_by_attribute() {
        let (mut c, _) = coordinator(Config::default());

        c.get_request(0x01FF, 0);
        c.get_request(0x0200, 1);
        assert_eq!(c.plc().gets, &[(0x01FF, 0)]);
        assert_eq!(c.rf().gets, &[(0x0200, 1)]);

        let value = PibValue::from_slice(&[0xAA]).unwrap();
        c.set_request(0x0400, 2, &value);
        c.set_request(0x0800_0200, 3, &value);
        assert_eq!(c.plc().sets.len(), 1);
        assert_eq!(c.plc().sets[0].0, 0x0400);
        assert_eq!(c.rf().sets.len(), 1);
        assert_eq!(c.rf().sets[0].0, 0x0800_0200);

        assert!(c.set_request_sync(0x0000, 0, &value).is_ok());
        assert_eq!(c.plc().sets.len(), 2);
    }

    #[test]
    fn events_flow_through_poll() {
        let (mut c, _) = coordinator(Config::default());

        c.data_request(request(0x40, short(0x002A), MediaPolicy::PlcOnly));
        c.plc_mut().push_event(confirm(0x40, Status::Success));
        c.rf_mut().push_event(MacEvent::BeaconNotify(BeaconNotifyIndication {
            pan_descriptor: PanDescriptor {
                pan_id: PanId(0x781D),
                link_quality: 90,
                lba_address: ShortAddress(0x0001),
                rc_coord: 0x0100,
            },
        }));

        c.poll();

        assert_eq!(c.notifications().data_confirms.len(), 1);
        let beacons = &c.notifications().beacons;
        assert_eq!(beacons.len(), 1);
        assert_eq!(beacons[0].1, Medium::Rf);
    }

    #[test]
    fn lost_confirm_expires_when_enabled() {
        let config = Config {
            data_confirm_timeout_ms: Some(1000),
        };
        let (mut c, mut timer) = coordinator(config);

        c.data_request(request(0x50, short(0x002A), MediaPolicy::PlcOnly));

        timer.set_ms(900);
        c.poll();
        assert!(c.notifications().data_confirms.is_empty());

        timer.set_ms(1100);
        c.poll();
        let confirms = &c.notifications().data_confirms;
        assert_eq!(confirms.len(), 1);
        assert_eq!(confirms[0].0.status, Status::TransactionExpired);

        // The slot is free again
        c.data_request(request(0x51, short(0x002A), MediaPolicy::PlcOnly));
        assert_eq!(c.plc().sent.len(), 2);
    }

    #[test]
    fn lost_confirm_waits_forever_by_default() {
        let (mut c, mut timer) = coordinator(Config::default());

        c.data_request(request(0x52, short(0x002A), MediaPolicy::PlcOnly));

        timer.set_ms(1_000_000);
        c.poll();
        assert!(c.notifications().data_confirms.is_empty());
    }
}
