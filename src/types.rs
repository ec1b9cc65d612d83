//! Shared primitive and service types for the hybrid MAC layer.
//!
//! Request / confirm / indication parameter sets mirror the per-medium MAC
//! service, with payloads held in owned bounded buffers so nothing borrowed
//! survives across an asynchronous confirm boundary.

use heapless::Vec;

pub use ieee802154::mac::{Address, AddressMode, ExtendedAddress, PanId, ShortAddress};

/// Maximum MSDU length accepted by the layer.
///
/// Payloads are snapshotted at request time so a backup-medium retry can
/// re-issue the frame after the caller's buffer is gone.
pub const MAX_MSDU_LEN: usize = 400;

/// Maximum serialized length of a PIB attribute value
pub const MAX_PIB_VALUE_LEN: usize = 144;

/// Owned MSDU payload
pub type Msdu = Vec<u8, MAX_MSDU_LEN>;

/// Serialized PIB attribute value
pub type PibValue = Vec<u8, MAX_PIB_VALUE_LEN>;

/// MAC timestamps, in symbol times as reported by the medium
pub type Timestamp = u32;

/// One of the two underlying MAC transports
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Medium {
    Plc,
    Rf,
}

impl Medium {
    /// The redundant counterpart of this medium
    pub fn other(self) -> Self {
        match self {
            Medium::Plc => Medium::Rf,
            Medium::Rf => Medium::Plc,
        }
    }
}

/// Caller-selected medium policy for an outgoing data request.
///
/// Immutable once the request is accepted. Broadcast destinations override
/// whatever was requested to `Both`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MediaPolicy {
    PlcPrimaryRfBackup = 0x00,
    RfPrimaryPlcBackup = 0x01,
    Both = 0x02,
    PlcOnly = 0x03,
    RfOnly = 0x04,
}

impl From<u8> for MediaPolicy {
    /// Decode a raw policy value.
    ///
    /// Unrecognised values fall back to plain PLC with no backup, keeping
    /// the legacy "unset means PLC" wire behaviour.
    fn from(v: u8) -> Self {
        match v {
            0x00 => MediaPolicy::PlcPrimaryRfBackup,
            0x01 => MediaPolicy::RfPrimaryPlcBackup,
            0x02 => MediaPolicy::Both,
            0x04 => MediaPolicy::RfOnly,
            _ => MediaPolicy::PlcOnly,
        }
    }
}

impl MediaPolicy {
    /// Medium the policy transmits on first
    pub fn primary(self) -> Medium {
        match self {
            MediaPolicy::RfPrimaryPlcBackup | MediaPolicy::RfOnly => Medium::Rf,
            _ => Medium::Plc,
        }
    }

    /// Media tag reported on confirms that never reached a medium
    /// (queue-full and expiry paths)
    pub fn media_type(self) -> MediaType {
        match self {
            MediaPolicy::Both => MediaType::Both,
            MediaPolicy::RfPrimaryPlcBackup | MediaPolicy::RfOnly => MediaType::Rf,
            _ => MediaType::Plc,
        }
    }
}

/// How a confirmed result was obtained, reported upward with every
/// data confirm
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MediaType {
    Plc = 0x00,
    Rf = 0x01,
    Both = 0x02,
    PlcAsBackup = 0x03,
    RfAsBackup = 0x04,
}

/// MAC service status codes, numeric values per IEEE 802.15.4 / G3
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Success = 0x00,
    AlternatePanIdDetection = 0x80,
    QueueFull = 0xD0,
    CounterError = 0xDB,
    BeaconLoss = 0xE0,
    ChannelAccessFailure = 0xE1,
    Denied = 0xE2,
    FrameTooLong = 0xE5,
    InvalidHandle = 0xE7,
    InvalidParameter = 0xE8,
    NoAck = 0xE9,
    NoBeacon = 0xEA,
    NoData = 0xEB,
    NoShortAddress = 0xEC,
    OutOfCap = 0xED,
    TransactionExpired = 0xF0,
    TransactionOverflow = 0xF1,
    TxActive = 0xF2,
    UnavailableKey = 0xF3,
    UnsupportedAttribute = 0xF4,
    InvalidAddress = 0xF5,
    InvalidIndex = 0xF9,
    ReadOnly = 0xFB,
    ScanInProgress = 0xFC,
}

/// Frame protection level
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SecurityLevel {
    None = 0x00,
    EncMic32 = 0x05,
}

/// Frame priority
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum QualityOfService {
    Normal = 0x00,
    High = 0x01,
}

/// Outgoing data-send request
#[derive(Clone, Debug, PartialEq)]
pub struct DataRequest {
    /// Source addressing mode (none / short / extended)
    pub src_addr_mode: AddressMode,
    /// Destination address, carrying the destination PAN ID
    pub dst_addr: Address,
    /// Payload, owned by the request
    pub msdu: Msdu,
    /// Caller handle correlating the eventual confirm
    pub msdu_handle: u8,
    /// Request link-layer acknowledgement
    pub ack_request: bool,
    pub security_level: SecurityLevel,
    pub key_index: u8,
    pub quality_of_service: QualityOfService,
    /// Requested medium selection policy
    pub policy: MediaPolicy,
}

impl DataRequest {
    /// Whether the destination is the short broadcast address
    pub fn is_broadcast(&self) -> bool {
        matches!(self.dst_addr, Address::Short(_, s) if s == ShortAddress::broadcast())
    }
}

/// Completion of a data-send request
#[derive(Clone, Debug, PartialEq)]
pub struct DataConfirm {
    pub msdu_handle: u8,
    pub status: Status,
    pub timestamp: Timestamp,
}

/// Received frame delivered upward
#[derive(Clone, Debug, PartialEq)]
pub struct DataIndication {
    pub src_addr: Address,
    pub dst_addr: Address,
    pub msdu: Msdu,
    /// Forward LQI measured during reception
    pub mpdu_link_quality: u8,
    /// Sequence number of the received frame
    pub dsn: u8,
    pub timestamp: Timestamp,
    pub security_level: SecurityLevel,
    pub key_index: u8,
    pub quality_of_service: QualityOfService,
}

impl DataIndication {
    /// Whether the frame was addressed to the short broadcast address
    pub fn is_broadcast(&self) -> bool {
        matches!(self.dst_addr, Address::Short(_, s) if s == ShortAddress::broadcast())
    }

    /// Source short address used for duplicate tracking; extended or absent
    /// sources map to the undefined short address
    pub fn src_short(&self) -> ShortAddress {
        match self.src_addr {
            Address::Short(_, s) => s,
            _ => ShortAddress::broadcast(),
        }
    }
}

/// Completion of an asynchronous PIB read
#[derive(Clone, Debug, PartialEq)]
pub struct GetConfirm {
    pub status: Status,
    pub attribute: u32,
    pub index: u16,
    pub value: PibValue,
}

/// Completion of an asynchronous PIB write
#[derive(Clone, Debug, PartialEq)]
pub struct SetConfirm {
    pub status: Status,
    pub attribute: u32,
    pub index: u16,
}

/// Combined completion of a reset request
#[derive(Clone, Debug, PartialEq)]
pub struct ResetConfirm {
    pub status: Status,
}

/// Combined completion of a network scan
#[derive(Clone, Debug, PartialEq)]
pub struct ScanConfirm {
    pub status: Status,
}

/// Combined completion of a PAN start
#[derive(Clone, Debug, PartialEq)]
pub struct StartConfirm {
    pub status: Status,
}

/// PAN discovered during a scan
#[derive(Clone, Debug, PartialEq)]
pub struct PanDescriptor {
    pub pan_id: PanId,
    pub link_quality: u8,
    /// Address of the agent the beacon was heard from
    pub lba_address: ShortAddress,
    /// Route cost to the PAN coordinator
    pub rc_coord: u16,
}

/// Beacon heard during a scan
#[derive(Clone, Debug, PartialEq)]
pub struct BeaconNotifyIndication {
    pub pan_descriptor: PanDescriptor,
}

/// Security failure on a received frame
#[derive(Clone, Debug, PartialEq)]
pub struct CommStatusIndication {
    pub pan_id: PanId,
    pub src_addr: Address,
    pub dst_addr: Address,
    pub status: Status,
    pub security_level: SecurityLevel,
    pub key_index: u8,
}

/// Raw traffic capture from a medium, forwarded unmodified
#[derive(Clone, Debug, PartialEq)]
pub struct SnifferIndication {
    pub frame_type: u8,
    pub src_addr: Address,
    pub dst_addr: Address,
    pub msdu: Msdu,
    pub mpdu_link_quality: u8,
    pub dsn: u8,
    pub timestamp: Timestamp,
}
