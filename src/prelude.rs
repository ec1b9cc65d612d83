//! HyAL crate prelude

pub use crate::coordinator::{Config, Coordinator};

pub use crate::mac::{MacEvent, MediumMac, Notifications};

pub use crate::timer::Timer;

pub use crate::types::{
    DataConfirm, DataIndication, DataRequest, MediaPolicy, MediaType, Medium, Status,
};

pub use ieee802154::mac::{Address, AddressMode, ExtendedAddress, PanId, ShortAddress};
