//! PAN information base attribute routing.
//!
//! Each medium owns a numeric slice of the attribute space; get/set
//! operations are dispatched by range, identically for the asynchronous and
//! synchronous variants.

use crate::types::Medium;

/// Upper bound (exclusive) of the standard PLC attribute range
const STANDARD_PLC_END: u32 = 0x0200;
/// Upper bound (exclusive) of the standard RF attribute range
const STANDARD_RF_END: u32 = 0x0400;
/// Upper bound (exclusive) of the vendor-extended PLC attribute range
const VENDOR_PLC_END: u32 = 0x0800_0200;

/// PLC neighbour POS table element, indexed by short address
pub const PIB_MANUF_POS_TABLE_ELEMENT_PLC: u32 = 0x0800_0027;
/// RF neighbour POS table element, indexed by short address
pub const PIB_MANUF_POS_TABLE_ELEMENT_RF: u32 = 0x0800_021B;

/// Map a PIB attribute identifier to the medium that owns it
pub fn route(attribute: u32) -> Medium {
    if attribute < STANDARD_PLC_END {
        Medium::Plc
    } else if attribute < STANDARD_RF_END {
        Medium::Rf
    } else if attribute < VENDOR_PLC_END {
        Medium::Plc
    } else {
        Medium::Rf
    }
}
