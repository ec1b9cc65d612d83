//! Hybrid Abstraction Layer (HyAL)
//!
//! Presents two independent MAC instances (one power-line, one radio) as a
//! single logical MAC to the layer above. The coordinator suppresses frames
//! received redundantly on both media, drives per-request medium selection
//! with backup retries, folds paired management confirms into one upward
//! confirm, and routes information-base accesses to the medium that owns
//! the attribute.

#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod types;

pub mod timer;

pub mod crc;

pub mod dedup;

pub mod aggregate;

pub mod pib;

pub mod slot;

pub mod mac;

pub mod coordinator;

pub mod prelude;
