//! Distributed unique ID generation in the Snowflake family.
//!
//! Every identifier is a single `u64` packing a count of 10 ms ticks since a
//! configurable epoch, a machine ID, a service ID, and a per-tick sequence:
//!
//! ```text
//!  Bit Index:  63           63 62            22 21             17 16             12 11             0
//!              +--------------+----------------+-----------------+----------------+---------------+
//!  Field:      | reserved (1) | timestamp (41) | machine ID (5)  | service ID (5) | sequence (12) |
//!              +--------------+----------------+-----------------+----------------+---------------+
//!              |<------------------------ MSB ------- 64 bits ------- LSB ----------------------->|
//! ```
//!
//! - 41 bits of 10 ms ticks cover roughly 697 years past the epoch
//! - 5 bits each for machine and service IDs (32 x 32 deployments)
//! - 12 bits of sequence allow 4096 IDs per tick, throttling issuance to
//!   409,600 IDs/sec per (machine, service) pair
//!
//! IDs issued by one generator are unique and strictly increasing; uniqueness
//! across processes is the caller's responsibility via distinct machine and
//! service IDs, supplied through [`Settings`] providers.
//!
//! # Example
//!
//! ```
//! use centiflake::Settings;
//!
//! let generator = Settings::new().with_ids(1, 2).build().expect("valid settings");
//! let id = generator.try_next_id().expect("tick budget not exhausted");
//!
//! let parts = id.decompose();
//! assert_eq!(parts.machine_id, 1);
//! assert_eq!(parts.service_id, 2);
//! ```

#[cfg(feature = "base32")]
mod base32;
mod error;
mod generator;
mod id;
mod time;

#[cfg(feature = "base32")]
pub use crate::base32::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
