//! Translation between wire payloads and device snapshots.
//!
//! - `decode`: raw `WireNodes` → `Device`s, enforcing required fields.
//! - `encode`: `Device` with pending targets → minimal partial-update payload.

pub mod decode;
pub mod encode;

pub use decode::{decode, decode_one};
pub use encode::diff;
