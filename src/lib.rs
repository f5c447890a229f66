//! Blocking client for the Hive (Omnia) home-heating cloud API.
//!
//! - `repository::DeviceRepository` is the entry point: list, fetch and update devices.
//! - Devices carry a sparse set of typed features; targets are set with
//!   copy-on-write `with_target_*` builders and sent with `update_device`.
//! - Expired sessions are re-established once per call, transparently.

pub mod models {
    pub mod hive;
}

pub mod api;
pub mod attribute;
pub mod codec;
pub mod config;
pub mod device;
pub mod error;
pub mod executor;
pub mod feature;
pub mod repository;
pub mod session;
pub mod transport;
pub mod utils;
pub mod values;

pub use device::Device;
pub use error::HiveError;
pub use repository::DeviceRepository;
pub use session::Credentials;
