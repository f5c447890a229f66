//! Device repository: list, fetch and update devices over an authenticated session.

use crate::api::ApiClient;
use crate::codec::{decode, decode_one, diff};
use crate::device::Device;
use crate::error::HiveError;
use crate::executor::AuthenticatedExecutor;
use crate::session::{Credentials, UserId};
use crate::values::NodeId;
use log::debug;
use std::sync::Arc;

pub struct DeviceRepository {
    executor: AuthenticatedExecutor,
}

impl DeviceRepository {
    /// Logs in and returns a repository bound to that account.
    pub fn connect(api: Arc<ApiClient>, credentials: Credentials) -> Result<Self, HiveError> {
        Ok(DeviceRepository {
            executor: AuthenticatedExecutor::connect(api, credentials)?,
        })
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.executor.user_id()
    }

    pub fn list_devices(&self) -> Result<Vec<Device>, HiveError> {
        let payload = self.executor.call(|api, session| api.get_nodes(session))?;
        let devices = decode(payload)?;
        debug!("Listed {} devices", devices.len());
        Ok(devices)
    }

    /// `Ok(None)` when no device has this id.
    pub fn get_device(&self, id: &NodeId) -> Result<Option<Device>, HiveError> {
        let payload = self.executor.call(|api, session| api.get_node(session, id))?;
        decode_one(payload)
    }

    /// Sends the device's pending targets and returns the server's canonical
    /// state, which supersedes `device`.
    ///
    /// `device` itself is never modified, so after a failure the caller can
    /// resend the same value. A response holding anything other than exactly
    /// one node is a `MalformedResponse`.
    pub fn update_device(&self, device: &Device) -> Result<Device, HiveError> {
        let update = diff(device);
        let payload = self
            .executor
            .call(|api, session| api.put_node(session, &device.id, &update))?;

        let devices = decode(payload)?;
        match <[Device; 1]>::try_from(devices) {
            Ok([canonical]) => {
                debug!("Updated node {}", canonical.id);
                Ok(canonical)
            }
            Err(devices) => Err(HiveError::malformed(format!(
                "update of node {} returned {} nodes",
                device.id,
                devices.len()
            ))),
        }
    }

    /// Best-effort logout.
    pub fn close(&self) {
        self.executor.close();
    }
}
