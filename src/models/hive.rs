//! Wire models for the Hive (Omnia) node and session endpoints.
//!
//! Scope: serde shapes only, no validation.
//!
//! Notes
//! - Every field is optional on the wire; required-field invariants are
//!   enforced by `codec::decode`, which turns gaps into typed errors.
//! - Feature blocks are keyed by their versioned wire name (`heating_thermostat_v1`).
//! - Timestamps are epoch milliseconds; transient start/end datetimes are strings.

use crate::values::{
    ActionType, FeatureType, GroupId, HeatingOperatingMode, HeatingOperatingState, NodeId, NodeName, NodeType,
    OnOffMode, OverrideMode, ProductType, WaterHeaterOperatingMode,
};
use serde::{Deserialize, Serialize};

// =====================
// Attribute envelope
// =====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAttribute<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_value: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_value: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_received_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_changed_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_set_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_expiry_time: Option<i64>,
    #[serde(rename = "targetSetTXId", skip_serializing_if = "Option::is_none")]
    pub target_set_tx_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_status: Option<String>,
}

impl<T> Default for WireAttribute<T> {
    fn default() -> Self {
        WireAttribute {
            reported_value: None,
            target_value: None,
            display_value: None,
            report_received_time: None,
            report_changed_time: None,
            target_set_time: None,
            target_expiry_time: None,
            target_set_tx_id: None,
            property_status: None,
        }
    }
}

impl<T> WireAttribute<T> {
    /// Write-side attribute carrying only a target value.
    pub fn target(value: T) -> Self {
        WireAttribute {
            target_value: Some(value),
            ..WireAttribute::default()
        }
    }
}

/// Numbers the API sometimes sends as JSON numbers and sometimes as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireNumber {
    Number(f64),
    Text(String),
}

// =====================
// Feature blocks
// =====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireBatteryDevice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<WireAttribute<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_state: Option<WireAttribute<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_voltage: Option<WireAttribute<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_state: Option<WireAttribute<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireOnOffDevice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<WireAttribute<OnOffMode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireHeatingThermostat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_mode: Option<WireAttribute<HeatingOperatingMode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_state: Option<WireAttribute<HeatingOperatingState>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_heat_temperature: Option<WireAttribute<WireNumber>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary_operating_mode_override: Option<WireAttribute<OverrideMode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireTemperatureSensor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<WireAttribute<WireNumber>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_type: Option<ActionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_type: Option<FeatureType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// The boost block. Shared on the wire by transient scheduling and the
/// heating target-temperature override carried in `actions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireTransientMode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<WireAttribute<Vec<WireAction>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<WireAttribute<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<WireAttribute<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_configuration: Option<WireAttribute<Vec<WireAction>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_datetime: Option<WireAttribute<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_datetime: Option<WireAttribute<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireWaterHeater {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_mode: Option<WireAttribute<WaterHeaterOperatingMode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_on: Option<WireAttribute<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary_operating_mode_override: Option<WireAttribute<OverrideMode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WireZigbeeDevice {
    #[serde(rename = "averageLQI", skip_serializing_if = "Option::is_none")]
    pub average_lqi: Option<WireAttribute<i64>>,
    #[serde(rename = "lastKnownLQI", skip_serializing_if = "Option::is_none")]
    pub last_known_lqi: Option<WireAttribute<i64>>,
    #[serde(rename = "averageRSSI", skip_serializing_if = "Option::is_none")]
    pub average_rssi: Option<WireAttribute<i64>>,
    #[serde(rename = "lastKnownRSSI", skip_serializing_if = "Option::is_none")]
    pub last_known_rssi: Option<WireAttribute<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WirePhysicalDevice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_identifier: Option<WireAttribute<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware_identifier: Option<WireAttribute<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<WireAttribute<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<WireAttribute<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub software_version: Option<WireAttribute<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireLink {
    pub bound_node: Option<NodeId>,
    pub binding_group_id: Option<GroupId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireReverseLink {
    pub bound_node: Option<NodeId>,
    pub binding_group_ids: Option<Vec<GroupId>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<WireAttribute<Vec<WireLink>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse_links: Option<WireAttribute<Vec<WireReverseLink>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireDimmableLight {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<WireAttribute<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireDeviceManagement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<WireAttribute<ProductType>>,
}

/// Feature blocks of one node. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WireFeatures {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_device_v1: Option<WireBatteryDevice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_management_v1: Option<WireDeviceManagement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimmable_light_v1: Option<WireDimmableLight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heating_thermostat_v1: Option<WireHeatingThermostat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links_v1: Option<WireLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_off_device_v1: Option<WireOnOffDevice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_device_v1: Option<WirePhysicalDevice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_sensor_v1: Option<WireTemperatureSensor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transient_mode_v1: Option<WireTransientMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_heater_v1: Option<WireWaterHeater>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zigbee_device_v1: Option<WireZigbeeDevice>,
}

impl WireFeatures {
    pub fn is_empty(&self) -> bool {
        *self == WireFeatures::default()
    }
}

// =====================
// Nodes
// =====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_node_id: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<NodeName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<WireFeatures>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WireNodes {
    pub nodes: Option<Vec<Option<WireNode>>>,
}

// =====================
// Sessions
// =====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireSession {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_supported_api_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WireSessions {
    pub sessions: Option<Vec<WireSession>>,
}
