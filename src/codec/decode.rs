//! Wire payload → device snapshots.
//!
//! Every attribute that is present must carry all four of reported value,
//! display value and both report timestamps; a gap is a `MalformedResponse`
//! naming the node and the field. Optional feature blocks that are absent are
//! left out of the device's feature map.

use crate::attribute::{Attribute, SettableAttribute};
use crate::device::Device;
use crate::error::HiveError;
use crate::feature::{
    BatteryDeviceFeature, DimmableLightFeature, FeatureMap, HeatingThermostatFeature, Link, LinksFeature,
    OnOffDeviceFeature, PhysicalDeviceFeature, ReverseLink, TemperatureSensorFeature, TransientModeFeature,
    TransientModeHeatingActionsFeature, WaterHeaterFeature, ZigbeeDeviceFeature,
};
use crate::models::hive::{
    WireAction, WireAttribute, WireBatteryDevice, WireDimmableLight, WireHeatingThermostat, WireLink, WireLinks,
    WireNode, WireNodes, WireNumber, WireOnOffDevice, WirePhysicalDevice, WireReverseLink, WireTemperatureSensor,
    WireTransientMode, WireWaterHeater, WireZigbeeDevice,
};
use crate::values::{BatteryLevel, BrightnessLevel, NodeId, Protocol, Temperature};
use chrono::{DateTime, FixedOffset, Utc};
use std::fmt;
use std::time::Duration;

/// Format of `transient_mode_v1.startDatetime` / `endDatetime`, e.g. `2020-03-04T19:13:47.462+0000`.
const TRANSIENT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

const UNKNOWN_HARDWARE_IDENTIFIER: &str = "UNKNOWN";

/// Decodes every node in the payload.
pub fn decode(payload: WireNodes) -> Result<Vec<Device>, HiveError> {
    let nodes = required(payload.nodes, "nodes list")?;
    nodes
        .into_iter()
        .enumerate()
        .map(|(index, node)| {
            let node = node.ok_or_else(|| HiveError::malformed(format!("nodes[{index}] is null")))?;
            decode_node(node)
        })
        .collect()
}

/// Decodes a payload expected to hold at most one node.
///
/// Zero nodes is `Ok(None)`; more than one is a `MalformedResponse`.
pub fn decode_one(payload: WireNodes) -> Result<Option<Device>, HiveError> {
    let mut devices = decode(payload)?;
    match devices.len() {
        0 | 1 => Ok(devices.pop()),
        n => Err(HiveError::malformed(format!("expected at most one node, got {n}"))),
    }
}

fn decode_node(node: WireNode) -> Result<Device, HiveError> {
    let id = required(node.id.clone(), "node id")?;
    build_device(id.clone(), node).map_err(context(format!("node {id}")))
}

fn build_device(id: NodeId, node: WireNode) -> Result<Device, HiveError> {
    let parent_id = required(node.parent_node_id, "parentNodeId")?;
    let name = required(node.name, "name")?;
    let node_type = required(node.node_type, "nodeType")?;
    let protocol = node.protocol.map(Protocol::from).unwrap_or(Protocol::None);
    let wire = required(node.features, "features")?;

    let management = required(wire.device_management_v1, "device_management_v1")?;
    let product_type = required(management.product_type, "device_management_v1.productType")?;
    let product_type = required(product_type.reported_value, "device_management_v1.productType.reportedValue")?;

    let has_heating = wire.heating_thermostat_v1.is_some();
    let mut features = FeatureMap::new();

    if let Some(block) = wire.battery_device_v1 {
        features.insert(battery_device(block)?);
    }
    if let Some(block) = wire.dimmable_light_v1 {
        features.insert(dimmable_light(block)?);
    }
    if let Some(block) = wire.heating_thermostat_v1 {
        features.insert(heating_thermostat(block)?);
    }
    if let Some(block) = wire.links_v1 {
        features.insert(links(block)?);
    }
    if let Some(block) = wire.on_off_device_v1 {
        features.insert(on_off_device(block)?);
    }
    if let Some(block) = wire.physical_device_v1 {
        features.insert(physical_device(block)?);
    }
    if let Some(block) = wire.temperature_sensor_v1 {
        features.insert(temperature_sensor(block)?);
    }
    if let Some(block) = wire.transient_mode_v1 {
        // The boost temperature lives in the transient action list but is
        // only meaningful on heating nodes.
        if has_heating {
            features.insert(heating_boost_actions(block.actions.clone())?);
        }
        features.insert(transient_mode(block)?);
    }
    if let Some(block) = wire.water_heater_v1 {
        features.insert(water_heater(block)?);
    }
    if let Some(block) = wire.zigbee_device_v1 {
        features.insert(zigbee_device(block)?);
    }

    Ok(Device::new(id, name, node_type, product_type, protocol, parent_id, features))
}

// =====================
// Attribute factories
// =====================

fn required<T>(value: Option<T>, what: &str) -> Result<T, HiveError> {
    value.ok_or_else(|| HiveError::malformed(format!("{what} is missing")))
}

/// Prefixes decode failures with where they happened.
fn context(ctx: impl fmt::Display) -> impl Fn(HiveError) -> HiveError {
    move |err| match err {
        HiveError::MalformedResponse(m) => HiveError::MalformedResponse(format!("{ctx}: {m}")),
        HiveError::Value(v) => HiveError::MalformedResponse(format!("{ctx}: {v}")),
        other => other,
    }
}

fn timestamp(millis: Option<i64>, what: &str) -> Result<DateTime<Utc>, HiveError> {
    let millis = required(millis, what)?;
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| HiveError::malformed(format!("{what} {millis} is out of range")))
}

fn attribute<F, T>(
    wire: Option<WireAttribute<F>>,
    adapt: impl Fn(F) -> Result<T, HiveError>,
) -> Result<Attribute<T>, HiveError> {
    let wire = required(wire, "attribute")?;
    let reported = required(wire.reported_value, "reportedValue")?;
    let display = required(wire.display_value, "displayValue")?;
    let changed = timestamp(wire.report_changed_time, "reportChangedTime")?;
    let received = timestamp(wire.report_received_time, "reportReceivedTime")?;
    Ok(Attribute::new(adapt(reported)?, adapt(display)?, changed, received))
}

fn read_only<F, T>(
    wire: Option<WireAttribute<F>>,
    field: &str,
    adapt: impl Fn(F) -> Result<T, HiveError>,
) -> Result<Attribute<T>, HiveError> {
    attribute(wire, adapt).map_err(context(field))
}

fn settable<F, T>(
    wire: Option<WireAttribute<F>>,
    field: &str,
    adapt: impl Fn(F) -> Result<T, HiveError>,
) -> Result<SettableAttribute<T>, HiveError> {
    read_only(wire, field, adapt).map(SettableAttribute::from)
}

fn same<T>(value: T) -> Result<T, HiveError> {
    Ok(value)
}

// =====================
// Value adapters
// =====================

fn temperature(raw: WireNumber) -> Result<Temperature, HiveError> {
    match raw {
        WireNumber::Number(v) => Ok(Temperature::celsius(v)?),
        WireNumber::Text(s) => Ok(Temperature::parse(&s)?),
    }
}

fn seconds(raw: i64) -> Result<Duration, HiveError> {
    u64::try_from(raw)
        .map(Duration::from_secs)
        .map_err(|_| HiveError::malformed(format!("duration {raw} is negative")))
}

fn transient_datetime(raw: String) -> Result<DateTime<FixedOffset>, HiveError> {
    DateTime::parse_from_str(&raw, TRANSIENT_DATETIME_FORMAT)
        .map_err(|e| HiveError::malformed(format!("{raw:?} is not a datetime ({e})")))
}

fn link_list(raw: Vec<WireLink>) -> Result<Vec<Link>, HiveError> {
    raw.into_iter()
        .map(|link| {
            Ok(Link {
                bound_node: required(link.bound_node, "boundNode")?,
                binding_group_id: required(link.binding_group_id, "bindingGroupId")?,
            })
        })
        .collect()
}

fn reverse_link_list(raw: Vec<WireReverseLink>) -> Result<Vec<ReverseLink>, HiveError> {
    raw.into_iter()
        .map(|link| {
            Ok(ReverseLink {
                bound_node: required(link.bound_node, "boundNode")?,
                binding_group_ids: link.binding_group_ids.unwrap_or_default(),
            })
        })
        .collect()
}

// =====================
// Feature blocks
// =====================

fn battery_device(w: WireBatteryDevice) -> Result<BatteryDeviceFeature, HiveError> {
    Ok(BatteryDeviceFeature {
        battery_level: read_only(w.battery_level, "battery_device_v1.batteryLevel", |v| {
            Ok(BatteryLevel::new(v)?)
        })?,
        battery_state: read_only(w.battery_state, "battery_device_v1.batteryState", same)?,
        battery_voltage: read_only(w.battery_voltage, "battery_device_v1.batteryVoltage", same)?,
        notification_state: read_only(w.notification_state, "battery_device_v1.notificationState", same)?,
    })
}

fn dimmable_light(w: WireDimmableLight) -> Result<DimmableLightFeature, HiveError> {
    Ok(DimmableLightFeature {
        brightness: settable(w.brightness, "dimmable_light_v1.brightness", |v| {
            Ok(BrightnessLevel::new(v)?)
        })?,
    })
}

fn heating_thermostat(w: WireHeatingThermostat) -> Result<HeatingThermostatFeature, HiveError> {
    Ok(HeatingThermostatFeature {
        operating_mode: settable(w.operating_mode, "heating_thermostat_v1.operatingMode", same)?,
        operating_state: read_only(w.operating_state, "heating_thermostat_v1.operatingState", same)?,
        target_heat_temperature: settable(
            w.target_heat_temperature,
            "heating_thermostat_v1.targetHeatTemperature",
            temperature,
        )?,
        temporary_operating_mode_override: settable(
            w.temporary_operating_mode_override,
            "heating_thermostat_v1.temporaryOperatingModeOverride",
            same,
        )?,
    })
}

fn links(w: WireLinks) -> Result<LinksFeature, HiveError> {
    let links = match w.links {
        Some(attr) => Some(read_only(Some(attr), "links_v1.links", link_list)?),
        None => None,
    };
    let reverse_links = match w.reverse_links {
        Some(attr) => Some(read_only(Some(attr), "links_v1.reverseLinks", reverse_link_list)?),
        None => None,
    };
    Ok(LinksFeature { links, reverse_links })
}

fn on_off_device(w: WireOnOffDevice) -> Result<OnOffDeviceFeature, HiveError> {
    Ok(OnOffDeviceFeature {
        mode: settable(w.mode, "on_off_device_v1.mode", same)?,
    })
}

fn physical_device(w: WirePhysicalDevice) -> Result<PhysicalDeviceFeature, HiveError> {
    let hardware_identifier = match (w.native_identifier, w.hardware_identifier) {
        (Some(native), _) => read_only(Some(native), "physical_device_v1.nativeIdentifier", same)?,
        (None, Some(hardware)) => {
            // Reported without timestamps.
            let reported = required(hardware.reported_value, "physical_device_v1.hardwareIdentifier.reportedValue")?;
            let display = required(hardware.display_value, "physical_device_v1.hardwareIdentifier.displayValue")?;
            let now = Utc::now();
            Attribute::new(reported, display, now, now)
        }
        (None, None) => {
            let now = Utc::now();
            Attribute::new(
                UNKNOWN_HARDWARE_IDENTIFIER.to_string(),
                UNKNOWN_HARDWARE_IDENTIFIER.to_string(),
                now,
                now,
            )
        }
    };

    Ok(PhysicalDeviceFeature {
        hardware_identifier,
        model: read_only(w.model, "physical_device_v1.model", same)?,
        manufacturer: read_only(w.manufacturer, "physical_device_v1.manufacturer", same)?,
        software_version: read_only(w.software_version, "physical_device_v1.softwareVersion", same)?,
    })
}

fn temperature_sensor(w: WireTemperatureSensor) -> Result<TemperatureSensorFeature, HiveError> {
    Ok(TemperatureSensorFeature {
        temperature: read_only(w.temperature, "temperature_sensor_v1.temperature", temperature)?,
    })
}

fn transient_mode(w: WireTransientMode) -> Result<TransientModeFeature, HiveError> {
    Ok(TransientModeFeature {
        duration: settable(w.duration, "transient_mode_v1.duration", seconds)?,
        is_enabled: settable(w.is_enabled, "transient_mode_v1.isEnabled", same)?,
        start_datetime: read_only(w.start_datetime, "transient_mode_v1.startDatetime", transient_datetime)?,
        end_datetime: read_only(w.end_datetime, "transient_mode_v1.endDatetime", transient_datetime)?,
    })
}

/// Synthesizes the boost target temperature from the first transient action.
///
/// The action list, its first entry and that entry's value are all required;
/// the attribute timestamps come from the `actions` attribute itself.
fn heating_boost_actions(
    actions: Option<WireAttribute<Vec<WireAction>>>,
) -> Result<TransientModeHeatingActionsFeature, HiveError> {
    const FIELD: &str = "transient_mode_v1.actions";

    let actions = required(actions, FIELD)?;
    let list = actions
        .reported_value
        .as_deref()
        .ok_or_else(|| HiveError::malformed(format!("{FIELD}.reportedValue is missing")))?;
    let first = list
        .first()
        .ok_or_else(|| HiveError::malformed(format!("{FIELD} list is empty")))?;
    let raw = first
        .value
        .as_deref()
        .ok_or_else(|| HiveError::malformed(format!("{FIELD}[0].value is missing")))?;
    let boost = Temperature::parse(raw).map_err(|e| HiveError::malformed(format!("{FIELD}[0].value: {e}")))?;

    Ok(TransientModeHeatingActionsFeature {
        boost_target_temperature: settable(Some(actions), FIELD, |_| Ok(boost))?,
    })
}

fn water_heater(w: WireWaterHeater) -> Result<WaterHeaterFeature, HiveError> {
    Ok(WaterHeaterFeature {
        operating_mode: settable(w.operating_mode, "water_heater_v1.operatingMode", same)?,
        is_on: read_only(w.is_on, "water_heater_v1.isOn", same)?,
        temporary_operating_mode_override: settable(
            w.temporary_operating_mode_override,
            "water_heater_v1.temporaryOperatingModeOverride",
            same,
        )?,
    })
}

fn zigbee_device(w: WireZigbeeDevice) -> Result<ZigbeeDeviceFeature, HiveError> {
    Ok(ZigbeeDeviceFeature {
        average_lqi: read_only(w.average_lqi, "zigbee_device_v1.averageLQI", same)?,
        last_known_lqi: read_only(w.last_known_lqi, "zigbee_device_v1.lastKnownLQI", same)?,
        average_rssi: read_only(w.average_rssi, "zigbee_device_v1.averageRSSI", same)?,
        last_known_rssi: read_only(w.last_known_rssi, "zigbee_device_v1.lastKnownRSSI", same)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureKind;
    use crate::values::{HeatingOperatingMode, NodeType, OnOffMode, ProductType};
    use chrono::TimeZone;
    use serde_json::{Value, json};

    fn load_fixture() -> WireNodes {
        let json = std::fs::read_to_string("tests/data/nodes.json").expect("fixture present");
        serde_json::from_str(&json).expect("parse nodes")
    }

    fn fixture_device(id: &str) -> Device {
        decode(load_fixture())
            .expect("decode fixture")
            .into_iter()
            .find(|d| d.id.0 == id)
            .expect("device in fixture")
    }

    fn attr(value: Value) -> Value {
        json!({
            "reportedValue": value,
            "displayValue": value,
            "reportChangedTime": 1583349200000_i64,
            "reportReceivedTime": 1583349227462_i64,
        })
    }

    /// A minimal valid node; `features` is merged on top of device management.
    fn node(features: Value) -> Value {
        let mut all = json!({ "device_management_v1": { "productType": attr(json!("HEATING")) } });
        if let (Some(target), Some(extra)) = (all.as_object_mut(), features.as_object()) {
            for (k, v) in extra {
                target.insert(k.clone(), v.clone());
            }
        }
        json!({
            "id": "node-1",
            "parentNodeId": "hub-1",
            "name": "Test",
            "nodeType": "http://alertme.com/schema/json/node.class.thermostat.json#",
            "protocol": "ZIGBEE",
            "features": all,
        })
    }

    fn decode_nodes(nodes: Vec<Value>) -> Result<Vec<Device>, HiveError> {
        let payload: WireNodes = serde_json::from_value(json!({ "nodes": nodes })).expect("wire shape");
        decode(payload)
    }

    fn transient_block(actions: Value) -> Value {
        json!({
            "actions": attr(actions),
            "duration": attr(json!(1800)),
            "isEnabled": attr(json!(false)),
            "startDatetime": attr(json!("2020-03-04T19:13:47.462+0000")),
            "endDatetime": attr(json!("2020-03-04T19:43:47.462+0000")),
        })
    }

    fn heating_block() -> Value {
        json!({
            "operatingMode": attr(json!("SCHEDULE")),
            "operatingState": attr(json!("HEAT")),
            "targetHeatTemperature": attr(json!(21)),
            "temporaryOperatingModeOverride": attr(json!("NONE")),
        })
    }

    fn assert_malformed(result: Result<Vec<Device>, HiveError>, needle: &str) {
        match result {
            Err(HiveError::MalformedResponse(msg)) => assert!(msg.contains(needle), "{msg}"),
            other => panic!("expected malformed response, got {other:?}"),
        }
    }

    #[test]
    fn decodes_fixture() {
        let devices = decode(load_fixture()).expect("decode fixture");
        assert_eq!(devices.len(), 5);
        assert!(devices.iter().all(|d| !d.has_pending_targets()));

        let heating = fixture_device("heating-1");
        assert_eq!(heating.node_type, NodeType::Thermostat);
        assert_eq!(heating.product_type, ProductType::Heating);
        assert_eq!(
            heating.features().kinds().collect::<Vec<_>>(),
            vec![
                FeatureKind::HeatingThermostat,
                FeatureKind::Links,
                FeatureKind::TemperatureSensor,
                FeatureKind::TransientMode,
                FeatureKind::TransientModeHeatingActions,
            ]
        );

        let thermostat = heating.feature::<HeatingThermostatFeature>().expect("heating");
        assert_eq!(*thermostat.operating_mode.display_value(), HeatingOperatingMode::Schedule);
        assert_eq!(*thermostat.target_heat_temperature.reported_value(), Temperature::celsius(21.0).expect("finite"));
        assert_eq!(thermostat.target_heat_temperature.target_value(), None);
        assert_eq!(
            thermostat.operating_mode.report_received_time(),
            Utc.timestamp_millis_opt(1583349227462).unwrap()
        );

        let sensor = heating.feature::<TemperatureSensorFeature>().expect("sensor");
        assert_eq!(*sensor.temperature.display_value(), Temperature::celsius(19.5).expect("finite"));

        let transient = heating.feature::<TransientModeFeature>().expect("transient");
        assert_eq!(*transient.duration.reported_value(), Duration::from_secs(1800));
        assert_eq!(
            transient.start_datetime.display_value().to_rfc3339(),
            "2020-03-04T19:13:47.462+00:00"
        );

        let boost = heating.feature::<TransientModeHeatingActionsFeature>().expect("boost");
        assert_eq!(*boost.boost_target_temperature.display_value(), Temperature::celsius(22.0).expect("finite"));
        assert_eq!(
            boost.boost_target_temperature.report_changed_time(),
            transient.duration.report_changed_time()
        );

        let links = heating.feature::<LinksFeature>().expect("links");
        assert_eq!(links.links().len(), 1);
        assert_eq!(links.links()[0].bound_node, NodeId("stat-ui-1".into()));
        assert!(links.reverse_links().is_empty());
    }

    #[test]
    fn decodes_other_fixture_devices() {
        let ui = fixture_device("stat-ui-1");
        let battery = ui.feature::<BatteryDeviceFeature>().expect("battery");
        assert_eq!(battery.battery_level.display_value().percent(), 80);
        assert_eq!(*battery.battery_voltage.reported_value(), 2.9);
        let zigbee = ui.feature::<ZigbeeDeviceFeature>().expect("zigbee");
        assert_eq!(*zigbee.last_known_rssi.display_value(), -64);
        let physical = ui.feature::<PhysicalDeviceFeature>().expect("physical");
        assert_eq!(physical.hardware_identifier.display_value(), "00158D0001A2B3C4");

        let light = fixture_device("light-1");
        assert_eq!(light.protocol, Protocol::Zigbee);
        let on_off = light.feature::<OnOffDeviceFeature>().expect("on/off");
        assert_eq!(*on_off.mode.reported_value(), OnOffMode::On);
        let dimmable = light.feature::<DimmableLightFeature>().expect("dimmable");
        assert_eq!(dimmable.brightness.display_value().percent(), 60);
    }

    #[test]
    fn transient_without_heating_has_no_boost_feature() {
        let hot_water = fixture_device("hotwater-1");
        assert!(hot_water.has_feature(FeatureKind::TransientMode));
        assert!(hot_water.has_feature(FeatureKind::WaterHeater));
        assert!(!hot_water.has_feature(FeatureKind::TransientModeHeatingActions));
        assert!(!hot_water.has_feature(FeatureKind::HeatingThermostat));
    }

    #[test]
    fn missing_protocol_defaults_to_none() {
        assert_eq!(fixture_device("hotwater-1").protocol, Protocol::None);
    }

    #[test]
    fn unknown_feature_blocks_are_ignored() {
        let hub = fixture_device("hub-1");
        assert_eq!(hub.features().kinds().collect::<Vec<_>>(), vec![FeatureKind::PhysicalDevice]);
    }

    #[test]
    fn hardware_identifier_fallbacks() {
        let hub = fixture_device("hub-1");
        let physical = hub.feature::<PhysicalDeviceFeature>().expect("physical");
        assert_eq!(physical.hardware_identifier.reported_value(), "001E5E0A1B2C");

        let base = json!({
            "model": attr(json!("SLR2")),
            "manufacturer": attr(json!("Computime")),
            "softwareVersion": attr(json!("09097720")),
        });
        let devices = decode_nodes(vec![node(json!({ "physical_device_v1": base }))]).expect("decode");
        let physical = devices[0].feature::<PhysicalDeviceFeature>().expect("physical");
        assert_eq!(physical.hardware_identifier.display_value(), UNKNOWN_HARDWARE_IDENTIFIER);
    }

    #[test]
    fn missing_product_type_is_malformed() {
        let mut raw = node(json!({}));
        raw["features"] = json!({ "on_off_device_v1": { "mode": attr(json!("ON")) } });
        assert_malformed(decode_nodes(vec![raw]), "node node-1: device_management_v1 is missing");

        let mut raw = node(json!({}));
        raw["features"]["device_management_v1"] = json!({});
        assert_malformed(decode_nodes(vec![raw]), "device_management_v1.productType is missing");
    }

    #[test]
    fn missing_required_node_fields_are_malformed() {
        for field in ["parentNodeId", "name", "nodeType", "features"] {
            let mut raw = node(json!({}));
            if let Some(obj) = raw.as_object_mut() {
                obj.remove(field);
            }
            assert_malformed(decode_nodes(vec![raw]), field);
        }

        let mut raw = node(json!({}));
        if let Some(obj) = raw.as_object_mut() {
            obj.remove("id");
        }
        assert_malformed(decode_nodes(vec![raw]), "node id is missing");

        let payload: WireNodes = serde_json::from_str(r#"{"nodes":null}"#).expect("wire shape");
        assert!(matches!(decode(payload), Err(HiveError::MalformedResponse(_))));
    }

    #[test]
    fn attribute_missing_timestamp_is_malformed() {
        let mut mode = attr(json!("ON"));
        if let Some(obj) = mode.as_object_mut() {
            obj.remove("reportChangedTime");
        }
        let raw = node(json!({ "on_off_device_v1": { "mode": mode } }));
        assert_malformed(decode_nodes(vec![raw]), "on_off_device_v1.mode: reportChangedTime is missing");
    }

    #[test]
    fn boost_action_without_value_is_malformed_on_heating_nodes() {
        let actions = json!([{
            "actionType": "http://alertme.com/schema/json/configuration/configuration.device.action.generic.json#",
            "featureType": "http://alertme.com/schema/json/feature/node.feature.heating_thermostat.v1.json#",
            "attribute": "targetHeatTemperature",
        }]);
        let raw = node(json!({
            "heating_thermostat_v1": heating_block(),
            "transient_mode_v1": transient_block(actions.clone()),
        }));
        assert_malformed(decode_nodes(vec![raw]), "transient_mode_v1.actions[0].value is missing");

        // Without a heating block the action list is not inspected.
        let raw = node(json!({ "transient_mode_v1": transient_block(actions) }));
        assert!(decode_nodes(vec![raw]).is_ok());
    }

    #[test]
    fn empty_boost_action_list_is_malformed_on_heating_nodes() {
        let raw = node(json!({
            "heating_thermostat_v1": heating_block(),
            "transient_mode_v1": transient_block(json!([])),
        }));
        assert_malformed(decode_nodes(vec![raw]), "list is empty");
    }

    #[test]
    fn battery_level_out_of_range_is_malformed() {
        let raw = node(json!({
            "battery_device_v1": {
                "batteryLevel": attr(json!(101)),
                "batteryState": attr(json!("NORMAL")),
                "batteryVoltage": attr(json!(3.0)),
                "notificationState": attr(json!("OK")),
            }
        }));
        assert_malformed(decode_nodes(vec![raw]), "battery_device_v1.batteryLevel: battery level 101");
    }

    #[test]
    fn temperature_accepts_numeric_strings() {
        let mut heating = heating_block();
        heating["targetHeatTemperature"] = attr(json!("18.5"));
        let devices = decode_nodes(vec![node(json!({ "heating_thermostat_v1": heating }))]).expect("decode");
        let feature = devices[0].feature::<HeatingThermostatFeature>().expect("heating");
        assert_eq!(*feature.target_heat_temperature.display_value(), Temperature::celsius(18.5).expect("finite"));
    }

    #[test]
    fn decode_one_cardinality() {
        let empty: WireNodes = serde_json::from_str(r#"{"nodes":[]}"#).expect("wire shape");
        assert_eq!(decode_one(empty).expect("decode"), None);

        let one: WireNodes = serde_json::from_value(json!({ "nodes": [node(json!({}))] })).expect("wire shape");
        let device = decode_one(one).expect("decode").expect("one device");
        assert!(device.features().is_empty());
        assert!(device.features().get_kind(FeatureKind::OnOffDevice).is_none());

        let two: WireNodes =
            serde_json::from_value(json!({ "nodes": [node(json!({})), node(json!({}))] })).expect("wire shape");
        assert!(matches!(decode_one(two), Err(HiveError::MalformedResponse(_))));
    }
}
