//! Device with pending targets → minimal partial-update payload.
//!
//! Only settable attributes that carry a target are written, and only as
//! `targetValue`. Read-only attributes and untouched settable ones never
//! appear, so a device without targets encodes to an empty `features` object.

use crate::attribute::SettableAttribute;
use crate::device::Device;
use crate::feature::{
    DimmableLightFeature, Feature, FeatureKind, HeatingThermostatFeature, OnOffDeviceFeature, TransientModeFeature,
    TransientModeHeatingActionsFeature, WaterHeaterFeature,
};
use crate::models::hive::{
    WireAction, WireAttribute, WireDimmableLight, WireFeatures, WireHeatingThermostat, WireNode, WireNodes,
    WireNumber, WireOnOffDevice, WireTransientMode, WireWaterHeater,
};
use crate::values::{ATTRIBUTE_TARGET_HEAT_TEMPERATURE, ActionType, FeatureType, Temperature};
use log::warn;
use std::collections::BTreeMap;
use std::time::Duration;

/// Builds the `PUT nodes/{id}` body for `device`.
pub fn diff(device: &Device) -> WireNodes {
    WireNodes {
        nodes: Some(vec![Some(WireNode {
            features: Some(diff_features(device)),
            ..WireNode::default()
        })]),
    }
}

/// The feature blocks of the partial update; empty when nothing is pending.
pub fn diff_features(device: &Device) -> WireFeatures {
    let mut features = WireFeatures::default();
    let mut transient = TransientFragment::default();

    for feature in device.features().iter() {
        match feature {
            Feature::DimmableLight(f) => features.dimmable_light_v1 = dimmable_light(f),
            Feature::HeatingThermostat(f) => features.heating_thermostat_v1 = heating_thermostat(f),
            Feature::OnOffDevice(f) => features.on_off_device_v1 = on_off_device(f),
            Feature::TransientMode(f) => transient.add_transient_mode(f),
            Feature::TransientModeHeatingActions(f) => transient.add_heating_actions(f),
            Feature::WaterHeater(f) => features.water_heater_v1 = water_heater(f),
            Feature::BatteryDevice(_)
            | Feature::Links(_)
            | Feature::PhysicalDevice(_)
            | Feature::TemperatureSensor(_)
            | Feature::ZigbeeDevice(_) => {}
        }
    }

    features.transient_mode_v1 = transient.finish();
    features
}

fn target<T: Clone>(attr: &SettableAttribute<T>) -> Option<WireAttribute<T>> {
    attr.target_value().cloned().map(WireAttribute::target)
}

fn non_empty<T: Default + PartialEq>(block: T) -> Option<T> {
    (block != T::default()).then_some(block)
}

fn temperature(value: Temperature) -> WireNumber {
    WireNumber::Number(value.as_celsius())
}

/// Whole seconds, never below one.
fn duration_seconds(duration: Duration) -> i64 {
    i64::try_from(duration.as_secs()).unwrap_or(i64::MAX).max(1)
}

fn dimmable_light(f: &DimmableLightFeature) -> Option<WireDimmableLight> {
    non_empty(WireDimmableLight {
        brightness: f
            .brightness
            .target_value()
            .map(|b| WireAttribute::target(i64::from(b.percent()))),
    })
}

fn heating_thermostat(f: &HeatingThermostatFeature) -> Option<WireHeatingThermostat> {
    non_empty(WireHeatingThermostat {
        operating_mode: target(&f.operating_mode),
        operating_state: None,
        target_heat_temperature: f
            .target_heat_temperature
            .target_value()
            .map(|t| WireAttribute::target(temperature(*t))),
        temporary_operating_mode_override: target(&f.temporary_operating_mode_override),
    })
}

fn on_off_device(f: &OnOffDeviceFeature) -> Option<WireOnOffDevice> {
    non_empty(WireOnOffDevice { mode: target(&f.mode) })
}

fn water_heater(f: &WaterHeaterFeature) -> Option<WireWaterHeater> {
    non_empty(WireWaterHeater {
        operating_mode: target(&f.operating_mode),
        is_on: None,
        temporary_operating_mode_override: target(&f.temporary_operating_mode_override),
    })
}

/// The `transient_mode_v1` block, which two features write into.
///
/// `TransientMode` owns `duration` and `isEnabled`; the heating boost owns
/// `actions`. Contributions are merged per attribute key. Should two features
/// ever claim the same key, the later one in feature-kind order wins.
#[derive(Default)]
struct TransientFragment {
    block: WireTransientMode,
    writers: BTreeMap<&'static str, FeatureKind>,
}

impl TransientFragment {
    fn claim(&mut self, key: &'static str, writer: FeatureKind) {
        if let Some(previous) = self.writers.insert(key, writer)
            && previous != writer
        {
            warn!("transient_mode_v1.{key} from {previous:?} overwritten by {writer:?}");
        }
    }

    fn add_transient_mode(&mut self, f: &TransientModeFeature) {
        if let Some(duration) = f.duration.target_value() {
            self.claim("duration", FeatureKind::TransientMode);
            self.block.duration = Some(WireAttribute::target(duration_seconds(*duration)));
        }
        if let Some(enabled) = f.is_enabled.target_value() {
            self.claim("isEnabled", FeatureKind::TransientMode);
            self.block.is_enabled = Some(WireAttribute::target(*enabled));
        }
    }

    fn add_heating_actions(&mut self, f: &TransientModeHeatingActionsFeature) {
        if let Some(boost) = f.boost_target_temperature.target_value() {
            self.claim("actions", FeatureKind::TransientModeHeatingActions);
            let action = WireAction {
                action_type: Some(ActionType::Generic),
                feature_type: Some(FeatureType::HeatingThermostat),
                attribute: Some(ATTRIBUTE_TARGET_HEAT_TEMPERATURE.to_string()),
                value: Some(boost.to_wire_string()),
            };
            self.block.actions = Some(WireAttribute::target(vec![action]));
        }
    }

    fn finish(self) -> Option<WireTransientMode> {
        (!self.writers.is_empty()).then_some(self.block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode::decode;
    use crate::values::{BrightnessLevel, HeatingOperatingMode, OnOffMode, OverrideMode, WaterHeaterOperatingMode};
    use serde_json::json;

    fn fixture_device(id: &str) -> Device {
        let json = std::fs::read_to_string("tests/data/nodes.json").expect("fixture present");
        decode(serde_json::from_str(&json).expect("parse nodes"))
            .expect("decode fixture")
            .into_iter()
            .find(|d| d.id.0 == id)
            .expect("device in fixture")
    }

    fn heating() -> Device {
        fixture_device("heating-1")
    }

    fn features_json(device: &Device) -> serde_json::Value {
        serde_json::to_value(diff_features(device)).expect("serialize")
    }

    #[test]
    fn no_pending_targets_encode_to_empty_payload() {
        for id in ["hub-1", "heating-1", "stat-ui-1", "hotwater-1", "light-1"] {
            let device = fixture_device(id);
            assert!(diff_features(&device).is_empty(), "{id}");
        }
        let body = serde_json::to_value(diff(&heating())).expect("serialize");
        assert_eq!(body, json!({ "nodes": [{ "features": {} }] }));
    }

    #[test]
    fn only_targeted_fields_are_written() {
        let device = heating();
        let thermostat = device
            .feature::<HeatingThermostatFeature>()
            .expect("heating")
            .with_target_heat_temperature(Temperature::celsius(22.5).expect("finite"))
            .with_target_operating_mode(HeatingOperatingMode::Manual);
        let updated = device.with_feature(thermostat);

        assert_eq!(
            features_json(&updated),
            json!({
                "heating_thermostat_v1": {
                    "operatingMode": { "targetValue": "MANUAL" },
                    "targetHeatTemperature": { "targetValue": 22.5 },
                }
            })
        );
        // The source snapshot is untouched.
        assert!(diff_features(&device).is_empty());
    }

    #[test]
    fn explicit_target_is_sent_even_when_it_matches_reported() {
        let device = heating();
        let current = device.heating_thermostat().expect("heating");
        let reported = *current.target_heat_temperature.reported_value();
        let thermostat = current.with_target_heat_temperature(reported);

        assert_eq!(
            features_json(&device.with_feature(thermostat.clone())),
            json!({ "heating_thermostat_v1": { "targetHeatTemperature": { "targetValue": 21.0 } } })
        );

        let cleared = HeatingThermostatFeature {
            target_heat_temperature: thermostat.target_heat_temperature.without_target(),
            ..thermostat
        };
        assert!(diff_features(&device.with_feature(cleared)).is_empty());
    }

    #[test]
    fn zero_duration_is_clamped_to_one_second() {
        let device = heating();
        let transient = device
            .feature::<TransientModeFeature>()
            .expect("transient")
            .with_target_duration(Duration::ZERO);

        assert_eq!(
            features_json(&device.with_feature(transient)),
            json!({ "transient_mode_v1": { "duration": { "targetValue": 1 } } })
        );
        assert_eq!(duration_seconds(Duration::from_millis(2500)), 2);
    }

    #[test]
    fn transient_and_boost_targets_share_one_block() {
        let device = heating();
        let transient = device
            .feature::<TransientModeFeature>()
            .expect("transient")
            .with_target_duration(Duration::from_secs(3600))
            .with_target_enabled(true);
        let boost = device
            .feature::<TransientModeHeatingActionsFeature>()
            .expect("boost")
            .with_target_boost_temperature(Temperature::celsius(23.0).expect("finite"));
        let thermostat = device
            .feature::<HeatingThermostatFeature>()
            .expect("heating")
            .with_target_override(OverrideMode::Transient);
        let updated = device.with_feature(transient).with_feature(boost).with_feature(thermostat);

        assert_eq!(
            features_json(&updated),
            json!({
                "heating_thermostat_v1": {
                    "temporaryOperatingModeOverride": { "targetValue": "TRANSIENT" },
                },
                "transient_mode_v1": {
                    "actions": { "targetValue": [{
                        "actionType": "http://alertme.com/schema/json/configuration/configuration.device.action.generic.json#",
                        "featureType": "http://alertme.com/schema/json/feature/node.feature.heating_thermostat.v1.json#",
                        "attribute": "targetHeatTemperature",
                        "value": "23",
                    }] },
                    "duration": { "targetValue": 3600 },
                    "isEnabled": { "targetValue": true },
                }
            })
        );
    }

    #[test]
    fn other_settable_features() {
        let light = fixture_device("light-1");
        let on_off = light
            .feature::<OnOffDeviceFeature>()
            .expect("on/off")
            .with_target_mode(OnOffMode::Off);
        let dimmable = light
            .feature::<DimmableLightFeature>()
            .expect("dimmable")
            .with_target_brightness(BrightnessLevel::new(35).expect("valid"));
        assert_eq!(
            features_json(&light.with_feature(on_off).with_feature(dimmable)),
            json!({
                "dimmable_light_v1": { "brightness": { "targetValue": 35 } },
                "on_off_device_v1": { "mode": { "targetValue": "OFF" } },
            })
        );

        let hot_water = fixture_device("hotwater-1");
        let heater = hot_water
            .feature::<WaterHeaterFeature>()
            .expect("water heater")
            .with_target_operating_mode(WaterHeaterOperatingMode::On);
        assert_eq!(
            features_json(&hot_water.with_feature(heater)),
            json!({ "water_heater_v1": { "operatingMode": { "targetValue": "ON" } } })
        );
    }
}
