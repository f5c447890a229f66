//! Device capability groups ("features") and the per-device feature registry.
//!
//! A device carries a sparse subset of the known [`FeatureKind`]s. Each
//! variant owns its attributes; "setting" a value goes through the
//! `with_target_*` builders, which return a new feature.

use crate::attribute::{Attribute, SettableAttribute};
use crate::values::{
    BatteryLevel, BrightnessLevel, GroupId, HeatingOperatingMode, HeatingOperatingState, NodeId, OnOffMode,
    OverrideMode, Temperature, WaterHeaterOperatingMode,
};
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureKind {
    BatteryDevice,
    DimmableLight,
    HeatingThermostat,
    Links,
    OnOffDevice,
    PhysicalDevice,
    TemperatureSensor,
    TransientMode,
    TransientModeHeatingActions,
    WaterHeater,
    ZigbeeDevice,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    BatteryDevice(BatteryDeviceFeature),
    DimmableLight(DimmableLightFeature),
    HeatingThermostat(HeatingThermostatFeature),
    Links(LinksFeature),
    OnOffDevice(OnOffDeviceFeature),
    PhysicalDevice(PhysicalDeviceFeature),
    TemperatureSensor(TemperatureSensorFeature),
    TransientMode(TransientModeFeature),
    TransientModeHeatingActions(TransientModeHeatingActionsFeature),
    WaterHeater(WaterHeaterFeature),
    ZigbeeDevice(ZigbeeDeviceFeature),
}

/// Typed access to one variant of [`Feature`].
pub trait FeatureVariant: Sized {
    const KIND: FeatureKind;

    fn from_feature(feature: &Feature) -> Option<&Self>;
    fn into_feature(self) -> Feature;
}

macro_rules! feature_variants {
    ($($variant:ident => $ty:ty),+ $(,)?) => {
        impl Feature {
            pub fn kind(&self) -> FeatureKind {
                match self {
                    $(Feature::$variant(_) => FeatureKind::$variant,)+
                }
            }

            /// Whether any settable attribute carries a pending target.
            pub fn has_targets(&self) -> bool {
                match self {
                    $(Feature::$variant(f) => f.has_targets(),)+
                }
            }
        }

        $(
            impl FeatureVariant for $ty {
                const KIND: FeatureKind = FeatureKind::$variant;

                fn from_feature(feature: &Feature) -> Option<&Self> {
                    match feature {
                        Feature::$variant(f) => Some(f),
                        _ => None,
                    }
                }

                fn into_feature(self) -> Feature {
                    Feature::$variant(self)
                }
            }

            impl From<$ty> for Feature {
                fn from(value: $ty) -> Self {
                    Feature::$variant(value)
                }
            }
        )+
    };
}

feature_variants! {
    BatteryDevice => BatteryDeviceFeature,
    DimmableLight => DimmableLightFeature,
    HeatingThermostat => HeatingThermostatFeature,
    Links => LinksFeature,
    OnOffDevice => OnOffDeviceFeature,
    PhysicalDevice => PhysicalDeviceFeature,
    TemperatureSensor => TemperatureSensorFeature,
    TransientMode => TransientModeFeature,
    TransientModeHeatingActions => TransientModeHeatingActionsFeature,
    WaterHeater => WaterHeaterFeature,
    ZigbeeDevice => ZigbeeDeviceFeature,
}

/// Features of one device, keyed by kind. At most one feature per kind.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureMap(BTreeMap<FeatureKind, Feature>);

impl FeatureMap {
    pub fn new() -> Self {
        FeatureMap::default()
    }

    /// Inserts or replaces the feature of the same kind.
    pub fn insert(&mut self, feature: impl Into<Feature>) {
        let feature = feature.into();
        self.0.insert(feature.kind(), feature);
    }

    pub fn get<T: FeatureVariant>(&self) -> Option<&T> {
        self.0.get(&T::KIND).and_then(T::from_feature)
    }

    pub fn get_kind(&self, kind: FeatureKind) -> Option<&Feature> {
        self.0.get(&kind)
    }

    pub fn contains(&self, kind: FeatureKind) -> bool {
        self.0.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = FeatureKind> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Feature> for FeatureMap {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        let mut map = FeatureMap::new();
        for feature in iter {
            map.insert(feature);
        }
        map
    }
}

// =====================
// Feature variants
// =====================

#[derive(Debug, Clone, PartialEq)]
pub struct BatteryDeviceFeature {
    pub battery_level: Attribute<BatteryLevel>,
    pub battery_state: Attribute<String>,
    /// Volts.
    pub battery_voltage: Attribute<f64>,
    pub notification_state: Attribute<String>,
}

impl BatteryDeviceFeature {
    fn has_targets(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OnOffDeviceFeature {
    pub mode: SettableAttribute<OnOffMode>,
}

impl OnOffDeviceFeature {
    pub fn with_target_mode(&self, mode: OnOffMode) -> Self {
        OnOffDeviceFeature {
            mode: self.mode.with_target(mode),
        }
    }

    fn has_targets(&self) -> bool {
        self.mode.has_target()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatingThermostatFeature {
    pub operating_mode: SettableAttribute<HeatingOperatingMode>,
    pub operating_state: Attribute<HeatingOperatingState>,
    pub target_heat_temperature: SettableAttribute<Temperature>,
    pub temporary_operating_mode_override: SettableAttribute<OverrideMode>,
}

impl HeatingThermostatFeature {
    pub fn with_target_operating_mode(&self, mode: HeatingOperatingMode) -> Self {
        HeatingThermostatFeature {
            operating_mode: self.operating_mode.with_target(mode),
            ..self.clone()
        }
    }

    pub fn with_target_heat_temperature(&self, temperature: Temperature) -> Self {
        HeatingThermostatFeature {
            target_heat_temperature: self.target_heat_temperature.with_target(temperature),
            ..self.clone()
        }
    }

    pub fn with_target_override(&self, mode: OverrideMode) -> Self {
        HeatingThermostatFeature {
            temporary_operating_mode_override: self.temporary_operating_mode_override.with_target(mode),
            ..self.clone()
        }
    }

    fn has_targets(&self) -> bool {
        self.operating_mode.has_target()
            || self.target_heat_temperature.has_target()
            || self.temporary_operating_mode_override.has_target()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureSensorFeature {
    pub temperature: Attribute<Temperature>,
}

impl TemperatureSensorFeature {
    fn has_targets(&self) -> bool {
        false
    }
}

/// Boost scheduling: how long a transient override lasts and whether it is on.
#[derive(Debug, Clone, PartialEq)]
pub struct TransientModeFeature {
    pub duration: SettableAttribute<Duration>,
    pub is_enabled: SettableAttribute<bool>,
    pub start_datetime: Attribute<DateTime<FixedOffset>>,
    pub end_datetime: Attribute<DateTime<FixedOffset>>,
}

impl TransientModeFeature {
    pub fn with_target_duration(&self, duration: Duration) -> Self {
        TransientModeFeature {
            duration: self.duration.with_target(duration),
            ..self.clone()
        }
    }

    pub fn with_target_enabled(&self, enabled: bool) -> Self {
        TransientModeFeature {
            is_enabled: self.is_enabled.with_target(enabled),
            ..self.clone()
        }
    }

    fn has_targets(&self) -> bool {
        self.duration.has_target() || self.is_enabled.has_target()
    }
}

/// Target temperature applied while a heating boost is active.
///
/// Lives inside the transient-mode action list on the wire, so it only exists
/// on devices that carry both the transient and the heating blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct TransientModeHeatingActionsFeature {
    pub boost_target_temperature: SettableAttribute<Temperature>,
}

impl TransientModeHeatingActionsFeature {
    pub fn with_target_boost_temperature(&self, temperature: Temperature) -> Self {
        TransientModeHeatingActionsFeature {
            boost_target_temperature: self.boost_target_temperature.with_target(temperature),
        }
    }

    fn has_targets(&self) -> bool {
        self.boost_target_temperature.has_target()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaterHeaterFeature {
    pub operating_mode: SettableAttribute<WaterHeaterOperatingMode>,
    pub is_on: Attribute<bool>,
    pub temporary_operating_mode_override: SettableAttribute<OverrideMode>,
}

impl WaterHeaterFeature {
    pub fn with_target_operating_mode(&self, mode: WaterHeaterOperatingMode) -> Self {
        WaterHeaterFeature {
            operating_mode: self.operating_mode.with_target(mode),
            ..self.clone()
        }
    }

    pub fn with_target_override(&self, mode: OverrideMode) -> Self {
        WaterHeaterFeature {
            temporary_operating_mode_override: self.temporary_operating_mode_override.with_target(mode),
            ..self.clone()
        }
    }

    fn has_targets(&self) -> bool {
        self.operating_mode.has_target() || self.temporary_operating_mode_override.has_target()
    }
}

/// Zigbee radio link quality diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ZigbeeDeviceFeature {
    pub average_lqi: Attribute<i64>,
    pub last_known_lqi: Attribute<i64>,
    pub average_rssi: Attribute<i64>,
    pub last_known_rssi: Attribute<i64>,
}

impl ZigbeeDeviceFeature {
    fn has_targets(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalDeviceFeature {
    pub hardware_identifier: Attribute<String>,
    pub model: Attribute<String>,
    pub manufacturer: Attribute<String>,
    pub software_version: Attribute<String>,
}

impl PhysicalDeviceFeature {
    fn has_targets(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    pub bound_node: NodeId,
    pub binding_group_id: GroupId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseLink {
    pub bound_node: NodeId,
    pub binding_group_ids: Vec<GroupId>,
}

/// Node-to-node links (e.g. TRV zone to its physical valve). Either side may be absent.
#[derive(Debug, Clone, PartialEq)]
pub struct LinksFeature {
    pub links: Option<Attribute<Vec<Link>>>,
    pub reverse_links: Option<Attribute<Vec<ReverseLink>>>,
}

impl LinksFeature {
    pub fn links(&self) -> &[Link] {
        self.links.as_ref().map(|a| a.display_value().as_slice()).unwrap_or_default()
    }

    pub fn reverse_links(&self) -> &[ReverseLink] {
        self.reverse_links
            .as_ref()
            .map(|a| a.display_value().as_slice())
            .unwrap_or_default()
    }

    fn has_targets(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimmableLightFeature {
    pub brightness: SettableAttribute<BrightnessLevel>,
}

impl DimmableLightFeature {
    pub fn with_target_brightness(&self, brightness: BrightnessLevel) -> Self {
        DimmableLightFeature {
            brightness: self.brightness.with_target(brightness),
        }
    }

    fn has_targets(&self) -> bool {
        self.brightness.has_target()
    }
}
