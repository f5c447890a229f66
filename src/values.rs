//! Scalar domain values carried by device attributes.
//!
//! Notes
//! - Enumerated values the API sends but this crate does not know are kept as
//!   `Other(String)` instead of failing the whole decode.
//! - Bounded values (`BatteryLevel`, `BrightnessLevel`) validate on construction.

use crate::error::ValueError;
use serde::{Deserialize, Serialize};
use std::fmt;

// =====================
// Identifier newtype wrappers
// =====================

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeName(pub String);

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

// =====================
// String enums with an open `Other` variant
// =====================

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Other(s) => s.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $($wire => $name::$variant,)+
                    _ => $name::Other(value),
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name::from(value.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(s) => s,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Device class, sent by the API as a schema URI.
    NodeType {
        Hub => "http://alertme.com/schema/json/node.class.hub.json#",
        Thermostat => "http://alertme.com/schema/json/node.class.thermostat.json#",
        ThermostatUi => "http://alertme.com/schema/json/node.class.thermostatui.json#",
        RadiatorValve => "http://alertme.com/schema/json/node.class.trv.json#",
        Light => "http://alertme.com/schema/json/node.class.light.json#",
        SmartPlug => "http://alertme.com/schema/json/node.class.smartplug.json#",
        Synthetic => "http://alertme.com/schema/json/node.class.synthetic.json#",
    }
}

string_enum! {
    ProductType {
        BoilerModule => "BOILER_MODULE",
        DaylightSd => "DAYLIGHT_SD",
        Heating => "HEATING",
        HotWater => "HOT_WATER",
        Hub => "HUB",
        ThermostatUi => "THERMOSTAT_UI",
        Trv => "TRV",
        TrvGroup => "TRV_GROUP",
    }
}

string_enum! {
    /// Transport protocol a node speaks; `None` when the API omits it.
    Protocol {
        Synthetic => "SYNTHETIC",
        Zigbee => "ZIGBEE",
        Proxied => "PROXIED",
        Mqtt => "MQTT",
        Xmpp => "XMPP",
        Virtual => "VIRTUAL",
        None => "NONE",
    }
}

string_enum! {
    OnOffMode {
        On => "ON",
        Off => "OFF",
    }
}

string_enum! {
    HeatingOperatingMode {
        Schedule => "SCHEDULE",
        Manual => "MANUAL",
        Off => "OFF",
    }
}

string_enum! {
    HeatingOperatingState {
        Heat => "HEAT",
        Off => "OFF",
    }
}

string_enum! {
    WaterHeaterOperatingMode {
        Schedule => "SCHEDULE",
        On => "ON",
        Off => "OFF",
    }
}

string_enum! {
    /// Temporary override on top of the operating mode; `Transient` is "boost".
    OverrideMode {
        None => "NONE",
        Transient => "TRANSIENT",
    }
}

string_enum! {
    ActionType {
        Generic => "http://alertme.com/schema/json/configuration/configuration.device.action.generic.json#",
    }
}

string_enum! {
    FeatureType {
        HeatingThermostat => "http://alertme.com/schema/json/feature/node.feature.heating_thermostat.v1.json#",
        WaterHeater => "http://alertme.com/schema/json/feature/node.feature.water_heater.v1.json#",
        OnOffDevice => "http://alertme.com/schema/json/feature/node.feature.on_off_device.v1.json#",
        TransientMode => "http://alertme.com/schema/json/feature/node.feature.transient_mode.v1.json#",
    }
}

/// Name of the heating attribute targeted by a boost action.
pub const ATTRIBUTE_TARGET_HEAT_TEMPERATURE: &str = "targetHeatTemperature";

// =====================
// Bounded numeric values
// =====================

fn bounded_percentage(name: &'static str, value: i64) -> Result<u8, ValueError> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= 100)
        .ok_or(ValueError::OutOfRange {
            name,
            min: 0,
            max: 100,
            actual: value,
        })
}

/// Battery charge in percent, 0–100 inclusive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatteryLevel(u8);

impl BatteryLevel {
    pub fn new(value: i64) -> Result<Self, ValueError> {
        bounded_percentage("battery level", value).map(BatteryLevel)
    }

    pub fn percent(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for BatteryLevel {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        BatteryLevel::new(value)
    }
}

impl fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Light brightness in percent, 0–100 inclusive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BrightnessLevel(u8);

impl BrightnessLevel {
    pub fn new(value: i64) -> Result<Self, ValueError> {
        bounded_percentage("brightness level", value).map(BrightnessLevel)
    }

    pub fn percent(self) -> u8 {
        self.0
    }
}

impl fmt::Display for BrightnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// A temperature in degrees Celsius (the only unit the API reports).
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Temperature(f64);

impl Temperature {
    /// Rejects NaN and infinities, which have no JSON form.
    pub fn celsius(value: f64) -> Result<Self, ValueError> {
        if value.is_finite() {
            Ok(Temperature(value))
        } else {
            Err(ValueError::NotFinite {
                name: "temperature",
                actual: value,
            })
        }
    }

    /// Parses the numeric strings the API uses inside action lists.
    pub fn parse(raw: &str) -> Result<Self, ValueError> {
        let value = raw.trim().parse::<f64>().map_err(|_| ValueError::NotANumber {
            name: "temperature",
            raw: raw.to_string(),
        })?;
        Temperature::celsius(value)
    }

    pub fn as_celsius(self) -> f64 {
        self.0
    }

    /// Wire form used for action values, e.g. `"21.5"`.
    pub fn to_wire_string(self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\u{00B0}C", self.0)
    }
}
