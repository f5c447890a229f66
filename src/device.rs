//! Device ("node") snapshots.

use crate::feature::{
    BatteryDeviceFeature, DimmableLightFeature, Feature, FeatureKind, FeatureMap, FeatureVariant,
    HeatingThermostatFeature, LinksFeature, OnOffDeviceFeature, PhysicalDeviceFeature, TemperatureSensorFeature,
    TransientModeFeature, TransientModeHeatingActionsFeature, WaterHeaterFeature, ZigbeeDeviceFeature,
};
use crate::values::{NodeId, NodeName, NodeType, ProductType, Protocol};

/// One device as last reported by the API.
///
/// Snapshots are replaced wholesale: every list/get/update returns fresh
/// values. Local changes are made with [`Device::with_feature`], which returns
/// a new snapshot carrying the modified feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub id: NodeId,
    pub name: NodeName,
    pub node_type: NodeType,
    pub product_type: ProductType,
    pub protocol: Protocol,
    pub parent_id: NodeId,
    features: FeatureMap,
}

impl Device {
    pub fn new(
        id: NodeId,
        name: NodeName,
        node_type: NodeType,
        product_type: ProductType,
        protocol: Protocol,
        parent_id: NodeId,
        features: FeatureMap,
    ) -> Self {
        Device {
            id,
            name,
            node_type,
            product_type,
            protocol,
            parent_id,
            features,
        }
    }

    pub fn features(&self) -> &FeatureMap {
        &self.features
    }

    /// `None` means the device does not support this capability.
    pub fn feature<T: FeatureVariant>(&self) -> Option<&T> {
        self.features.get::<T>()
    }

    pub fn battery(&self) -> Option<&BatteryDeviceFeature> {
        self.feature()
    }

    pub fn dimmable_light(&self) -> Option<&DimmableLightFeature> {
        self.feature()
    }

    pub fn heating_thermostat(&self) -> Option<&HeatingThermostatFeature> {
        self.feature()
    }

    pub fn heating_boost(&self) -> Option<&TransientModeHeatingActionsFeature> {
        self.feature()
    }

    pub fn links(&self) -> Option<&LinksFeature> {
        self.feature()
    }

    pub fn on_off(&self) -> Option<&OnOffDeviceFeature> {
        self.feature()
    }

    pub fn physical_device(&self) -> Option<&PhysicalDeviceFeature> {
        self.feature()
    }

    pub fn temperature_sensor(&self) -> Option<&TemperatureSensorFeature> {
        self.feature()
    }

    pub fn transient_mode(&self) -> Option<&TransientModeFeature> {
        self.feature()
    }

    pub fn water_heater(&self) -> Option<&WaterHeaterFeature> {
        self.feature()
    }

    pub fn zigbee(&self) -> Option<&ZigbeeDeviceFeature> {
        self.feature()
    }

    pub fn has_feature(&self, kind: FeatureKind) -> bool {
        self.features.contains(kind)
    }

    /// Returns a copy of this device with `feature` replacing the one of the same kind.
    pub fn with_feature(&self, feature: impl Into<Feature>) -> Self {
        let mut features = self.features.clone();
        features.insert(feature);
        Device {
            features,
            ..self.clone()
        }
    }

    /// Whether any feature carries a target value waiting to be sent.
    pub fn has_pending_targets(&self) -> bool {
        self.features.iter().any(Feature::has_targets)
    }
}
