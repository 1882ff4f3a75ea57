//! Ordered catalog of the devices installed in a house.

use std::collections::HashMap;

use super::types::{DeviceKey, DeviceSpec};

/// Static device catalog, in configuration order, indexed by [`DeviceKey`].
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    specs: Vec<DeviceSpec>,
    index: HashMap<DeviceKey, usize>,
}

impl DeviceRegistry {
    /// Builds a registry from device descriptors.
    ///
    /// A later descriptor with an already-registered key is ignored; config
    /// validation reports duplicates before this point.
    pub fn new(specs: impl IntoIterator<Item = DeviceSpec>) -> Self {
        let mut registry = Self::default();
        for spec in specs {
            if registry.index.contains_key(&spec.key) {
                continue;
            }
            registry.index.insert(spec.key.clone(), registry.specs.len());
            registry.specs.push(spec);
        }
        registry
    }

    pub fn get(&self, key: &DeviceKey) -> Option<&DeviceSpec> {
        self.index.get(key).map(|&i| &self.specs[i])
    }

    /// Position of `key` in configuration order.
    pub fn position(&self, key: &DeviceKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Whether the device physically exists in that room.
    pub fn contains(&self, key: &DeviceKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeviceSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::types::{DeviceKind, WaterFlow};

    fn spec(room: &str, name: &str) -> DeviceSpec {
        DeviceSpec {
            key: DeviceKey::new(room, name),
            kind: DeviceKind::Water,
            power_watts: 0.0,
            water_flow: Some(WaterFlow::PerUse(1.0)),
            max_uses_per_day: None,
            typical_duration_minutes: None,
            hot_water: false,
        }
    }

    #[test]
    fn keeps_configuration_order() {
        let reg = DeviceRegistry::new([spec("Kitchen", "sink"), spec("Bathroom", "sink")]);
        let rooms: Vec<&str> = reg.iter().map(|d| d.key.room.as_str()).collect();
        assert_eq!(rooms, vec!["kitchen", "bathroom"]);
        assert_eq!(reg.position(&DeviceKey::new("bathroom", "sink")), Some(1));
    }

    #[test]
    fn same_name_in_other_room_is_not_present() {
        let reg = DeviceRegistry::new([spec("Kitchen", "sink")]);
        assert!(reg.contains(&DeviceKey::new("Kitchen", "Sink")));
        assert!(!reg.contains(&DeviceKey::new("Bathroom", "sink")));
    }

    #[test]
    fn duplicate_keys_keep_first() {
        let mut second = spec("Kitchen", "sink");
        second.water_flow = Some(WaterFlow::PerUse(9.0));
        let reg = DeviceRegistry::new([spec("Kitchen", "sink"), second]);
        assert_eq!(reg.len(), 1);
        assert_eq!(
            reg.get(&DeviceKey::new("kitchen", "sink")).and_then(|d| d.water_flow),
            Some(WaterFlow::PerUse(1.0))
        );
    }
}
