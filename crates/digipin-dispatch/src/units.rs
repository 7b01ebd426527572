//! Emergency unit reference data
//!
//! The roster is read-only once built; runs only ever look units up.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use digipin_codec::{CoordError, GeoCoordinate};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, DispatchError};

/// Kind of responding unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitCategory {
    Ambulance,
    #[serde(rename = "Fire Truck")]
    FireTruck,
    Police,
}

impl UnitCategory {
    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            UnitCategory::Ambulance => "Ambulance",
            UnitCategory::FireTruck => "Fire Truck",
            UnitCategory::Police => "Police",
        }
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of emergency a caller reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmergencyType {
    Ambulance,
    Firefighter,
    Police,
}

impl EmergencyType {
    /// Unit category that answers this emergency
    pub fn unit_category(&self) -> UnitCategory {
        match self {
            EmergencyType::Ambulance => UnitCategory::Ambulance,
            EmergencyType::Firefighter => UnitCategory::FireTruck,
            EmergencyType::Police => UnitCategory::Police,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EmergencyType::Ambulance => "Ambulance",
            EmergencyType::Firefighter => "Firefighter",
            EmergencyType::Police => "Police",
        }
    }
}

impl fmt::Display for EmergencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EmergencyType {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ambulance" | "medical" => Ok(EmergencyType::Ambulance),
            "firefighter" | "fire" | "fire truck" => Ok(EmergencyType::Firefighter),
            "police" => Ok(EmergencyType::Police),
            _ => Err(DispatchError::UnknownEmergencyType(s.to_string())),
        }
    }
}

/// A responding unit and where it is stationed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UnitRecord", into = "UnitRecord")]
pub struct EmergencyUnit {
    pub id: String,
    pub category: UnitCategory,
    pub location: GeoCoordinate,
    pub station: String,
}

impl EmergencyUnit {
    pub fn new(
        id: impl Into<String>,
        category: UnitCategory,
        location: GeoCoordinate,
        station: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            location,
            station: station.into(),
        }
    }
}

/// Flat `{id, type, lat, lon, station}` form used in roster files
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UnitRecord {
    id: String,
    #[serde(rename = "type")]
    category: UnitCategory,
    lat: f64,
    lon: f64,
    station: String,
}

impl TryFrom<UnitRecord> for EmergencyUnit {
    type Error = CoordError;

    fn try_from(record: UnitRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            location: GeoCoordinate::new(record.lat, record.lon)?,
            id: record.id,
            category: record.category,
            station: record.station,
        })
    }
}

impl From<EmergencyUnit> for UnitRecord {
    fn from(unit: EmergencyUnit) -> Self {
        Self {
            lat: unit.location.latitude(),
            lon: unit.location.longitude(),
            id: unit.id,
            category: unit.category,
            station: unit.station,
        }
    }
}

/// Ordered, read-only list of stationed units
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    units: Vec<EmergencyUnit>,
}

impl Roster {
    pub fn new(units: Vec<EmergencyUnit>) -> Self {
        Self { units }
    }

    /// Parse a JSON array of `{id, type, lat, lon, station}` records
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a roster file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn units(&self) -> &[EmergencyUnit] {
        &self.units
    }

    /// Units of one category, in roster order
    pub fn of_category(&self, category: UnitCategory) -> impl Iterator<Item = &EmergencyUnit> {
        self.units.iter().filter(move |u| u.category == category)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Built-in stations across Delhi, Mumbai, Bangalore and Kolkata
    pub fn india_default() -> Self {
        use UnitCategory::*;

        const STATIONS: &[(&str, UnitCategory, f64, f64, &str)] = &[
            // Delhi
            ("AMB-DL1", Ambulance, 28.5665, 77.2105, "AIIMS Hospital, Delhi"),
            ("POL-DL1", Police, 28.6328, 77.2195, "Connaught Place Police Station"),
            ("ENG-DL1", FireTruck, 28.6324, 77.2170, "Delhi Fire Service HQ, CP"),
            ("AMB-DL2", Ambulance, 28.7041, 77.1025, "Max Hospital, Pitampura"),
            ("POL-DL2", Police, 28.5273, 77.2066, "Saket Police Station"),
            // Mumbai
            ("AMB-MH1", Ambulance, 19.043, 72.8633, "Sion Hospital, Mumbai"),
            ("POL-MH1", Police, 18.943, 72.835, "Colaba Police Station"),
            ("ENG-MH1", FireTruck, 19.076, 72.8777, "Bandra Fire Station"),
            ("AMB-MH2", Ambulance, 19.119, 72.847, "Nanavati Hospital, Vile Parle"),
            ("POL-MH2", Police, 19.138, 72.835, "Andheri Police Station"),
            // Bangalore
            ("AMB-KA1", Ambulance, 12.9716, 77.5946, "Victoria Hospital, Bangalore"),
            ("POL-KA1", Police, 12.9784, 77.5919, "Cubbon Park Police Station"),
            ("ENG-KA1", FireTruck, 12.9698, 77.5852, "High Grounds Fire Station"),
            ("AMB-KA2", Ambulance, 13.035, 77.597, "MS Ramaiah Hospital"),
            // Kolkata
            ("AMB-WB1", Ambulance, 22.5448, 88.3426, "SSKM Hospital, Kolkata"),
            ("POL-WB1", Police, 22.5697, 88.3697, "Lalbazar Police HQ"),
            ("ENG-WB1", FireTruck, 22.564, 88.343, "Fire Service HQ, Taltala"),
        ];

        let units = STATIONS
            .iter()
            .filter_map(|&(id, category, lat, lon, station)| {
                GeoCoordinate::new(lat, lon)
                    .ok()
                    .map(|location| EmergencyUnit::new(id, category, location, station))
            })
            .collect();

        Self { units }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster() {
        let roster = Roster::india_default();
        assert_eq!(roster.len(), 17);
        assert_eq!(roster.of_category(UnitCategory::FireTruck).count(), 4);
        assert_eq!(roster.of_category(UnitCategory::Ambulance).count(), 7);
        assert_eq!(roster.of_category(UnitCategory::Police).count(), 6);
    }

    #[test]
    fn test_emergency_type_parsing() {
        assert_eq!("Ambulance".parse::<EmergencyType>(), Ok(EmergencyType::Ambulance));
        assert_eq!(" firefighter ".parse::<EmergencyType>(), Ok(EmergencyType::Firefighter));
        assert_eq!("POLICE".parse::<EmergencyType>(), Ok(EmergencyType::Police));
        assert!(matches!(
            "plumber".parse::<EmergencyType>(),
            Err(DispatchError::UnknownEmergencyType(_))
        ));
    }

    #[test]
    fn test_emergency_maps_to_unit_category() {
        assert_eq!(EmergencyType::Firefighter.unit_category(), UnitCategory::FireTruck);
        assert_eq!(EmergencyType::Police.unit_category(), UnitCategory::Police);
    }

    #[test]
    fn test_roster_json_shape() {
        let json = r#"[
            {"id": "AMB-X", "type": "Ambulance", "lat": 10.0, "lon": 20.0, "station": "X"},
            {"id": "ENG-Y", "type": "Fire Truck", "lat": -5.5, "lon": 100.25, "station": "Y"}
        ]"#;
        let roster = Roster::from_json(json).unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.units()[1].category, UnitCategory::FireTruck);
        assert_eq!(roster.units()[1].location.as_tuple(), (-5.5, 100.25));

        let back: serde_json::Value = serde_json::to_value(&roster).unwrap();
        assert_eq!(back[0]["type"], "Ambulance");
        assert_eq!(back[1]["lon"], 100.25);
    }

    #[test]
    fn test_roster_rejects_bad_coordinates() {
        let json = r#"[{"id": "A", "type": "Police", "lat": 95.0, "lon": 0.0, "station": "S"}]"#;
        assert!(matches!(Roster::from_json(json), Err(ConfigError::Parse(_))));
    }
}
