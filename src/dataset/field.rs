use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::dataset::DatasetError;
use crate::dataset::column::ColumnType;

/// Columns of the airport table, in storage order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AirportField {
    Name,
    Municipality,
    RegionCode,
    AirportType,
    ScheduledService,
    ElevationFt,
    LatitudeDeg,
    LongitudeDeg,
    /// Derived: characters in `name`
    NameLength,
    /// Derived: `elevation_ft` above the high-altitude threshold
    HighAltitude,
}

impl AirportField {
    pub const ALL: [AirportField; 10] = [
        AirportField::Name,
        AirportField::Municipality,
        AirportField::RegionCode,
        AirportField::AirportType,
        AirportField::ScheduledService,
        AirportField::ElevationFt,
        AirportField::LatitudeDeg,
        AirportField::LongitudeDeg,
        AirportField::NameLength,
        AirportField::HighAltitude,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Header used by the CSV source
    pub fn column_name(self) -> &'static str {
        match self {
            AirportField::Name => "name",
            AirportField::Municipality => "municipality",
            AirportField::RegionCode => "iso_region",
            AirportField::AirportType => "type",
            AirportField::ScheduledService => "scheduled_service",
            AirportField::ElevationFt => "elevation_ft",
            AirportField::LatitudeDeg => "latitude_deg",
            AirportField::LongitudeDeg => "longitude_deg",
            AirportField::NameLength => "name_length",
            AirportField::HighAltitude => "high_altitude",
        }
    }

    /// Alternative header accepted on load
    pub fn alias(self) -> Option<&'static str> {
        match self {
            AirportField::RegionCode => Some("region_code"),
            AirportField::AirportType => Some("airport_type"),
            _ => None,
        }
    }

    pub fn column_type(self) -> ColumnType {
        match self {
            AirportField::Name
            | AirportField::Municipality
            | AirportField::RegionCode
            | AirportField::AirportType
            | AirportField::ScheduledService => ColumnType::Str,
            AirportField::ElevationFt | AirportField::LatitudeDeg | AirportField::LongitudeDeg => {
                ColumnType::Float64
            }
            AirportField::NameLength => ColumnType::Int64,
            AirportField::HighAltitude => ColumnType::Bool,
        }
    }

    pub fn is_derived(self) -> bool {
        matches!(self, AirportField::NameLength | AirportField::HighAltitude)
    }
}

impl fmt::Display for AirportField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for AirportField {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AirportField::ALL
            .into_iter()
            .find(|f| f.column_name() == s || f.alias() == Some(s))
            .ok_or_else(|| DatasetError::UnknownField(s.to_string()))
    }
}
