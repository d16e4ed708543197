use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

use crate::error::CoreError;

/// Unit system requested from the provider.
///
/// The provider returns values already converted; this type only decides which
/// suffix is appended when a value is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Standard,
    #[default]
    Metric,
    Imperial,
}

/// Kind of quantity a suffix is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantityKind {
    Temperature,
    Speed,
    Pressure,
    Percent,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Standard => "standard",
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Standard, UnitSystem::Metric, UnitSystem::Imperial]
    }

    pub fn suffix(&self, kind: QuantityKind) -> &'static str {
        suffix_for(kind, *self)
    }
}

impl QuantityKind {
    pub const fn all() -> &'static [QuantityKind] {
        &[
            QuantityKind::Temperature,
            QuantityKind::Speed,
            QuantityKind::Pressure,
            QuantityKind::Percent,
        ]
    }

    /// Text placed between the number and its suffix ("4 m/s" but "23°C").
    fn separator(&self) -> &'static str {
        match self {
            QuantityKind::Speed | QuantityKind::Pressure => " ",
            QuantityKind::Temperature | QuantityKind::Percent => "",
        }
    }
}

/// Display suffix for a quantity in the given unit system.
pub fn suffix_for(kind: QuantityKind, units: UnitSystem) -> &'static str {
    match (kind, units) {
        (QuantityKind::Temperature, UnitSystem::Standard) => "K",
        (QuantityKind::Temperature, UnitSystem::Metric) => "°C",
        (QuantityKind::Temperature, UnitSystem::Imperial) => "°F",
        (QuantityKind::Speed, UnitSystem::Imperial) => "mph",
        (QuantityKind::Speed, _) => "m/s",
        (QuantityKind::Pressure, _) => "hPa",
        (QuantityKind::Percent, _) => "%",
    }
}

/// Rounds to the nearest integer, ties away from zero. Never yields `-0`.
pub fn round_display(value: f64) -> f64 {
    let rounded = value.round();
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// `"<rounded value><suffix>"`, e.g. `"23°C"` or `"4 m/s"`.
pub fn format_quantity(value: f64, kind: QuantityKind, units: UnitSystem) -> String {
    format!(
        "{:.0}{}{}",
        round_display(value),
        kind.separator(),
        suffix_for(kind, units)
    )
}

/// Same as [`format_quantity`] but keeps absent values absent.
pub fn format_optional(value: Option<f64>, kind: QuantityKind, units: UnitSystem) -> Option<String> {
    value.map(|v| format_quantity(v, kind, units))
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "standard" => Ok(UnitSystem::Standard),
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(CoreError::unsupported(format!(
                "Unit system '{value}' is not supported. Supported: standard, metric, imperial."
            ))),
        }
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitSystem::try_from(s)
    }
}
