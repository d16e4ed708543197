use std::convert::TryFrom;

use crate::{
    coords::Coordinates,
    error::CoreResult,
    language::Language,
    units::UnitSystem,
};

/// Where a request is aimed: a city name or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates(Coordinates),
}

impl LocationQuery {
    /// Provider query parameters selecting the location.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::City(name) => vec![("q", name.clone())],
            LocationQuery::Coordinates(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
        }
    }
}

/// Unit system and language sent with every request.
///
/// Setters validate before assigning, so an instance never holds an
/// unsupported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestSettings {
    units: UnitSystem,
    language: Language,
}

impl RequestSettings {
    pub fn new(units: UnitSystem, language: Language) -> Self {
        Self { units, language }
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_units(&mut self, value: &str) -> CoreResult<()> {
        self.units = UnitSystem::try_from(value)?;
        Ok(())
    }

    pub fn set_language(&mut self, value: &str) -> CoreResult<()> {
        self.language = Language::try_from(value)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub location: LocationQuery,
    pub settings: RequestSettings,
}
