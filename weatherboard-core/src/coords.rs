use serde::{Deserialize, Serialize};

/// Geographic coordinates. Values are opaque floats; no range check is done.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Used when geolocation is unavailable (Lviv, Ukraine).
    pub const FALLBACK: Coordinates = Coordinates {
        latitude: 49.842957,
        longitude: 24.031111,
    };

    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub const fn empty() -> Self {
        Self::new(0.0, 0.0)
    }
}
