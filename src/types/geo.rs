use thiserror::Error;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use solar_resource::LatLon;
///
/// let madrid = LatLon(40.4168, -3.7038);
/// assert_eq!(madrid.0, 40.4168); // Latitude
/// assert_eq!(madrid.1, -3.7038); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("{field} {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Site coordinates of the project a climatology is loaded for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectGeo {
    latitude: f64,
    longitude: f64,
    altitude: f64,
}

fn check(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, GeoError> {
    // NaN fails both comparisons
    if value >= min && value <= max {
        Ok(value)
    } else {
        Err(GeoError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl ProjectGeo {
    /// Validates latitude in [-90, 90], longitude in [-180, 180] and altitude in
    /// [0, 3000] metres above sea level.
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Result<Self, GeoError> {
        Ok(Self {
            latitude: check("latitude", latitude, -90.0, 90.0)?,
            longitude: check("longitude", longitude, -180.0, 180.0)?,
            altitude: check("altitude", altitude, 0.0, 3000.0)?,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    pub fn lat_lon(&self) -> LatLon {
        LatLon(self.latitude, self.longitude)
    }
}
