//! Wire models for the postal code pipeline.
//!
//! Request and response bodies of both services, plus the subset of the
//! address and weather provider payloads the pipeline reads.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize, Serializer};

/// Body of `POST /cep` on the edge service
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct CepRequest {
    /// Eight digit postal code; formatting characters are ignored
    pub cep: String,
}

/// Address as returned by the address provider (`/ws/{cep}/json/`).
///
/// Every field defaults to empty so that the provider's
/// `{"erro": true}` not-found body decodes into an empty record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressRecord {
    pub cep: String,
    #[serde(rename = "logradouro")]
    pub street: String,
    #[serde(rename = "bairro")]
    pub district: String,
    #[serde(rename = "localidade")]
    pub locality: String,
    #[serde(rename = "uf")]
    pub region: String,
}

impl AddressRecord {
    /// Whether the record identifies a place the weather lookup can use
    pub fn is_resolved(&self) -> bool {
        !self.cep.trim().is_empty() && !self.locality.trim().is_empty()
    }
}

/// Current conditions as returned by the weather provider
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherSample {
    pub current: CurrentWeather,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeather {
    pub temp_c: f64,
    /// Provider-side conversion; never used, Fahrenheit is derived locally
    #[serde(default)]
    pub temp_f: Option<f64>,
}

/// A temperature in the three scales the pipeline reports
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureReading {
    pub celsius: f64,
    pub fahrenheit: f64,
    pub kelvin: f64,
}

/// Response body of both services on success.
///
/// Whole-degree values are written without a fractional part (`25`, not
/// `25.0`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct CityTemperature {
    pub city: String,
    #[serde(rename = "temp_C", serialize_with = "whole_as_integer")]
    pub temp_c: f64,
    #[serde(rename = "temp_F", serialize_with = "whole_as_integer")]
    pub temp_f: f64,
    #[serde(rename = "temp_K", serialize_with = "whole_as_integer")]
    pub temp_k: f64,
}

// Beyond 2^53 an f64 no longer holds every integer exactly
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn whole_as_integer<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

impl CityTemperature {
    pub fn new(city: impl Into<String>, reading: TemperatureReading) -> Self {
        Self {
            city: city.into(),
            temp_c: reading.celsius,
            temp_f: reading.fahrenheit,
            temp_k: reading.kelvin,
        }
    }
}
