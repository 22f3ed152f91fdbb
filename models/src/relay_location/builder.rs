use crate::error::model_error::ModelError;
use crate::location::LocationConstraint;

use common::ErrorLocation;

use std::panic::Location;

const COUNTRY_CODE_LEN: usize = 2;

/// Builder for creating validated [`LocationConstraint`] instances.
///
/// A constraint narrows from country to city to hostname; a narrower level is
/// only valid when the broader one is set.
#[derive(Debug, Default)]
pub struct RelayLocationBuilder {
    country: Option<String>,
    city: Option<String>,
    hostname: Option<String>,
}

impl RelayLocationBuilder {
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Build the LocationConstraint with validation.
    #[track_caller]
    pub fn build(self) -> Result<LocationConstraint, ModelError> {
        let country = self.country.ok_or_else(|| ModelError::Validation {
            message: String::from("Country is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if country.len() != COUNTRY_CODE_LEN || !country.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(ModelError::Validation {
                message: format!("Invalid country code: {country}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.city.as_deref().is_some_and(str::is_empty) {
            return Err(ModelError::Validation {
                message: String::from("City code cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if let Some(ref hostname) = self.hostname {
            if self.city.is_none() {
                return Err(ModelError::Validation {
                    message: format!("Hostname {hostname} requires a city"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }

            if hostname.is_empty() {
                return Err(ModelError::Validation {
                    message: String::from("Hostname cannot be empty"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        Ok(LocationConstraint {
            country,
            city: self.city,
            hostname: self.hostname,
        })
    }
}
