use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::entities::city::{city_names, find_city};
use crate::entities::{City, RideFeatures, CITIES};
use crate::error::{AppError, AppResult, FieldError};
use crate::utils::geo::distance_between;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PriceRequest {
    pub depart: String,
    pub destination: String,
    #[serde(rename = "heure_depart")]
    pub departure_hour: i64,
    #[serde(rename = "places_disponibles")]
    pub available_seats: i64,
}

/// A price request whose fields all passed validation
#[derive(Debug, Clone, Copy)]
pub struct ValidRide {
    pub depart: &'static City,
    pub destination: &'static City,
    pub departure_hour: u8,
    pub available_seats: u8,
}

impl PriceRequest {
    /// Check every field, reporting all failures at once.
    pub fn validate(&self) -> AppResult<ValidRide> {
        let mut errors = Vec::new();

        let depart = lookup_city("depart", &self.depart, &mut errors);
        let destination = lookup_city("destination", &self.destination, &mut errors);

        if let (Some(from), Some(to)) = (depart, destination) {
            if from.name == to.name {
                errors.push(FieldError::new(
                    "destination",
                    "Destination must be different from depart",
                ));
            }
        }

        let departure_hour = u8::try_from(self.departure_hour)
            .ok()
            .filter(|h| *h <= 23);
        if departure_hour.is_none() {
            errors.push(FieldError::new(
                "heure_depart",
                format!("Departure hour must be between 0 and 23, got {}", self.departure_hour),
            ));
        }

        let available_seats = u8::try_from(self.available_seats)
            .ok()
            .filter(|s| (1..=6).contains(s));
        if available_seats.is_none() {
            errors.push(FieldError::new(
                "places_disponibles",
                format!("Available seats must be between 1 and 6, got {}", self.available_seats),
            ));
        }

        match (depart, destination, departure_hour, available_seats) {
            (Some(depart), Some(destination), Some(departure_hour), Some(available_seats))
                if errors.is_empty() =>
            {
                Ok(ValidRide {
                    depart,
                    destination,
                    departure_hour,
                    available_seats,
                })
            }
            _ => Err(AppError::Validation(errors)),
        }
    }
}

fn lookup_city(
    field: &'static str,
    name: &str,
    errors: &mut Vec<FieldError>,
) -> Option<&'static City> {
    let city = find_city(name);
    if city.is_none() {
        errors.push(FieldError::new(
            field,
            format!(
                "Unknown city: {}. Supported cities: {}",
                name.trim(),
                city_names().join(", ")
            ),
        ));
    }
    city
}

/// Round to the nearest half unit, ties to even
pub fn round_to_half(value: f64) -> f64 {
    (value * 2.0).round_ties_even() / 2.0
}

/// Predict the price of a ride, rounded to the nearest 0.5
pub async fn predict_price(
    State(state): State<AppState>,
    payload: Result<Json<PriceRequest>, JsonRejection>,
) -> AppResult<Json<f64>> {
    let Json(payload) = payload?;
    let ride = payload.validate()?;

    let features = RideFeatures {
        depart: ride.depart.name.to_string(),
        destination: ride.destination.name.to_string(),
        distance_km: distance_between(ride.depart, ride.destination),
        departure_hour: ride.departure_hour,
        available_seats: ride.available_seats,
    };

    let raw = state
        .model
        .predict(&features)
        .map_err(|e| AppError::Prediction(e.to_string()))?;

    tracing::debug!(
        depart = ride.depart.name,
        destination = ride.destination.name,
        distance_km = features.distance_km,
        raw,
        "price predicted"
    );

    Ok(Json(round_to_half(raw)))
}

#[derive(Debug, Serialize)]
pub struct CityInfo {
    pub name: &'static str,
    pub center_lat: f64,
    pub center_lng: f64,
}

/// List all supported cities
pub async fn list_cities() -> Json<Vec<CityInfo>> {
    let cities = CITIES
        .iter()
        .map(|c| CityInfo {
            name: c.name,
            center_lat: c.lat,
            center_lng: c.lng,
        })
        .collect();

    Json(cities)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(depart: &str, destination: &str, hour: i64, seats: i64) -> PriceRequest {
        PriceRequest {
            depart: depart.to_string(),
            destination: destination.to_string(),
            departure_hour: hour,
            available_seats: seats,
        }
    }

    fn field_errors(req: PriceRequest) -> Vec<FieldError> {
        match req.validate() {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_request() {
        let ride = request(" Tunis", "Sousse ", 8, 2).validate().unwrap();
        assert_eq!(ride.depart.name, "Tunis");
        assert_eq!(ride.destination.name, "Sousse");
        assert_eq!(ride.departure_hour, 8);
        assert_eq!(ride.available_seats, 2);
    }

    #[test]
    fn test_unknown_city_lists_supported_cities() {
        let errors = field_errors(request("Tunis", "Atlantis", 8, 2));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "destination");
        assert!(errors[0].message.contains("Atlantis"));
        for name in city_names() {
            assert!(errors[0].message.contains(name));
        }
    }

    #[test]
    fn test_same_city_rejected() {
        let errors = field_errors(request("Tunis", "Tunis", 8, 2));
        assert_eq!(errors, vec![FieldError::new(
            "destination",
            "Destination must be different from depart",
        )]);
    }

    #[test]
    fn test_out_of_range_fields() {
        let errors = field_errors(request("Tunis", "Sousse", 24, 0));
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["heure_depart", "places_disponibles"]);

        let errors = field_errors(request("Tunis", "Sousse", -1, 7));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_round_to_half() {
        assert_eq!(round_to_half(12.2), 12.0);
        assert_eq!(round_to_half(12.3), 12.5);
        assert_eq!(round_to_half(12.74), 12.5);
        assert_eq!(round_to_half(12.76), 13.0);
    }

    #[test]
    fn test_round_to_half_ties_to_even() {
        assert_eq!(round_to_half(12.25), 12.0);
        assert_eq!(round_to_half(13.25), 13.0);
        assert_eq!(round_to_half(12.75), 13.0);
    }
}
