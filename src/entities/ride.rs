use serde::{Deserialize, Serialize};

/// Column order of the ride dataset.
pub const DATASET_COLUMNS: [&str; 6] = [
    "depart",
    "destination",
    "distance_km",
    "heure_depart",
    "places_disponibles",
    "prix",
];

/// One ride of the training dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RideRecord {
    pub depart: String,
    pub destination: String,
    pub distance_km: f64,
    #[serde(rename = "heure_depart")]
    pub departure_hour: u8,
    #[serde(rename = "places_disponibles")]
    pub available_seats: u8,
    #[serde(rename = "prix")]
    pub price: f64,
}

/// Model input: a ride without its price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RideFeatures {
    pub depart: String,
    pub destination: String,
    pub distance_km: f64,
    #[serde(rename = "heure_depart")]
    pub departure_hour: u8,
    #[serde(rename = "places_disponibles")]
    pub available_seats: u8,
}

impl RideRecord {
    pub fn features(&self) -> RideFeatures {
        RideFeatures {
            depart: self.depart.clone(),
            destination: self.destination.clone(),
            distance_km: self.distance_km,
            departure_hour: self.departure_hour,
            available_seats: self.available_seats,
        }
    }
}
