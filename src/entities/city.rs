use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct City {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

const fn city(name: &'static str, lat: f64, lng: f64) -> City {
    City { name, lat, lng }
}

/// Supported cities with their approximate center coordinates.
/// Shared by the data generator and the prediction service.
pub const CITIES: &[City] = &[
    city("Tunis", 36.8065, 10.1815),
    city("Sousse", 35.8256, 10.6360),
    city("Sfax", 34.7406, 10.7603),
    city("Bizerte", 37.2746, 9.8739),
    city("Hammamet", 36.4073, 10.6220),
    city("Monastir", 35.7643, 10.8113),
    city("Gabes", 33.8815, 10.0982),
    city("Nabeul", 36.4518, 10.7350),
    city("Kairouan", 35.6781, 10.0963),
    city("Sidi Bouzid", 35.0405, 9.4855),
    city("Tozeur", 33.9188, 8.1220),
    city("Gafsa", 34.4250, 8.7842),
    city("Kebili", 33.7067, 8.9717),
    city("Mahdia", 35.5047, 11.0622),
    city("Beja", 36.7333, 9.1833),
    city("Jendouba", 36.5011, 8.7802),
    city("Msaken", 35.7330, 10.5833),
];

/// Look up a city by exact name, ignoring surrounding whitespace.
pub fn find_city(name: &str) -> Option<&'static City> {
    let name = name.trim();
    CITIES.iter().find(|c| c.name == name)
}

pub fn city_names() -> Vec<&'static str> {
    CITIES.iter().map(|c| c.name).collect()
}
