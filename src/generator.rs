//! Synthetic ride dataset.
//!
//! Prices follow a simple heuristic: a target band per known route (or per
//! distance bucket), a rush-hour premium, a small discount for rides offering
//! more seats, and uniform noise. Output is fully determined by the seed.

use std::fs::{self, File};
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::entities::{City, RideRecord, CITIES};
use crate::utils::geo::distance_between;

const MIN_PRICE: f64 = 4.0;
const NOISE: f64 = 1.5;
const SEAT_DISCOUNT: f64 = 0.03;

/// Target price bands for known routes, independent of direction.
const ROUTE_PRESETS: &[(&str, &str, (f64, f64))] = &[
    ("Tunis", "Sousse", (11.0, 13.0)),
    ("Msaken", "Tunis", (12.0, 13.0)),
    ("Sousse", "Sfax", (17.0, 18.0)),
    ("Tunis", "Bizerte", (5.0, 8.0)),
    ("Tunis", "Gabes", (30.0, 35.0)),
    ("Sousse", "Gabes", (20.0, 25.0)),
];

pub fn is_rush_hour(hour: u8) -> bool {
    (7..=9).contains(&hour) || (16..=18).contains(&hour)
}

/// Price band `(min, max)` for a route.
///
/// Known city pairs match regardless of order and letter case; any other
/// route falls back to a band chosen by distance.
pub fn route_price_band(depart: &str, destination: &str, distance_km: f64) -> (f64, f64) {
    let preset = ROUTE_PRESETS.iter().find(|(a, b, _)| {
        (a.eq_ignore_ascii_case(depart) && b.eq_ignore_ascii_case(destination))
            || (a.eq_ignore_ascii_case(destination) && b.eq_ignore_ascii_case(depart))
    });
    if let Some((_, _, band)) = preset {
        return *band;
    }

    match distance_km {
        d if d < 80.0 => (5.0, 8.0),
        d if d < 150.0 => (10.0, 15.0),
        d if d < 250.0 => (16.0, 24.0),
        d if d < 400.0 => (25.0, 35.0),
        _ => (30.0, 45.0),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Draw a price from `band`, then apply the rush-hour premium, the seat
/// discount and noise. Never below `MIN_PRICE`.
fn sample_price(rng: &mut ChaCha8Rng, (p_min, p_max): (f64, f64), hour: u8, seats: u8) -> f64 {
    let mut price = rng.gen_range(p_min..=p_max);

    if is_rush_hour(hour) {
        price *= rng.gen_range(1.05..=1.15);
    }

    price /= 1.0 + f64::from(seats.saturating_sub(1)) * SEAT_DISCOUNT;

    let noise = rng.gen_range(-NOISE..=NOISE);
    (price + noise).max(MIN_PRICE)
}

fn generate_sample(rng: &mut ChaCha8Rng) -> RideRecord {
    let depart = &CITIES[rng.gen_range(0..CITIES.len())];
    let others: Vec<&City> = CITIES.iter().filter(|c| c.name != depart.name).collect();
    let destination = others[rng.gen_range(0..others.len())];

    let distance_km = distance_between(depart, destination);
    let hour: u8 = rng.gen_range(5..=22);
    let seats: u8 = rng.gen_range(1..=6);

    let band = route_price_band(depart.name, destination.name, distance_km);
    let price = sample_price(rng, band, hour, seats);

    RideRecord {
        depart: depart.name.to_string(),
        destination: destination.name.to_string(),
        distance_km: round2(distance_km),
        departure_hour: hour,
        available_seats: seats,
        price: round2(price),
    }
}

/// Generate `n` ride records from `seed`.
pub fn generate(n: usize, seed: u64) -> Vec<RideRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| generate_sample(&mut rng)).collect()
}

/// Write records as CSV to `path`, creating parent directories.
pub fn write_csv(records: &[RideRecord], path: &Path) -> csv::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_writer(File::create(path)?);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    tracing::debug!(rows = records.len(), path = %path.display(), "dataset written");
    Ok(())
}
