pub mod city;
pub mod ride;

pub use city::{City, CITIES};
pub use ride::{RideFeatures, RideRecord};
