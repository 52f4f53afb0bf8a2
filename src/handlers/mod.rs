pub mod health;
pub mod pricing;
