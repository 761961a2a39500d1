mod availability;
pub mod client;
pub mod error;
mod geocode;
pub mod places;
pub(crate) mod retry;
mod services;
pub mod slots;
pub mod types;

pub use availability::booking_url;
pub use client::ClicSanteClient;
pub use error::ClientError;
pub use places::{PlaceFilter, PlacePages};
pub use slots::UPSTREAM_CLOCK_SKEW_HOURS;
