pub mod coordinate;
pub mod geo_math;
pub mod location_sample;
pub mod rotation;
pub mod route;
pub mod tracking_session;
