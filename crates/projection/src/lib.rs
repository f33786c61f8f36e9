//! Coordinate conversions for sonar log positions.
//!
//! Implements the projection from scratch without external dependencies.

pub mod mercator;

pub use mercator::{
    from_latitude, from_longitude, to_latitude, to_longitude, VendorMercator, EARTH_RADIUS,
};
