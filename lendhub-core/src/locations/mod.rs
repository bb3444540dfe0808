pub mod location;
pub mod shared_locations;

pub use location::{Location, OpeningHours, TimeRange, Weekday};
pub use shared_locations::{LocationVec, SharedLocations};
