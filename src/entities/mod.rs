//! Entity type definitions
//!
//! SWX works with a single entity type:
//!
//! - [`Character`] - a SWAPI person, normalized for display, whose reference
//!   fields (homeworld, films, species, starships, vehicles) are enriched
//!   with resolved display names

pub mod character;

pub use character::{Character, ReferenceRole};
