//! Domain model types for elementary shortest path problems.
//!
//! Provides the core abstractions: locations with rewards and visit
//! intervals, instances with a derived duration/cost model, and tours as
//! ordered depot-to-depot visit sequences.

mod instance;
mod location;
mod tour;

pub use instance::{Instance, InstanceError};
pub use location::{Location, VisitInterval};
pub use tour::Tour;
