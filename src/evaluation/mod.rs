//! Certificate checking for tours and multi-route plans.

mod checker;

pub use checker::{check_plan, check_tour, PlanCheck, TourCheck};
