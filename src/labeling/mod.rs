//! Label-correcting dynamic program for the single-interval case.
//!
//! Operates on each location's earliest visit interval; the tree search in
//! [`crate::search`] handles the general multi-interval case.

mod dp;

pub use dp::solve;
