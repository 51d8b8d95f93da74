//! Algorithms for keyed sequencing

pub mod lane_planner;

pub use lane_planner::{plan_lanes, Lane};
