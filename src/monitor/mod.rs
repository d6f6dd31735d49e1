//! Capacity monitoring: VM record extraction, node aggregation, growth
//! projection, report export and console rendering.

pub mod application;
pub mod domain;
pub mod presentation;
