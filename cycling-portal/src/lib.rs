//! Cycling race portal.
//!
//! Keeps teams, riders, multi-stage races and riders' checkpoint times,
//! and computes stage rankings and the general, points and mountain
//! classifications from them.

pub mod classification;
pub mod domain;
pub mod store;
