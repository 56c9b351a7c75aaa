#![deny(
    unsafe_code,
    clippy::all,
    clippy::as_conversions,
    clippy::float_arithmetic,
    clippy::must_use_candidate
)]

pub mod cmp;
pub mod codec;
pub mod config;
pub mod tracing;
