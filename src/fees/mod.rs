//! Fee custody: accrual buckets, claims, and burning.

mod handler;

pub use handler::FeeHandler;
