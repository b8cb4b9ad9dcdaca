//! Named domain operations.
//!
//! One module per aggregate. Every op runs the shared check chain in
//! `crate::engine` before touching the store, and returns the full updated
//! snapshot plus the domain events it produced.

pub mod ancillary;
pub mod booking;
pub mod emergency;
pub mod encounter;
pub mod invoice;
pub mod lab;
pub mod medication;
pub mod prescription;
pub mod stay;
