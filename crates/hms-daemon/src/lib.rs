//! hms-daemon library surface.
//!
//! Exposed as a lib so the scenario tests under `tests/` can compose the
//! router in-process without binding a socket.

pub mod api_types;
pub mod routes;
pub mod state;
