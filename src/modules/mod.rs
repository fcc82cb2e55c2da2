//! Modules layer - Infrastructure components for external integrations
//!
//! Upload backends, the fax provider client and tunnel discovery.

pub mod storage;
pub mod telnyx;
pub mod tunnel;
