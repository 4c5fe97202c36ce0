//! Core functionality for the TM1 client
//!
//! The transport seam, cell access, the bulk engine and async process
//! execution.

pub mod bulk;
pub mod cells;
pub mod process;
pub mod transport;
