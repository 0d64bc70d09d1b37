//! Library side of the `ptyx` command-line tool.

pub mod logging;
pub mod session;
