//! Library side of the `addrkit` command-line tool.

pub mod batch;
pub mod logging;
