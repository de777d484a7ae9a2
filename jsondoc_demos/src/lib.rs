//! Shared pieces of the JSON-column demo binaries: the stderr logger and
//! the fixed sample documents each binary stores and fetches.

pub mod logger;
pub mod samples;
