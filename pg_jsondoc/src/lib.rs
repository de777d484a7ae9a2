//! JSON document round-trips through a PostgreSQL `JSON` column.
//!
//! This crate is glue around the `postgres` driver's JSON marshalling: it
//! provisions a scratch table with a JSON-typed column, inserts one sample
//! document, reads every row back, and decodes the stored text to a native
//! value. The wire protocol, the JSON codec, and connection pooling all stay
//! on the other side of the `postgres` dependency.

use std::error::Error as StdError;

pub use postgres::fallible_iterator;

mod config;
mod deadline;
mod runner;
mod scratch;
mod value;

pub type Error = Box<dyn StdError + Send + Sync>;

pub use config::Config;
pub use deadline::{Deadline, DeadlineElapsed};
pub use runner::{Document, FetchedRow, Report, Shape, run};
pub use scratch::ScratchTable;
pub use value::{DecodeOptions, DocValue, Number};
