use std::fmt;
use std::time::Duration;

use postgres::fallible_iterator::FallibleIterator as _;

use crate::Error;
use crate::config::Config;
use crate::deadline::Deadline;
use crate::scratch::ScratchTable;
use crate::value::{DecodeOptions, DocValue};

/// Identifier of the single row each run writes.
const ROW_ID: i32 = 1;

/// Budget shared by every database operation after connect.
const OP_BUDGET: Duration = Duration::from_secs(10);

/// A sample document to store in the JSON column.
pub enum Document {
    /// A native value, encoded to JSON on insert.
    Value(DocValue),
    /// Literal JSON text, passed through to the column as-is.
    Text(String),
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Document::Value(value) => write!(f, "{value}"),
            Document::Text(text) => f.write_str(text),
        }
    }
}

/// The shape the decoded document is narrowed to in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Sequence,
    Mapping,
}

pub struct Report {
    pub rows: Vec<FetchedRow>,
}

pub struct FetchedRow {
    pub id: i32,
    /// Textual rendering of the stored document.
    pub json_text: String,
    /// The document decoded back to a native value, numbers rendered as
    /// strings, narrowed to the expected shape. Empty when narrowing fails.
    pub value: DocValue,
}

/// Runs one document round-trip.
///
/// Connects, recreates the scratch table, inserts `doc` as row 1 under a
/// shared deadline, then reads every row back and decodes the stored text
/// with the number-as-string option. The scratch table is dropped on every
/// exit path.
pub fn run(config: &Config, doc: &Document, shape: Shape) -> Result<Report, Error> {
    let mut client = config.connect()?;
    let deadline = Deadline::start(OP_BUDGET);
    let mut scratch = ScratchTable::create(&mut client, &deadline)?;

    match doc {
        Document::Value(value) => scratch.insert_value(&deadline, ROW_ID, &value.to_json())?,
        Document::Text(text) => scratch.insert_text(&deadline, ROW_ID, text)?,
    };

    let mut rows = Vec::new();
    let mut it = scratch.rows(&deadline)?;
    while let Some(row) = it.next()? {
        let id: i32 = row.get(0);
        let json_text: String = row.get(1);
        let stored: serde_json::Value = serde_json::from_str(&json_text)?;
        let decoded = DocValue::from_json(&stored, DecodeOptions { numbers_as_strings: true });
        rows.push(FetchedRow { id, json_text, value: narrow(decoded, shape) });
    }
    drop(it);

    scratch.drop_now()?;
    Ok(Report { rows })
}

/// Narrows a decoded value to the expected shape; a mismatch yields an
/// empty value rather than an error.
fn narrow(value: DocValue, shape: Shape) -> DocValue {
    match (shape, value) {
        (Shape::Sequence, DocValue::Array(items)) => DocValue::Array(items),
        (Shape::Sequence, _) => DocValue::Array(Vec::new()),
        (Shape::Mapping, DocValue::Object(map)) => DocValue::Object(map),
        (Shape::Mapping, _) => DocValue::Object(Default::default()),
    }
}
