use postgres::{Client, RowIter};
use serde_json::Value as JsonValue;

use crate::Error;
use crate::deadline::Deadline;

/// RAII guard over the scratch relation `test (id INT, jdoc JSON)`.
///
/// The column is `JSON`, not `JSONB`: documents inserted from literal text
/// must come back byte-for-byte, and `JSONB` rewrites the stored form.
pub struct ScratchTable<'a> {
    client: &'a mut Client,
    dropped: bool,
}

impl<'a> ScratchTable<'a> {
    /// Drops any leftover table from a previous run (best effort), bounds
    /// the session's statements to the deadline, and creates the table.
    pub fn create(client: &'a mut Client, deadline: &Deadline) -> Result<ScratchTable<'a>, Error> {
        if let Err(e) = client.batch_execute("DROP TABLE test") {
            // the table usually does not exist yet
            log::debug!("pre-run cleanup skipped: {e}");
        }
        let timeout_ms = deadline.remaining().as_millis().max(1);
        client.batch_execute(&format!("SET statement_timeout = {timeout_ms}"))?;
        deadline.check()?;
        client.batch_execute("CREATE TABLE test (id INT, jdoc JSON)")?;
        Ok(ScratchTable { client, dropped: false })
    }

    /// Inserts one row with a native value encoded through the driver's
    /// JSON marshalling.
    pub fn insert_value(
        &mut self,
        deadline: &Deadline,
        id: i32,
        doc: &JsonValue,
    ) -> Result<u64, Error> {
        deadline.check()?;
        Ok(self
            .client
            .execute("INSERT INTO test (id, jdoc) VALUES ($1, $2)", &[&id, doc])?)
    }

    /// Inserts one row from literal JSON text, passed through verbatim.
    pub fn insert_text(&mut self, deadline: &Deadline, id: i32, doc: &str) -> Result<u64, Error> {
        deadline.check()?;
        Ok(self.client.execute(
            "INSERT INTO test (id, jdoc) VALUES ($1, $2::json)",
            &[&id, &doc],
        )?)
    }

    /// Returns a cursor over every stored row: the id and the stored
    /// document's textual rendering.
    pub fn rows(&mut self, deadline: &Deadline) -> Result<RowIter<'_>, Error> {
        deadline.check()?;
        Ok(self
            .client
            .query_raw("SELECT id, jdoc::text FROM test", std::iter::empty::<&i32>())?)
    }

    /// Drops the table now, surfacing the error instead of deferring to the
    /// guard.
    pub fn drop_now(mut self) -> Result<(), Error> {
        self.dropped = true;
        self.client.batch_execute("DROP TABLE test")?;
        Ok(())
    }
}

impl Drop for ScratchTable<'_> {
    fn drop(&mut self) {
        if !self.dropped {
            if let Err(e) = self.client.batch_execute("DROP TABLE test") {
                log::warn!("failed to drop scratch table: {e}");
            }
        }
    }
}
