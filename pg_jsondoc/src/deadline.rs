use std::fmt;
use std::time::{Duration, Instant};

use crate::Error;

/// Shared wall-clock budget for a group of database operations.
///
/// Operations check the deadline before they start; an in-flight statement
/// is bounded server-side via `statement_timeout` (see `ScratchTable`), so
/// nothing can hang past the budget.
pub struct Deadline {
    end: Instant,
}

/// The budget handed to [`Deadline::start`] has elapsed.
#[derive(Debug)]
pub struct DeadlineElapsed;

impl fmt::Display for DeadlineElapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("operation deadline elapsed")
    }
}

impl std::error::Error for DeadlineElapsed {}

impl Deadline {
    pub fn start(budget: Duration) -> Deadline {
        Deadline { end: Instant::now() + budget }
    }

    pub fn remaining(&self) -> Duration {
        self.end.saturating_duration_since(Instant::now())
    }

    pub fn check(&self) -> Result<(), Error> {
        if self.remaining() == Duration::ZERO {
            return Err(DeadlineElapsed.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_deadline_passes() {
        let deadline = Deadline::start(Duration::from_secs(3600));
        assert!(deadline.check().is_ok());
        assert!(deadline.remaining() > Duration::from_secs(3599));
    }

    #[test]
    fn spent_deadline_fails() {
        let deadline = Deadline::start(Duration::ZERO);
        let err = deadline.check().unwrap_err();
        assert!(err.is::<DeadlineElapsed>());
        assert_eq!(deadline.remaining(), Duration::ZERO);
    }
}
