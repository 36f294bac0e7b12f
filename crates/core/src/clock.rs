use chrono::NaiveDate;

/// Source of "today" for the stateful layers (session, facade).
///
/// The date arithmetic in `services` never reads a clock; it takes `today`
/// as an argument and the facade asks its `Clock` once per operation.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Current UTC calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Utc::now().date_naive()
    }
}

/// Always returns the same date. Useful for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
