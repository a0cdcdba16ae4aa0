//! Entry: one raw user input, as it arrived.

use jiff::Zoned;

/// A single piece of user input. Immutable once created.
///
/// The timestamp keeps its time zone so the daily file can render
/// the wall-clock `HHMM` the user actually saw.
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: String,
    pub timestamp: Zoned,
    pub raw: String,
}
