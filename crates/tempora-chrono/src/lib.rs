//! Calendar collaborator for the tempora formatting engine.
//!
//! Provides the field and duration identifiers, an ISO-8601 [`Chronology`]
//! whose fields operate on local millisecond instants, time zones backed by
//! `chrono-tz`, locale text tables, and partial-value views over `chrono`
//! types.

pub mod chronology;
pub mod datetime;
pub mod error;
pub mod field_type;
pub mod iso;
pub mod locale;
pub mod partial;
pub mod zone;

pub use chronology::{Chronology, ChronologyRef, DateTimeField, PreciseField};
pub use datetime::DateTime;
pub use error::{ChronoError, IllegalFieldValue, RejectedValue, Result};
pub use field_type::{compare_reverse, DateTimeFieldType, DurationField, DurationFieldType};
pub use iso::{local_millis_to_naive, naive_to_local_millis, IsoChronology};
pub use locale::{Locale, Symbols};
pub use partial::{Partial, ReadablePartial};
pub use zone::{print_offset, DateTimeZone, DEFAULT_ZONE_NAMES};
