//! # tempora-format
//!
//! Pattern-driven printing and parsing of date-times with deterministic
//! resolution of parsed fields.
//!
//! A [`Formatter`] is compiled from a pattern such as `yyyy-MM-dd HH:mm`, or
//! assembled element by element with a [`FormatterBuilder`]. Printing walks
//! the element tree and never fails on a bad field; parsing saves each
//! matched field into a [`ParserBucket`], which applies them most
//! significant first and converts the result to an instant.
//!
//! ```
//! use tempora_format::{iso, Formatter};
//!
//! let parser = iso::date_optional_time_parser()?;
//! let millis = parser.parse_millis("2024-03-10T12:30Z")?;
//!
//! let printer = Formatter::for_pattern("EEE, d MMM yyyy HH:mm")?;
//! assert_eq!(printer.print_millis(millis)?, "Sun, 10 Mar 2024 12:30");
//! # Ok::<(), tempora_format::FormatError>(())
//! ```

pub mod bucket;
pub mod builder;
pub mod cache;
pub mod element;
pub mod error;
pub mod formatter;
pub mod iso;
pub mod numeric;
pub mod pattern;
pub mod settings;

pub use bucket::{ParserBucket, SavedState};
pub use builder::FormatterBuilder;
pub use cache::{BoundedCache, PatternCache, TextLookupCache};
pub use element::{FormatElement, ParseOutcome, PrintContext};
pub use error::{create_error_message, FormatError, Result};
pub use formatter::Formatter;
pub use settings::FormatSettings;
