//! Common types shared by the grid coordinate and vertical transform crates.

pub mod attributes;
pub mod error;
pub mod interval;
pub mod range;
pub mod time;
pub mod units;

pub use attributes::{AttributeValue, Attributes};
pub use error::{ErrorKind, GridError, GridResult};
pub use interval::{CoordInterval, MinMax};
pub use range::IndexRange;
pub use time::{parse_iso8601, CalendarDateUnit, TimePeriod};
pub use units::{SimpleUnit, UnitKind};
