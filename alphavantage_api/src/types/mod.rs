mod function;
pub use self::function::{FieldKeys, Interval, SeriesFunction, NUMBERED_FIELDS};

mod series;
pub use self::series::{RawBar, SeriesResponse};
