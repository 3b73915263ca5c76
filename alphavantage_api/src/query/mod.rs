mod common;
pub use self::common::{OutputSize, Query};

mod series;
pub use self::series::SeriesQuery;
