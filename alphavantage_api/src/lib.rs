mod classify;
mod client;
mod errors;
mod query;
pub mod types;
pub use self::classify::classify_response;
pub use self::client::Client;
pub use self::errors::Error;
pub use self::query::{OutputSize, Query, SeriesQuery};
