//! Network access for the missing-resource mode
//!
//! - `session`: HTTP client built from the conversion options
//! - `fetch`: the fetch provider trait and the dry-run/fetch/retry loop

pub mod fetch;
pub mod session;

pub use fetch::{convert_with_fetch, FetchedResource, ResourceFetcher};
pub use session::Session;
