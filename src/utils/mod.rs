//! # Utility module
//!
//! - `url` - URL resolution, data URL creation and small reference helpers

pub mod url;

// Re-export commonly used items for convenience
pub use url::{
    absolute_reference, base_for, content_id_from_cid_url, create_data_url, create_html_data_url, is_data_url, is_http_url,
    normalize_url, remove_quotes, resolve_path, split_fragment, Url,
};
