//! # mhtml-to-html
//!
//! Converts MHTML archives (RFC 2557) into standalone HTML documents, with every
//! resource the archive holds inlined as a `data:` URL.
//!
//! ## Modules
//!
//! - `core` - conversion driver, options and errors
//! - `env` - typed environment variables
//! - `parsers` - MHTML, HTML, CSS and JavaScript handling
//! - `network` - fetching resources missing from an archive
//! - `utils` - URL helpers
//!
//! ```no_run
//! use mhtml_to_html::{mhtml_to_html, MhtmlOptions};
//!
//! let data = std::fs::read("page.mht").unwrap();
//! let page = mhtml_to_html(&data, &MhtmlOptions::default()).unwrap();
//! println!("{}", page.data);
//! ```

pub mod core;
pub mod env;
pub mod network;
pub mod parsers;
pub mod utils;

// Re-export commonly used items for convenience
pub use self::core::*;
pub use network::*;
pub use parsers::*;
pub use utils::*;
