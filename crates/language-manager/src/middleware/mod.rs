//! HTTP middleware components.
//!
//! Two entry points share the language resolver: [`page_language`] for
//! interactive pages and [`api_language`] for requests under the API prefix.

pub mod api_language;
pub mod page_language;

pub use api_language::api_language;
pub use page_language::page_language;
