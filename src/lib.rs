//! docfilter - compile OData-style filter expressions and evaluate them
//! against nested string-keyed documents.
//!
//! ```
//! use docfilter::{Document, Filter};
//!
//! let filter = Filter::new("age gt 30 and contains(name, 'ef')").unwrap();
//! let doc = Document::new().with("name", "Jeff").with("age", 53);
//! assert_eq!(filter.evaluate(&doc), Ok(true));
//! ```

pub mod collections;
pub mod document;
pub mod filter;
pub mod syntax;

pub use document::{Document, Value};
pub use filter::{EvalError, Filter, InternalError};
pub use syntax::CompileError;
