//! Main content extraction module.
//!
//! # Module Structure
//!
//! - `tags`: Tag constants, catalogs, and handler dispatch kinds
//! - `state`: Potential tags plus the options and cache handlers consult
//! - `handlers`: Element handlers (titles, paragraphs, lists, quotes, code, tables, images)
//! - `pruning`: Section pruning and boilerplate removal
//! - `pipeline`: Candidate selection, handler dispatch, wild-text recovery
//! - `baseline`: Tiered fallback extraction
//! - `arbitration`: Comparison with an alternative extractor
//!
//! # Usage
//!
//! ```rust
//! use rs_distill::extractor::pipeline;
//! use rs_distill::{dom, html_processing, Options};
//!
//! let options = Options::default();
//! let tree = dom::parse("<body><article><p>Main content here.</p></article></body>");
//! let mut tree = html_processing::clean(tree, &options).expect("non-empty document");
//! let result = pipeline::extract_content(&mut tree, &options, None);
//! assert_eq!(result.text, "Main content here.");
//! ```

pub mod arbitration;
pub mod baseline;
pub mod handlers;
pub mod pipeline;
pub mod pruning;
pub mod state;
pub mod tags;

pub use arbitration::{arbitrate, AlternativeExtractor, NoAlternative};
#[cfg(feature = "readability")]
pub use arbitration::ReadabilityExtractor;
pub use baseline::baseline;
pub use pipeline::extract_content;
pub use state::ExtractionState;
