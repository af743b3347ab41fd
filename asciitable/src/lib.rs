//! This library implements types and functions to read, extend and rewrite the
//! column-oriented ASCII tables written by our simulation post-processing.
//!
//! A table is a header (info lines plus a line of column labels) followed by
//! whitespace-separated data rows. The filters built on top of it all follow
//! the same recipe: read the header, figure out which new columns to add,
//! then stream the rows through with the derived values appended.
//!
//! The numerical kernels live here too: a small safe formula language, the
//! reconstruction of regular grids from coordinate columns, the spectral curl
//! and the tensor deviator.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![allow(clippy::needless_return)]

pub mod batch;
pub mod curl;
pub mod datainfo;
pub mod deviator;
pub mod errors;
pub mod formula;
pub mod grid;
pub mod labels;
pub mod table;
pub mod transforms;
pub mod util;

/// Imports the most relevant exports from the library.
pub mod prelude {
  pub use super::batch::*;
  pub use super::datainfo::*;
  pub use super::errors::*;
  pub use super::labels::*;
  pub use super::table::*;
  pub use super::transforms::*;
}
