#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

extern crate alloc;

mod error;
mod populate;
mod report;
mod span;

pub use error::{PopulateError, PopulateErrorKind, PopulateErrorWithInput};
pub use populate::{ConversionPolicy, Populator};
pub use report::{PopulateReport, TokenOutcome, TokenReport};
pub use span::{Pos, Span};
