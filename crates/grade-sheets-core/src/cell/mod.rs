//! Cell-related types
//!
//! - [`CellValue`] - what a cell holds
//! - [`CellAddress`] - where it is ("E1")
//! - [`CellStorage`] - sparse row-major grid

mod address;
mod storage;
mod value;

pub use address::CellAddress;
pub use storage::CellStorage;
pub use value::{CellError, CellValue, SharedString};
