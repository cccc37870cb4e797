//! The view pipeline
//!
//! Each stage is a pure function over borrowed rows:
//! search → sort → paginate, with export reading search + sort output and
//! selection tracked independently of all three. `transition` lists which
//! derived state each grid event invalidates.

pub mod export;
pub mod paginate;
pub mod search;
pub mod selection;
pub mod sort;
pub mod transition;
