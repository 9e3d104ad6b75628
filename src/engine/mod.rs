// SPDX-License-Identifier: GPL-3.0-only

//! Layout engine.
//!
//! Turns declarative rows into concrete geometry:
//!
//! - [`sizing`]: width of every row child from its width policy
//! - [`row`]: horizontal placement and hit regions
//! - [`page`]: vertical stacking, hit-testing and live mutation

pub mod page;
pub mod row;
pub mod sizing;

pub use page::Page;
pub use row::{button_hit_insets, layout_row, PlacedButton};
pub use sizing::{clean_width, optimum_dynamic_width, resolve_widths};
