// SPDX-License-Identifier: GPL-3.0-only

//! Transient overlays shown above a pressed key: the preview bubble and the
//! long-press menu.

pub mod menu;
pub mod preview;

pub use menu::{KeyMenu, KeyMenuItem, MenuRelease};
pub use preview::KeyPreview;
