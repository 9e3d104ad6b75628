// SPDX-License-Identifier: GPL-3.0-only

//! Button width resolution.
//!
//! Every direct child of a row gets a concrete width from its
//! [`WidthPolicy`]:
//!
//! - **Static**: exactly the given value.
//! - **Relative**: a fraction of the row's *clean width*, which is the
//!   available width minus the leading/trailing padding and the gaps between
//!   direct children.
//! - **Dynamic**: an equal share (the *optimum width*) of whatever is left
//!   after static widths, relative widths, gaps and edge padding.
//!
//! A nested row occupies one dynamic slot, grown by its own leading and
//! trailing padding. Its children are then resolved against the nested row's
//! own width, so a relative button inside a nested row is a fraction of that
//! row, not of the outer one.
//!
//! Overflow is never an error: widths are clamped at zero and the row simply
//! compresses.

use crate::geometry::Orientation;
use crate::layout::{Row, RowChild, RowStyle, WidthPolicy};

// ============================================================================
// Public API
// ============================================================================

/// Calculates the clean width of a row.
///
/// # Arguments
///
/// * `row` - The row whose direct children are counted
/// * `style` - Spacing of the row
/// * `available_width` - Full width given to the row
/// * `orientation` - Selects the portrait or landscape padding set
///
/// # Returns
///
/// The width left after edge padding and inter-button gaps, never negative.
pub fn clean_width(
    row: &Row,
    style: &RowStyle,
    available_width: f32,
    orientation: Orientation,
) -> f32 {
    let gaps = gap_count(row) as f32 * style.buttons_padding(orientation);
    (available_width
        - style.leading_padding(orientation)
        - style.trailing_padding(orientation)
        - gaps)
        .max(0.0)
}

/// Calculates the width of one dynamic slot in a row.
///
/// Nested rows count as one dynamic slot each and additionally consume their
/// own edge padding.
///
/// # Returns
///
/// The optimum dynamic width. Returns 0.0 if the row has no dynamic slots or
/// the fixed widths already exceed the available space.
///
/// # Example
///
/// ```rust,ignore
/// // 300 wide, 3+3 edge padding, 10 dynamic keys with 6 between them:
/// // (300 - 9*6 - 3 - 3) / 10 = 24
/// let width = optimum_dynamic_width(&row, &RowStyle::default(), 300.0, Orientation::Portrait);
/// ```
pub fn optimum_dynamic_width(
    row: &Row,
    style: &RowStyle,
    available_width: f32,
    orientation: Orientation,
) -> f32 {
    let clean = clean_width(row, style, available_width, orientation);
    let mut remaining = available_width
        - gap_count(row) as f32 * style.buttons_padding(orientation)
        - style.leading_padding(orientation)
        - style.trailing_padding(orientation);
    let mut dynamic_slots = 0usize;

    for child in &row.children {
        match child {
            RowChild::Button(button) => match button.width {
                WidthPolicy::Static(width) => remaining -= width,
                WidthPolicy::Relative(percent) => remaining -= percent * clean,
                WidthPolicy::Dynamic => dynamic_slots += 1,
            },
            RowChild::Row(nested) => {
                let nested_style = nested.effective_style(true);
                remaining -= nested_style.leading_padding(orientation)
                    + nested_style.trailing_padding(orientation);
                dynamic_slots += 1;
            }
        }
    }

    if dynamic_slots == 0 {
        return 0.0;
    }

    (remaining / dynamic_slots as f32).max(0.0)
}

/// Resolves the width of every direct child of a row.
///
/// # Arguments
///
/// * `row` - The row to resolve
/// * `style` - Spacing of the row (see [`Row::effective_style`])
/// * `available_width` - Full width given to the row
/// * `orientation` - Selects the portrait or landscape padding set
///
/// # Returns
///
/// One width per direct child, in order. Every width is at least 0.0.
pub fn resolve_widths(
    row: &Row,
    style: &RowStyle,
    available_width: f32,
    orientation: Orientation,
) -> Vec<f32> {
    let clean = clean_width(row, style, available_width, orientation);
    let optimum = optimum_dynamic_width(row, style, available_width, orientation);

    row.children
        .iter()
        .map(|child| {
            let width = match child {
                RowChild::Button(button) => match button.width {
                    WidthPolicy::Static(width) => width,
                    WidthPolicy::Relative(percent) => percent * clean,
                    WidthPolicy::Dynamic => optimum,
                },
                RowChild::Row(nested) => {
                    let nested_style = nested.effective_style(true);
                    nested_style.leading_padding(orientation)
                        + optimum
                        + nested_style.trailing_padding(orientation)
                }
            };
            width.max(0.0)
        })
        .collect()
}

// ============================================================================
// Helpers
// ============================================================================

fn gap_count(row: &Row) -> usize {
    row.children.len().saturating_sub(1)
}

// ============================================================================
// Tests
// ============================================================================
