// SPDX-License-Identifier: GPL-3.0-only

//! Row layout.
//!
//! Places the children of a row left to right, starting at the leading
//! padding and separated by the buttons padding, and flattens nested rows
//! into a list of absolutely positioned buttons.

use crate::geometry::{EdgeInsets, Orientation, Point, Rect};
use crate::layout::{ButtonPath, Row, RowChild, RowStyle};

use super::sizing::resolve_widths;

/// A button with its resolved geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedButton {
    pub path: ButtonPath,
    /// Visual frame in container coordinates
    pub frame: Rect,
    /// Insets applied to `frame` for hit-testing (negative grows it)
    pub hit_insets: EdgeInsets,
}

impl PlacedButton {
    /// Touchable area of the button.
    pub fn hit_region(&self) -> Rect {
        self.frame.inset_by(self.hit_insets)
    }

    pub fn hit(&self, point: Point) -> bool {
        self.hit_region().contains(point)
    }
}

/// Base hit insets for the buttons of a row.
///
/// The touchable area reaches into the row's vertical padding and halfway
/// into the gap to each neighbour.
pub fn button_hit_insets(style: &RowStyle, orientation: Orientation) -> EdgeInsets {
    let half_gap = style.buttons_padding(orientation) / 2.0;
    EdgeInsets::new(
        -style.top_padding(orientation),
        -half_gap,
        -style.bottom_padding(orientation),
        -half_gap,
    )
}

/// Lays out an outermost row.
///
/// `frame` is the band the buttons occupy: its `x`/`width` span the whole
/// row including edge padding, its `y`/`height` are the button band without
/// the row's top and bottom padding.
///
/// The first and last direct button children get `edge_hit_extension` added
/// to their outer side. Buttons inside nested rows never do.
pub fn layout_row(
    row: &Row,
    row_index: usize,
    frame: Rect,
    orientation: Orientation,
    edge_hit_extension: f32,
) -> Vec<PlacedButton> {
    let mut placed = Vec::new();
    let style = row.effective_style(false);
    place_children(
        row,
        &style,
        &ButtonPath(vec![row_index]),
        frame,
        orientation,
        Some(edge_hit_extension),
        &mut placed,
    );
    placed
}

fn place_children(
    row: &Row,
    style: &RowStyle,
    path: &ButtonPath,
    frame: Rect,
    orientation: Orientation,
    edge_hit_extension: Option<f32>,
    placed: &mut Vec<PlacedButton>,
) {
    let widths = resolve_widths(row, style, frame.width, orientation);
    let base_insets = button_hit_insets(style, orientation);
    let gap = style.buttons_padding(orientation);
    let last = row.children.len().saturating_sub(1);
    let mut x = frame.x + style.leading_padding(orientation);

    for (index, (child, width)) in row.children.iter().zip(widths).enumerate() {
        let child_frame = Rect::new(x, frame.y, width, frame.height);
        let child_path = path.child(index);

        match child {
            RowChild::Button(_) => {
                let mut hit_insets = base_insets;
                if let Some(extension) = edge_hit_extension {
                    if index == 0 {
                        hit_insets.left -= extension;
                    }
                    if index == last {
                        hit_insets.right -= extension;
                    }
                }
                placed.push(PlacedButton {
                    path: child_path,
                    frame: child_frame,
                    hit_insets,
                });
            }
            RowChild::Row(nested) => {
                let nested_style = nested.effective_style(true);
                place_children(
                    nested,
                    &nested_style,
                    &child_path,
                    child_frame,
                    orientation,
                    None,
                    placed,
                );
            }
        }

        x += width + gap;
    }

    tracing::trace!(path = %path, children = row.children.len(), "row placed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Button, WidthPolicy};

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn letters(s: &str) -> Vec<RowChild> {
        s.chars().map(|c| Button::glyph(c.to_string()).into()).collect()
    }

    /// Buttons start at the leading padding and advance by width + gap
    #[test]
    fn test_left_to_right_placement() {
        let row = Row::new(letters("abc"));
        let placed = layout_row(
            &row,
            0,
            Rect::new(0.0, 10.0, 90.0, 40.0),
            Orientation::Portrait,
            20.0,
        );

        // (90 - 2*6 - 3 - 3) / 3 = 24
        assert_eq!(placed.len(), 3);
        assert!(approx_eq(placed[0].frame.x, 3.0));
        assert!(approx_eq(placed[1].frame.x, 33.0));
        assert!(approx_eq(placed[2].frame.x, 63.0));
        assert!(approx_eq(placed[2].frame.max_x() + 3.0, 90.0));
        assert_eq!(placed[1].frame.y, 10.0);
        assert_eq!(placed[1].frame.height, 40.0);
        assert_eq!(placed[1].path, ButtonPath::direct(0, 1));
    }

    /// Hit regions cover half the gap and the vertical padding
    #[test]
    fn test_hit_insets() {
        let row = Row::new(letters("abc"));
        let placed = layout_row(
            &row,
            0,
            Rect::new(0.0, 10.0, 90.0, 40.0),
            Orientation::Portrait,
            20.0,
        );

        let middle = &placed[1];
        assert_eq!(middle.hit_insets, EdgeInsets::new(-6.0, -3.0, -6.0, -3.0));

        // Point in the gap between a and b belongs to exactly one of them
        let in_gap = Point::new(30.0, 20.0);
        let owners = placed.iter().filter(|p| p.hit(in_gap)).count();
        assert_eq!(owners, 1);

        // Point in the top padding still hits
        assert!(middle.hit(Point::new(40.0, 5.0)));
    }

    /// Outermost edge buttons reach 20 further out; nested ones don't
    #[test]
    fn test_edge_extension_only_on_outermost_row() {
        let row = Row::new(vec![
            Button::icon("Shift", "shift")
                .with_width(WidthPolicy::Relative(0.115))
                .into(),
            Row::new(letters("zx")).into(),
            Button::icon("Backspace", "backspace")
                .with_width(WidthPolicy::Relative(0.115))
                .into(),
        ]);
        let placed = layout_row(
            &row,
            2,
            Rect::new(0.0, 0.0, 320.0, 40.0),
            Orientation::Portrait,
            20.0,
        );

        assert_eq!(placed.len(), 4);
        assert_eq!(placed[0].hit_insets.left, -23.0);
        assert_eq!(placed[0].hit_insets.right, -3.0);
        assert_eq!(placed[3].hit_insets.right, -23.0);

        // z and x live in the nested row and keep plain insets
        assert_eq!(placed[1].path, ButtonPath(vec![2, 1, 0]));
        assert_eq!(placed[1].hit_insets.left, -3.0);
        assert_eq!(placed[2].hit_insets.right, -3.0);
    }

    /// A single-button row is extended on both sides
    #[test]
    fn test_single_button_row_extended_both_sides() {
        let row = Row::new(letters("a"));
        let placed = layout_row(
            &row,
            0,
            Rect::new(0.0, 0.0, 100.0, 40.0),
            Orientation::Landscape,
            20.0,
        );

        assert_eq!(placed[0].hit_insets.left, -22.5);
        assert_eq!(placed[0].hit_insets.right, -22.5);
    }

    /// Nested row children start after the nested row's own leading padding
    #[test]
    fn test_nested_children_offset() {
        let nested = Row::new(letters("ab")).with_style(RowStyle {
            leading_padding: 10.0,
            trailing_padding: 10.0,
            buttons_padding: 0.0,
            buttons_padding_landscape: None,
            ..RowStyle::default()
        });
        let row = Row::new(vec![Button::glyph("x").into(), nested.into()]).with_style(RowStyle {
            leading_padding: 0.0,
            trailing_padding: 0.0,
            buttons_padding: 0.0,
            buttons_padding_landscape: None,
            ..RowStyle::default()
        });

        let placed = layout_row(
            &row,
            0,
            Rect::new(0.0, 0.0, 220.0, 40.0),
            Orientation::Portrait,
            20.0,
        );

        // optimum 100: x at 0..100, nested at 100..220, a at 110..160, b at 160..210
        assert!(approx_eq(placed[1].frame.x, 110.0));
        assert!(approx_eq(placed[1].frame.width, 50.0));
        assert!(approx_eq(placed[2].frame.x, 160.0));
    }
}
