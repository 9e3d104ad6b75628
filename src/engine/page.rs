// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard page layout.
//!
//! A [`Page`] stacks the rows of one keyboard face vertically, keeps the
//! resolved geometry of every button and routes touch locations to buttons.
//! Buttons and rows can be mutated live; every mutation re-runs layout with
//! the last container size.

use crate::geometry::{Orientation, Point, Rect, Size};
use crate::layout::{Button, ButtonPath, PageDefinition, PageKind, Row, RowChild};

use super::row::{layout_row, PlacedButton};

/// One keyboard face with its current layout.
#[derive(Debug, Clone)]
pub struct Page {
    kind: PageKind,
    definition: PageDefinition,
    placed: Vec<PlacedButton>,
    container: Size,
    orientation: Orientation,
    edge_hit_extension: f32,
    typing_enabled: bool,
}

impl Page {
    /// Creates a page. Nothing is laid out until [`Page::layout`] is called.
    pub fn new(kind: PageKind, definition: PageDefinition, edge_hit_extension: f32) -> Self {
        Self {
            kind,
            definition,
            placed: Vec::new(),
            container: Size::default(),
            orientation: Orientation::Portrait,
            edge_hit_extension,
            typing_enabled: true,
        }
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn definition(&self) -> &PageDefinition {
        &self.definition
    }

    pub fn rows(&self) -> &[Row] {
        &self.definition.rows
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Geometry of every button, nested ones included, in row order.
    pub fn placed_buttons(&self) -> &[PlacedButton] {
        &self.placed
    }

    /// When false, touches on this page produce no presses.
    pub fn typing_enabled(&self) -> bool {
        self.typing_enabled
    }

    pub fn set_typing_enabled(&mut self, enabled: bool) {
        self.typing_enabled = enabled;
    }

    /// Height shared by every row for the current container.
    pub fn row_height(&self) -> f32 {
        let rows = &self.definition.rows;
        if rows.is_empty() {
            return 0.0;
        }

        let orientation = self.orientation;
        let style = &self.definition.style;
        let vertical_padding: f32 = rows
            .iter()
            .map(|row| {
                let row_style = row.effective_style(false);
                row_style.top_padding(orientation) + row_style.bottom_padding(orientation)
            })
            .sum();
        let gaps = (rows.len() - 1) as f32 * style.row_padding(orientation);
        let available = self.container.height
            - style.top_padding(orientation)
            - style.bottom_padding(orientation)
            - vertical_padding
            - gaps;

        (available / rows.len() as f32).max(0.0)
    }

    /// Lays out every row for the given container.
    pub fn layout(&mut self, container: Size, orientation: Orientation) {
        self.container = container;
        self.orientation = orientation;
        self.relayout();
    }

    fn relayout(&mut self) {
        let orientation = self.orientation;
        let row_height = self.row_height();
        let row_padding = self.definition.style.row_padding(orientation);
        let row_count = self.definition.rows.len();
        let mut y = self.definition.style.top_padding(orientation);

        self.placed.clear();
        for (index, row) in self.definition.rows.iter().enumerate() {
            let style = row.effective_style(false);
            y += style.top_padding(orientation);

            let band = Rect::new(0.0, y, self.container.width, row_height);
            let mut buttons = layout_row(row, index, band, orientation, self.edge_hit_extension);

            // Split the gap between rows so their hit regions tile.
            for button in &mut buttons {
                if index > 0 {
                    button.hit_insets.top -= row_padding / 2.0;
                }
                if index + 1 < row_count {
                    button.hit_insets.bottom -= row_padding / 2.0;
                }
            }
            self.placed.extend(buttons);

            y += row_height + style.bottom_padding(orientation) + row_padding;
        }

        tracing::debug!(
            page = %self.kind,
            width = self.container.width,
            height = self.container.height,
            row_height,
            buttons = self.placed.len(),
            "page laid out"
        );
    }

    // ========================================================================
    // Hit-testing
    // ========================================================================

    /// Finds the button under a point.
    ///
    /// A button whose visual frame contains the point wins over one whose
    /// enlarged hit region merely overlaps it.
    pub fn hit_test(&self, point: Point) -> Option<&PlacedButton> {
        self.placed
            .iter()
            .find(|placed| placed.frame.contains(point))
            .or_else(|| self.placed.iter().find(|placed| placed.hit(point)))
    }

    /// Returns the frame of a placed button.
    pub fn frame_of(&self, path: &ButtonPath) -> Option<Rect> {
        self.placed
            .iter()
            .find(|placed| &placed.path == path)
            .map(|placed| placed.frame)
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Returns the button at `path`, if the path names a button.
    pub fn button(&self, path: &ButtonPath) -> Option<&Button> {
        let (row, rest) = path.0.split_first()?;
        child_button(&self.definition.rows.get(*row)?.children, rest)
    }

    fn button_mut(&mut self, path: &ButtonPath) -> Option<&mut Button> {
        let (row, rest) = path.0.split_first()?;
        child_button_mut(&mut self.definition.rows.get_mut(*row)?.children, rest)
    }

    /// Returns a direct button child of a row.
    ///
    /// Nested rows are not searched; an index naming a nested row returns
    /// `None`, as does any out-of-range index.
    pub fn button_at(&self, row: usize, index: usize) -> Option<&Button> {
        self.definition
            .rows
            .get(row)?
            .children
            .get(index)?
            .as_button()
    }

    /// Finds the first button with the given identifier, searching nested
    /// rows too.
    pub fn button_with_identifier(&self, identifier: &str) -> Option<(ButtonPath, &Button)> {
        self.definition
            .rows
            .iter()
            .enumerate()
            .find_map(|(index, row)| {
                find_identifier(&row.children, ButtonPath(vec![index]), identifier)
            })
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Inserts a button into a row.
    ///
    /// `at` defaults to the end of the row and is clamped to it. Does nothing
    /// if `row` is out of range.
    pub fn insert_button(&mut self, button: Button, row: usize, at: Option<usize>) {
        let Some(target) = self.definition.rows.get_mut(row) else {
            tracing::debug!(page = %self.kind, row, "insert into missing row ignored");
            return;
        };
        let index = at
            .unwrap_or(target.children.len())
            .min(target.children.len());
        target.children.insert(index, RowChild::Button(button));
        self.relayout();
    }

    /// Removes a direct child (button or nested row) from a row.
    ///
    /// Returns `false` if either index is out of range.
    pub fn remove_button(&mut self, row: usize, index: usize) -> bool {
        let Some(target) = self.definition.rows.get_mut(row) else {
            return false;
        };
        if index >= target.children.len() {
            return false;
        }
        target.children.remove(index);
        self.relayout();
        true
    }

    // ========================================================================
    // Highlights
    // ========================================================================

    pub fn set_highlighted(&mut self, path: &ButtonPath, highlighted: bool) {
        if let Some(button) = self.button_mut(path) {
            button.highlighted = highlighted;
        }
    }

    pub fn clear_highlights(&mut self) {
        let paths: Vec<ButtonPath> = self.placed.iter().map(|p| p.path.clone()).collect();
        for path in &paths {
            self.set_highlighted(path, false);
        }
    }

    pub fn highlighted_paths(&self) -> Vec<ButtonPath> {
        self.placed
            .iter()
            .filter(|placed| self.button(&placed.path).is_some_and(|b| b.highlighted))
            .map(|placed| placed.path.clone())
            .collect()
    }
}

fn child_button<'a>(children: &'a [RowChild], indices: &[usize]) -> Option<&'a Button> {
    let (first, rest) = indices.split_first()?;
    match (children.get(*first)?, rest.is_empty()) {
        (RowChild::Button(button), true) => Some(button),
        (RowChild::Row(nested), false) => child_button(&nested.children, rest),
        _ => None,
    }
}

fn child_button_mut<'a>(
    children: &'a mut [RowChild],
    indices: &[usize],
) -> Option<&'a mut Button> {
    let (first, rest) = indices.split_first()?;
    match (children.get_mut(*first)?, rest.is_empty()) {
        (RowChild::Button(button), true) => Some(button),
        (RowChild::Row(nested), false) => child_button_mut(&mut nested.children, rest),
        _ => None,
    }
}

fn find_identifier<'a>(
    children: &'a [RowChild],
    path: ButtonPath,
    identifier: &str,
) -> Option<(ButtonPath, &'a Button)> {
    children.iter().enumerate().find_map(|(index, child)| match child {
        RowChild::Button(button) if button.identifier.as_deref() == Some(identifier) => {
            Some((path.child(index), button))
        }
        RowChild::Button(_) => None,
        RowChild::Row(nested) => find_identifier(&nested.children, path.child(index), identifier),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{PageStyle, RowStyle, WidthPolicy};

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn letters(s: &str) -> Row {
        Row::new(s.chars().map(|c| Button::glyph(c.to_string()).into()).collect())
    }

    fn four_row_page() -> Page {
        let definition = PageDefinition {
            style: PageStyle::default(),
            rows: vec![
                letters("qwertyuiop"),
                letters("asdfghjkl"),
                Row::new(vec![
                    Button::icon("Shift", "shift")
                        .with_width(WidthPolicy::Relative(0.115))
                        .into(),
                    letters("zxcvbnm").into(),
                    Button::icon("Backspace", "backspace")
                        .with_width(WidthPolicy::Relative(0.115))
                        .into(),
                ]),
                Row::new(vec![
                    Button::label("Numbers", "123").into(),
                    Button::label("Space", "space").into(),
                    Button::label("Return", "return").into(),
                ]),
            ],
        };
        let mut page = Page::new(PageKind::Lowercase, definition, 20.0);
        page.layout(Size::new(320.0, 216.0), Orientation::Portrait);
        page
    }

    /// Row height divides what the paddings leave
    #[test]
    fn test_row_height() {
        let page = four_row_page();
        // (216 - 4 * 12) / 4 = 42
        assert!(approx_eq(page.row_height(), 42.0));

        let first = page.frame_of(&ButtonPath::direct(0, 0)).unwrap();
        let second = page.frame_of(&ButtonPath::direct(1, 0)).unwrap();
        assert!(approx_eq(first.y, 6.0));
        assert!(approx_eq(second.y, 6.0 + 42.0 + 6.0 + 6.0));
    }

    /// A tiny container yields zero-height rows, never negative
    #[test]
    fn test_row_height_clamped() {
        let mut page = four_row_page();
        page.layout(Size::new(320.0, 1.0), Orientation::Portrait);
        assert_eq!(page.row_height(), 0.0);
        assert!(page.placed_buttons().iter().all(|p| p.frame.height == 0.0));
    }

    /// Page padding and row padding are taken into account
    #[test]
    fn test_page_padding() {
        let definition = PageDefinition {
            style: PageStyle {
                top_padding: 10.0,
                bottom_padding: 4.0,
                row_padding: 8.0,
                ..PageStyle::default()
            },
            rows: vec![
                letters("ab").with_style(RowStyle {
                    top_padding: 0.0,
                    bottom_padding: 0.0,
                    bottom_padding_landscape: None,
                    ..RowStyle::default()
                }),
                letters("cd").with_style(RowStyle {
                    top_padding: 0.0,
                    bottom_padding: 0.0,
                    bottom_padding_landscape: None,
                    ..RowStyle::default()
                }),
            ],
        };
        let mut page = Page::new(PageKind::Lowercase, definition, 20.0);
        page.layout(Size::new(100.0, 114.0), Orientation::Portrait);

        // (114 - 10 - 4 - 8) / 2 = 46
        assert!(approx_eq(page.row_height(), 46.0));
        let second = page.frame_of(&ButtonPath::direct(1, 0)).unwrap();
        assert!(approx_eq(second.y, 10.0 + 46.0 + 8.0));

        // The 8px gap is split between the rows
        assert_eq!(page.hit_test(Point::new(20.0, 59.0)).unwrap().path.row(), 0);
        assert_eq!(page.hit_test(Point::new(20.0, 60.0)).unwrap().path.row(), 1);
    }

    /// Out-of-range lookups return None
    #[test]
    fn test_lookup_safety() {
        let page = four_row_page();
        assert!(page.button_at(99, 0).is_none());
        assert!(page.button_at(0, 99).is_none());
        assert!(page.button(&ButtonPath(vec![])).is_none());
        assert!(page.button(&ButtonPath(vec![2, 0, 0])).is_none());
        assert!(page.button_with_identifier("Globe").is_none());
    }

    /// Direct lookup skips nested rows; identifier lookup doesn't
    #[test]
    fn test_direct_and_recursive_lookup() {
        let page = four_row_page();
        assert!(page.button_at(2, 1).is_none());
        assert_eq!(page.button_at(0, 0).unwrap().content.glyph(), Some("q"));
        assert_eq!(
            page.button(&ButtonPath(vec![2, 1, 6])).unwrap().content.glyph(),
            Some("m")
        );

        let (path, button) = page.button_with_identifier("Backspace").unwrap();
        assert_eq!(path, ButtonPath::direct(2, 2));
        assert_eq!(button.identifier.as_deref(), Some("Backspace"));
    }

    /// Hit-testing finds letters and edge extensions
    #[test]
    fn test_hit_test() {
        let page = four_row_page();
        let q = page.frame_of(&ButtonPath::direct(0, 0)).unwrap();

        let hit = page.hit_test(Point::new(q.center_x(), q.center_y())).unwrap();
        assert_eq!(hit.path, ButtonPath::direct(0, 0));

        // Left of the leading padding still reaches q through the extension
        let edge = page.hit_test(Point::new(0.0, q.center_y())).unwrap();
        assert_eq!(edge.path, ButtonPath::direct(0, 0));

        assert!(page.hit_test(Point::new(500.0, 500.0)).is_none());
    }

    /// Insert and remove re-layout the page
    #[test]
    fn test_insert_and_remove() {
        let mut page = four_row_page();
        let before = page.placed_buttons().len();

        page.insert_button(Button::label("Globe", "globe"), 3, Some(1));
        assert_eq!(page.placed_buttons().len(), before + 1);
        assert_eq!(
            page.button_at(3, 1).unwrap().identifier.as_deref(),
            Some("Globe")
        );
        assert!(page.button_with_identifier("Globe").is_some());

        page.insert_button(Button::glyph("!"), 3, Some(99));
        assert_eq!(page.button_at(3, 4).unwrap().content.glyph(), Some("!"));

        page.insert_button(Button::glyph("?"), 42, None);
        assert_eq!(page.placed_buttons().len(), before + 2);

        assert!(page.remove_button(3, 1));
        assert!(!page.remove_button(3, 99));
        assert!(!page.remove_button(99, 0));
        assert!(page.button_with_identifier("Globe").is_none());

        // Removing a nested row drops all its buttons
        assert!(page.remove_button(2, 1));
        assert_eq!(page.placed_buttons().len(), before + 1 - 7);
    }

    #[test]
    fn test_highlights() {
        let mut page = four_row_page();
        let path = ButtonPath(vec![2, 1, 0]);

        page.set_highlighted(&path, true);
        assert!(page.button(&path).unwrap().highlighted);
        assert_eq!(page.highlighted_paths(), vec![path.clone()]);

        page.clear_highlights();
        assert!(page.highlighted_paths().is_empty());
    }
}
