// SPDX-License-Identifier: GPL-3.0-only

//! Long-press key menu.
//!
//! A menu is a row or column of items shown above its key. Selection follows
//! the finger continuously: while dragging, only the main axis matters and
//! the first and last items reach out to infinity, so sliding past the menu
//! keeps the edge item selected.
//!
//! # Release rules
//!
//! 1. An item is selected: its action fires and the menu closes.
//! 2. Nothing is selected and the menu is locked: the menu closes.
//! 3. Nothing is selected otherwise: the menu locks open and waits for a tap.

use crate::geometry::{Point, Rect, Size};
use crate::layout::{ButtonPath, KeyMenuSpec, KeyMenuStyle, MenuAction, MenuOrientation};
use crate::settings;

use super::preview::clamp_to_container;

/// A laid-out menu entry.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyMenuItem {
    pub title: String,
    pub action: MenuAction,
    pub frame: Rect,
}

/// What a release on an open menu leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuRelease {
    /// Fire the action and close
    Fire(MenuAction),
    /// Close without an action
    Close,
    /// Stay open, locked
    Lock,
}

/// An open key menu.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyMenu {
    pub anchor: ButtonPath,
    pub orientation: MenuOrientation,
    pub frame: Rect,
    pub items: Vec<KeyMenuItem>,
    selected: Option<usize>,
    locked: bool,
    dragged: bool,
}

impl KeyMenu {
    /// Lays the menu out centered above its anchor button and inside the
    /// container width.
    pub fn new(
        anchor: ButtonPath,
        spec: &KeyMenuSpec,
        anchor_frame: Rect,
        style: &KeyMenuStyle,
        container: Size,
    ) -> Self {
        let size = menu_size(spec, style);
        let x = clamp_to_container(
            anchor_frame.center_x() - size.width / 2.0,
            size.width,
            container.width,
        );
        let y = anchor_frame.min_y() - size.height - settings::POPUP_GAP;
        Self::at(anchor, spec, Point::new(x, y), style)
    }

    /// Lays the menu out with its top-left corner at `origin`.
    pub fn at(anchor: ButtonPath, spec: &KeyMenuSpec, origin: Point, style: &KeyMenuStyle) -> Self {
        let size = menu_size(spec, style);
        let items = spec
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let offset = index as f32;
                let frame = match spec.orientation {
                    MenuOrientation::Horizontal => Rect::new(
                        origin.x + offset * style.item_width,
                        origin.y,
                        style.item_width,
                        style.item_height,
                    ),
                    MenuOrientation::Vertical => Rect::new(
                        origin.x,
                        origin.y + offset * (style.item_height + style.separator_thickness),
                        style.item_width,
                        style.item_height,
                    ),
                };
                KeyMenuItem {
                    title: item.title.clone(),
                    action: item.action.clone(),
                    frame,
                }
            })
            .collect();

        Self {
            anchor,
            orientation: spec.orientation,
            frame: Rect::new(origin.x, origin.y, size.width, size.height),
            items,
            selected: None,
            locked: false,
            dragged: false,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Selects by the main-axis coordinate only, edge items extended to
    /// infinity. Returns `true` if the selection changed.
    pub fn update_selection(&mut self, point: Point) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let coordinate = |rect: &Rect| match self.orientation {
            MenuOrientation::Horizontal => rect.min_x(),
            MenuOrientation::Vertical => rect.min_y(),
        };
        let value = match self.orientation {
            MenuOrientation::Horizontal => point.x,
            MenuOrientation::Vertical => point.y,
        };
        let index = self
            .items
            .iter()
            .rposition(|item| coordinate(&item.frame) <= value)
            .unwrap_or(0);
        self.set_selected(Some(index))
    }

    /// Selects the item whose frame strictly contains `point`, or nothing.
    /// Returns `true` if the selection changed.
    pub fn highlight_exact(&mut self, point: Point) -> bool {
        let index = self.items.iter().position(|item| item.frame.contains(point));
        self.set_selected(index)
    }

    fn set_selected(&mut self, index: Option<usize>) -> bool {
        let changed = self.selected != index;
        self.selected = index;
        changed
    }

    /// A new touch went down while the menu is open.
    pub fn touch_down(&mut self, point: Point) -> bool {
        self.dragged = false;
        self.highlight_exact(point)
    }

    /// The touch moved while the menu is open.
    pub fn touch_moved(&mut self, point: Point) -> bool {
        self.dragged = true;
        self.update_selection(point)
    }

    /// The touch lifted; see the module docs for the rules.
    pub fn touch_up(&mut self, point: Point) -> MenuRelease {
        if self.dragged {
            self.update_selection(point);
        }
        self.dragged = false;

        match self.selected.and_then(|index| self.items.get(index)) {
            Some(item) => MenuRelease::Fire(item.action.clone()),
            None if self.locked => MenuRelease::Close,
            None => {
                self.locked = true;
                MenuRelease::Lock
            }
        }
    }
}

fn menu_size(spec: &KeyMenuSpec, style: &KeyMenuStyle) -> Size {
    let count = spec.items.len() as f32;
    let separators = (spec.items.len().saturating_sub(1)) as f32;
    match spec.orientation {
        MenuOrientation::Horizontal => Size::new(count * style.item_width, style.item_height),
        MenuOrientation::Vertical => Size::new(
            style.item_width,
            count * style.item_height + separators * style.separator_thickness,
        ),
    }
}
