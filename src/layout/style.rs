// SPDX-License-Identifier: GPL-3.0-only

//! Style configuration for pages, rows, buttons and popups.
//!
//! Styles are plain immutable values handed to each page when it is built.
//! Spacing values come in portrait/landscape pairs; a missing landscape value
//! falls back to the portrait one.

use serde::{Deserialize, Serialize};

use crate::geometry::{Orientation, Size};
use crate::settings;

/// An RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "default_alpha")]
    pub a: f32,
}

fn default_alpha() -> f32 {
    1.0
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const CLEAR: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    /// Creates a color from float components.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from 8-bit components.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Drop shadow description passed through to the host renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shadow {
    pub color: Color,
    pub opacity: f32,
    pub offset: Size,
    pub radius: f32,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            opacity: 0.4,
            offset: Size::new(0.0, 1.0),
            radius: 0.5,
        }
    }
}

/// Which preview bubble shape a button uses when pressed.
///
/// `Left` and `Right` keep the bubble inside the container for keys at the
/// row edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPopType {
    /// No preview bubble
    #[default]
    None,
    /// Bubble aligned with the key's left edge, growing to the right
    Left,
    /// Bubble centered above the key
    Center,
    /// Bubble aligned with the key's right edge, growing to the left
    Right,
}

impl KeyPopType {
    /// Returns `true` if this button shows a preview bubble at all.
    pub fn shows_preview(self) -> bool {
        self != KeyPopType::None
    }
}

/// Vertical spacing of a whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageStyle {
    pub top_padding: f32,
    pub top_padding_landscape: Option<f32>,
    pub bottom_padding: f32,
    pub bottom_padding_landscape: Option<f32>,
    /// Gap between consecutive rows, on top of each row's own paddings
    pub row_padding: f32,
    pub row_padding_landscape: Option<f32>,
    pub background_color: Color,
}

impl Default for PageStyle {
    fn default() -> Self {
        Self {
            top_padding: 0.0,
            top_padding_landscape: None,
            bottom_padding: 0.0,
            bottom_padding_landscape: None,
            row_padding: 0.0,
            row_padding_landscape: None,
            background_color: Color::rgb8(208, 213, 219),
        }
    }
}

impl PageStyle {
    pub fn top_padding(&self, orientation: Orientation) -> f32 {
        pick(orientation, self.top_padding, self.top_padding_landscape)
    }

    pub fn bottom_padding(&self, orientation: Orientation) -> f32 {
        pick(orientation, self.bottom_padding, self.bottom_padding_landscape)
    }

    pub fn row_padding(&self, orientation: Orientation) -> f32 {
        pick(orientation, self.row_padding, self.row_padding_landscape)
    }
}

/// Spacing of a single row and of the buttons inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowStyle {
    pub leading_padding: f32,
    pub leading_padding_landscape: Option<f32>,
    pub trailing_padding: f32,
    pub trailing_padding_landscape: Option<f32>,
    pub top_padding: f32,
    pub top_padding_landscape: Option<f32>,
    pub bottom_padding: f32,
    pub bottom_padding_landscape: Option<f32>,
    /// Gap between two adjacent children of the row
    pub buttons_padding: f32,
    pub buttons_padding_landscape: Option<f32>,
}

impl Default for RowStyle {
    fn default() -> Self {
        Self {
            leading_padding: settings::ROW_LEADING_PADDING,
            leading_padding_landscape: None,
            trailing_padding: settings::ROW_TRAILING_PADDING,
            trailing_padding_landscape: None,
            top_padding: settings::ROW_TOP_PADDING,
            top_padding_landscape: None,
            bottom_padding: settings::ROW_BOTTOM_PADDING,
            bottom_padding_landscape: Some(settings::ROW_BOTTOM_PADDING_LANDSCAPE),
            buttons_padding: settings::ROW_BUTTONS_PADDING,
            buttons_padding_landscape: Some(settings::ROW_BUTTONS_PADDING_LANDSCAPE),
        }
    }
}

impl RowStyle {
    /// Style for a nested row: no edge padding of its own.
    pub fn nested() -> Self {
        Self {
            leading_padding: 0.0,
            trailing_padding: 0.0,
            ..Self::default()
        }
    }

    pub fn leading_padding(&self, orientation: Orientation) -> f32 {
        pick(orientation, self.leading_padding, self.leading_padding_landscape)
    }

    pub fn trailing_padding(&self, orientation: Orientation) -> f32 {
        pick(orientation, self.trailing_padding, self.trailing_padding_landscape)
    }

    pub fn top_padding(&self, orientation: Orientation) -> f32 {
        pick(orientation, self.top_padding, self.top_padding_landscape)
    }

    pub fn bottom_padding(&self, orientation: Orientation) -> f32 {
        pick(orientation, self.bottom_padding, self.bottom_padding_landscape)
    }

    pub fn buttons_padding(&self, orientation: Orientation) -> f32 {
        pick(orientation, self.buttons_padding, self.buttons_padding_landscape)
    }
}

/// Appearance of a button, passed through to the host renderer.
///
/// Only `key_pop_type` affects behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonStyle {
    pub background_color: Color,
    pub text_color: Color,
    pub font_size: f32,
    pub corner_radius: f32,
    pub border_color: Color,
    pub border_width: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    /// Icon size; icons fill the key minus padding when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size: Option<f32>,
    pub text_offset_y: f32,
    pub key_pop_type: KeyPopType,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            background_color: Color::WHITE,
            text_color: Color::BLACK,
            font_size: 20.0,
            corner_radius: 5.0,
            border_color: Color::CLEAR,
            border_width: 0.0,
            shadow: Some(Shadow::default()),
            image_size: None,
            text_offset_y: 0.0,
            key_pop_type: KeyPopType::None,
        }
    }
}

impl ButtonStyle {
    /// Default letter key style with the given preview bubble.
    pub fn key(key_pop_type: KeyPopType) -> Self {
        Self {
            key_pop_type,
            ..Self::default()
        }
    }

    /// Darker style used by function keys (shift, backspace, mode switches).
    pub fn function() -> Self {
        Self {
            background_color: Color::rgb8(172, 179, 188),
            font_size: 15.0,
            ..Self::default()
        }
    }
}

/// Appearance and size of the key preview bubble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyPreviewStyle {
    pub background_color: Color,
    pub text_color: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    pub width_multiplier: f32,
    pub height_multiplier: f32,
    pub content_inset: Size,
    pub content_offset: Size,
    /// Depth of the connector joining the bubble to its key
    pub connector_overlap: f32,
}

impl Default for KeyPreviewStyle {
    fn default() -> Self {
        Self {
            background_color: Color::WHITE,
            text_color: Color::BLACK,
            shadow: None,
            width_multiplier: settings::PREVIEW_WIDTH_MULTIPLIER,
            height_multiplier: settings::PREVIEW_HEIGHT_MULTIPLIER,
            content_inset: Size::new(
                settings::PREVIEW_CONTENT_INSET,
                settings::PREVIEW_CONTENT_INSET,
            ),
            content_offset: Size::default(),
            connector_overlap: settings::PREVIEW_CONNECTOR_OVERLAP,
        }
    }
}

/// Appearance and item metrics of key menus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyMenuStyle {
    pub background_color: Color,
    pub item_width: f32,
    pub item_height: f32,
    pub separator_thickness: f32,
    pub separator_color: Color,
    pub text_color: Color,
    pub highlighted_text_color: Color,
    pub highlighted_background_color: Color,
    pub font_size: f32,
}

impl Default for KeyMenuStyle {
    fn default() -> Self {
        Self {
            background_color: Color::rgb8(128, 128, 128),
            item_width: settings::MENU_ITEM_WIDTH,
            item_height: settings::MENU_ITEM_HEIGHT,
            separator_thickness: settings::MENU_SEPARATOR_THICKNESS,
            separator_color: Color::rgb8(200, 200, 200),
            text_color: Color::BLACK,
            highlighted_text_color: Color::WHITE,
            highlighted_background_color: Color::rgb8(0, 122, 255),
            font_size: 15.0,
        }
    }
}

fn pick(orientation: Orientation, portrait: f32, landscape: Option<f32>) -> f32 {
    match orientation {
        Orientation::Portrait => portrait,
        Orientation::Landscape => landscape.unwrap_or(portrait),
    }
}
