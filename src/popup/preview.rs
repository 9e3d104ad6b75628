// SPDX-License-Identifier: GPL-3.0-only

//! Key preview bubble.
//!
//! The bubble shows an enlarged copy of the pressed button's content right
//! above it, its bottom edge reaching over the top of the button by the
//! connector overlap. It carries no state beyond which button it belongs to; the
//! keyboard creates one on press start and drops it on press end, drag or
//! cancel.

use crate::geometry::{Rect, Size};
use crate::layout::{Button, ButtonContent, ButtonPath, KeyPopType, KeyPreviewStyle};

/// Geometry and content of a preview bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPreview {
    pub button: ButtonPath,
    pub content: ButtonContent,
    pub pop_type: KeyPopType,
    /// Bubble frame in container coordinates
    pub frame: Rect,
    /// Area inside the bubble for the content
    pub content_frame: Rect,
    /// Scale applied to the button's font or icon
    pub font_scale: f32,
}

impl KeyPreview {
    /// Builds the preview for a button, or `None` if its style has no
    /// preview bubble.
    ///
    /// # Arguments
    ///
    /// * `path` - Address of the pressed button
    /// * `button` - The pressed button
    /// * `button_frame` - Its frame in container coordinates
    /// * `style` - Preview size multipliers, insets and connector overlap
    /// * `container` - Container size, used to keep the bubble on screen
    pub fn for_button(
        path: &ButtonPath,
        button: &Button,
        button_frame: Rect,
        style: &KeyPreviewStyle,
        container: Size,
    ) -> Option<Self> {
        let pop_type = button.style.key_pop_type;
        let width = button_frame.width * style.width_multiplier;
        let height = button_frame.height * style.height_multiplier;

        let x = match pop_type {
            KeyPopType::None => return None,
            KeyPopType::Center => button_frame.center_x() - width / 2.0,
            KeyPopType::Left => button_frame.min_x(),
            KeyPopType::Right => button_frame.max_x() - width,
        };
        let x = clamp_to_container(x, width, container.width);
        let overlap = style.connector_overlap.clamp(0.0, button_frame.height);
        let frame = Rect::new(x, button_frame.min_y() + overlap - height, width, height);

        let content_frame = Rect::new(
            frame.x + style.content_inset.width + style.content_offset.width,
            frame.y + style.content_inset.height + style.content_offset.height,
            (frame.width - style.content_inset.width * 2.0).max(0.0),
            (frame.height - style.content_inset.height * 2.0).max(0.0),
        );

        Some(Self {
            button: path.clone(),
            content: button.content.clone(),
            pop_type,
            frame,
            content_frame,
            font_scale: style.width_multiplier,
        })
    }
}

/// Keeps `[x, x + width)` inside `[0, container_width)` when it fits.
pub(crate) fn clamp_to_container(x: f32, width: f32, container_width: f32) -> f32 {
    let max_x = (container_width - width).max(0.0);
    x.clamp(0.0, max_x)
}
