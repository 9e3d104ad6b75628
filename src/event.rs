// SPDX-License-Identifier: GPL-3.0-only

//! Events the keyboard reports to its host.
//!
//! The keyboard never inserts text or draws anything itself. It pushes
//! [`KeyboardEvent`]s into a [`KeyboardEventSink`], and the host turns them
//! into text edits and redraws.

use futures::channel::mpsc::UnboundedSender;

use crate::input::KeyboardMode;
use crate::layout::{ButtonContent, ButtonPath, PageKind};
use crate::popup::{KeyMenu, KeyPreview};

/// Identifies the button an event came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonRef {
    pub page: PageKind,
    pub path: ButtonPath,
    pub identifier: Option<String>,
    pub content: ButtonContent,
}

/// Messages emitted by the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyboardEvent {
    /// Text committed by a glyph key or a key menu item
    KeyCommit(String),

    Space,
    Backspace,
    Return,

    /// The globe key asks the host to switch to the next keyboard
    GlobeSwitch,

    /// Any button was released. Sent before the button's specific event.
    ButtonPressed(ButtonRef),

    /// A button with a host-defined identifier was released.
    CustomButtonPressed { identifier: String, button: ButtonRef },

    /// A key menu item with a custom action was selected.
    CustomMenuItemSelected(String),

    ModeChanged { old: KeyboardMode, new: KeyboardMode },

    PreviewShown(KeyPreview),
    PreviewHidden,

    MenuShown(KeyMenu),
    MenuSelectionChanged(Option<usize>),
    MenuHidden,

    /// Geometry or highlights changed; the host should redraw.
    LayoutInvalidated,
}

/// Receiver of keyboard events.
pub trait KeyboardEventSink {
    fn send(&mut self, event: KeyboardEvent);
}

impl KeyboardEventSink for Vec<KeyboardEvent> {
    fn send(&mut self, event: KeyboardEvent) {
        self.push(event);
    }
}

impl KeyboardEventSink for UnboundedSender<KeyboardEvent> {
    fn send(&mut self, event: KeyboardEvent) {
        if let Err(err) = self.unbounded_send(event) {
            tracing::warn!("Dropping keyboard event, receiver is gone: {}", err);
        }
    }
}

/// Adapts a closure into a [`KeyboardEventSink`].
///
/// # Example
///
/// ```rust,ignore
/// let mut committed = String::new();
/// let mut sink = SinkFn(|event| {
///     if let KeyboardEvent::KeyCommit(text) = event {
///         committed.push_str(&text);
///     }
/// });
/// ```
pub struct SinkFn<F>(pub F);

impl<F: FnMut(KeyboardEvent)> KeyboardEventSink for SinkFn<F> {
    fn send(&mut self, event: KeyboardEvent) {
        (self.0)(event);
    }
}
