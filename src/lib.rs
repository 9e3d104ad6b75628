// SPDX-License-Identifier: GPL-3.0-only

//! Tapboard - a soft keyboard layout engine and touch state machine
//!
//! This crate turns a declarative keyboard definition into absolutely
//! positioned keys, and turns raw touches into text and key events. Drawing
//! is left to the host: it renders the frames and popups the keyboard
//! reports and forwards touches back.
//!
//! # Architecture
//!
//! 1. **Definitions** (`layout`): five pages of rows, buttons and nested
//!    rows, built in code or loaded from JSON.
//!
//! 2. **Layout engine** (`engine`): resolves static, relative and dynamic
//!    widths and computes a frame and a touch area for every key.
//!
//! 3. **Input** (`input`, `keyboard`, `popup`): multi-touch tracking, the
//!    shift and page mode machine, backspace repeat, key previews and
//!    long-press menus.
//!
//! 4. **Driver** (`runtime`): an async loop feeding host input and timer
//!    deadlines into a [`Keyboard`].
//!
//! # Modules
//!
//! - `config`: Timing and behavior settings, loadable from JSON
//! - `engine`: Width resolution, row placement and hit-testing
//! - `event`: Events reported to the host and the sinks receiving them
//! - `geometry`: Points, sizes, rectangles and insets
//! - `input`: Touch tracking, identifiers, mode transitions and timers
//! - `keyboard`: The controller tying pages, input and popups together
//! - `layout`: Definition data model, parsing, validation and the QWERTY default
//! - `popup`: Key preview bubble and long-press menu
//! - `runtime`: Tokio event loop and logging setup
//! - `settings`: Default constants

pub mod config;
pub mod engine;
pub mod event;
pub mod geometry;
pub mod input;
pub mod keyboard;
pub mod layout;
pub mod popup;
pub mod runtime;
pub mod settings;

pub use crate::config::{KeyboardConfig, TimingConfig};
pub use crate::event::{ButtonRef, KeyboardEvent, KeyboardEventSink, SinkFn};
pub use crate::input::{DragPolicy, KeyboardMode, ShiftState, TouchEvent};
pub use crate::keyboard::Keyboard;
pub use crate::runtime::HostInput;

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod integration_tests {
    use crate::engine::resolve_widths;
    use crate::geometry::{Orientation, Size};
    use crate::layout::{PageKind, defaults};
    use crate::{
        DragPolicy, Keyboard, KeyboardConfig, KeyboardEvent, KeyboardMode, ShiftState, TouchEvent,
    };
    use futures::StreamExt;
    use futures::channel::mpsc;
    use std::time::{Duration, Instant};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn qwerty(mode: KeyboardMode) -> Keyboard {
        let config = KeyboardConfig {
            initial_mode: mode,
            ..KeyboardConfig::default()
        };
        let mut keyboard = Keyboard::new(defaults::qwerty(), config);
        keyboard.set_container(Size::new(320.0, 216.0), Orientation::Portrait, &mut Vec::new());
        keyboard
    }

    /// Center of the first button on the active page matching `pred`.
    fn center_where(
        keyboard: &Keyboard,
        pred: impl Fn(&crate::layout::Button) -> bool,
    ) -> (f32, f32) {
        let page = keyboard.active_page();
        let frame = page
            .placed_buttons()
            .iter()
            .find(|placed| page.button(&placed.path).is_some_and(&pred))
            .map(|placed| placed.frame)
            .unwrap();
        (frame.center_x(), frame.center_y())
    }

    fn glyph_center(keyboard: &Keyboard, glyph: &str) -> (f32, f32) {
        center_where(keyboard, |button| button.content.glyph() == Some(glyph))
    }

    fn shift_center(keyboard: &Keyboard) -> (f32, f32) {
        center_where(keyboard, |button| {
            button
                .identifier
                .as_deref()
                .is_some_and(|id| id.starts_with("Shift"))
        })
    }

    fn tap_at(
        keyboard: &mut Keyboard,
        id: u64,
        (x, y): (f32, f32),
        now: Instant,
    ) -> Vec<KeyboardEvent> {
        let mut events = Vec::new();
        keyboard.handle_touches(
            &[TouchEvent::began(id, x, y), TouchEvent::ended(id, x, y)],
            now,
            &mut events,
        );
        events
    }

    fn commits(events: &[KeyboardEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|event| match event {
                KeyboardEvent::KeyCommit(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Integration Test 1: Shift double-tap locks caps on the QWERTY layout
    ///
    /// Two shift taps inside the window land on the locked page, letters
    /// typed there stay uppercase, and a third tap unlocks.
    #[test]
    fn test_shift_double_tap_on_default_layout() {
        let start = Instant::now();
        let mut keyboard = qwerty(KeyboardMode::Letters(ShiftState::Off));
        assert_eq!(keyboard.active_page().kind(), PageKind::Lowercase);

        let shift = shift_center(&keyboard);
        tap_at(&mut keyboard, 1, shift, start);
        assert_eq!(keyboard.active_page().kind(), PageKind::Uppercase);

        let shift = shift_center(&keyboard);
        tap_at(&mut keyboard, 2, shift, start + ms(250));
        assert_eq!(keyboard.mode(), KeyboardMode::Letters(ShiftState::On));
        assert_eq!(keyboard.active_page().kind(), PageKind::UppercaseLocked);

        let q = glyph_center(&keyboard, "Q");
        let events = tap_at(&mut keyboard, 3, q, start + ms(400));
        assert_eq!(commits(&events), vec!["Q"]);
        assert_eq!(keyboard.active_page().kind(), PageKind::UppercaseLocked);

        let shift = shift_center(&keyboard);
        tap_at(&mut keyboard, 4, shift, start + ms(2000));
        assert_eq!(keyboard.mode(), KeyboardMode::Letters(ShiftState::Off));
    }

    /// Integration Test 2: Fast typing with overlapping fingers
    ///
    /// The second finger going down commits the first finger's key, so text
    /// comes out in touch-down order even when lifts arrive late.
    #[test]
    fn test_rollover_typing() {
        let now = Instant::now();
        let mut keyboard = qwerty(KeyboardMode::Letters(ShiftState::Off));
        let (qx, qy) = glyph_center(&keyboard, "q");
        let (wx, wy) = glyph_center(&keyboard, "w");
        let (tx, ty) = glyph_center(&keyboard, "t");
        let mut events = Vec::new();

        keyboard.handle_touches(&[TouchEvent::began(1, qx, qy)], now, &mut events);
        keyboard.handle_touches(&[TouchEvent::began(2, wx, wy)], now, &mut events);
        keyboard.handle_touches(&[TouchEvent::began(3, tx, ty)], now, &mut events);
        keyboard.handle_touches(
            &[
                TouchEvent::ended(1, qx, qy),
                TouchEvent::ended(3, tx, ty),
                TouchEvent::ended(2, wx, wy),
            ],
            now,
            &mut events,
        );

        assert_eq!(commits(&events), vec!["q", "w", "t"]);
    }

    /// Integration Test 3: Sentence start capitalization through a channel
    ///
    /// Events delivered to an mpsc sender arrive in order: the uppercase
    /// letter, then the switch back to lowercase.
    #[tokio::test]
    async fn test_capitalized_letter_through_channel() {
        let mut keyboard = qwerty(KeyboardMode::Letters(ShiftState::Off));
        let (mut tx, rx) = mpsc::unbounded::<KeyboardEvent>();

        keyboard.capitalize(&mut tx);
        let (x, y) = glyph_center(&keyboard, "H");
        keyboard.handle_touches(
            &[TouchEvent::began(1, x, y), TouchEvent::ended(1, x, y)],
            Instant::now(),
            &mut tx,
        );
        drop(tx);

        let events: Vec<KeyboardEvent> = rx.collect().await;
        let commit = events
            .iter()
            .position(|e| *e == KeyboardEvent::KeyCommit("H".into()))
            .unwrap();
        let lowered = events
            .iter()
            .position(|e| {
                *e == KeyboardEvent::ModeChanged {
                    old: KeyboardMode::Letters(ShiftState::Once),
                    new: KeyboardMode::Letters(ShiftState::Off),
                }
            })
            .unwrap();
        assert!(commit < lowered);
        assert_eq!(keyboard.active_page().kind(), PageKind::Lowercase);
    }

    /// Integration Test 4: Accent menu with edge capture
    ///
    /// Holding "e" opens its accent menu; dragging far past the last item
    /// still selects it, and lifting commits that accent.
    #[test]
    fn test_accent_menu_edge_capture() {
        let start = Instant::now();
        let mut keyboard = qwerty(KeyboardMode::Letters(ShiftState::Off));
        let (x, y) = glyph_center(&keyboard, "e");
        let mut events = Vec::new();

        keyboard.handle_touches(&[TouchEvent::began(1, x, y)], start, &mut events);
        keyboard.fire_timers(start + ms(1000), &mut events);
        assert!(keyboard.key_menu().is_some());
        assert!(!keyboard.typing_enabled());

        keyboard.handle_touches(&[TouchEvent::moved(1, 5000.0, y)], start + ms(1100), &mut events);
        assert_eq!(keyboard.key_menu().and_then(|menu| menu.selected()), Some(4));

        keyboard.handle_touches(&[TouchEvent::moved(1, -5000.0, y)], start + ms(1150), &mut events);
        assert_eq!(keyboard.key_menu().and_then(|menu| menu.selected()), Some(0));

        keyboard.handle_touches(&[TouchEvent::moved(1, 5000.0, y)], start + ms(1200), &mut events);
        keyboard.handle_touches(&[TouchEvent::ended(1, 5000.0, y)], start + ms(1300), &mut events);

        assert_eq!(commits(&events), vec!["ē"]);
        assert!(events.contains(&KeyboardEvent::MenuHidden));
        assert!(keyboard.key_menu().is_none());
        assert!(keyboard.typing_enabled());
    }

    /// Integration Test 5: Out-of-range lookups are safe
    #[test]
    fn test_lookup_out_of_range() {
        let keyboard = qwerty(KeyboardMode::default());

        assert!(keyboard.button(PageKind::Lowercase, 99, 0).is_none());
        assert!(keyboard.button(PageKind::Lowercase, 0, 99).is_none());
        // Index 1 of the third row is the nested letter row
        assert!(keyboard.button(PageKind::Lowercase, 2, 1).is_none());
        assert!(keyboard.button(PageKind::Lowercase, 2, 0).is_some());
        assert!(keyboard.button_with_identifier(PageKind::Numbers, "Nope").is_none());
        assert!(keyboard.button_with_identifier(PageKind::Numbers, "Symbols").is_some());
    }

    /// Integration Test 6: Rows fill the container in both orientations
    ///
    /// Every outermost row of every page spans exactly the container width,
    /// paddings included.
    #[test]
    fn test_rows_fill_container() {
        let definition = defaults::qwerty();
        let cases = [
            (320.0, Orientation::Portrait),
            (414.0, Orientation::Portrait),
            (568.0, Orientation::Landscape),
        ];

        for (width, orientation) in cases {
            for kind in PageKind::ALL {
                for row in &definition.pages.get(kind).rows {
                    let style = row.effective_style(false);
                    let widths = resolve_widths(row, &style, width, orientation);
                    let gaps = style.buttons_padding(orientation)
                        * (row.children.len().saturating_sub(1)) as f32;
                    let total = style.leading_padding(orientation)
                        + widths.iter().sum::<f32>()
                        + gaps
                        + style.trailing_padding(orientation);

                    assert!(
                        (total - width).abs() < 0.01,
                        "{} row spans {} of {}",
                        kind,
                        total,
                        width
                    );
                }
            }
        }
    }

    /// Integration Test 7: Rotation re-lays out every page
    #[test]
    fn test_rotation_relayout() {
        let mut keyboard = qwerty(KeyboardMode::default());
        let mut events = Vec::new();
        keyboard.set_container(Size::new(568.0, 162.0), Orientation::Landscape, &mut events);

        assert_eq!(events, vec![KeyboardEvent::LayoutInvalidated]);
        for kind in PageKind::ALL {
            let page = keyboard.page(kind);
            assert_eq!(page.orientation(), Orientation::Landscape);
            assert!(
                page.placed_buttons()
                    .iter()
                    .all(|placed| placed.frame.max_x() <= 568.0 + 0.01)
            );
        }
    }

    /// Integration Test 8: Sliding with drags ignored
    ///
    /// The first key stays pressed while the finger slides across the row.
    /// The key under the finger at lift is committed, and nothing stays
    /// highlighted afterwards.
    #[test]
    fn test_ignored_drag_on_default_layout() {
        let now = Instant::now();
        let config = KeyboardConfig {
            initial_mode: KeyboardMode::Letters(ShiftState::Off),
            drag_policy: DragPolicy::Ignore,
            ..KeyboardConfig::default()
        };
        let mut keyboard = Keyboard::new(defaults::qwerty(), config);
        keyboard.set_container(Size::new(320.0, 216.0), Orientation::Portrait, &mut Vec::new());
        let (qx, qy) = glyph_center(&keyboard, "q");
        let (tx, ty) = glyph_center(&keyboard, "t");
        let (px, py) = glyph_center(&keyboard, "p");
        let mut events = Vec::new();

        keyboard.handle_touches(&[TouchEvent::began(1, qx, qy)], now, &mut events);
        keyboard.handle_touches(&[TouchEvent::moved(1, tx, ty)], now, &mut events);
        keyboard.handle_touches(&[TouchEvent::moved(1, px, py)], now, &mut events);
        let held = keyboard.active_page().highlighted_paths();
        assert_eq!(held.len(), 1);
        assert_eq!(keyboard.preview().map(|preview| &preview.button), held.first());

        keyboard.handle_touches(&[TouchEvent::ended(1, px, py)], now, &mut events);
        assert_eq!(commits(&events), vec!["p"]);
        assert!(keyboard.preview().is_none());
        assert!(keyboard.active_page().highlighted_paths().is_empty());
    }
}
