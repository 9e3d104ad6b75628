// SPDX-License-Identifier: GPL-3.0-only

//! The keyboard controller.
//!
//! [`Keyboard`] ties the pieces together: it owns one [`Page`] per mode, the
//! touch tracker, the timers and the transient popups, and turns host input
//! into [`KeyboardEvent`]s.
//!
//! Everything runs on the caller's thread. Each entry point takes the current
//! time explicitly and timers only fire when the caller passes a time past
//! their deadline, so the controller is fully deterministic. [`crate::runtime::run`] drives it
//! from a tokio event loop.
//!
//! # Touch routing
//!
//! - A new touch first commits every older touch (rollover), then is
//!   hit-tested against the page of the resulting mode.
//! - While a key menu is open, typing is disabled and touches go to the menu.
//! - A cancelled touch resets all interaction state: timers, tracking,
//!   preview, menu and highlights.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Instant;
//! use tapboard::{Keyboard, KeyboardConfig, TouchEvent};
//! use tapboard::geometry::{Orientation, Size};
//! use tapboard::layout::defaults;
//!
//! let mut keyboard = Keyboard::new(defaults::qwerty(), KeyboardConfig::default());
//! let mut events = Vec::new();
//! keyboard.set_container(Size::new(320.0, 216.0), Orientation::Portrait, &mut events);
//!
//! let now = Instant::now();
//! keyboard.handle_touches(&[TouchEvent::began(1, 20.0, 30.0)], now, &mut events);
//! keyboard.handle_touches(&[TouchEvent::ended(1, 20.0, 30.0)], now, &mut events);
//! ```

use std::time::Instant;

use crate::config::KeyboardConfig;
use crate::engine::Page;
use crate::event::{ButtonRef, KeyboardEvent, KeyboardEventSink};
use crate::geometry::{Orientation, Point, Size};
use crate::input::{
    KeyIdentifier, KeyRole, KeyboardMode, PressEvent, ScheduledTask, ShiftState,
    ShiftTimerEffect, TimerKind, TimerQueue, TouchEvent, TouchId, TouchPhase, TouchTracker,
};
use crate::layout::{Button, ButtonPath, KeyboardDefinition, MenuAction, PageKind};
use crate::popup::{KeyMenu, KeyPreview, MenuRelease};

/// A soft keyboard: five pages, the mode state machine and its popups.
#[derive(Debug)]
pub struct Keyboard {
    definition: KeyboardDefinition,
    config: KeyboardConfig,
    /// Indexed by `PageKind as usize`
    pages: Vec<Page>,
    mode: KeyboardMode,
    container: Size,
    orientation: Orientation,

    tracker: TouchTracker,
    timers: TimerQueue,
    shift_timer: Option<ScheduledTask>,
    backspace_delay: Option<ScheduledTask>,
    backspace_repeat: Option<ScheduledTask>,
    menu_timer: Option<ScheduledTask>,
    /// Button whose menu opens when `menu_timer` fires
    menu_candidate: Option<ButtonPath>,

    preview: Option<KeyPreview>,
    menu: Option<KeyMenu>,
    /// Touch currently interacting with the open menu
    menu_touch: Option<TouchId>,

    /// A redraw is owed to the host
    dirty: bool,
}

impl Keyboard {
    /// Creates a keyboard. Nothing is laid out until
    /// [`Keyboard::set_container`] is called.
    pub fn new(definition: KeyboardDefinition, config: KeyboardConfig) -> Self {
        let pages = build_pages(&definition, &config);
        tracing::info!(
            layout = %definition.name,
            mode = %config.initial_mode,
            "Keyboard created"
        );

        Self {
            mode: config.initial_mode,
            tracker: TouchTracker::new(config.drag_policy),
            definition,
            config,
            pages,
            container: Size::default(),
            orientation: Orientation::default(),
            timers: TimerQueue::new(),
            shift_timer: None,
            backspace_delay: None,
            backspace_repeat: None,
            menu_timer: None,
            menu_candidate: None,
            preview: None,
            menu: None,
            menu_touch: None,
            dirty: false,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn definition(&self) -> &KeyboardDefinition {
        &self.definition
    }

    pub fn config(&self) -> &KeyboardConfig {
        &self.config
    }

    pub fn mode(&self) -> KeyboardMode {
        self.mode
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The page shown in the current mode.
    pub fn active_page(&self) -> &Page {
        self.page(self.mode.page_kind())
    }

    pub fn page(&self, kind: PageKind) -> &Page {
        &self.pages[kind as usize]
    }

    fn active_page_mut(&mut self) -> &mut Page {
        let index = self.mode.page_kind() as usize;
        &mut self.pages[index]
    }

    /// The preview bubble currently shown, if any.
    pub fn preview(&self) -> Option<&KeyPreview> {
        self.preview.as_ref()
    }

    /// The key menu currently open, if any.
    pub fn key_menu(&self) -> Option<&KeyMenu> {
        self.menu.as_ref()
    }

    /// Whether touches on the active page produce presses.
    pub fn typing_enabled(&self) -> bool {
        self.active_page().typing_enabled()
    }

    /// Earliest time [`Keyboard::fire_timers`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Returns a direct button child of a row on a page.
    pub fn button(&self, kind: PageKind, row: usize, index: usize) -> Option<&Button> {
        self.page(kind).button_at(row, index)
    }

    /// Finds a button by identifier on a page, nested rows included.
    pub fn button_with_identifier(
        &self,
        kind: PageKind,
        identifier: &str,
    ) -> Option<(ButtonPath, &Button)> {
        self.page(kind).button_with_identifier(identifier)
    }

    // ========================================================================
    // Host input
    // ========================================================================

    /// Lays out every page for a new container size or orientation.
    ///
    /// Any press or popup in progress is dropped, since its geometry no
    /// longer applies.
    pub fn set_container(
        &mut self,
        container: Size,
        orientation: Orientation,
        sink: &mut dyn KeyboardEventSink,
    ) {
        self.reset_interaction(sink);
        self.container = container;
        self.orientation = orientation;
        for page in &mut self.pages {
            page.layout(container, orientation);
        }
        self.dirty = true;
        self.flush(sink);
    }

    /// Processes one batch of touch events in order.
    ///
    /// Timers already due at `now` fire first.
    pub fn handle_touches(
        &mut self,
        touches: &[TouchEvent],
        now: Instant,
        sink: &mut dyn KeyboardEventSink,
    ) {
        self.fire_due(now, sink);
        for touch in touches {
            tracing::trace!(
                touch = touch.id.0,
                phase = ?touch.phase,
                x = touch.location.x,
                y = touch.location.y,
                "touch"
            );
            if self.menu.is_some() {
                self.route_to_menu(touch, sink);
            } else {
                self.route_to_page(touch, now, sink);
            }
        }
        self.flush(sink);
    }

    /// Fires every timer due at `now`.
    pub fn fire_timers(&mut self, now: Instant, sink: &mut dyn KeyboardEventSink) {
        self.fire_due(now, sink);
        self.flush(sink);
    }

    /// Replaces the definition, keeping the current mode and container.
    pub fn reload(&mut self, definition: KeyboardDefinition, sink: &mut dyn KeyboardEventSink) {
        self.reset_interaction(sink);
        self.pages = build_pages(&definition, &self.config);
        for page in &mut self.pages {
            page.layout(self.container, self.orientation);
        }
        tracing::info!(layout = %definition.name, "Keyboard definition reloaded");
        self.definition = definition;
        self.dirty = true;
        self.flush(sink);
    }

    // ========================================================================
    // Host-driven mode and page changes
    // ========================================================================

    /// Shows the letters page with the given shift state.
    pub fn switch_to_letters(&mut self, shift: ShiftState, sink: &mut dyn KeyboardEventSink) {
        self.timers.cancel_slot(&mut self.shift_timer);
        self.set_mode(KeyboardMode::Letters(shift), sink);
        self.flush(sink);
    }

    /// Capitalizes the next letter, e.g. at the start of a sentence.
    pub fn capitalize(&mut self, sink: &mut dyn KeyboardEventSink) {
        self.switch_to_letters(ShiftState::Once, sink);
    }

    /// Inserts a button into a row of a page; see [`Page::insert_button`].
    pub fn insert_button(
        &mut self,
        kind: PageKind,
        button: Button,
        row: usize,
        at: Option<usize>,
        sink: &mut dyn KeyboardEventSink,
    ) {
        if kind == self.mode.page_kind() {
            self.reset_interaction(sink);
        }
        self.pages[kind as usize].insert_button(button, row, at);
        self.dirty = true;
        self.flush(sink);
    }

    /// Removes a row child from a page; see [`Page::remove_button`].
    pub fn remove_button(
        &mut self,
        kind: PageKind,
        row: usize,
        index: usize,
        sink: &mut dyn KeyboardEventSink,
    ) -> bool {
        if kind == self.mode.page_kind() {
            self.reset_interaction(sink);
        }
        let removed = self.pages[kind as usize].remove_button(row, index);
        self.dirty |= removed;
        self.flush(sink);
        removed
    }

    // ========================================================================
    // Touch routing
    // ========================================================================

    fn hit(&self, point: Point) -> Option<ButtonPath> {
        let page = self.active_page();
        if !page.typing_enabled() {
            return None;
        }
        page.hit_test(point).map(|placed| placed.path.clone())
    }

    fn route_to_page(
        &mut self,
        touch: &TouchEvent,
        now: Instant,
        sink: &mut dyn KeyboardEventSink,
    ) {
        let id = touch.id;
        match touch.phase {
            TouchPhase::Began => {
                // Commit older touches first; a mode change they cause
                // already applies to this touch.
                for press in self.tracker.retire_others(id) {
                    self.apply_press(press, now, sink);
                }
                let hit = self.hit(touch.location);
                if let Some(press) = self.tracker.begin(id, hit) {
                    self.apply_press(press, now, sink);
                }
            }
            TouchPhase::Moved => {
                let hit = self.hit(touch.location);
                if let Some(press) = self.tracker.moved(id, hit) {
                    self.apply_press(press, now, sink);
                }
            }
            TouchPhase::Ended => {
                let hit = self.hit(touch.location);
                if let Some(press) = self.tracker.ended(id, hit) {
                    self.apply_press(press, now, sink);
                }
            }
            TouchPhase::Cancelled => {
                tracing::debug!(touch = id.0, "Touch cancelled, resetting interaction");
                self.reset_interaction(sink);
            }
        }
    }

    fn route_to_menu(&mut self, touch: &TouchEvent, sink: &mut dyn KeyboardEventSink) {
        if touch.phase == TouchPhase::Cancelled {
            tracing::debug!(touch = touch.id.0, "Touch cancelled, closing key menu");
            self.reset_interaction(sink);
            return;
        }
        let owns_menu = self.menu_touch == Some(touch.id);
        let Some(menu) = self.menu.as_mut() else {
            return;
        };

        match touch.phase {
            TouchPhase::Began => {
                self.menu_touch = Some(touch.id);
                if menu.touch_down(touch.location) {
                    sink.send(KeyboardEvent::MenuSelectionChanged(menu.selected()));
                    self.dirty = true;
                }
            }
            TouchPhase::Moved if owns_menu => {
                if menu.touch_moved(touch.location) {
                    sink.send(KeyboardEvent::MenuSelectionChanged(menu.selected()));
                    self.dirty = true;
                }
            }
            TouchPhase::Ended if owns_menu => {
                let release = menu.touch_up(touch.location);
                self.menu_touch = None;
                match release {
                    MenuRelease::Fire(action) => {
                        self.close_menu(sink);
                        self.menu_action(action, sink);
                    }
                    MenuRelease::Close => self.close_menu(sink),
                    MenuRelease::Lock => tracing::debug!("Key menu locked open"),
                }
            }
            _ => tracing::trace!(touch = touch.id.0, "Touch ignored while key menu is open"),
        }
    }

    // ========================================================================
    // Presses
    // ========================================================================

    fn apply_press(&mut self, press: PressEvent, now: Instant, sink: &mut dyn KeyboardEventSink) {
        match press {
            PressEvent::PressStart(path) => self.press_started(path, now, sink),
            PressEvent::DraggedIn { from, to } => {
                tracing::trace!(%from, %to, "Press dragged");
                self.active_page_mut().set_highlighted(&from, false);
                self.press_started(to, now, sink);
            }
            PressEvent::PressEnd { pressed, end } => self.press_ended(pressed, end, now, sink),
            PressEvent::Abandoned(path) => {
                tracing::trace!(%path, "Press abandoned");
                self.cancel_press_timers();
                self.hide_preview(sink);
                self.active_page_mut().set_highlighted(&path, false);
                self.dirty = true;
            }
        }
    }

    fn press_started(&mut self, path: ButtonPath, now: Instant, sink: &mut dyn KeyboardEventSink) {
        // A new press always restarts the press timers, so a lost touch-up
        // can't leave backspace repeating.
        self.cancel_press_timers();

        let page = self.active_page();
        let Some(button) = page.button(&path).cloned() else {
            return;
        };
        let Some(frame) = page.frame_of(&path) else {
            return;
        };

        self.active_page_mut().set_highlighted(&path, true);
        self.dirty = true;

        if is_identifier(&button, KeyIdentifier::Backspace) {
            self.backspace_delay = Some(self.timers.schedule(
                TimerKind::BackspaceRepeatDelay,
                now,
                self.config.timing.backspace_repeat_delay(),
            ));
        }

        self.hide_preview(sink);
        if button.style.key_pop_type.shows_preview() {
            if let Some(preview) = KeyPreview::for_button(
                &path,
                &button,
                frame,
                &self.definition.preview_style,
                self.container,
            ) {
                sink.send(KeyboardEvent::PreviewShown(preview.clone()));
                self.preview = Some(preview);
            }
            if button.has_menu() {
                self.menu_timer = Some(self.timers.schedule(
                    TimerKind::KeyMenuOpen,
                    now,
                    self.config.timing.key_menu_open_delay(),
                ));
                self.menu_candidate = Some(path);
            }
        } else if button.has_menu() {
            self.open_menu(&path, sink);
        }
    }

    /// Commits `path`, the button under the finger at lift. `pressed` is the
    /// button the touch held; it differs when the finger reached `path`
    /// without a reported drag.
    fn press_ended(
        &mut self,
        pressed: ButtonPath,
        path: ButtonPath,
        now: Instant,
        sink: &mut dyn KeyboardEventSink,
    ) {
        self.cancel_press_timers();
        self.hide_preview(sink);
        let page = self.active_page_mut();
        page.set_highlighted(&pressed, false);
        page.set_highlighted(&path, false);
        self.dirty = true;

        let Some(button) = self.active_page().button(&path).cloned() else {
            return;
        };
        let button_ref = ButtonRef {
            page: self.mode.page_kind(),
            path,
            identifier: button.identifier.clone(),
            content: button.content.clone(),
        };
        sink.send(KeyboardEvent::ButtonPressed(button_ref.clone()));

        match KeyRole::classify(button.identifier.as_deref(), button.content.glyph()) {
            KeyRole::Glyph(text) => self.commit(text.to_string(), sink),
            KeyRole::Special(key) => self.special_key(key, now, sink),
            KeyRole::Custom(identifier) => sink.send(KeyboardEvent::CustomButtonPressed {
                identifier: identifier.to_string(),
                button: button_ref,
            }),
            KeyRole::Inert => tracing::trace!(path = %button_ref.path, "Inert button released"),
        }
    }

    fn commit(&mut self, text: String, sink: &mut dyn KeyboardEventSink) {
        sink.send(KeyboardEvent::KeyCommit(text));
        let next = self.mode.after_glyph();
        self.set_mode(next, sink);
    }

    fn special_key(&mut self, key: KeyIdentifier, now: Instant, sink: &mut dyn KeyboardEventSink) {
        match key {
            KeyIdentifier::Space => sink.send(KeyboardEvent::Space),
            KeyIdentifier::Backspace => sink.send(KeyboardEvent::Backspace),
            KeyIdentifier::Return => sink.send(KeyboardEvent::Return),
            KeyIdentifier::Globe => sink.send(KeyboardEvent::GlobeSwitch),
            KeyIdentifier::Numbers
            | KeyIdentifier::Symbols
            | KeyIdentifier::Letters
            | KeyIdentifier::Shift => {
                let window_open = self
                    .shift_timer
                    .is_some_and(|task| self.timers.is_scheduled(task));
                let transition = self.mode.after_key(key, window_open);

                match transition.shift_timer {
                    ShiftTimerEffect::Keep => {}
                    ShiftTimerEffect::Arm => {
                        self.timers.cancel_slot(&mut self.shift_timer);
                        self.shift_timer = Some(self.timers.schedule(
                            TimerKind::ShiftToggle,
                            now,
                            self.config.timing.shift_toggle_interval(),
                        ));
                    }
                    ShiftTimerEffect::Cancel => self.timers.cancel_slot(&mut self.shift_timer),
                }
                self.set_mode(transition.mode, sink);
            }
        }
    }

    fn menu_action(&mut self, action: MenuAction, sink: &mut dyn KeyboardEventSink) {
        match action {
            MenuAction::Commit(text) => self.commit(text, sink),
            MenuAction::Custom(identifier) => {
                sink.send(KeyboardEvent::CustomMenuItemSelected(identifier))
            }
        }
    }

    fn set_mode(&mut self, mode: KeyboardMode, sink: &mut dyn KeyboardEventSink) {
        let old = self.mode;
        if old == mode {
            return;
        }
        self.active_page_mut().clear_highlights();
        self.mode = mode;
        tracing::debug!(%old, new = %mode, "Keyboard mode changed");
        sink.send(KeyboardEvent::ModeChanged { old, new: mode });
        self.dirty = true;
    }

    // ========================================================================
    // Timers
    // ========================================================================

    fn fire_due(&mut self, now: Instant, sink: &mut dyn KeyboardEventSink) {
        while let Some((task, deadline)) = self.timers.pop_expired(now) {
            self.timer_fired(task, deadline, sink);
        }
    }

    fn timer_fired(
        &mut self,
        task: ScheduledTask,
        deadline: Instant,
        sink: &mut dyn KeyboardEventSink,
    ) {
        tracing::debug!(kind = ?task.kind(), "Timer fired");
        match task.kind() {
            TimerKind::ShiftToggle if self.shift_timer == Some(task) => {
                // Only closes the double-tap window; the mode stays.
                self.shift_timer = None;
            }
            TimerKind::BackspaceRepeatDelay if self.backspace_delay == Some(task) => {
                self.backspace_delay = None;
                self.backspace_repeat = Some(self.timers.schedule_repeating(
                    TimerKind::BackspaceRepeat,
                    deadline,
                    self.config.timing.backspace_repeat_interval(),
                ));
            }
            TimerKind::BackspaceRepeat if self.backspace_repeat == Some(task) => {
                sink.send(KeyboardEvent::Backspace);
            }
            TimerKind::KeyMenuOpen if self.menu_timer == Some(task) => {
                self.menu_timer = None;
                if let Some(path) = self.menu_candidate.take() {
                    self.open_menu(&path, sink);
                }
            }
            kind => {
                tracing::warn!(?kind, "Ignoring stray timer");
                self.timers.cancel(task);
            }
        }
    }

    fn cancel_press_timers(&mut self) {
        self.timers.cancel_slot(&mut self.backspace_delay);
        self.timers.cancel_slot(&mut self.backspace_repeat);
        self.timers.cancel_slot(&mut self.menu_timer);
        self.menu_candidate = None;
    }

    // ========================================================================
    // Popups
    // ========================================================================

    fn hide_preview(&mut self, sink: &mut dyn KeyboardEventSink) {
        if self.preview.take().is_some() {
            sink.send(KeyboardEvent::PreviewHidden);
        }
    }

    fn open_menu(&mut self, path: &ButtonPath, sink: &mut dyn KeyboardEventSink) {
        let page = self.active_page();
        let Some(spec) = page
            .button(path)
            .and_then(|button| button.menu.as_ref())
            .filter(|spec| !spec.items.is_empty())
        else {
            return;
        };
        let Some(anchor_frame) = page.frame_of(path) else {
            return;
        };
        let menu = KeyMenu::new(
            path.clone(),
            spec,
            anchor_frame,
            &self.definition.menu_style,
            self.container,
        );

        // The touch holding the key now drives the menu.
        self.menu_touch = self.tracker.primary().map(|(id, _)| id);
        self.tracker.reset();
        self.cancel_press_timers();
        self.hide_preview(sink);

        let page = self.active_page_mut();
        page.clear_highlights();
        page.set_typing_enabled(false);

        tracing::debug!(%path, items = menu.items.len(), "Key menu opened");
        sink.send(KeyboardEvent::MenuShown(menu.clone()));
        self.menu = Some(menu);
        self.dirty = true;
    }

    fn close_menu(&mut self, sink: &mut dyn KeyboardEventSink) {
        if self.menu.take().is_none() {
            return;
        }
        self.menu_touch = None;
        for page in &mut self.pages {
            page.set_typing_enabled(true);
        }
        tracing::debug!("Key menu closed");
        sink.send(KeyboardEvent::MenuHidden);
        self.dirty = true;
    }

    /// Drops every press, timer and popup. The mode is kept.
    fn reset_interaction(&mut self, sink: &mut dyn KeyboardEventSink) {
        self.cancel_press_timers();
        self.timers.cancel_slot(&mut self.shift_timer);
        self.tracker.reset();
        self.hide_preview(sink);
        self.close_menu(sink);
        for page in &mut self.pages {
            page.clear_highlights();
            page.set_typing_enabled(true);
        }
        self.dirty = true;
    }

    fn flush(&mut self, sink: &mut dyn KeyboardEventSink) {
        if std::mem::take(&mut self.dirty) {
            sink.send(KeyboardEvent::LayoutInvalidated);
        }
    }
}

fn build_pages(definition: &KeyboardDefinition, config: &KeyboardConfig) -> Vec<Page> {
    PageKind::ALL
        .iter()
        .map(|kind| {
            Page::new(
                *kind,
                definition.pages.get(*kind).clone(),
                config.edge_hit_extension,
            )
        })
        .collect()
}

fn is_identifier(button: &Button, key: KeyIdentifier) -> bool {
    button
        .identifier
        .as_deref()
        .and_then(KeyIdentifier::parse)
        .is_some_and(|parsed| parsed == key)
}
