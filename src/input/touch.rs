// SPDX-License-Identifier: GPL-3.0-only

//! Touch disambiguation.
//!
//! Raw touches are keyed by their runtime identity, never by position, and
//! turned into discrete press events:
//!
//! - a touch going down on a button starts a press
//! - a new touch commits every older touch still down (rollover typing), so
//!   the newest touch is always the primary one
//! - sliding onto another button reports one combined [`PressEvent::DraggedIn`]
//!   (or nothing, with [`DragPolicy::Ignore`])
//! - lifting ends the press on the button under the finger, or abandons it
//!   when the finger is no longer over any button
//!
//! The tracker does no hit-testing itself; callers pass the button under
//! each touch location.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::geometry::Point;
use crate::layout::ButtonPath;

/// Runtime identity of a touch, stable from down to up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TouchId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
    /// The system interrupted the gesture
    Cancelled,
}

/// A raw touch event from the host, in container coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub id: TouchId,
    pub phase: TouchPhase,
    pub location: Point,
}

impl TouchEvent {
    pub fn new(id: u64, phase: TouchPhase, location: Point) -> Self {
        Self {
            id: TouchId(id),
            phase,
            location,
        }
    }

    pub fn began(id: u64, x: f32, y: f32) -> Self {
        Self::new(id, TouchPhase::Began, Point::new(x, y))
    }

    pub fn moved(id: u64, x: f32, y: f32) -> Self {
        Self::new(id, TouchPhase::Moved, Point::new(x, y))
    }

    pub fn ended(id: u64, x: f32, y: f32) -> Self {
        Self::new(id, TouchPhase::Ended, Point::new(x, y))
    }

    pub fn cancelled(id: u64, x: f32, y: f32) -> Self {
        Self::new(id, TouchPhase::Cancelled, Point::new(x, y))
    }
}

/// A discrete press transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressEvent {
    PressStart(ButtonPath),
    /// The press completed. `pressed` is the button the touch was holding,
    /// `end` the one under the finger at lift; they differ when a drag was
    /// ignored.
    PressEnd { pressed: ButtonPath, end: ButtonPath },
    /// The touch slid from one button onto another
    DraggedIn { from: ButtonPath, to: ButtonPath },
    /// The touch lifted outside every button; nothing is committed
    Abandoned(ButtonPath),
}

/// How a touch sliding onto a different button is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPolicy {
    /// Re-target the press to the new button
    #[default]
    Retarget,
    /// Keep the original press until release
    Ignore,
}

#[derive(Debug, Clone)]
struct TrackedTouch {
    id: TouchId,
    button: Option<ButtonPath>,
}

/// Per-touch press state.
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    /// Touches still down, oldest first; the last one is primary
    active: Vec<TrackedTouch>,
    /// Touches already committed by rollover, ignored until they lift
    retired: HashSet<TouchId>,
    policy: DragPolicy,
}

impl TouchTracker {
    pub fn new(policy: DragPolicy) -> Self {
        Self {
            active: Vec::new(),
            retired: HashSet::new(),
            policy,
        }
    }

    pub fn policy(&self) -> DragPolicy {
        self.policy
    }

    /// The newest touch still down and the button it presses.
    pub fn primary(&self) -> Option<(TouchId, Option<&ButtonPath>)> {
        self.active
            .last()
            .map(|touch| (touch.id, touch.button.as_ref()))
    }

    /// Button currently pressed by a touch.
    pub fn pressed(&self, id: TouchId) -> Option<&ButtonPath> {
        self.find(id)?.button.as_ref()
    }

    pub fn is_tracking(&self, id: TouchId) -> bool {
        self.find(id).is_some()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    fn find(&self, id: TouchId) -> Option<&TrackedTouch> {
        self.active.iter().find(|touch| touch.id == id)
    }

    fn find_mut(&mut self, id: TouchId) -> Option<&mut TrackedTouch> {
        self.active.iter_mut().find(|touch| touch.id == id)
    }

    /// Commits every touch other than `except` that is still down.
    ///
    /// Called before a new touch is hit-tested so that a mode change caused
    /// by the committed key already applies to the new touch.
    pub fn retire_others(&mut self, except: TouchId) -> Vec<PressEvent> {
        let mut events = Vec::new();
        let mut kept = Vec::new();

        for touch in self.active.drain(..) {
            if touch.id == except {
                kept.push(touch);
                continue;
            }
            tracing::trace!(touch = touch.id.0, "rollover retires touch");
            self.retired.insert(touch.id);
            if let Some(button) = touch.button {
                events.push(PressEvent::PressEnd {
                    pressed: button.clone(),
                    end: button,
                });
            }
        }

        self.active = kept;
        events
    }

    /// A touch went down over `hit`.
    pub fn begin(&mut self, id: TouchId, hit: Option<ButtonPath>) -> Option<PressEvent> {
        self.retired.remove(&id);
        self.active.retain(|touch| touch.id != id);
        self.active.push(TrackedTouch {
            id,
            button: hit.clone(),
        });
        hit.map(PressEvent::PressStart)
    }

    /// A touch moved and is now over `hit`.
    pub fn moved(&mut self, id: TouchId, hit: Option<ButtonPath>) -> Option<PressEvent> {
        let policy = self.policy;
        let touch = self.find_mut(id)?;
        let to = hit?;

        match (touch.button.clone(), policy) {
            (Some(current), _) if current == to => None,
            (_, DragPolicy::Ignore) => None,
            (Some(from), DragPolicy::Retarget) => {
                touch.button = Some(to.clone());
                Some(PressEvent::DraggedIn { from, to })
            }
            (None, DragPolicy::Retarget) => {
                touch.button = Some(to.clone());
                Some(PressEvent::PressStart(to))
            }
        }
    }

    /// A touch lifted over `hit`.
    pub fn ended(&mut self, id: TouchId, hit: Option<ButtonPath>) -> Option<PressEvent> {
        if self.retired.remove(&id) {
            return None;
        }
        let index = self.active.iter().position(|touch| touch.id == id)?;
        let touch = self.active.remove(index);

        match (touch.button, hit) {
            (Some(pressed), Some(end)) => Some(PressEvent::PressEnd { pressed, end }),
            (Some(pressed), None) => Some(PressEvent::Abandoned(pressed)),
            (None, _) => None,
        }
    }

    /// A touch was cancelled by the system. Returns `true` if it was known.
    pub fn cancelled(&mut self, id: TouchId) -> bool {
        let was_retired = self.retired.remove(&id);
        let before = self.active.len();
        self.active.retain(|touch| touch.id != id);
        was_retired || self.active.len() != before
    }

    /// Forgets every touch without emitting anything.
    pub fn reset(&mut self) {
        self.active.clear();
        self.retired.clear();
    }
}
