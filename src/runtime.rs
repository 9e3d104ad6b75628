// SPDX-License-Identifier: GPL-3.0-only

//! Event loop driver.
//!
//! [`run`] feeds host input into a [`Keyboard`] and fires its timers on time,
//! all from one task. Host input arrives as a [`futures::Stream`] of
//! [`HostInput`]; the loop ends when the stream does.
//!
//! # Example
//!
//! ```rust,ignore
//! let (input_tx, input_rx) = futures::channel::mpsc::unbounded();
//! let (event_tx, mut event_rx) = futures::channel::mpsc::unbounded();
//! let mut keyboard = Keyboard::new(defaults::qwerty(), KeyboardConfig::default());
//!
//! tokio::spawn(async move {
//!     let mut sink = event_tx;
//!     runtime::run(&mut keyboard, input_rx, &mut sink).await;
//! });
//! ```

use futures::{Stream, StreamExt};
use tokio::time::Instant;

use crate::event::KeyboardEventSink;
use crate::geometry::{Orientation, Size};
use crate::input::TouchEvent;
use crate::keyboard::Keyboard;
use crate::layout::KeyboardDefinition;

/// Input from the host to the keyboard.
#[derive(Debug, Clone)]
pub enum HostInput {
    /// The visible area changed
    Resize { size: Size, orientation: Orientation },
    /// One batch of touches, processed together
    Touches(Vec<TouchEvent>),
    /// Swap in a new definition
    Reload(KeyboardDefinition),
    /// Capitalize the next letter
    Capitalize,
}

/// Runs the keyboard until `inputs` ends.
pub async fn run<I, K>(keyboard: &mut Keyboard, mut inputs: I, sink: &mut K)
where
    I: Stream<Item = HostInput> + Unpin,
    K: KeyboardEventSink,
{
    tracing::info!("Keyboard driver started");

    loop {
        let deadline = keyboard.next_deadline();
        let timer = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(Instant::from_std(deadline)).await,
                None => futures::future::pending::<()>().await,
            }
        };

        tokio::select! {
            input = inputs.next() => match input {
                Some(input) => apply(keyboard, input, sink),
                None => break,
            },
            () = timer => keyboard.fire_timers(Instant::now().into_std(), sink),
        }
    }

    tracing::info!("Keyboard driver stopped");
}

fn apply<K: KeyboardEventSink>(keyboard: &mut Keyboard, input: HostInput, sink: &mut K) {
    match input {
        HostInput::Resize { size, orientation } => {
            tracing::debug!(width = size.width, height = size.height, ?orientation, "Resize");
            keyboard.set_container(size, orientation, sink);
        }
        HostInput::Touches(touches) => {
            keyboard.handle_touches(&touches, Instant::now().into_std(), sink);
        }
        HostInput::Reload(definition) => keyboard.reload(definition, sink),
        HostInput::Capitalize => keyboard.capitalize(sink),
    }
}

/// Installs a `tracing` subscriber filtered by `RUST_LOG`, defaulting to
/// `tapboard=info`.
///
/// For hosts without their own subscriber. Does nothing if one is already
/// installed.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tapboard=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeyboardConfig;
    use crate::event::KeyboardEvent;
    use crate::layout::defaults;
    use std::time::Duration;

    fn laid_out_keyboard() -> Keyboard {
        init_logging();
        let mut keyboard = Keyboard::new(defaults::qwerty(), KeyboardConfig::default());
        keyboard.set_container(Size::new(320.0, 216.0), Orientation::Portrait, &mut Vec::new());
        keyboard
    }

    fn center_of(keyboard: &Keyboard, identifier: &str) -> (f32, f32) {
        let page = keyboard.active_page();
        let (path, _) = page.button_with_identifier(identifier).unwrap();
        let frame = page.frame_of(&path).unwrap();
        (frame.center_x(), frame.center_y())
    }

    /// Holding backspace for 820ms deletes at 600, 700, 800 and on release
    #[tokio::test(start_paused = true)]
    async fn test_backspace_hold() {
        let mut keyboard = laid_out_keyboard();
        let (x, y) = center_of(&keyboard, "Backspace");
        let (tx, rx) = futures::channel::mpsc::unbounded();
        let mut events: Vec<KeyboardEvent> = Vec::new();

        let host = async move {
            tx.unbounded_send(HostInput::Touches(vec![TouchEvent::began(1, x, y)]))
                .unwrap();
            tokio::time::sleep(Duration::from_millis(820)).await;
            tx.unbounded_send(HostInput::Touches(vec![TouchEvent::ended(1, x, y)]))
                .unwrap();
        };
        tokio::join!(run(&mut keyboard, rx, &mut events), host);

        let deletes = events
            .iter()
            .filter(|event| **event == KeyboardEvent::Backspace)
            .count();
        assert_eq!(deletes, 4);
        assert_eq!(keyboard.next_deadline(), None);
    }

    /// A letter with accents opens its menu after a one second hold
    #[tokio::test(start_paused = true)]
    async fn test_menu_opens_after_hold() {
        let mut keyboard = laid_out_keyboard();
        let (tx, rx) = futures::channel::mpsc::unbounded();
        let (mut event_tx, event_rx) = futures::channel::mpsc::unbounded();

        tx.unbounded_send(HostInput::Resize {
            size: Size::new(320.0, 216.0),
            orientation: Orientation::Portrait,
        })
        .unwrap();
        tx.unbounded_send(HostInput::Capitalize).unwrap();

        let page = keyboard.active_page();
        let (path, _) = page
            .placed_buttons()
            .iter()
            .find_map(|placed| {
                let button = page.button(&placed.path)?;
                (button.has_menu() && button.style.key_pop_type.shows_preview())
                    .then(|| (placed.path.clone(), button))
            })
            .unwrap();
        let frame = page.frame_of(&path).unwrap();
        let (x, y) = (frame.center_x(), frame.center_y());

        let host = async move {
            tx.unbounded_send(HostInput::Touches(vec![TouchEvent::began(1, x, y)]))
                .unwrap();
            tokio::time::sleep(Duration::from_millis(1100)).await;
        };
        tokio::join!(run(&mut keyboard, rx, &mut event_tx), host);
        drop(event_tx);

        let events: Vec<KeyboardEvent> = event_rx.collect().await;
        assert!(events.iter().any(|event| matches!(event, KeyboardEvent::MenuShown(_))));
        assert!(keyboard.key_menu().is_some());
        assert!(!keyboard.typing_enabled());
    }
}
