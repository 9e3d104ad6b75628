// SPDX-License-Identifier: GPL-3.0-only

//! Built-in US QWERTY layout.
//!
//! Used when the host does not ship a definition file, and as a realistic
//! fixture in tests. The five pages share one bottom row (mode key, globe,
//! space, return); the letter pages put shift and backspace around a nested
//! row of seven letters.

use crate::input::KeyIdentifier;
use crate::layout::style::{ButtonStyle, Color, KeyPopType, PageStyle, RowStyle};
use crate::layout::types::{
    Button, KeyMenuSpec, KeyboardDefinition, MenuItemSpec, MenuOrientation, PageDefinition,
    Pages, Row, RowChild, WidthPolicy,
};

/// Width of shift, backspace, the mode keys and globe.
const FUNCTION_KEY_WIDTH: f32 = 0.115;

/// Width of the return key.
const RETURN_KEY_WIDTH: f32 = 0.18;

const NUMBERS_ROW_1: [&str; 10] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"];
const NUMBERS_ROW_2: [&str; 10] = ["-", "/", ":", ";", "(", ")", "$", "&", "@", "\""];
const SYMBOLS_ROW_1: [&str; 10] = ["[", "]", "{", "}", "#", "%", "^", "*", "+", "="];
const SYMBOLS_ROW_2: [&str; 10] = ["_", "\\", "|", "~", "<", ">", "€", "£", "¥", "•"];
const PUNCTUATION: [&str; 5] = [".", ",", "?", "!", "'"];

/// Returns the built-in QWERTY definition.
///
/// # Example
///
/// ```rust,ignore
/// use tapboard::{Keyboard, KeyboardConfig};
/// use tapboard::layout::defaults;
///
/// let keyboard = Keyboard::new(defaults::qwerty(), KeyboardConfig::default());
/// ```
pub fn qwerty() -> KeyboardDefinition {
    KeyboardDefinition {
        name: "QWERTY".into(),
        pages: Pages {
            uppercase: letters_page(true, "ShiftOnce"),
            uppercase_locked: letters_page(true, "ShiftOn"),
            lowercase: letters_page(false, "ShiftOff"),
            numbers: numbers_page(),
            symbols: symbols_page(),
        },
        preview_style: Default::default(),
        menu_style: Default::default(),
    }
}

// ============================================================================
// Pages
// ============================================================================

fn letters_page(uppercase: bool, shift_identifier: &str) -> PageDefinition {
    let case = |text: &str| {
        if uppercase {
            text.to_uppercase()
        } else {
            text.to_owned()
        }
    };
    let letters = |row: &str| -> Vec<String> {
        row.chars().map(|c| case(&c.to_string())).collect()
    };

    let top = letters("qwertyuiop");
    let middle = letters("asdfghjkl");
    let bottom = letters("zxcvbnm");

    let shift = Button::icon(shift_identifier, shift_icon(shift_identifier))
        .with_width(WidthPolicy::Relative(FUNCTION_KEY_WIDTH))
        .with_style(dark_image_style());

    PageDefinition {
        style: PageStyle::default(),
        rows: vec![
            Row::new(edge_aware_keys(&top)).with_style(first_row_style()),
            Row::new(edge_aware_keys(&middle)).with_style(second_row_style()),
            Row::new(vec![
                shift.into(),
                Row::new(centered_keys(&bottom)).into(),
                backspace().into(),
            ])
            .with_style(third_row_style()),
            bottom_row(Button::label(KeyIdentifier::Numbers.as_str(), "123")),
        ],
    }
}

fn numbers_page() -> PageDefinition {
    symbol_page(
        &NUMBERS_ROW_1,
        &NUMBERS_ROW_2,
        Button::label(KeyIdentifier::Symbols.as_str(), "#+="),
    )
}

fn symbols_page() -> PageDefinition {
    symbol_page(
        &SYMBOLS_ROW_1,
        &SYMBOLS_ROW_2,
        Button::label(KeyIdentifier::Numbers.as_str(), "123"),
    )
}

/// Numbers and symbols share a shape: two full rows, a switch key with
/// punctuation and backspace, then the bottom row with "ABC".
fn symbol_page(first: &[&str], second: &[&str], switch: Button) -> PageDefinition {
    let owned = |keys: &[&str]| -> Vec<String> { keys.iter().map(|k| (*k).to_owned()).collect() };
    let switch = switch
        .with_width(WidthPolicy::Relative(FUNCTION_KEY_WIDTH))
        .with_style(ButtonStyle::function());

    PageDefinition {
        style: PageStyle::default(),
        rows: vec![
            Row::new(edge_aware_keys(&owned(first))).with_style(first_row_style()),
            Row::new(edge_aware_keys(&owned(second))),
            Row::new(vec![
                switch.into(),
                Row::new(centered_keys(&owned(&PUNCTUATION))).into(),
                backspace().into(),
            ])
            .with_style(third_row_style()),
            bottom_row(Button::label(KeyIdentifier::Letters.as_str(), "ABC")),
        ],
    }
}

// ============================================================================
// Rows
// ============================================================================

fn bottom_row(mode_key: Button) -> Row {
    let mode_key = mode_key
        .with_width(WidthPolicy::Relative(FUNCTION_KEY_WIDTH))
        .with_style(ButtonStyle::function());
    let globe = Button::icon(KeyIdentifier::Globe.as_str(), "globe")
        .with_width(WidthPolicy::Relative(FUNCTION_KEY_WIDTH))
        .with_style(ButtonStyle {
            background_color: Color::rgb8(180, 188, 201),
            image_size: Some(20.0),
            ..ButtonStyle::default()
        });
    let space = Button::label(KeyIdentifier::Space.as_str(), "space").with_style(ButtonStyle {
        font_size: 15.0,
        ..ButtonStyle::default()
    });
    let enter = Button::label(KeyIdentifier::Return.as_str(), "return")
        .with_width(WidthPolicy::Relative(RETURN_KEY_WIDTH))
        .with_style(ButtonStyle::function());

    Row::new(vec![mode_key.into(), globe.into(), space.into(), enter.into()])
        .with_style(RowStyle {
            top_padding: 5.0,
            top_padding_landscape: Some(4.0),
            bottom_padding: 4.0,
            bottom_padding_landscape: Some(4.0),
            ..RowStyle::default()
        })
}

fn first_row_style() -> RowStyle {
    RowStyle {
        top_padding: 10.0,
        top_padding_landscape: Some(6.0),
        ..RowStyle::default()
    }
}

/// The home row is inset so its keys sit between the ones above.
fn second_row_style() -> RowStyle {
    RowStyle {
        leading_padding: 22.0,
        leading_padding_landscape: Some(30.0),
        trailing_padding: 22.0,
        trailing_padding_landscape: Some(30.0),
        ..RowStyle::default()
    }
}

fn third_row_style() -> RowStyle {
    RowStyle {
        buttons_padding: 15.0,
        buttons_padding_landscape: Some(12.0),
        ..RowStyle::default()
    }
}

// ============================================================================
// Keys
// ============================================================================

/// Glyph keys for a full-width row: the outermost keys keep their preview
/// bubble inside the keyboard.
fn edge_aware_keys(keys: &[String]) -> Vec<RowChild> {
    let last = keys.len().saturating_sub(1);
    keys.iter()
        .enumerate()
        .map(|(index, key)| {
            let pop = match index {
                0 => KeyPopType::Left,
                i if i == last => KeyPopType::Right,
                _ => KeyPopType::Center,
            };
            glyph_key(key, pop).into()
        })
        .collect()
}

fn centered_keys(keys: &[String]) -> Vec<RowChild> {
    keys.iter()
        .map(|key| glyph_key(key, KeyPopType::Center).into())
        .collect()
}

fn glyph_key(text: &str, pop: KeyPopType) -> Button {
    let button = Button::glyph(text).with_style(ButtonStyle::key(pop));
    match accents(text) {
        Some(items) => button.with_menu(KeyMenuSpec {
            orientation: MenuOrientation::Horizontal,
            items: items.iter().map(|item| MenuItemSpec::commit(*item)).collect(),
        }),
        None => button,
    }
}

/// Long-press alternatives for a letter.
fn accents(letter: &str) -> Option<&'static [&'static str]> {
    let items: &'static [&'static str] = match letter {
        "a" => &["à", "á", "â", "ä", "æ", "ã", "å"],
        "A" => &["À", "Á", "Â", "Ä", "Æ", "Ã", "Å"],
        "e" => &["è", "é", "ê", "ë", "ē"],
        "E" => &["È", "É", "Ê", "Ë", "Ē"],
        "i" => &["ì", "í", "î", "ï"],
        "I" => &["Ì", "Í", "Î", "Ï"],
        "o" => &["ò", "ó", "ô", "ö", "õ", "ø"],
        "O" => &["Ò", "Ó", "Ô", "Ö", "Õ", "Ø"],
        "u" => &["ù", "ú", "û", "ü"],
        "U" => &["Ù", "Ú", "Û", "Ü"],
        "n" => &["ñ"],
        "N" => &["Ñ"],
        "c" => &["ç"],
        "C" => &["Ç"],
        _ => return None,
    };
    Some(items)
}

fn backspace() -> Button {
    Button::icon(KeyIdentifier::Backspace.as_str(), "backspace")
        .with_width(WidthPolicy::Relative(FUNCTION_KEY_WIDTH))
        .with_style(dark_image_style())
}

fn dark_image_style() -> ButtonStyle {
    ButtonStyle {
        image_size: Some(18.0),
        ..ButtonStyle::function()
    }
}

fn shift_icon(identifier: &str) -> &'static str {
    match identifier {
        "ShiftOn" => "shift-locked",
        "ShiftOnce" => "shift-once",
        _ => "shift",
    }
}
