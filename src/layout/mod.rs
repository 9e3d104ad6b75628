// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard definitions: the data model, JSON loading and validation.
//!
//! A [`KeyboardDefinition`] holds five pages, one per keyboard mode. Each
//! page is a list of rows; a row holds buttons and nested rows, laid out
//! left to right. Definitions are plain data: they are built in code (see
//! [`defaults::qwerty`]) or loaded from JSON, and never carry geometry.
//! Geometry is computed by [`crate::engine`].
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use tapboard::layout::{parse_definition_file, defaults};
//!
//! let definition = match parse_definition_file("layouts/azerty.json") {
//!     Ok(result) => {
//!         if result.has_warnings() {
//!             println!("Loaded with {} warnings:", result.warning_count());
//!             for warning in &result.warnings {
//!                 println!("  {}", warning);
//!             }
//!         }
//!         result.into_layout()
//!     }
//!     Err(e) => {
//!         eprintln!("Falling back to QWERTY: {}", e);
//!         defaults::qwerty()
//!     }
//! };
//! ```
//!
//! ## Definition Format
//!
//! ```json
//! {
//!     "name": "Tiny",
//!     "pages": {
//!         "lowercase": {
//!             "rows": [
//!                 {
//!                     "children": [
//!                         {"type": "button", "content": {"glyph": "a"}},
//!                         {"type": "button", "identifier": "Backspace",
//!                          "content": {"icon": "backspace"},
//!                          "width": {"relative": 0.115}}
//!                     ]
//!                 }
//!             ]
//!         },
//!         "uppercase": {"rows": [...]},
//!         "uppercase_locked": {"rows": [...]},
//!         "numbers": {"rows": [...]},
//!         "symbols": {"rows": [...]}
//!     }
//! }
//! ```
//!
//! ## Error Handling
//!
//! Validation is permissive. Problems the engine can live with (duplicate
//! identifiers, over-full rows, empty pages) come back as warnings in the
//! [`ParseResult`]. Unreadable files, malformed JSON and rows nested too
//! deeply return a [`ParseError`].

// Sub-modules
pub mod defaults;
pub mod parser;
pub mod style;
pub mod types;
pub mod validation;

// Re-export public API - Error handling types
pub use types::{ParseError, ParseResult, Severity, ValidationIssue};

// Re-export public API - Parser functions
pub use parser::{
    parse_config_file, parse_config_from_string, parse_definition_file,
    parse_definition_from_string,
};
pub use validation::validate_definition;

// Re-export public API - Data structures
pub use style::{
    ButtonStyle, Color, KeyMenuStyle, KeyPopType, KeyPreviewStyle, PageStyle, RowStyle, Shadow,
};
pub use types::{
    Button, ButtonContent, ButtonPath, KeyMenuSpec, KeyboardDefinition, MenuAction, MenuItemSpec,
    MenuOrientation, PageDefinition, PageKind, Pages, Row, RowChild, WidthPolicy,
};

// ============================================================================
// Public API Integration Tests
// ============================================================================
