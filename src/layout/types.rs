// SPDX-License-Identifier: GPL-3.0-only

//! Core data types for keyboard definitions.
//!
//! This module defines the error types used while loading definitions, the
//! validation structures for permissive parsing, and the declarative data
//! model: buttons, rows (which may nest), pages and the five-page keyboard.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::style::{ButtonStyle, KeyMenuStyle, KeyPreviewStyle, PageStyle, RowStyle};

// ============================================================================
// Loading Errors and Validation Findings
// ============================================================================

/// How much a validation finding matters. Errors sort before warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// The value cannot be laid out as written: the engine clamps it or lets
    /// the row overflow
    Error,
    /// Probably unintended, but the definition works as written
    Warning,
}

/// One finding from validating a definition that still loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub message: String,
    /// Where in the definition, e.g. `pages.lowercase.rows[1].children[2]`
    pub field_path: String,
    pub hint: Option<String>,
}

impl ValidationIssue {
    pub fn error(message: impl Into<String>, field_path: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, message.into(), field_path.into())
    }

    pub fn warning(message: impl Into<String>, field_path: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, message.into(), field_path.into())
    }

    fn with_severity(severity: Severity, message: String, field_path: String) -> Self {
        Self {
            severity,
            message,
            field_path,
            hint: None,
        }
    }

    /// Adds advice on how to fix the definition.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{} at {}: {}", label, self.field_path, self.message)?;
        match &self.hint {
            Some(hint) => write!(f, " ({})", hint),
            None => Ok(()),
        }
    }
}

/// Why a definition or config could not be loaded.
///
/// Only loading can fail. Once a definition is accepted, every runtime
/// operation of the keyboard is total.
#[derive(Debug)]
pub enum ParseError {
    /// The file could not be read
    IoError {
        source: std::io::Error,
        file_path: Option<String>,
    },
    /// Malformed JSON, or JSON that does not match the schema
    JsonError {
        source: serde_json::Error,
        file_path: Option<String>,
    },
    /// A row nests deeper than the engine lays out
    MaxDepthExceeded {
        /// Field path of the outermost row of the offending tree
        row: String,
        max_depth: usize,
        actual_depth: usize,
        file_path: Option<String>,
    },
}

impl ParseError {
    pub fn io_error(source: std::io::Error, file_path: impl Into<String>) -> Self {
        Self::IoError {
            source,
            file_path: Some(file_path.into()),
        }
    }

    pub fn json_error(source: serde_json::Error) -> Self {
        Self::JsonError {
            source,
            file_path: None,
        }
    }

    pub fn max_depth_exceeded(
        row: impl Into<String>,
        max_depth: usize,
        actual_depth: usize,
    ) -> Self {
        Self::MaxDepthExceeded {
            row: row.into(),
            max_depth,
            actual_depth,
            file_path: None,
        }
    }

    /// Names the file the error came from. An already known path is kept.
    pub fn in_file(mut self, path: impl Into<String>) -> Self {
        let slot = match &mut self {
            Self::IoError { file_path, .. }
            | Self::JsonError { file_path, .. }
            | Self::MaxDepthExceeded { file_path, .. } => file_path,
        };
        slot.get_or_insert_with(|| path.into());
        self
    }

    pub fn file_path(&self) -> Option<&str> {
        match self {
            Self::IoError { file_path, .. }
            | Self::JsonError { file_path, .. }
            | Self::MaxDepthExceeded { file_path, .. } => file_path.as_deref(),
        }
    }

    /// 1-based line of a JSON error, when serde_json knows it.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::JsonError { source, .. } => Some(source.line()).filter(|line| *line > 0),
            _ => None,
        }
    }

    /// What to do about it.
    pub fn hint(&self) -> String {
        match self {
            Self::IoError { .. } => "check that the file exists and is readable".into(),
            Self::JsonError { .. } => "check the JSON near the reported line".into(),
            Self::MaxDepthExceeded { max_depth, .. } => {
                format!("flatten the row to at most {} levels", max_depth)
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = self.file_path().unwrap_or("<string>");
        match self {
            Self::IoError { source, .. } => write!(f, "Cannot read '{}': {}", file, source)?,
            Self::JsonError { source, .. } => {
                write!(f, "Invalid definition in '{}'", file)?;
                if let Some(line) = self.line() {
                    write!(f, " at line {}", line)?;
                }
                write!(f, ": {}", source)?;
            }
            Self::MaxDepthExceeded {
                row,
                max_depth,
                actual_depth,
                ..
            } => write!(
                f,
                "Row {} in '{}' nests {} levels deep, the limit is {}",
                row, file, actual_depth, max_depth
            )?,
        }
        write!(f, "; {}", self.hint())
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError { source, .. } => Some(source),
            Self::JsonError { source, .. } => Some(source),
            Self::MaxDepthExceeded { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::json_error(err)
    }
}

/// A loaded value together with the findings that did not stop it loading.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult<T> {
    pub layout: T,
    /// Errors first, then warnings, each group ordered by field path
    pub warnings: Vec<ValidationIssue>,
}

impl<T> ParseResult<T> {
    pub fn with_warnings(layout: T, warnings: Vec<ValidationIssue>) -> Self {
        Self { layout, warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Findings the engine had to work around.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.warnings
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
    }

    pub fn into_layout(self) -> T {
        self.layout
    }
}

// ============================================================================
// Buttons
// ============================================================================

/// What a button displays.
///
/// Only glyph buttons commit text when released; labels and icons are
/// function keys recognized by their identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonContent {
    /// Character(s) committed on release and shown in the preview bubble
    Glyph(String),
    /// Descriptive text such as "space" or "123"
    Label(String),
    /// Name of an icon asset resolved by the host
    Icon(String),
}

impl ButtonContent {
    /// Returns the text to commit, for glyph buttons.
    pub fn glyph(&self) -> Option<&str> {
        match self {
            ButtonContent::Glyph(text) => Some(text),
            _ => None,
        }
    }
}

/// How a button's width is derived from its row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthPolicy {
    /// Equal share of the space left after static and relative widths
    #[default]
    Dynamic,
    /// Fixed width in logical pixels
    Static(f32),
    /// Fraction (0.0..=1.0) of the row's clean width
    Relative(f32),
}

/// A long-press menu attached to a button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMenuSpec {
    #[serde(default)]
    pub orientation: MenuOrientation,
    pub items: Vec<MenuItemSpec>,
}

/// Direction in which key menu items are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuOrientation {
    /// Items side by side
    #[default]
    Horizontal,
    /// Items stacked with separators between them
    Vertical,
}

/// One entry of a key menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemSpec {
    pub title: String,
    pub action: MenuAction,
}

impl MenuItemSpec {
    /// Item committing its own title as text.
    pub fn commit(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            action: MenuAction::Commit(title.clone()),
            title,
        }
    }
}

/// What happens when a key menu item is selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuAction {
    /// Commit text, exactly like releasing a glyph key
    Commit(String),
    /// Report a host-defined action identifier
    Custom(String),
}

/// A key on the keyboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    /// Stable identifier for special keys and lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    pub content: ButtonContent,

    #[serde(default)]
    pub width: WidthPolicy,

    #[serde(default)]
    pub style: ButtonStyle,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<KeyMenuSpec>,

    /// Runtime highlight, set while a touch is on the button
    #[serde(skip)]
    pub highlighted: bool,
}

impl Button {
    /// Creates a button with dynamic width and default style.
    pub fn new(content: ButtonContent) -> Self {
        Self {
            identifier: None,
            content,
            width: WidthPolicy::Dynamic,
            style: ButtonStyle::default(),
            menu: None,
            highlighted: false,
        }
    }

    /// A glyph key that commits `text`.
    pub fn glyph(text: impl Into<String>) -> Self {
        Self::new(ButtonContent::Glyph(text.into()))
    }

    /// A function key showing a text label.
    pub fn label(identifier: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(ButtonContent::Label(text.into())).with_identifier(identifier)
    }

    /// A function key showing an icon.
    pub fn icon(identifier: impl Into<String>, icon: impl Into<String>) -> Self {
        Self::new(ButtonContent::Icon(icon.into())).with_identifier(identifier)
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_width(mut self, width: WidthPolicy) -> Self {
        self.width = width;
        self
    }

    pub fn with_style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_menu(mut self, menu: KeyMenuSpec) -> Self {
        self.menu = Some(menu);
        self
    }

    /// Returns `true` if the button has a menu with at least one item.
    pub fn has_menu(&self) -> bool {
        self.menu.as_ref().is_some_and(|menu| !menu.items.is_empty())
    }
}

// ============================================================================
// Rows and pages
// ============================================================================

/// A child of a row: a button or a nested row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowChild {
    Button(Button),
    Row(Row),
}

impl RowChild {
    pub fn as_button(&self) -> Option<&Button> {
        match self {
            RowChild::Button(button) => Some(button),
            RowChild::Row(_) => None,
        }
    }

    /// Width policy of this child; nested rows always take a dynamic slot.
    pub fn width_policy(&self) -> WidthPolicy {
        match self {
            RowChild::Button(button) => button.width,
            RowChild::Row(_) => WidthPolicy::Dynamic,
        }
    }
}

impl From<Button> for RowChild {
    fn from(button: Button) -> Self {
        RowChild::Button(button)
    }
}

impl From<Row> for RowChild {
    fn from(row: Row) -> Self {
        RowChild::Row(row)
    }
}

/// An ordered sequence of buttons and nested rows laid out left to right.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Spacing override; see [`Row::effective_style`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<RowStyle>,

    #[serde(default)]
    pub children: Vec<RowChild>,
}

impl Row {
    /// Creates a row with the default spacing for its position.
    pub fn new(children: Vec<RowChild>) -> Self {
        Self {
            style: None,
            children,
        }
    }

    pub fn with_style(mut self, style: RowStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Spacing used for layout.
    ///
    /// Without an override, outermost rows use [`RowStyle::default`] and
    /// nested rows [`RowStyle::nested`] (no edge padding).
    pub fn effective_style(&self, nested: bool) -> RowStyle {
        match (&self.style, nested) {
            (Some(style), _) => style.clone(),
            (None, false) => RowStyle::default(),
            (None, true) => RowStyle::nested(),
        }
    }

    /// Nesting depth: 1 for a row of buttons, 2 for a row containing rows.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .filter_map(|child| match child {
                RowChild::Row(row) => Some(row.depth()),
                RowChild::Button(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Iterates over every button in the row, nested ones included.
    pub fn buttons<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Button> + 'a> {
        Box::new(self.children.iter().flat_map(|child| match child {
            RowChild::Button(button) => {
                Box::new(std::iter::once(button)) as Box<dyn Iterator<Item = &'a Button> + 'a>
            }
            RowChild::Row(row) => row.buttons(),
        }))
    }
}

/// One complete keyboard face.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageDefinition {
    #[serde(default)]
    pub style: PageStyle,
    #[serde(default)]
    pub rows: Vec<Row>,
}

/// Identifies one of the five keyboard pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Uppercase,
    UppercaseLocked,
    Lowercase,
    Numbers,
    Symbols,
}

impl PageKind {
    pub const ALL: [PageKind; 5] = [
        PageKind::Uppercase,
        PageKind::UppercaseLocked,
        PageKind::Lowercase,
        PageKind::Numbers,
        PageKind::Symbols,
    ];

    /// Field name used in definition files.
    pub fn as_str(self) -> &'static str {
        match self {
            PageKind::Uppercase => "uppercase",
            PageKind::UppercaseLocked => "uppercase_locked",
            PageKind::Lowercase => "lowercase",
            PageKind::Numbers => "numbers",
            PageKind::Symbols => "symbols",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five pages of a keyboard. A page missing from a file is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pages {
    pub uppercase: PageDefinition,
    pub uppercase_locked: PageDefinition,
    pub lowercase: PageDefinition,
    pub numbers: PageDefinition,
    pub symbols: PageDefinition,
}

impl Pages {
    pub fn get(&self, kind: PageKind) -> &PageDefinition {
        match kind {
            PageKind::Uppercase => &self.uppercase,
            PageKind::UppercaseLocked => &self.uppercase_locked,
            PageKind::Lowercase => &self.lowercase,
            PageKind::Numbers => &self.numbers,
            PageKind::Symbols => &self.symbols,
        }
    }
}

/// A complete keyboard definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyboardDefinition {
    /// Layout name
    pub name: String,

    pub pages: Pages,

    #[serde(default)]
    pub preview_style: KeyPreviewStyle,

    #[serde(default)]
    pub menu_style: KeyMenuStyle,
}

// ============================================================================
// Button addressing
// ============================================================================

/// Address of a row child: the row index followed by child indices.
///
/// `[1, 3]` is the fourth child of the second row; `[2, 1, 0]` is the first
/// child of the row nested at index 1 of the third row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ButtonPath(pub Vec<usize>);

impl ButtonPath {
    /// Path of a direct child of a row.
    pub fn direct(row: usize, index: usize) -> Self {
        Self(vec![row, index])
    }

    /// Index of the top-level row.
    pub fn row(&self) -> usize {
        self.0.first().copied().unwrap_or(0)
    }

    /// Returns a new path one level deeper.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }
}

impl fmt::Display for ButtonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", index)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// JSON errors report the line and the file
    #[test]
    fn test_json_error_line_and_file() {
        let invalid_json = "{\n  \"name\": \"test\",\n  \"invalid\":\n}";
        let source = serde_json::from_str::<serde_json::Value>(invalid_json).unwrap_err();

        let err = ParseError::from(source).in_file("test.json");
        assert_eq!(err.line(), Some(4));
        assert_eq!(err.file_path(), Some("test.json"));

        let shown = err.to_string();
        assert!(shown.contains("'test.json' at line 4"), "got: {}", shown);
        assert!(shown.ends_with("check the JSON near the reported line"));
    }

    /// A path set at the failure site is not overwritten
    #[test]
    fn test_in_file_keeps_first_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ParseError::io_error(source, "a.json").in_file("b.json");

        assert_eq!(err.file_path(), Some("a.json"));
        assert_eq!(err.line(), None);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_max_depth_exceeded_display() {
        let err = ParseError::max_depth_exceeded("pages.numbers.rows[0]", 4, 5);
        assert_eq!(err.file_path(), None);

        let shown = err.in_file("deep.json").to_string();
        assert!(shown.contains("pages.numbers.rows[0] in 'deep.json' nests 5 levels deep"));
        assert!(shown.contains("the limit is 4"));
        assert!(shown.contains("at most 4 levels"));
    }

    #[test]
    fn test_validation_issue_display() {
        let issue = ValidationIssue::error("Static width -4 is negative", "pages.lowercase.rows[2]")
            .with_hint("laid out as zero");
        assert_eq!(
            issue.to_string(),
            "error at pages.lowercase.rows[2]: Static width -4 is negative (laid out as zero)"
        );

        let plain = ValidationIssue::warning("Layout name is empty", "name");
        assert_eq!(plain.to_string(), "warning at name: Layout name is empty");
    }

    #[test]
    fn test_parse_result_errors() {
        let result = ParseResult::with_warnings(
            "definition",
            vec![
                ValidationIssue::error("Relative width 1.5 is outside 0.0..=1.0", "w"),
                ValidationIssue::warning("Layout name is empty", "name"),
            ],
        );

        assert!(result.has_warnings());
        assert_eq!(result.warning_count(), 2);
        assert_eq!(result.errors().count(), 1);
        assert_eq!(result.into_layout(), "definition");
    }

    #[test]
    fn test_row_child_json_tagging() {
        let json = r#"{
            "children": [
                {"type": "button", "identifier": "Shift", "content": {"icon": "shift"},
                 "width": {"relative": 0.115}},
                {"type": "row", "children": [
                    {"type": "button", "content": {"glyph": "z"}}
                ]}
            ]
        }"#;

        let row: Row = serde_json::from_str(json).unwrap();
        assert_eq!(row.children.len(), 2);
        assert_eq!(row.depth(), 2);

        let shift = row.children[0].as_button().unwrap();
        assert_eq!(shift.identifier.as_deref(), Some("Shift"));
        assert_eq!(shift.width, WidthPolicy::Relative(0.115));
        assert_eq!(row.children[1].width_policy(), WidthPolicy::Dynamic);
        assert!(row.children[1].as_button().is_none());
    }

    #[test]
    fn test_nested_row_defaults_to_zero_edge_padding() {
        let row = Row::new(vec![Button::glyph("a").into()]);
        assert_eq!(row.effective_style(true).leading_padding, 0.0);
        assert_eq!(row.effective_style(false).leading_padding, 3.0);
    }

    #[test]
    fn test_buttons_iterates_nested() {
        let row = Row::new(vec![
            Button::glyph("a").into(),
            Row::new(vec![Button::glyph("b").into(), Button::glyph("c").into()]).into(),
        ]);

        let glyphs: Vec<_> = row.buttons().filter_map(|b| b.content.glyph()).collect();
        assert_eq!(glyphs, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_button_path_display() {
        let path = ButtonPath::direct(2, 1).child(0);
        assert_eq!(path.row(), 2);
        assert_eq!(path.to_string(), "2/1/0");
    }

    #[test]
    fn test_menu_presence() {
        let plain = Button::glyph("e");
        let empty = Button::glyph("e").with_menu(KeyMenuSpec {
            orientation: MenuOrientation::Horizontal,
            items: Vec::new(),
        });
        let accented = Button::glyph("e").with_menu(KeyMenuSpec {
            orientation: MenuOrientation::Vertical,
            items: vec![MenuItemSpec::commit("é")],
        });

        assert!(!plain.has_menu());
        assert!(!empty.has_menu());
        assert!(accented.has_menu());
    }
}
