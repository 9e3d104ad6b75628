// SPDX-License-Identifier: GPL-3.0-only

//! Validation rules for keyboard definitions.
//!
//! Validation is permissive: findings are collected and the definition is
//! returned unchanged. Widths that cannot be laid out as written are
//! [`Severity::Error`](crate::layout::Severity) findings, everything else is a
//! warning. Only row nesting deeper than [`settings::MAX_NESTING_DEPTH`] is
//! fatal.

use std::collections::HashSet;

use crate::input::KeyIdentifier;
use crate::layout::types::{
    Button, KeyboardDefinition, PageDefinition, PageKind, ParseError, ParseResult, Row, RowChild,
    ValidationIssue, WidthPolicy,
};
use crate::settings;

const SPECIAL_KEYS_HINT: &str =
    "Special keys are Space, Backspace, Globe, Return, Numbers, Symbols, Letters and Shift";

/// Validates a definition and returns it with warnings.
pub fn validate_definition(
    definition: KeyboardDefinition,
) -> Result<ParseResult<KeyboardDefinition>, ParseError> {
    let mut warnings = Vec::new();

    // Fatal first: nothing else is worth reporting for an unusable tree.
    enforce_max_nesting_depth(&definition, &mut warnings)?;

    validate_required_fields(&definition, &mut warnings);
    for kind in PageKind::ALL {
        validate_page(kind, definition.pages.get(kind), &mut warnings);
    }

    Ok(collect_warnings(definition, warnings))
}

/// Checks the layout name and that every page has rows.
pub fn validate_required_fields(
    definition: &KeyboardDefinition,
    warnings: &mut Vec<ValidationIssue>,
) {
    if definition.name.trim().is_empty() {
        warnings.push(
            ValidationIssue::warning("Layout name is empty", "name")
                .with_hint("Provide a descriptive name for the layout"),
        );
    }

    for kind in PageKind::ALL {
        if definition.pages.get(kind).rows.is_empty() {
            warnings.push(
                ValidationIssue::warning("Page has no rows", format!("pages.{}", kind))
                    .with_hint("Every mode needs a page; an empty page shows no keys"),
            );
        }
    }
}

/// Validates the rows and buttons of one page.
pub fn validate_page(kind: PageKind, page: &PageDefinition, warnings: &mut Vec<ValidationIssue>) {
    let mut seen = HashSet::new();
    for (index, row) in page.rows.iter().enumerate() {
        let path = format!("pages.{}.rows[{}]", kind, index);
        validate_row(row, &path, &mut seen, warnings);
    }
}

fn validate_row(
    row: &Row,
    path: &str,
    seen: &mut HashSet<String>,
    warnings: &mut Vec<ValidationIssue>,
) {
    if row.children.is_empty() {
        warnings.push(ValidationIssue::warning("Row has no children", path));
    }

    let relative_sum: f32 = row
        .children
        .iter()
        .filter_map(|child| match child.width_policy() {
            WidthPolicy::Relative(percent) => Some(percent),
            _ => None,
        })
        .sum();
    if relative_sum > 1.0 {
        warnings.push(
            ValidationIssue::warning(
                format!("Relative widths add up to {:.3}, more than the row", relative_sum),
                path,
            )
            .with_hint("Keep the sum of relative widths at or below 1.0"),
        );
    }

    for (index, child) in row.children.iter().enumerate() {
        let child_path = format!("{}.children[{}]", path, index);
        match child {
            RowChild::Button(button) => validate_button(button, &child_path, seen, warnings),
            RowChild::Row(nested) => validate_row(nested, &child_path, seen, warnings),
        }
    }
}

fn validate_button(
    button: &Button,
    path: &str,
    seen: &mut HashSet<String>,
    warnings: &mut Vec<ValidationIssue>,
) {
    validate_width(&button.width, &format!("{}.width", path), warnings);

    if let Some(identifier) = &button.identifier {
        let identifier_path = format!("{}.identifier", path);
        if !seen.insert(identifier.clone()) {
            warnings.push(
                ValidationIssue::warning(
                    format!("Duplicate identifier '{}' on this page", identifier),
                    identifier_path.clone(),
                )
                .with_hint("Lookups by identifier return the first match only"),
            );
        }
        if KeyIdentifier::parse(identifier).is_none() && button.content.glyph().is_none() {
            warnings.push(
                ValidationIssue::warning(
                    format!("Unknown identifier '{}' is treated as a custom button", identifier),
                    identifier_path,
                )
                .with_hint(SPECIAL_KEYS_HINT),
            );
        }
    }

    if let Some(menu) = &button.menu {
        if menu.items.is_empty() {
            warnings.push(ValidationIssue::warning(
                "Key menu has no items and will never open",
                format!("{}.menu", path),
            ));
        }
    }
}

/// Validates a single width policy.
pub fn validate_width(width: &WidthPolicy, field_path: &str, warnings: &mut Vec<ValidationIssue>) {
    match *width {
        WidthPolicy::Relative(percent) if !(0.0..=1.0).contains(&percent) => {
            warnings.push(
                ValidationIssue::error(
                    format!("Relative width {} is outside 0.0..=1.0", percent),
                    field_path,
                )
                .with_hint("Relative widths are fractions of the row, e.g. 0.115"),
            );
        }
        WidthPolicy::Static(pixels) if pixels < 0.0 => {
            warnings.push(
                ValidationIssue::error(format!("Static width {} is negative", pixels), field_path)
                    .with_hint("Negative widths are laid out as zero"),
            );
        }
        _ => {}
    }
}

/// Rejects rows nested beyond the engine limit and warns about unusually
/// deep ones.
pub fn enforce_max_nesting_depth(
    definition: &KeyboardDefinition,
    warnings: &mut Vec<ValidationIssue>,
) -> Result<(), ParseError> {
    for kind in PageKind::ALL {
        for (index, row) in definition.pages.get(kind).rows.iter().enumerate() {
            let depth = row.depth();
            let path = format!("pages.{}.rows[{}]", kind, index);

            if depth > settings::MAX_NESTING_DEPTH {
                return Err(ParseError::max_depth_exceeded(
                    path,
                    settings::MAX_NESTING_DEPTH,
                    depth,
                ));
            }
            if depth > settings::TYPICAL_NESTING_DEPTH {
                warnings.push(
                    ValidationIssue::warning(format!("Row is nested {} levels deep", depth), path)
                        .with_hint("Keyboards rarely need more than one nested row"),
                );
            }
        }
    }
    Ok(())
}

/// Sorts findings (errors first, then by field path) into a result.
pub fn collect_warnings<T>(value: T, mut warnings: Vec<ValidationIssue>) -> ParseResult<T> {
    warnings.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| a.field_path.cmp(&b.field_path))
    });

    ParseResult::with_warnings(value, warnings)
}

// ============================================================================
// Tests
// ============================================================================
