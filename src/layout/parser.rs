// SPDX-License-Identifier: GPL-3.0-only

//! Loading keyboard definitions and configuration from JSON.
//!
//! Definitions are validated after parsing; see [`super::validation`].
//! Configuration files are plain serde documents where every field is
//! optional.

use std::fs;

use crate::config::KeyboardConfig;
use crate::layout::types::{KeyboardDefinition, ParseError, ParseResult};
use crate::layout::validation::validate_definition;

/// Parses a keyboard definition from a JSON file.
///
/// I/O errors (missing file, permissions) and JSON errors (malformed
/// document, missing required fields) are reported separately, both with the
/// file path attached.
///
/// # Arguments
///
/// * `path` - Path to the JSON definition file
///
/// # Returns
///
/// The definition with any validation warnings, or a `ParseError`.
///
/// # Example
///
/// ```rust,ignore
/// use tapboard::layout::parse_definition_file;
///
/// match parse_definition_file("layouts/azerty.json") {
///     Ok(result) => {
///         for warning in &result.warnings {
///             eprintln!("{}", warning);
///         }
///         let definition = result.into_layout();
///     }
///     Err(e) => eprintln!("Failed to load layout: {}", e),
/// }
/// ```
pub fn parse_definition_file(path: &str) -> Result<ParseResult<KeyboardDefinition>, ParseError> {
    let json = fs::read_to_string(path).map_err(|e| ParseError::io_error(e, path))?;

    let definition: KeyboardDefinition =
        serde_json::from_str(&json).map_err(|e| ParseError::json_error(e).in_file(path))?;

    let result = validate_definition(definition).map_err(|e| e.in_file(path))?;
    log_result(&result, Some(path));
    Ok(result)
}

/// Parses a keyboard definition from a JSON string.
pub fn parse_definition_from_string(
    json: &str,
) -> Result<ParseResult<KeyboardDefinition>, ParseError> {
    let definition: KeyboardDefinition =
        serde_json::from_str(json).map_err(ParseError::json_error)?;

    let result = validate_definition(definition)?;
    log_result(&result, None);
    Ok(result)
}

/// Reads a [`KeyboardConfig`] from a JSON file. Missing fields take their
/// defaults.
pub fn parse_config_file(path: &str) -> Result<KeyboardConfig, ParseError> {
    let json = fs::read_to_string(path).map_err(|e| ParseError::io_error(e, path))?;
    serde_json::from_str(&json).map_err(|e| ParseError::json_error(e).in_file(path))
}

/// Reads a [`KeyboardConfig`] from a JSON string.
pub fn parse_config_from_string(json: &str) -> Result<KeyboardConfig, ParseError> {
    Ok(serde_json::from_str(json)?)
}

fn log_result(result: &ParseResult<KeyboardDefinition>, path: Option<&str>) {
    tracing::info!(
        layout = %result.layout.name,
        path = path.unwrap_or("<string>"),
        findings = result.warning_count(),
        errors = result.errors().count(),
        "Keyboard definition loaded"
    );
    for warning in &result.warnings {
        tracing::warn!("{}", warning);
    }
}

// ============================================================================
// Tests
// ============================================================================
