// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

//! Templated SQL script helpers.
//!
//! Fragments produced by this crate are not final SQL: they are script text
//! for an external templating layer that understands `#{...}` parameter
//! placeholders and `<if test="...">` guards. The helpers here keep that
//! text byte-for-byte reproducible so the templating layer can be exercised
//! against fixed expectations.

/// Equality with the spacing used throughout generated fragments.
pub const EQUALS: &str = " = ";

/// Fragment separator used when joining per-field scripts.
pub const NEWLINE: &str = "\n";

/// Comma separator for column and value lists.
pub const COMMA: &str = ",";

/// Wrap a parameter name into a safe binding placeholder.
///
/// ```
/// use tablemeta_core::script::safe_param;
///
/// assert_eq!(safe_param("et.userName"), "#{et.userName}");
/// ```
pub fn safe_param(param: &str) -> String {
    format!("#{{{param}}}")
}

/// Wrap a script in a conditional guard emitted only when `test` holds.
///
/// With `newline` set the guarded body is placed on its own line, which keeps
/// multi-field scripts readable in logged statements.
pub fn convert_if(script: &str, test: &str, newline: bool) -> String {
    if newline {
        format!("<if test=\"{test}\">{NEWLINE}{script}{NEWLINE}</if>")
    } else {
        format!("<if test=\"{test}\">{script}</if>")
    }
}

/// Null guard for a bound property: `prop != null`.
pub fn not_null_test(param: &str) -> String {
    format!("{param} != null")
}

/// Null-and-non-empty guard for textual properties:
/// `prop != null and prop != ''`.
pub fn not_empty_test(param: &str) -> String {
    format!("{param} != null and {param} != ''")
}

/// Render a configured literal for direct embedding into SQL text.
///
/// Char-sequence typed fields get single quotes; everything else is embedded
/// verbatim.
pub fn quoted_literal(value: &str, char_sequence: bool) -> String {
    if char_sequence {
        format!("'{value}'")
    } else {
        value.to_string()
    }
}
