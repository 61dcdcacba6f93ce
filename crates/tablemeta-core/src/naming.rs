// SPDX-FileCopyrightText: 2026 tablemeta contributors
// SPDX-License-Identifier: MIT

//! Identifier-to-database-name conversion.
//!
//! Pure functions translating Rust-side identifiers (type and property names)
//! into database identifiers under the globally configured conventions, plus
//! the relatedness check deciding whether a generated `SELECT` needs an
//! `AS property` alias.
//!
//! The conversion is a deliberate ASCII letter-case heuristic, not a
//! Unicode-aware tokenizer: generated SQL column order and spelling depend on
//! it being boringly predictable.

/// Quote pairs stripped by [`check_related`] before comparison.
const ESCAPE_PAIRS: [(char, char); 3] = [('`', '`'), ('"', '"'), ('[', ']')];

/// Convert a camel-cased identifier to lower-case underscore form.
///
/// An underscore is inserted before every upper-case ASCII letter that
/// follows a lower-case letter or a digit, then the whole identifier is
/// lower-cased.
///
/// # Examples
///
/// ```
/// use tablemeta_core::naming::camel_to_underline;
///
/// assert_eq!(camel_to_underline("userName"), "user_name");
/// assert_eq!(camel_to_underline("UserName"), "user_name");
/// assert_eq!(camel_to_underline("addr2Line"), "addr2_line");
/// ```
pub fn camel_to_underline(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len() + 4);
    let mut prev_splittable = false;
    for ch in identifier.chars() {
        if ch.is_ascii_uppercase() && prev_splittable {
            out.push('_');
        }
        prev_splittable = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        out.push(ch.to_ascii_lowercase());
    }
    out
}

/// Lower-case only the first character of an identifier.
pub fn first_to_lower(identifier: &str) -> String {
    let mut chars = identifier.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new()
    }
}

/// Resolve a database identifier for `identifier` under the active naming
/// conventions.
///
/// Rules, in order:
///
/// 1. With `underline` on, apply [`camel_to_underline`].
/// 2. With `capital` on, upper-case the result (overriding step 1's
///    lower-casing). Otherwise, when `underline` is off, lower-case only the
///    first character.
///
/// Used both for table names derived from type names and for column names
/// derived from property names.
pub fn to_column_name(identifier: &str, underline: bool, capital: bool) -> String {
    let name = if underline {
        camel_to_underline(identifier)
    } else {
        identifier.to_string()
    };
    if capital {
        name.to_ascii_uppercase()
    } else if underline {
        name
    } else {
        first_to_lower(&name)
    }
}

/// Qualify a table name with the global prefix and schema.
///
/// The prefix is prepended directly with no separator; the schema, when
/// non-empty, is prepended afterwards as `schema.`.
pub fn qualify(table_name: &str, prefix: &str, schema: &str) -> String {
    let mut target = if prefix.is_empty() {
        table_name.to_string()
    } else {
        format!("{prefix}{table_name}")
    };
    if !schema.is_empty() {
        target = format!("{schema}.{target}");
    }
    target
}

/// Decide whether `property` and `column` diverge enough to require an
/// `AS property` alias in generated `SELECT` text.
///
/// A single balanced leading/trailing quote pair on the column is stripped
/// first. The comparison is case-insensitive; with `under_camel` on, a match
/// after removing underscores from the column also counts. Returns `true`
/// when no comparison matches (an alias is required).
pub fn check_related(under_camel: bool, property: &str, column: &str) -> bool {
    let column = strip_escape(column);
    let property_upper = property.to_ascii_uppercase();
    let column_upper = column.to_ascii_uppercase();
    if under_camel {
        !(property_upper == column_upper || property_upper == column_upper.replace('_', ""))
    } else {
        property_upper != column_upper
    }
}

/// Strip one leading/trailing escape pair when both ends carry it.
fn strip_escape(column: &str) -> &str {
    if column.len() >= 2 {
        let mut chars = column.chars();
        let (first, last) = (chars.next(), chars.next_back());
        for (open, close) in ESCAPE_PAIRS {
            if first == Some(open) && last == Some(close) {
                return &column[open.len_utf8()..column.len() - close.len_utf8()];
            }
        }
    }
    column
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_to_underline_basic() {
        assert_eq!(camel_to_underline("userName"), "user_name");
        assert_eq!(camel_to_underline("UserName"), "user_name");
        assert_eq!(camel_to_underline("id"), "id");
        assert_eq!(camel_to_underline(""), "");
    }

    #[test]
    fn camel_to_underline_digit_boundary() {
        assert_eq!(camel_to_underline("addr2Line"), "addr2_line");
        assert_eq!(camel_to_underline("HTTPServer"), "httpserver");
    }

    #[test]
    fn to_column_name_conventions() {
        assert_eq!(to_column_name("userName", true, false), "user_name");
        assert_eq!(to_column_name("UserName", false, false), "userName");
        assert_eq!(to_column_name("userName", true, true), "USER_NAME");
        assert_eq!(to_column_name("UserName", false, true), "USERNAME");
    }

    #[test]
    fn qualify_prefix_and_schema() {
        assert_eq!(qualify("user", "", ""), "user");
        assert_eq!(qualify("user", "t_", ""), "t_user");
        assert_eq!(qualify("user", "", "crm"), "crm.user");
        assert_eq!(qualify("user", "t_", "crm"), "crm.t_user");
    }

    #[test]
    fn related_under_camel() {
        assert!(!check_related(true, "userId", "user_id"));
        assert!(!check_related(true, "userId", "USERID"));
        assert!(check_related(true, "userId", "uid"));
    }

    #[test]
    fn related_exact_only() {
        assert!(check_related(false, "userId", "user_id"));
        assert!(!check_related(false, "userId", "USERID"));
    }

    #[test]
    fn related_strips_escapes() {
        assert!(!check_related(false, "order", "`order`"));
        assert!(!check_related(false, "order", "\"ORDER\""));
        assert!(!check_related(true, "userId", "[user_id]"));
    }
}
