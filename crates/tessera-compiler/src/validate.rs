//! Pure validation predicates.
//!
//! These functions have no side effects and emit no diagnostics, so both the
//! core builders and extensions can use them to keep validation uniform.

use crate::syntax;

/// Longest legal long filename, in characters.
pub const MAX_LONG_FILENAME_LEN: usize = 259;

const MAX_SHORT_NAME_LEN: usize = 8;

const MAX_SHORT_EXTENSION_LEN: usize = 3;

/// Characters never allowed in a long filename.
const ILLEGAL_LONG_FILENAME_CHARS: &[char] = &['\\', '?', '|', '>', '<', ':', '/', '*', '"'];

/// Characters never allowed in a short filename, in addition to the long set.
const ILLEGAL_SHORT_FILENAME_CHARS: &[char] = &['+', ',', ';', '=', '[', ']', ' '];

const WILDCARDS: &[char] = &['*', '?'];

const PATH_SEPARATORS: &[char] = &['\\', '/'];

/// Returns `true` if `value` matches `[_A-Za-z][0-9A-Za-z_.]*`.
///
/// # Examples
///
/// ```
/// use tessera_compiler::validate::is_valid_identifier;
///
/// assert!(is_valid_identifier("INSTALLFOLDER"));
/// assert!(is_valid_identifier("_private.name"));
/// assert!(!is_valid_identifier("1st"));
/// assert!(!is_valid_identifier("has space"));
/// assert!(!is_valid_identifier(""));
/// ```
pub fn is_valid_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        }
        _ => false,
    }
}

/// Returns `true` if `value` is exactly a localization reference `!(loc.Name)`.
///
/// # Examples
///
/// ```
/// use tessera_compiler::validate::is_valid_loc_identifier;
///
/// assert!(is_valid_loc_identifier("!(loc.ProductName)"));
/// assert!(!is_valid_loc_identifier("$(loc.ProductName)"));
/// assert!(!is_valid_loc_identifier("!(loc.ProductName) "));
/// ```
pub fn is_valid_loc_identifier(value: &str) -> bool {
    syntax::parse_variable_reference(value).is_some_and(|reference| reference.is_localization())
}

/// Returns `true` if `value` is a localization or wix variable reference that
/// is resolved after analysis and therefore passes through validation.
pub fn is_deferred_reference(value: &str) -> bool {
    syntax::parse_variable_reference(value).is_some_and(|reference| reference.is_deferred_text())
}

/// Returns `true` if `value` is a binder variable such as `!(bind.fileVersion.App)`.
pub fn is_binder_variable(value: &str) -> bool {
    syntax::parse_variable_reference(value).is_some_and(|reference| reference.is_binder_variable())
}

/// Returns `true` if `filename` is a legal long filename.
///
/// The name must be non-empty, at most 259 characters, not made only of
/// periods and free of `\ ? | > < : / * "` and control characters.
/// `allow_wildcards` permits `*` and `?`. `allow_relative` permits `\` and
/// `/` separated paths whose segments are legal names or `.`/`..`.
///
/// # Examples
///
/// ```
/// use tessera_compiler::validate::is_valid_long_filename;
///
/// assert!(is_valid_long_filename("Application Settings.config", false, false));
/// assert!(!is_valid_long_filename("what?.txt", false, false));
/// assert!(is_valid_long_filename("*.txt", true, false));
/// assert!(!is_valid_long_filename("bin\\app.exe", false, false));
/// assert!(is_valid_long_filename("..\\bin\\app.exe", false, true));
/// ```
pub fn is_valid_long_filename(filename: &str, allow_wildcards: bool, allow_relative: bool) -> bool {
    if filename.is_empty() || filename.chars().count() > MAX_LONG_FILENAME_LEN {
        return false;
    }

    if allow_relative {
        filename
            .split(PATH_SEPARATORS)
            .filter(|segment| !segment.is_empty())
            .all(|segment| {
                matches!(segment, "." | "..") || is_valid_long_name(segment, allow_wildcards)
            })
            && filename.chars().any(|c| !PATH_SEPARATORS.contains(&c))
    } else {
        is_valid_long_name(filename, allow_wildcards)
    }
}

fn is_valid_long_name(name: &str, allow_wildcards: bool) -> bool {
    if name.chars().all(|c| c == '.') {
        return false;
    }
    name.chars().all(|c| {
        !c.is_control()
            && (!ILLEGAL_LONG_FILENAME_CHARS.contains(&c)
                || (allow_wildcards && WILDCARDS.contains(&c)))
    })
}

/// Returns `true` if `filename` is a legal 8.3 short filename.
///
/// # Examples
///
/// ```
/// use tessera_compiler::validate::is_valid_short_filename;
///
/// assert!(is_valid_short_filename("SETUP.EXE", false));
/// assert!(is_valid_short_filename("readme", false));
/// assert!(!is_valid_short_filename("toolongname.txt", false));
/// assert!(!is_valid_short_filename("a.b.c", false));
/// assert!(!is_valid_short_filename("my file.txt", false));
/// assert!(is_valid_short_filename("*.txt", true));
/// ```
pub fn is_valid_short_filename(filename: &str, allow_wildcards: bool) -> bool {
    let (stem, extension) = match filename.split_once('.') {
        Some((stem, extension)) => {
            if extension.is_empty() || extension.contains('.') {
                return false;
            }
            (stem, extension)
        }
        None => (filename, ""),
    };

    if stem.is_empty()
        || stem.chars().count() > MAX_SHORT_NAME_LEN
        || extension.chars().count() > MAX_SHORT_EXTENSION_LEN
    {
        return false;
    }

    filename.chars().filter(|c| *c != '.').all(|c| {
        let wildcard = WILDCARDS.contains(&c);
        c.is_ascii_graphic()
            && !ILLEGAL_SHORT_FILENAME_CHARS.contains(&c)
            && (!ILLEGAL_LONG_FILENAME_CHARS.contains(&c) || (allow_wildcards && wildcard))
    })
}

/// Returns `true` if `value` looks like a generated short name (`NAME~1`).
pub fn looks_like_short_name_alias(value: &str) -> bool {
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '~' && chars.peek().is_some_and(char::is_ascii_digit) {
            return true;
        }
    }
    false
}

/// Returns `true` if `value` contains a formatted property reference such as `[INSTALLFOLDER]`.
///
/// # Examples
///
/// ```
/// use tessera_compiler::validate::contains_property;
///
/// assert!(contains_property("[INSTALLFOLDER]bin"));
/// assert!(contains_property("prefix [A] suffix"));
/// assert!(!contains_property("[]"));
/// assert!(!contains_property("no properties"));
/// assert!(!contains_property("unterminated [A"));
/// ```
pub fn contains_property(value: &str) -> bool {
    let mut open: Option<usize> = None;
    for (index, c) in value.char_indices() {
        match c {
            '[' => open = Some(index),
            ']' => {
                if open.is_some_and(|start| index > start + 1) {
                    return true;
                }
                open = None;
            }
            _ => {}
        }
    }
    false
}
