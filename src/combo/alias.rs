//! Alias resolution — shortcut string splitting, shift conversion, and
//! the special key aliases used at match time.
//!
//! Registration-time normalization lives in [`resolve`]. Match-time alias
//! lookups ([`alias_of`], [`matches_token`]) are bidirectional: a registered
//! `"option"` is satisfied by a pressed `"alt"` and vice versa, while the
//! display form keeps whatever token was registered.

use super::registry::ShortcutKind;

/// Characters that can only be typed with shift held, mapped to the key
/// that produces them unshifted (US layout).
const SHIFT_MAP: &[(&str, &str)] = &[
    ("~", "`"),
    ("!", "1"),
    ("@", "2"),
    ("#", "3"),
    ("$", "4"),
    ("%", "5"),
    ("^", "6"),
    ("&", "7"),
    ("*", "8"),
    ("(", "9"),
    (")", "0"),
    ("_", "-"),
    ("+", "="),
    (":", ";"),
    ("\"", "'"),
    ("<", ","),
    (">", "."),
    ("?", "/"),
    ("|", "\\"),
];

/// Friendlier names accepted in shortcut strings, mapped to the token the
/// key source reports.
const SPECIAL_ALIASES: &[(&str, &str)] = &[
    ("option", "alt"),
    ("command", "meta"),
    ("return", "enter"),
    ("escape", "esc"),
];

/// The token `"shift"` prepended by shift conversion.
pub const SHIFT: &str = "shift";

/// A shortcut string after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub kind: ShortcutKind,
    pub keys: Vec<String>,
    /// Canonical display text, rejoined with the kind's separator.
    pub text: String,
}

/// Base key for a symbol that requires shift, e.g. `"!"` → `"1"`.
pub fn shifted_base(symbol: &str) -> Option<&'static str> {
    SHIFT_MAP
        .iter()
        .find(|(shifted, _)| *shifted == symbol)
        .map(|(_, base)| *base)
}

/// Resolved form of a special alias, e.g. `"option"` → `"alt"`.
pub fn alias_of(token: &str) -> Option<&'static str> {
    SPECIAL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == token)
        .map(|(_, resolved)| *resolved)
}

/// Alias spelling of a resolved token, e.g. `"alt"` → `"option"`.
pub fn alias_for(resolved: &str) -> Option<&'static str> {
    SPECIAL_ALIASES
        .iter()
        .find(|(_, target)| *target == resolved)
        .map(|(alias, _)| *alias)
}

/// Whether a pressed token satisfies a registered token, directly or
/// through a special alias in either direction.
pub fn matches_token(registered: &str, pressed: &str) -> bool {
    registered == pressed
        || alias_of(registered) == Some(pressed)
        || alias_for(registered) == Some(pressed)
}

/// Normalize a raw shortcut string.
///
/// A space anywhere makes it a sequence split on spaces; otherwise it is a
/// combination split on `+`. A lone `"+"` is the plus key itself. A
/// single-key shortcut that is an uppercase letter or a shifted symbol is
/// rewritten to `shift` + its base key. Multi-key shortcuts are never
/// converted, so `"ctrl+M"` keeps its uppercase `M`.
pub fn resolve(raw: &str) -> Resolved {
    let (kind, separator) = if raw.contains(' ') {
        (ShortcutKind::Sequence, " ")
    } else {
        (ShortcutKind::Combination, "+")
    };

    let mut keys: Vec<String> = if kind == ShortcutKind::Combination && raw == "+" {
        vec![raw.to_string()]
    } else {
        raw.split(separator).map(str::to_string).collect()
    };

    if keys.len() == 1 {
        if let Some(converted) = convert_shifted(&keys[0]) {
            keys = converted;
        }
        return Resolved {
            kind,
            text: keys.join(separator),
            keys,
        };
    }

    Resolved {
        kind,
        text: raw.to_string(),
        keys,
    }
}

/// `shift` + base key for a lone key typed with shift, if it is one.
fn convert_shifted(key: &str) -> Option<Vec<String>> {
    if let Some(base) = shifted_base(key) {
        return Some(vec![SHIFT.to_string(), base.to_string()]);
    }

    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_uppercase() => {
            Some(vec![SHIFT.to_string(), c.to_lowercase().collect()])
        }
        _ => None,
    }
}
