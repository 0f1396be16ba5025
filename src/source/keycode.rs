//! Key identity resolution — browser-style key codes and DOM key names
//! to the lowercase tokens used in shortcut strings.

/// Tokens treated as modifiers.
const MODIFIERS: &[&str] = &["shift", "ctrl", "alt", "meta"];

/// Whether a token is a modifier key.
pub fn is_modifier(key: &str) -> bool {
    MODIFIERS.contains(&key)
}

/// Resolve a key code to its token.
///
/// Named and punctuation keys come from the fixed tables; any other code
/// in the printable range is taken as its character, lowercased. Returns
/// `None` for codes with no sensible token.
pub fn from_code(code: u32) -> Option<String> {
    if let Some(name) = special_key(code) {
        return Some(name.to_string());
    }
    if let Some(symbol) = punctuation(code) {
        return Some(symbol.to_string());
    }

    match code {
        // Numeric keypad digits.
        96..=105 => Some((code - 96).to_string()),
        112..=130 => Some(format!("f{}", code - 111)),
        _ => char::from_u32(code)
            .filter(|c| c.is_ascii_graphic())
            .map(|c| c.to_ascii_lowercase().to_string()),
    }
}

/// Normalize a key name as hosts report it (`"Control"`, `"ArrowUp"`,
/// `"Escape"`, `"K"`) to a shortcut token. Matching ignores case.
pub fn from_name(name: &str) -> String {
    let lower = name.to_lowercase();
    let token = match lower.as_str() {
        " " | "spacebar" => "space",
        "control" | "ctrl" => "ctrl",
        "alt" | "altgraph" | "option" => "alt",
        "shift" => "shift",
        "meta" | "os" | "super" | "command" | "cmd" => "meta",
        "escape" | "esc" => "esc",
        "enter" | "return" => "enter",
        "capslock" => "capslock",
        "delete" | "del" => "del",
        "insert" | "ins" => "ins",
        "arrowup" => "up",
        "arrowdown" => "down",
        "arrowleft" => "left",
        "arrowright" => "right",
        _ => return lower,
    };
    token.to_string()
}

fn special_key(code: u32) -> Option<&'static str> {
    Some(match code {
        8 => "backspace",
        9 => "tab",
        13 => "enter",
        16 => "shift",
        17 => "ctrl",
        18 => "alt",
        20 => "capslock",
        27 => "esc",
        32 => "space",
        33 => "pageup",
        34 => "pagedown",
        35 => "end",
        36 => "home",
        37 => "left",
        38 => "up",
        39 => "right",
        40 => "down",
        45 => "ins",
        46 => "del",
        91 | 93 | 224 => "meta",
        _ => return None,
    })
}

fn punctuation(code: u32) -> Option<&'static str> {
    Some(match code {
        106 => "*",
        107 => "+",
        109 => "-",
        110 => ".",
        111 => "/",
        186 => ";",
        187 => "=",
        188 => ",",
        189 => "-",
        190 => ".",
        191 => "/",
        192 => "`",
        219 => "[",
        220 => "\\",
        221 => "]",
        222 => "'",
        _ => return None,
    })
}
