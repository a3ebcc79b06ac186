//! Validation of global hotkey accelerators such as `Alt+Space`.
//!
//! An accelerator is a `+`-separated list of modifiers followed by exactly one
//! key code. Tokens are matched case-insensitively.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

/// Default value of the `general.hotkey` setting.
pub const DEFAULT_HOTKEY: &str = "Alt+Space";

/// Modifier aliases, mapped to the modifier they stand for.
static MODIFIERS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("command", "command"),
        ("cmd", "command"),
        ("control", "control"),
        ("ctrl", "control"),
        ("commandorcontrol", "commandorcontrol"),
        ("cmdorctrl", "commandorcontrol"),
        ("alt", "alt"),
        ("option", "alt"),
        ("altgr", "altgr"),
        ("shift", "shift"),
        ("super", "super"),
        ("meta", "super"),
    ])
});

static NAMED_KEYS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "plus",
        "space",
        "tab",
        "capslock",
        "numlock",
        "scrolllock",
        "backspace",
        "delete",
        "insert",
        "return",
        "enter",
        "up",
        "down",
        "left",
        "right",
        "home",
        "end",
        "pageup",
        "pagedown",
        "escape",
        "esc",
        "volumeup",
        "volumedown",
        "volumemute",
        "medianexttrack",
        "mediaprevioustrack",
        "mediastop",
        "mediaplaypause",
        "printscreen",
        "numdec",
        "numadd",
        "numsub",
        "nummult",
        "numdiv",
    ])
});

const PUNCTUATION: &str = ")!@#+$%^&*(:;<=>,_-.?/~`{]|[}\\'\"";

fn function_key_number(key: &str) -> Option<u8> {
    let rest = key.strip_prefix(['f', 'F'])?;
    let number: u8 = rest.parse().ok()?;
    (1..=24).contains(&number).then_some(number)
}

fn is_function_key(key: &str) -> bool {
    function_key_number(key).is_some()
}

fn is_key_code(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();

    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return c.is_ascii_alphanumeric() || PUNCTUATION.contains(c);
    }

    if let Some(digit) = lower.strip_prefix("num") {
        if digit.len() == 1 && digit.chars().all(|c| c.is_ascii_digit()) {
            return true;
        }
    }

    is_function_key(key) || NAMED_KEYS.contains(lower.as_str())
}

/// Whether `hotkey` is a valid accelerator.
///
/// Requires at least one modifier unless the key is a function key, and
/// rejects repeated modifiers (including aliases like `Ctrl+Control`).
pub fn is_valid_hotkey(hotkey: &str) -> bool {
    if hotkey.trim() != hotkey || hotkey.is_empty() {
        return false;
    }

    // A trailing "++" means the key itself is "+".
    let (prefix, key) = match hotkey.strip_suffix("++") {
        Some(prefix) => (Some(prefix), "+"),
        None => match hotkey.rsplit_once('+') {
            Some((prefix, key)) => (Some(prefix), key),
            None => (None, hotkey),
        },
    };

    if !is_key_code(key) {
        return false;
    }

    let Some(prefix) = prefix else {
        return is_function_key(key);
    };

    let mut seen = HashSet::new();
    for token in prefix.split('+') {
        let Some(modifier) = MODIFIERS.get(token.to_ascii_lowercase().as_str()) else {
            return false;
        };
        if !seen.insert(*modifier) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_hotkeys() {
        for hotkey in [
            DEFAULT_HOTKEY,
            "CmdOrCtrl+Shift+K",
            "Ctrl+Alt+Delete",
            "Super+1",
            "Option+Space",
            "Control+Shift+Plus",
            "Alt+num5",
            "Ctrl+/",
            "Ctrl++",
            "F12",
            "Shift+F24",
            "alt+space",
        ] {
            assert!(is_valid_hotkey(hotkey), "{} should be valid", hotkey);
        }
    }

    #[test]
    fn test_invalid_hotkeys() {
        for hotkey in [
            "",
            "Space",
            "A",
            "F25",
            "F0",
            "Alt+",
            "+Space",
            "Alt+Alt+Space",
            "Ctrl+Control+A",
            "Meta+Super+A",
            "Hyper+Space",
            "Alt+Space+Shift",
            "Alt+Spacebar",
            " Alt+Space",
            "Alt + Space",
        ] {
            assert!(!is_valid_hotkey(hotkey), "{} should be invalid", hotkey);
        }
    }
}
