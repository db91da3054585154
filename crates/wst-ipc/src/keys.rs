use serde::Serialize;

/// Modifier prefixes understood in key chords, and the key each presses.
const MODIFIERS: [(&str, &str); 3] = [
    ("S-", "KEY_LEFTMETA"),
    ("C-", "KEY_LEFTCTRL"),
    ("A-", "KEY_LEFTALT"),
];

/// One key state change sent as `feed_key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTransition {
    pub key: String,
    pub pressed: bool,
}

impl KeyTransition {
    fn press(key: &str) -> Self {
        Self {
            key: key.to_string(),
            pressed: true,
        }
    }

    fn release(key: &str) -> Self {
        Self {
            key: key.to_string(),
            pressed: false,
        }
    }
}

/// Expand a chord such as `"S-KEY_E"` or `"C-S-KEY_T"` into key transitions.
///
/// Modifiers go down in the order written, then the key is pressed and
/// released, then the modifiers come up in reverse order.
pub fn chord_sequence(combo: &str) -> Vec<KeyTransition> {
    let mut modifiers = Vec::new();
    let mut key = combo;
    'strip: loop {
        for (prefix, modifier) in MODIFIERS {
            if let Some(rest) = key.strip_prefix(prefix) {
                if !rest.is_empty() {
                    modifiers.push(modifier);
                    key = rest;
                    continue 'strip;
                }
            }
        }
        break;
    }

    let mut sequence = Vec::with_capacity(2 * (modifiers.len() + 1));
    sequence.extend(modifiers.iter().map(|m| KeyTransition::press(m)));
    sequence.push(KeyTransition::press(key));
    sequence.push(KeyTransition::release(key));
    sequence.extend(modifiers.iter().rev().map(|m| KeyTransition::release(m)));
    sequence
}

/// How `feed_button` drives a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonMode {
    /// Press and release.
    Full,
    Press,
    Release,
}

impl ButtonMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ButtonMode::Full => "full",
            ButtonMode::Press => "press",
            ButtonMode::Release => "release",
        }
    }
}
