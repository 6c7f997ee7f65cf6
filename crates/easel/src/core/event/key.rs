//! Keyboard input primitives and keystroke normalization.
use std::ops::Add;

/// Modifier key state.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Mods {
    /// Shift is active.
    pub shift: bool,
    /// Control is active.
    pub ctrl: bool,
    /// Alt is active.
    pub alt: bool,
}

impl Add<KeyCode> for Mods {
    type Output = KeyEvent;

    fn add(self, code: KeyCode) -> Self::Output {
        KeyEvent {
            code,
            mods: self,
            text: None,
        }
    }
}

impl Add<Self> for Mods {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self {
            shift: self.shift || other.shift,
            ctrl: self.ctrl || other.ctrl,
            alt: self.alt || other.alt,
        }
    }
}

/// No modifiers pressed.
#[allow(non_upper_case_globals)]
pub const Empty: Mods = Mods {
    shift: false,
    ctrl: false,
    alt: false,
};

/// Shift-only modifier state.
#[allow(non_upper_case_globals)]
pub const Shift: Mods = Mods {
    shift: true,
    ctrl: false,
    alt: false,
};

/// Control-only modifier state.
#[allow(non_upper_case_globals)]
pub const Ctrl: Mods = Mods {
    shift: false,
    ctrl: true,
    alt: false,
};

/// Alt-only modifier state.
#[allow(non_upper_case_globals)]
pub const Alt: Mods = Mods {
    shift: false,
    ctrl: false,
    alt: true,
};

/// Physical modifier key codes.
#[derive(Debug, PartialOrd, PartialEq, Hash, Eq, Clone, Copy)]
pub enum ModifierKeyCode {
    /// Left shift.
    LeftShift,
    /// Left control.
    LeftControl,
    /// Left alt.
    LeftAlt,
    /// Left meta.
    LeftMeta,
    /// Right shift.
    RightShift,
    /// Right control.
    RightControl,
    /// Right alt.
    RightAlt,
    /// Right meta.
    RightMeta,
}

/// Key codes.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum KeyCode {
    /// A character key, reported lowercase.
    Char(char),
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// Return on the main keyboard.
    Return,
    /// Tab.
    Tab,
    /// Escape.
    Escape,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Insert.
    Insert,
    /// Function key.
    F(u8),
    /// A keypad digit or operator: `0`-`9`, `/`, `.`, `-`, `+`, `*`.
    Keypad(char),
    /// Enter on the keypad.
    KeypadEnter,
    /// A modifier key on its own.
    Modifier(ModifierKeyCode),
    /// A key with no name.
    Unknown,
}

impl KeyCode {
    /// The key's name, without modifiers. Keypad keys report the bare symbol.
    fn name(&self) -> Option<String> {
        let name = match self {
            Self::Char(' ') => "space".to_string(),
            Self::Char(c) | Self::Keypad(c) => c.to_lowercase().collect(),
            Self::Backspace => "backspace".into(),
            Self::Delete => "delete".into(),
            Self::Return => "return".into(),
            Self::Tab => "tab".into(),
            Self::Escape => "escape".into(),
            Self::Left => "left".into(),
            Self::Right => "right".into(),
            Self::Up => "up".into(),
            Self::Down => "down".into(),
            Self::Home => "home".into(),
            Self::End => "end".into(),
            Self::PageUp => "pageup".into(),
            Self::PageDown => "pagedown".into(),
            Self::Insert => "insert".into(),
            Self::F(n) => format!("f{n}"),
            Self::KeypadEnter => "enter".into(),
            Self::Modifier(_) | Self::Unknown => return None,
        };
        Some(name)
    }

    /// Is this a keypad key?
    fn is_keypad(&self) -> bool {
        matches!(self, Self::Keypad(_) | Self::KeypadEnter)
    }
}

/// A key press.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct KeyEvent {
    /// Physical key.
    pub code: KeyCode,
    /// Active modifiers.
    pub mods: Mods,
    /// Text the press produced, if any.
    pub text: Option<String>,
}

impl KeyEvent {
    /// A key press that produced text.
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// A printable character with no modifiers, producing itself as text.
    pub fn char(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            mods: Empty,
            text: Some(c.to_string()),
        }
    }

    /// The normalized keystroke: `CTRL-`, `ALT-`, `SHIFT-` and `KP-` prefixes
    /// in that order followed by the key name, e.g. `CTRL-return` or
    /// `KP-enter`. Modifier-only presses produce no keystroke.
    pub fn keystroke(&self) -> Option<String> {
        let name = self.code.name()?;
        let mut parts = vec![];
        if self.mods.ctrl {
            parts.push("CTRL");
        }
        if self.mods.alt {
            parts.push("ALT");
        }
        if self.mods.shift {
            parts.push("SHIFT");
        }
        if self.code.is_keypad() {
            parts.push("KP");
        }
        parts.push(&name);
        Some(parts.join("-"))
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Empty + code
    }
}

impl From<char> for KeyEvent {
    fn from(c: char) -> Self {
        Self::char(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keystrokes() {
        assert_eq!(KeyEvent::from(KeyCode::Return).keystroke(), Some("return".into()));
        assert_eq!((Ctrl + KeyCode::Return).keystroke(), Some("CTRL-return".into()));
        assert_eq!(
            (Ctrl + Alt + Shift + KeyCode::Char('A')).keystroke(),
            Some("CTRL-ALT-SHIFT-a".into())
        );
        assert_eq!(KeyEvent::from(KeyCode::KeypadEnter).keystroke(), Some("KP-enter".into()));
        assert_eq!((Shift + KeyCode::Keypad('7')).keystroke(), Some("SHIFT-KP-7".into()));
        assert_eq!(KeyEvent::from(' ').keystroke(), Some("space".into()));
        assert_eq!(KeyEvent::from(KeyCode::PageUp).keystroke(), Some("pageup".into()));
        assert_eq!(KeyEvent::from(KeyCode::F(5)).keystroke(), Some("f5".into()));
        assert_eq!(
            KeyEvent::from(KeyCode::Modifier(ModifierKeyCode::LeftShift)).keystroke(),
            None
        );
    }
}
