//! Input events, and their translation from the terminal backend into key
//! presses the keymap understands.

use crossterm::event as cevent;

/// Key presses and canonical tokens.
pub mod key;

use key::{KeyPress, Mods};

/// Translate crossterm key modifiers into neodocs modifiers.
fn translate_key_modifiers(mods: cevent::KeyModifiers) -> Mods {
    Mods {
        shift: mods.contains(cevent::KeyModifiers::SHIFT),
        ctrl: mods.contains(cevent::KeyModifiers::CONTROL),
        alt: mods.contains(cevent::KeyModifiers::ALT),
        meta: mods.contains(cevent::KeyModifiers::META)
            || mods.contains(cevent::KeyModifiers::SUPER),
        mouse: false,
    }
}

/// Name a crossterm key code the way browser keyboard events do, so bindings
/// written for the documentation UI work unchanged in the terminal.
fn key_name(code: cevent::KeyCode) -> String {
    match code {
        cevent::KeyCode::Char(c) => c.to_string(),
        cevent::KeyCode::Backspace => "Backspace".into(),
        cevent::KeyCode::Enter => "Enter".into(),
        cevent::KeyCode::Left => "ArrowLeft".into(),
        cevent::KeyCode::Right => "ArrowRight".into(),
        cevent::KeyCode::Up => "ArrowUp".into(),
        cevent::KeyCode::Down => "ArrowDown".into(),
        cevent::KeyCode::Home => "Home".into(),
        cevent::KeyCode::End => "End".into(),
        cevent::KeyCode::PageUp => "PageUp".into(),
        cevent::KeyCode::PageDown => "PageDown".into(),
        cevent::KeyCode::Tab | cevent::KeyCode::BackTab => "Tab".into(),
        cevent::KeyCode::Delete => "Delete".into(),
        cevent::KeyCode::Insert => "Insert".into(),
        cevent::KeyCode::Esc => "Escape".into(),
        cevent::KeyCode::F(n) => format!("F{n}"),
        cevent::KeyCode::CapsLock => "CapsLock".into(),
        cevent::KeyCode::ScrollLock => "ScrollLock".into(),
        cevent::KeyCode::NumLock => "NumLock".into(),
        cevent::KeyCode::PrintScreen => "PrintScreen".into(),
        cevent::KeyCode::Pause => "Pause".into(),
        cevent::KeyCode::Menu => "ContextMenu".into(),
        cevent::KeyCode::Null
        | cevent::KeyCode::KeypadBegin
        | cevent::KeyCode::Media(_)
        | cevent::KeyCode::Modifier(_) => "Unidentified".into(),
    }
}

impl From<cevent::KeyEvent> for KeyPress {
    fn from(k: cevent::KeyEvent) -> Self {
        let mut mods = translate_key_modifiers(k.modifiers);
        // BackTab arrives without the shift flag on some terminals.
        if k.code == cevent::KeyCode::BackTab {
            mods.shift = true;
        }
        Self::new(key_name(k.code), mods)
    }
}

/// Translate a mouse button press into a key press carrying the mouse marker.
/// Releases, drags, moves and scrolls produce nothing.
pub fn mouse_press(m: &cevent::MouseEvent) -> Option<KeyPress> {
    let cevent::MouseEventKind::Down(button) = m.kind else {
        return None;
    };
    let name = match button {
        cevent::MouseButton::Left => "Left",
        cevent::MouseButton::Right => "Right",
        cevent::MouseButton::Middle => "Middle",
    };
    let mut mods = translate_key_modifiers(m.modifiers);
    mods.mouse = true;
    Some(KeyPress::new(name, mods))
}
