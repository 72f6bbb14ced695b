pub use crate::Result;

use crate::geometry::Pos;
use crate::window::Window;

use std::collections::HashMap;
use std::convert::TryFrom;

use anyhow::anyhow;
use strum::EnumIter;
use strum::IntoEnumIterator;
use strum::IntoStaticStr;

/// Keysym name (`Return`, `q`, `F1`, ...) to the keycode producing it.
pub type KeyMap = HashMap<String, u8>;

#[derive(Debug, PartialEq, EnumIter, IntoStaticStr, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum Modifier {
    Shift,
    Lock,
    Ctrl,
    Alt,
    NumLock,
    AltGr,
    Super,
    ScrollLock,
}

impl Modifier {
    /// Modifiers whose state must not influence which binding a key press
    /// triggers.
    pub const LOCKS: [Modifier; 2] = [Modifier::Lock, Modifier::NumLock];
}

impl TryFrom<&str> for Modifier {
    type Error = anyhow::Error;

    fn try_from(val: &str) -> Result<Self> {
        match val.to_ascii_lowercase().as_str() {
            "shift" => Ok(Self::Shift),
            "lock" => Ok(Self::Lock),
            "control" | "ctrl" => Ok(Self::Ctrl),
            "alt" | "mod1" => Ok(Self::Alt),
            "mod2" => Ok(Self::NumLock),
            "mod3" => Ok(Self::AltGr),
            "super" | "mod4" | "win" => Ok(Self::Super),
            "mod5" => Ok(Self::ScrollLock),
            _ => Err(anyhow!("unable to resolve \"{}\" to modifier", val)),
        }
    }
}

/// A key together with the modifier mask held while it was pressed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode {
    pub mask: u16,
    pub code: u8,
}

impl KeyCode {
    /// Names of the modifiers in `mask`, joined the way bindings are written.
    pub fn describe(
        &self,
        mask_of: impl Fn(Modifier) -> u16,
    ) -> String {
        let code = self.code.to_string();
        let mut parts: Vec<&str> = Modifier::iter()
            .filter(|&modifier| self.mask & mask_of(modifier) != 0)
            .map(|modifier| modifier.into())
            .collect();

        parts.push(&code);
        parts.join("+")
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum MouseEventKind {
    Press,
    Release,
    Motion,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    /// Window under the pointer, `None` when the pointer is over the root.
    pub window: Option<Window>,
    pub root_rpos: Pos,
    pub time: u32,
}
