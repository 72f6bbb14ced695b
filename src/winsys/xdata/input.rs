pub use crate::input::*;

use strum::IntoEnumIterator;

use x11rb::protocol::xproto::ModMask;

impl From<Modifier> for u16 {
    fn from(modifier: Modifier) -> u16 {
        u16::from(match modifier {
            Modifier::Shift => ModMask::SHIFT,
            Modifier::Lock => ModMask::LOCK,
            Modifier::Ctrl => ModMask::CONTROL,
            Modifier::Alt => ModMask::M1,
            Modifier::NumLock => ModMask::M2,
            Modifier::AltGr => ModMask::M3,
            Modifier::Super => ModMask::M4,
            Modifier::ScrollLock => ModMask::M5,
        })
    }
}

/// Every combination of lock modifiers a key grab has to cover so that a
/// binding fires regardless of Caps Lock or Num Lock state.
pub fn lock_variants() -> [u16; 4] {
    let lock = u16::from(Modifier::Lock);
    let num_lock = u16::from(Modifier::NumLock);

    [0, lock, num_lock, lock | num_lock]
}

/// Reduces the state field of an input event to the modifiers that select
/// a binding: pointer button bits and lock modifiers are dropped.
pub fn clean_mask(state: u16) -> u16 {
    let modifiers = Modifier::iter().fold(0u16, |acc, modifier| acc | u16::from(modifier));
    let locks = Modifier::LOCKS
        .iter()
        .fold(0u16, |acc, &modifier| acc | u16::from(modifier));

    state & modifiers & !locks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_mask_drops_locks_and_buttons() {
        let button1 = 1 << 8;
        let state = u16::from(Modifier::Super)
            | u16::from(Modifier::Shift)
            | u16::from(Modifier::NumLock)
            | u16::from(Modifier::Lock)
            | button1;

        assert_eq!(
            clean_mask(state),
            u16::from(Modifier::Super) | u16::from(Modifier::Shift)
        );
    }

    #[test]
    fn lock_variants_start_with_plain_mask() {
        let variants = lock_variants();

        assert_eq!(variants[0], 0);
        assert!(variants.iter().all(|&mask| clean_mask(mask) == 0));
    }
}
