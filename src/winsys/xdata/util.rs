use super::super::input::KeyMap;

use std::collections::HashMap;

type Keysym = u32;

const NAMED_KEYSYMS: &[(&str, Keysym)] = &[
    ("space", 0x0020),
    ("apostrophe", 0x0027),
    ("comma", 0x002c),
    ("minus", 0x002d),
    ("period", 0x002e),
    ("slash", 0x002f),
    ("semicolon", 0x003b),
    ("equal", 0x003d),
    ("bracketleft", 0x005b),
    ("backslash", 0x005c),
    ("bracketright", 0x005d),
    ("grave", 0x0060),
    ("BackSpace", 0xff08),
    ("Tab", 0xff09),
    ("Return", 0xff0d),
    ("Pause", 0xff13),
    ("Scroll_Lock", 0xff14),
    ("Escape", 0xff1b),
    ("Home", 0xff50),
    ("Left", 0xff51),
    ("Up", 0xff52),
    ("Right", 0xff53),
    ("Down", 0xff54),
    ("Prior", 0xff55),
    ("Page_Up", 0xff55),
    ("Next", 0xff56),
    ("Page_Down", 0xff56),
    ("End", 0xff57),
    ("Print", 0xff61),
    ("Insert", 0xff63),
    ("Menu", 0xff67),
    ("Num_Lock", 0xff7f),
    ("Delete", 0xffff),
    ("XF86AudioLowerVolume", 0x1008_ff11),
    ("XF86AudioMute", 0x1008_ff12),
    ("XF86AudioRaiseVolume", 0x1008_ff13),
    ("XF86AudioPlay", 0x1008_ff14),
    ("XF86AudioStop", 0x1008_ff15),
    ("XF86AudioPrev", 0x1008_ff16),
    ("XF86AudioNext", 0x1008_ff17),
    ("XF86MonBrightnessUp", 0x1008_ff02),
    ("XF86MonBrightnessDown", 0x1008_ff03),
];

const XK_F1: Keysym = 0xffbe;

pub struct Util;

impl Util {
    /// Keysym names understood in key bindings.
    pub fn keysym_names() -> Vec<(String, Keysym)> {
        let letters = (b'a'..=b'z').flat_map(|c| {
            vec![
                ((c as char).to_string(), Keysym::from(c)),
                ((c.to_ascii_uppercase() as char).to_string(), Keysym::from(c.to_ascii_uppercase())),
            ]
        });

        let digits = (b'0'..=b'9').map(|c| ((c as char).to_string(), Keysym::from(c)));
        let functions = (0..24).map(|i| (format!("F{}", i + 1), XK_F1 + i));

        letters
            .chain(digits)
            .chain(functions)
            .chain(
                NAMED_KEYSYMS
                    .iter()
                    .map(|&(name, keysym)| (name.to_owned(), keysym)),
            )
            .collect()
    }

    /// Resolves every known keysym name to the lowest keycode producing it,
    /// given the server's keyboard mapping table.
    pub fn keymap_from_keysyms(
        min_keycode: u8,
        keysyms_per_keycode: u8,
        keysyms: &[Keysym],
    ) -> KeyMap {
        let per_keycode = keysyms_per_keycode as usize;
        let mut codes: HashMap<Keysym, u8> = HashMap::new();

        if per_keycode == 0 {
            return KeyMap::new();
        }

        for (i, row) in keysyms.chunks(per_keycode).enumerate() {
            let keycode = match u8::try_from(min_keycode as usize + i) {
                Ok(keycode) => keycode,
                Err(_) => break,
            };

            for &keysym in row.iter().filter(|&&keysym| keysym != 0) {
                codes.entry(keysym).or_insert(keycode);
            }
        }

        Self::keysym_names()
            .into_iter()
            .filter_map(|(name, keysym)| codes.get(&keysym).map(|&code| (name, code)))
            .collect()
    }
}
