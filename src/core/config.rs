use winsys::input::KeyCode;
use winsys::input::KeyMap;
use winsys::input::Modifier;
use winsys::xdata::input::clean_mask;

use std::convert::TryFrom;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::anyhow;
use thiserror::Error;
use toml::Table;
use toml::Value;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("keybinding {binding} is bound more than once")]
    DuplicateKeybinding {
        binding: String,
    },
    #[error("value {value} of {key} is out of range")]
    OutOfRange {
        key: String,
        value: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Exec(String),
    CloseFocused,
    Reload,
    FocusNext,
    FocusPrevious,
}

impl TryFrom<&str> for Action {
    type Error = anyhow::Error;

    fn try_from(val: &str) -> winsys::Result<Self> {
        match val {
            "close" => Ok(Self::CloseFocused),
            "reload" => Ok(Self::Reload),
            "focus_next" => Ok(Self::FocusNext),
            "focus_previous" => Ok(Self::FocusPrevious),
            _ => Err(anyhow!("unknown action \"{}\"", val)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    /// The binding as written in the configuration file.
    pub name: String,
    pub key_code: KeyCode,
    pub action: Action,
}

/// An immutable snapshot of the user's settings. A reload replaces the
/// whole snapshot, never parts of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub border_width: u32,
    pub border_focused: u32,
    pub border_unfocused: u32,
    pub gap_inner: u32,
    pub gap_outer: u32,
    pub keybindings: Vec<KeyBinding>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            border_width: Self::DEFAULT_BORDER_WIDTH,
            border_focused: Self::DEFAULT_BORDER_FOCUSED,
            border_unfocused: Self::DEFAULT_BORDER_UNFOCUSED,
            gap_inner: Self::DEFAULT_GAP_INNER,
            gap_outer: Self::DEFAULT_GAP_OUTER,
            keybindings: Vec::new(),
        }
    }
}

impl Configuration {
    #[inline]
    pub fn border_color(
        &self,
        focused: bool,
    ) -> u32 {
        if focused {
            self.border_focused
        } else {
            self.border_unfocused
        }
    }

    pub fn binding_for(
        &self,
        key_code: KeyCode,
    ) -> Option<&KeyBinding> {
        self.keybindings
            .iter()
            .find(|binding| binding.key_code == key_code)
    }

    /// Interprets a TOML document. Individual malformed values fall back to
    /// their defaults with a warning; syntax errors, duplicate keybindings
    /// and out-of-range numbers reject the document as a whole.
    pub fn parse(
        content: &str,
        keymap: &KeyMap,
    ) -> Result<Self, ConfigError> {
        let document: Table = content.parse()?;
        let mut config = Self::default();

        for (key, value) in document.iter() {
            match (key.as_str(), value) {
                ("appearance", Value::Table(table)) => config.read_appearance(table)?,
                ("gaps", Value::Table(table)) => config.read_gaps(table)?,
                ("keybindings", Value::Table(table)) => config.read_keybindings(table, keymap)?,
                ("appearance", _) | ("gaps", _) | ("keybindings", _) => {
                    warn!("ignoring [{}]: expected a table", key)
                },
                _ => warn!("ignoring unknown configuration key {}", key),
            }
        }

        Ok(config)
    }

    fn read_appearance(
        &mut self,
        table: &Table,
    ) -> Result<(), ConfigError> {
        for (key, value) in table.iter() {
            let path = format!("appearance.{}", key);

            match key.as_str() {
                "border_width" => {
                    self.border_width = read_dimension(&path, value, Self::DEFAULT_BORDER_WIDTH)?
                },
                "border_focused" => {
                    self.border_focused = read_color(&path, value, Self::DEFAULT_BORDER_FOCUSED)?
                },
                "border_unfocused" => {
                    self.border_unfocused =
                        read_color(&path, value, Self::DEFAULT_BORDER_UNFOCUSED)?
                },
                _ => warn!("ignoring unknown configuration key {}", path),
            }
        }

        Ok(())
    }

    fn read_gaps(
        &mut self,
        table: &Table,
    ) -> Result<(), ConfigError> {
        for (key, value) in table.iter() {
            let path = format!("gaps.{}", key);

            match key.as_str() {
                "inner" => self.gap_inner = read_dimension(&path, value, Self::DEFAULT_GAP_INNER)?,
                "outer" => self.gap_outer = read_dimension(&path, value, Self::DEFAULT_GAP_OUTER)?,
                _ => warn!("ignoring unknown configuration key {}", path),
            }
        }

        Ok(())
    }

    fn read_keybindings(
        &mut self,
        table: &Table,
        keymap: &KeyMap,
    ) -> Result<(), ConfigError> {
        for (kind, bindings) in table.iter() {
            let bindings = match (kind.as_str(), bindings) {
                ("exec", Value::Table(bindings)) | ("action", Value::Table(bindings)) => bindings,
                _ => {
                    warn!("ignoring keybindings.{}: expected exec or action table", kind);
                    continue;
                },
            };

            for (name, value) in bindings.iter() {
                let action = match (kind.as_str(), value) {
                    ("exec", Value::String(cmd)) => Action::Exec(cmd.to_owned()),
                    ("action", Value::String(action)) => match Action::try_from(action.as_str()) {
                        Ok(action) => action,
                        Err(err) => {
                            warn!("ignoring keybinding {}: {}", name, err);
                            continue;
                        },
                    },
                    _ => {
                        warn!("ignoring keybinding {}: expected a string", name);
                        continue;
                    },
                };

                let key_code = match parse_key_binding(name, keymap) {
                    Ok(key_code) => key_code,
                    Err(err) => {
                        warn!("ignoring keybinding {}: {}", name, err);
                        continue;
                    },
                };

                if let Some(existing) = self.binding_for(key_code) {
                    return Err(ConfigError::DuplicateKeybinding {
                        binding: if existing.name == *name {
                            name.to_owned()
                        } else {
                            format!("{} (same as {})", name, existing.name)
                        },
                    });
                }

                self.keybindings.push(KeyBinding {
                    name: name.to_owned(),
                    key_code,
                    action,
                });
            }
        }

        Ok(())
    }
}

/// Resolves `Mod+Mod+Key` to the modifier mask and keycode it grabs.
pub fn parse_key_binding(
    binding: &str,
    keymap: &KeyMap,
) -> winsys::Result<KeyCode> {
    let mut constituents: Vec<&str> = binding.split('+').map(str::trim).collect();

    let key = match constituents.pop() {
        Some(key) if !key.is_empty() => key,
        _ => return Err(anyhow!("missing key name")),
    };

    let code = *keymap
        .get(key)
        .ok_or_else(|| anyhow!("unable to resolve \"{}\" to a keycode", key))?;

    let mask = constituents.into_iter().try_fold(0u16, |mask, modifier| {
        Modifier::try_from(modifier).map(|modifier| mask | u16::from(modifier))
    })?;

    // key presses are matched with lock modifiers stripped
    let clean = clean_mask(mask);
    if clean != mask {
        debug!("ignoring lock modifiers in keybinding {}", binding);
    }

    Ok(KeyCode {
        mask: clean,
        code,
    })
}

fn read_dimension(
    key: &str,
    value: &Value,
    default: u32,
) -> Result<u32, ConfigError> {
    match value {
        Value::Integer(value) if (0..=Configuration::MAX_DIMENSION).contains(value) => {
            Ok(*value as u32)
        },
        Value::Integer(value) => Err(ConfigError::OutOfRange {
            key: key.to_owned(),
            value: *value,
        }),
        _ => {
            warn!("{} must be a non-negative integer, using default {}", key, default);
            Ok(default)
        },
    }
}

fn read_color(
    key: &str,
    value: &Value,
    default: u32,
) -> Result<u32, ConfigError> {
    match value {
        Value::Integer(value) if (0..=Configuration::MAX_COLOR).contains(value) => {
            Ok(*value as u32)
        },
        Value::Integer(value) => Err(ConfigError::OutOfRange {
            key: key.to_owned(),
            value: *value,
        }),
        Value::String(color) => Ok(parse_color(color).unwrap_or_else(|| {
            warn!("{} has malformed color \"{}\", using default {:#08x}", key, color, default);
            default
        })),
        _ => {
            warn!("{} must be a color, using default {:#08x}", key, default);
            Ok(default)
        },
    }
}

/// Accepts `#RRGGBB`, `0xRRGGBB` and bare `RRGGBB`.
fn parse_color(color: &str) -> Option<u32> {
    let digits = color
        .strip_prefix('#')
        .or_else(|| color.strip_prefix("0x"))
        .or_else(|| color.strip_prefix("0X"))
        .unwrap_or(color);

    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    u32::from_str_radix(digits, 16).ok()
}

/// `$XDG_CONFIG_HOME/hana/config.toml`, else `$HOME/.config/hana/config.toml`.
pub fn config_path(
    xdg_config_home: Option<OsString>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    xdg_config_home
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|home| home.join(".config")))
        .map(|config_home| config_home.join(WM_NAME!()).join("config.toml"))
}

/// Where configuration snapshots come from. Loaded at startup and again on
/// every reload request.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    path: Option<PathBuf>,
}

impl ConfigSource {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
        }
    }

    pub fn from_environment() -> Self {
        let home = std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir);

        Self::new(config_path(std::env::var_os("XDG_CONFIG_HOME"), home))
    }

    /// A missing file yields the defaults.
    pub fn load(
        &self,
        keymap: &KeyMap,
    ) -> Result<Configuration, ConfigError> {
        let path = match self.path {
            Some(ref path) => path,
            None => {
                info!("no configuration directory available, using defaults");
                return Ok(Configuration::default());
            },
        };

        match fs::read_to_string(path) {
            Ok(content) => {
                let config = Configuration::parse(&content, keymap)?;
                info!("configuration loaded from {}", path.display());
                debug!("{:?}", config);

                Ok(config)
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("no configuration at {}, using defaults", path.display());
                Ok(Configuration::default())
            },
            Err(source) => Err(ConfigError::Io {
                path: path.to_owned(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    fn keymap() -> KeyMap {
        vec![("Return", 36), ("q", 24), ("x", 53), ("F1", 67)]
            .into_iter()
            .map(|(name, code)| (name.to_owned(), code))
            .collect()
    }

    fn load(content: &str) -> Result<Configuration, ConfigError> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();

        ConfigSource::new(Some(path)).load(&keymap())
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let source = ConfigSource::new(Some(dir.path().join("absent.toml")));

        assert_eq!(source.load(&keymap()).unwrap(), Configuration::default());
    }

    #[test]
    fn reads_every_recognized_key() {
        let config = load(
            r##"
            [appearance]
            border_width = 4
            border_focused = "#ff0000"
            border_unfocused = 0x00ff00

            [gaps]
            inner = 5
            outer = 10

            [keybindings.exec]
            "Super+Return" = "xterm"

            [keybindings.action]
            "Super+Shift+q" = "close"
            "##,
        )
        .unwrap();

        assert_eq!(config.border_width, 4);
        assert_eq!(config.border_focused, 0xff0000);
        assert_eq!(config.border_unfocused, 0x00ff00);
        assert_eq!(config.gap_inner, 5);
        assert_eq!(config.gap_outer, 10);
        assert_eq!(config.keybindings.len(), 2);

        let super_mask = u16::from(Modifier::Super);
        let shift_mask = u16::from(Modifier::Shift);

        assert_eq!(config.keybindings[0].key_code, KeyCode {
            mask: super_mask,
            code: 36,
        });
        assert_eq!(config.keybindings[0].action, Action::Exec("xterm".to_owned()));
        assert_eq!(config.keybindings[1].key_code, KeyCode {
            mask: super_mask | shift_mask,
            code: 24,
        });
        assert_eq!(config.keybindings[1].action, Action::CloseFocused);
    }

    #[test]
    fn malformed_border_width_falls_back_to_default() {
        let config = load("[appearance]\nborder_width = \"abc\"\n").unwrap();

        assert_eq!(config.border_width, Configuration::DEFAULT_BORDER_WIDTH);
    }

    #[test]
    fn malformed_color_falls_back_to_default() {
        let config = load("[appearance]\nborder_focused = \"#12345g\"\n").unwrap();

        assert_eq!(config.border_focused, Configuration::DEFAULT_BORDER_FOCUSED);
    }

    #[test]
    fn unparseable_document_is_rejected() {
        assert!(matches!(
            load("[appearance\nborder_width = 2"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn out_of_range_values_reject_the_load() {
        assert!(matches!(
            load("[gaps]\nouter = -1\n"),
            Err(ConfigError::OutOfRange { value: -1, .. })
        ));
        assert!(matches!(
            load("[appearance]\nborder_width = 70000\n"),
            Err(ConfigError::OutOfRange { value: 70000, .. })
        ));
        assert!(matches!(
            load("[appearance]\nborder_focused = 0x1000000\n"),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn duplicate_keybinding_is_rejected() {
        let duplicated = r#"
            [keybindings.exec]
            "Super+Return" = "xterm"
            "Shift+Mod4+Return" = "urxvt"
            "Mod4+Return" = "st"
        "#;

        assert!(matches!(
            load(duplicated),
            Err(ConfigError::DuplicateKeybinding { .. })
        ));

        let deduplicated = r#"
            [keybindings.exec]
            "Super+Return" = "xterm"
            "Shift+Mod4+Return" = "urxvt"
        "#;

        assert_eq!(load(deduplicated).unwrap().keybindings.len(), 2);
    }

    #[test]
    fn duplicates_are_detected_across_binding_kinds() {
        let config = r#"
            [keybindings.exec]
            "Alt+x" = "xterm"

            [keybindings.action]
            "Mod1+x" = "reload"
        "#;

        assert!(matches!(
            load(config),
            Err(ConfigError::DuplicateKeybinding { .. })
        ));
    }

    #[test]
    fn lock_modifiers_are_dropped_from_bindings() {
        let config = load("[keybindings.action]\n\"Mod2+Lock+x\" = \"close\"\n").unwrap();

        assert_eq!(config.keybindings[0].key_code, KeyCode {
            mask: 0,
            code: 53,
        });

        let shadowed = r#"
            [keybindings.exec]
            "x" = "xterm"

            [keybindings.action]
            "Mod2+x" = "close"
        "#;

        assert!(matches!(
            load(shadowed),
            Err(ConfigError::DuplicateKeybinding { .. })
        ));
    }

    #[test]
    fn unresolvable_bindings_are_skipped() {
        let config = load(
            r#"
            [keybindings.exec]
            "Hyper+Return" = "xterm"
            "Super+NoSuchKey" = "xterm"
            "Super+F1" = 3

            [keybindings.action]
            "Super+q" = "explode"
            "Super+x" = "focus_next"
            "#,
        )
        .unwrap();

        assert_eq!(config.keybindings.len(), 1);
        assert_eq!(config.keybindings[0].action, Action::FocusNext);
    }

    #[test]
    fn binding_lookup_uses_declaration_order() {
        let config = load(
            r#"
            [keybindings.action]
            "Super+x" = "focus_previous"
            "Super+q" = "reload"
            "#,
        )
        .unwrap();

        let key_code = KeyCode {
            mask: u16::from(Modifier::Super),
            code: 24,
        };

        assert_eq!(config.binding_for(key_code).map(|b| &b.action), Some(&Action::Reload));
        assert_eq!(config.keybindings[0].name, "Super+x");
    }

    #[test]
    fn parses_color_notations() {
        assert_eq!(parse_color("#e78a53"), Some(0xe78a53));
        assert_eq!(parse_color("0x333333"), Some(0x333333));
        assert_eq!(parse_color("FFFFFF"), Some(0xffffff));
        assert_eq!(parse_color("#fff"), None);
        assert_eq!(parse_color("red"), None);
    }

    #[test]
    fn config_path_prefers_xdg_config_home() {
        assert_eq!(
            config_path(Some("/xdg".into()), Some(PathBuf::from("/home/u"))),
            Some(PathBuf::from("/xdg/hana/config.toml"))
        );
        assert_eq!(
            config_path(Some("".into()), Some(PathBuf::from("/home/u"))),
            Some(PathBuf::from("/home/u/.config/hana/config.toml"))
        );
        assert_eq!(config_path(None, None), None);
    }
}
