use crate::config::Configuration;
use crate::registry::ManagedWindow;

use winsys::geometry::Region;

#[macro_export]
macro_rules! WM_NAME (
    () => { "hana" };
);

impl ManagedWindow {
    /// Geometry recorded for a window whose geometry query failed.
    pub const FALLBACK_REGION: Region = Region::new(0, 0, 480, 260);
}

impl Configuration {
    pub const DEFAULT_BORDER_WIDTH: u32 = 2;
    pub const DEFAULT_BORDER_FOCUSED: u32 = 0xe78a53;
    pub const DEFAULT_BORDER_UNFOCUSED: u32 = 0x333333;
    pub const DEFAULT_GAP_INNER: u32 = 0;
    pub const DEFAULT_GAP_OUTER: u32 = 0;

    /// Largest integer accepted for a pixel count (an X11 CARD16).
    pub const MAX_DIMENSION: i64 = 65535;
    pub const MAX_COLOR: i64 = 0xffffff;
}
