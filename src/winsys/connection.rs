use crate::event::Event;
use crate::geometry::Region;
use crate::input::KeyCode;
use crate::input::KeyMap;
use crate::window::Window;
use crate::window::WindowProperties;
use crate::Result;

/// Every request the window manager sends to the display goes through this
/// trait. Implementations log nothing themselves: failures are returned and
/// callers decide whether they matter.
pub trait Connection {
    fn root(&self) -> Window;
    fn screen_region(&self) -> Region;

    fn flush(&self) -> bool;

    /// Blocks until the next event arrives. `Ok(None)` is an event the
    /// window manager does not handle, or a wait cut short by a signal; an
    /// error means the connection is gone and no further events will follow.
    fn step(&self) -> Result<Option<Event>>;

    fn keymap(&self) -> Result<KeyMap>;
    fn top_level_windows(&self) -> Vec<Window>;
    fn cleanup(&self);

    // Window queries
    fn get_window_geometry(
        &self,
        window: Window,
    ) -> Result<Region>;
    fn get_window_properties(
        &self,
        window: Window,
    ) -> Result<WindowProperties>;

    // Window manipulation
    fn init_window(
        &self,
        window: Window,
    ) -> Result<()>;
    fn map_window(
        &self,
        window: Window,
    ) -> Result<()>;
    fn destroy_window(
        &self,
        window: Window,
    ) -> Result<()>;
    fn place_window(
        &self,
        window: Window,
        region: &Region,
    ) -> Result<()>;
    fn stack_window_above(
        &self,
        window: Window,
    ) -> Result<()>;
    fn focus_window(
        &self,
        window: Window,
    ) -> Result<()>;
    fn set_window_border_width(
        &self,
        window: Window,
        width: u32,
    ) -> Result<()>;
    fn set_window_border_color(
        &self,
        window: Window,
        color: u32,
    ) -> Result<()>;
    fn send_configure_notify(
        &self,
        window: Window,
        region: &Region,
        border_width: u32,
    ) -> Result<()>;

    // Input
    fn grab_key(
        &self,
        key_code: KeyCode,
    ) -> Result<()>;
    fn ungrab_keys(&self) -> Result<()>;
    fn replay_pointer(
        &self,
        time: u32,
    ) -> Result<()>;
    fn release_pointer(
        &self,
        time: u32,
    ) -> Result<()>;
}
