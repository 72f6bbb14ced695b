use crate::config::ConfigSource;
use crate::config::Configuration;
use crate::registry::WindowRegistry;
use crate::signal;

use winsys::connection::Connection;
use winsys::input::KeyMap;
use winsys::window::Window;

use std::sync::atomic::AtomicBool;

pub struct Model<'a> {
    pub(crate) conn: &'a dyn Connection,
    pub(crate) root: Window,
    pub(crate) config: Configuration,
    pub(crate) source: ConfigSource,
    pub(crate) keymap: KeyMap,
    pub(crate) registry: WindowRegistry,
    pub(crate) focus: Option<Window>,
    reload_requested: &'a AtomicBool,
    running: bool,
}

impl<'a> Model<'a> {
    pub fn new(
        conn: &'a dyn Connection,
        source: ConfigSource,
        reload_requested: &'a AtomicBool,
    ) -> Self {
        let keymap = conn.keymap().unwrap_or_else(|err| {
            warn!("unable to read keyboard mapping, keybindings are disabled: {}", err);
            KeyMap::new()
        });

        let config = source.load(&keymap).unwrap_or_else(|err| {
            warn!("falling back to default configuration: {}", err);
            Configuration::default()
        });

        Self::init(Self {
            conn,
            root: conn.root(),
            config,
            source,
            keymap,
            registry: WindowRegistry::new(),
            focus: None,
            reload_requested,
            running: true,
        })
    }

    fn init(mut model: Self) -> Self {
        info!("initializing window manager on root window {:#0x}", model.root);

        model.grab_bindings();

        model
            .conn
            .top_level_windows()
            .into_iter()
            .for_each(|window| {
                debug!("adopting existing window {:#0x}", window);
                model.manage(window);
            });

        model.conn.flush();
        model
    }

    /// Processes events until the display connection goes away.
    pub fn run(&mut self) {
        while self.running {
            self.poll_reload();

            match self.conn.step() {
                Ok(Some(event)) => {
                    trace!("received event: {:?}", event);
                    self.dispatch(event);
                },
                Ok(None) => {},
                Err(err) => {
                    info!("display connection closed: {}", err);
                    self.exit();
                },
            }

            self.conn.flush();
        }

        self.conn.cleanup();
    }

    fn poll_reload(&mut self) {
        if signal::take_request(self.reload_requested) {
            self.reload_config();
        }
    }

    /// Swaps in a freshly loaded configuration. A configuration that fails
    /// to load leaves the current one untouched.
    pub fn reload_config(&mut self) {
        info!("reloading configuration");

        match self.source.load(&self.keymap) {
            Ok(config) => {
                self.config = config;
                self.grab_bindings();
                self.redraw_borders();
            },
            Err(err) => warn!("keeping current configuration: {}", err),
        }
    }

    fn redraw_borders(&self) {
        for window in self.registry.iter() {
            let id = window.id();
            let color = self.config.border_color(window.is_focused());

            attempt!(
                self.conn.set_window_border_width(id, self.config.border_width),
                "set border width of window {:#0x}",
                id
            );
            attempt!(
                self.conn.set_window_border_color(id, color),
                "set border color of window {:#0x}",
                id
            );
        }
    }

    #[inline]
    pub fn focused_window(&self) -> Option<Window> {
        self.focus
    }

    #[inline]
    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    #[inline]
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn exit(&mut self) {
        info!("exiting window manager");
        self.running = false;
    }
}
