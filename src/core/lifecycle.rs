use crate::model::Model;
use crate::registry::ManagedWindow;

use winsys::event::Event;
use winsys::geometry::Dim;
use winsys::geometry::Pos;
use winsys::geometry::Region;
use winsys::window::Window;
use winsys::window::WindowProperties;

impl<'a> Model<'a> {
    pub(crate) fn handle_lifecycle(
        &mut self,
        event: Event,
    ) {
        match event {
            Event::MapRequest {
                window,
            } => self.handle_map_request(window),
            Event::ConfigureRequest {
                window,
                pos,
                dim,
            } => self.handle_configure_request(window, pos, dim),
            Event::Destroy {
                window,
            } => self.handle_destroy(window),
            _ => {},
        }
    }

    /// The single region every window is placed in: the screen minus the
    /// outer gap, shrunk so that the border fits as well.
    pub fn placement_region(&self) -> Region {
        self.conn
            .screen_region()
            .inset(self.config.gap_outer)
            .without_border(self.config.border_width)
    }

    /// Brings a window under management. Decoration is applied before the
    /// window is mapped so its first frame is already correct.
    pub(crate) fn manage(
        &mut self,
        window: Window,
    ) {
        if self.registry.contains(window) {
            attempt!(self.conn.map_window(window), "map window {:#0x}", window);
            return;
        }

        let geometry = self.conn.get_window_geometry(window).unwrap_or_else(|err| {
            warn!("unable to query geometry of window {:#0x}: {}", window, err);
            ManagedWindow::FALLBACK_REGION
        });

        let properties = self
            .conn
            .get_window_properties(window)
            .unwrap_or_else(|err| {
                warn!("unable to query properties of window {:#0x}: {}", window, err);
                WindowProperties::default()
            });

        info!(
            "managing window {:#0x} [name: \"{}\", class: \"{}\"] at {}",
            window,
            properties.name(),
            properties.class(),
            geometry
        );

        self.registry
            .insert(ManagedWindow::new(window, geometry, properties));

        attempt!(
            self.conn
                .set_window_border_width(window, self.config.border_width),
            "set border width of window {:#0x}",
            window
        );
        attempt!(
            self.conn
                .set_window_border_color(window, self.config.border_unfocused),
            "set border color of window {:#0x}",
            window
        );
        attempt!(
            self.conn.init_window(window),
            "select input on window {:#0x}",
            window
        );
        attempt!(self.conn.map_window(window), "map window {:#0x}", window);
    }

    fn handle_map_request(
        &mut self,
        window: Window,
    ) {
        debug!("MAP_REQUEST for window {:#0x}", window);
        self.manage(window);
    }

    /// Client geometry requests are acknowledged but not honored: the window
    /// is forced into the placement region and told so.
    fn handle_configure_request(
        &mut self,
        window: Window,
        pos: Option<Pos>,
        dim: Option<Dim>,
    ) {
        debug!(
            "CONFIGURE_REQUEST for window {:#0x} (pos: {:?}, dim: {:?})",
            window, pos, dim
        );

        let region = self.placement_region();

        attempt!(
            self.conn.place_window(window, &region),
            "place window {:#0x}",
            window
        );
        attempt!(
            self.conn
                .send_configure_notify(window, &region, self.config.border_width),
            "notify window {:#0x} of its geometry",
            window
        );

        if let Some(managed) = self.registry.get_mut(window) {
            debug!("moving window {:#0x} from {} to {}", window, managed.geometry(), region);
            managed.set_geometry(region);
        }
    }

    fn handle_destroy(
        &mut self,
        window: Window,
    ) {
        debug!("DESTROY_NOTIFY for window {:#0x}", window);

        if let Some(managed) = self.registry.remove(window) {
            info!(
                "unmanaging window {:#0x} [name: \"{}\", class: \"{}\"]",
                window,
                managed.properties().name(),
                managed.properties().class()
            );
        }

        if self.focus == Some(window) {
            self.focus = None;
        }
    }
}
