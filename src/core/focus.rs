use crate::config::Action;
use crate::model::Model;
use crate::util::Util;

use winsys::event::Event;
use winsys::input::KeyCode;
use winsys::input::MouseEvent;
use winsys::input::MouseEventKind;
use winsys::window::Window;

impl<'a> Model<'a> {
    pub(crate) fn handle_focus_input(
        &mut self,
        event: Event,
    ) {
        match event {
            Event::Enter {
                window,
            } => self.handle_enter(window),
            Event::FocusIn {
                window,
            } => self.handle_focus_in(window),
            Event::Key {
                key_code,
            } => self.handle_key(key_code),
            Event::KeyRelease {
                key_code,
            } => trace!("KEY_RELEASE for keycode {}", key_code.code),
            Event::Mouse {
                event,
            } => self.handle_mouse(event),
            _ => {},
        }
    }

    /// Makes `window` the single focused window. Only windows whose focus
    /// state actually changes get their border recolored.
    pub fn focus(
        &mut self,
        window: Window,
    ) {
        if !self.registry.contains(window) {
            debug!("not focusing unmanaged window {:#0x}", window);
            return;
        }

        let changed: Vec<(Window, bool)> = self
            .registry
            .iter_mut()
            .filter_map(|managed| {
                let focused = managed.id() == window;

                if managed.set_focused(focused) {
                    Some((managed.id(), focused))
                } else {
                    None
                }
            })
            .collect();

        for (id, focused) in changed {
            attempt!(
                self.conn
                    .set_window_border_color(id, self.config.border_color(focused)),
                "set border color of window {:#0x}",
                id
            );
        }

        if self.focus != Some(window) {
            info!("focusing window {:#0x}", window);
        }

        self.focus = Some(window);

        attempt!(
            self.conn.focus_window(window),
            "focus window {:#0x}",
            window
        );
    }

    fn handle_enter(
        &mut self,
        window: Window,
    ) {
        debug!("ENTER_NOTIFY for window {:#0x}", window);

        if window != self.root {
            self.focus(window);
        }
    }

    /// Keeps focus state in sync when a client grabs focus on its own.
    fn handle_focus_in(
        &mut self,
        window: Window,
    ) {
        debug!("FOCUS_IN for window {:#0x}", window);

        if Some(window) != self.focus && self.registry.contains(window) {
            self.focus(window);
        }
    }

    fn handle_key(
        &mut self,
        key_code: KeyCode,
    ) {
        debug!("KEY_PRESS for keycode {} (mask {:#06x})", key_code.code, key_code.mask);

        let action = match self.config.binding_for(key_code) {
            Some(binding) => binding.action.clone(),
            None => {
                debug!("no binding for {}", key_code.describe(u16::from));
                return;
            },
        };

        self.execute(action);
    }

    fn handle_mouse(
        &mut self,
        event: MouseEvent,
    ) {
        match event.kind {
            MouseEventKind::Press => {
                debug!(
                    "BUTTON_PRESS at {:?} over {:?}",
                    event.root_rpos.values(),
                    event.window
                );

                if let Some(window) = event.window {
                    self.focus(window);

                    attempt!(
                        self.conn.stack_window_above(window),
                        "raise window {:#0x}",
                        window
                    );
                }

                attempt!(self.conn.replay_pointer(event.time), "replay pointer event");
                self.conn.flush();
            },
            MouseEventKind::Release | MouseEventKind::Motion => {
                attempt!(self.conn.release_pointer(event.time), "release pointer");
            },
        }
    }

    pub fn execute(
        &mut self,
        action: Action,
    ) {
        match action {
            Action::Exec(cmd) => {
                info!("spawning \"{}\"", cmd);

                if let Err(err) = Util::spawn_shell(&cmd) {
                    warn!("unable to spawn \"{}\": {}", cmd, err);
                }
            },
            Action::CloseFocused => self.kill_focus(),
            Action::Reload => self.reload_config(),
            Action::FocusNext | Action::FocusPrevious => {
                debug!("focus cycling is not available");
            },
        }
    }

    pub fn kill_focus(&mut self) {
        if let Some(focus) = self.focus {
            info!("closing window {:#0x}", focus);
            attempt!(self.conn.destroy_window(focus), "destroy window {:#0x}", focus);
        }
    }
}
