use crate::connection::Connection;
use crate::error::StartupError;
use crate::event::Event;
use crate::event::EventKind;
use crate::geometry::Dim;
use crate::geometry::Pos;
use crate::geometry::Region;
use crate::input::KeyCode;
use crate::input::KeyMap;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crate::window::Window;
use crate::window::WindowProperties;
use crate::xdata::input::clean_mask;
use crate::xdata::input::lock_variants;
use crate::xdata::util::Util;
use crate::Result;

use nix::errno::Errno;
use nix::poll::ppoll;
use nix::poll::PollFd;
use nix::poll::PollFlags;
use nix::sys::signal::SigSet;

use std::os::unix::io::BorrowedFd;

use x11rb::connection;
use x11rb::errors::ReplyError;
use x11rb::protocol::xproto;
use x11rb::protocol::xproto::ConnectionExt;
use x11rb::protocol::xproto::EventMask;
use x11rb::protocol::xproto::ModMask;
use x11rb::protocol::ErrorKind;
use x11rb::protocol::Event as XEvent;
use x11rb::rust_connection::RustConnection;

type Atom = u32;

x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        UTF8_STRING,
        _NET_WM_NAME,
        _NET_WM_WINDOW_TYPE,
    }
}

/// Opens the display named by `$DISPLAY`, returning the connection and the
/// number of its default screen.
pub fn connect() -> std::result::Result<(RustConnection, usize), StartupError> {
    x11rb::connect(None).map_err(|err| StartupError::Connection(err.to_string()))
}

pub fn default_screen<Conn: connection::Connection>(
    conn: &Conn,
    screen_num: usize,
) -> std::result::Result<xproto::Screen, StartupError> {
    conn.setup()
        .roots
        .get(screen_num)
        .cloned()
        .ok_or(StartupError::ScreenUnavailable)
}

/// Selects `mask` on the root window through a checked request. The server
/// grants substructure redirection to a single client, so an access error
/// means another window manager holds it.
pub fn become_window_manager<Conn: connection::Connection>(
    conn: &Conn,
    root: Window,
    mask: EventMask,
) -> std::result::Result<(), StartupError> {
    let aux = xproto::ChangeWindowAttributesAux::default().event_mask(mask);

    let cookie = conn
        .change_window_attributes(root, &aux)
        .map_err(|err| StartupError::Setup(err.to_string()))?;

    match cookie.check() {
        Ok(()) => Ok(()),
        Err(ReplyError::X11Error(err)) if err.error_kind == ErrorKind::Access => {
            Err(StartupError::AnotherManagerRunning)
        },
        Err(err) => Err(StartupError::Setup(err.to_string())),
    }
}

/// Blocks until `fd` has input. Signals the caller keeps blocked are let
/// through for the duration of the wait only; `false` means one of them
/// cut it short.
pub fn wait_readable(fd: BorrowedFd) -> Result<bool> {
    let mut fds = [PollFd::new(fd, PollFlags::POLLIN)];

    match ppoll(&mut fds, None, Some(SigSet::empty())) {
        Ok(_) => Ok(true),
        Err(Errno::EINTR) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

pub struct XConnection<'conn, Conn: connection::Connection> {
    conn: &'conn Conn,
    stream: BorrowedFd<'conn>,
    atoms: Atoms,
    screen: xproto::Screen,
    window_event_mask: EventMask,
    button_event_mask: EventMask,
}

impl<'conn, Conn: connection::Connection> XConnection<'conn, Conn> {
    /// `stream` is the socket underlying `conn`, waited on between events.
    pub fn new(
        conn: &'conn Conn,
        stream: BorrowedFd<'conn>,
        screen_num: usize,
    ) -> std::result::Result<Self, StartupError> {
        let screen = default_screen(conn, screen_num)?;

        let root_event_mask: EventMask = EventMask::SUBSTRUCTURE_REDIRECT
            | EventMask::SUBSTRUCTURE_NOTIFY
            | EventMask::FOCUS_CHANGE;

        become_window_manager(conn, screen.root, root_event_mask)?;

        let atoms = Atoms::new(conn)
            .map_err(|err| StartupError::Setup(err.to_string()))?
            .reply()
            .map_err(|err| StartupError::Setup(err.to_string()))?;

        let window_event_mask: EventMask = EventMask::ENTER_WINDOW | EventMask::FOCUS_CHANGE;
        let button_event_mask: EventMask = EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE;

        Ok(Self {
            conn,
            stream,
            atoms,
            screen,
            window_event_mask,
            button_event_mask,
        })
    }

    fn get_string_property(
        &self,
        window: Window,
        property: Atom,
        type_: Atom,
    ) -> Option<String> {
        self.conn
            .get_property(false, window, property, type_, 0, u32::MAX)
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .filter(|reply| reply.format == 8 && !reply.value.is_empty())
            .map(|reply| String::from_utf8_lossy(&reply.value).into_owned())
    }

    fn get_window_name(
        &self,
        window: Window,
    ) -> Option<String> {
        self.get_string_property(window, self.atoms._NET_WM_NAME, self.atoms.UTF8_STRING)
            .or_else(|| {
                self.get_string_property(
                    window,
                    xproto::AtomEnum::WM_NAME.into(),
                    xproto::AtomEnum::ANY.into(),
                )
            })
    }

    /// `WM_CLASS` holds the instance and class names as two consecutive
    /// NUL-terminated strings; the class is the second one.
    fn get_window_class(
        &self,
        window: Window,
    ) -> Option<String> {
        self.get_string_property(
            window,
            xproto::AtomEnum::WM_CLASS.into(),
            xproto::AtomEnum::STRING.into(),
        )
        .and_then(|value| {
            value
                .split('\0')
                .nth(1)
                .filter(|class| !class.is_empty())
                .map(|class| class.to_owned())
        })
    }

    fn get_window_type(
        &self,
        window: Window,
    ) -> Option<String> {
        let type_ = self
            .conn
            .get_property(
                false,
                window,
                self.atoms._NET_WM_WINDOW_TYPE,
                xproto::AtomEnum::ATOM,
                0,
                u32::MAX,
            )
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .and_then(|reply| reply.value32().and_then(|mut types| types.next()))?;

        self.conn
            .get_atom_name(type_)
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .and_then(|reply| String::from_utf8(reply.name).ok())
    }

    fn window_is_adoptable(
        &self,
        window: Window,
    ) -> bool {
        self.conn
            .get_window_attributes(window)
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .map_or(false, |attrs| {
                !attrs.override_redirect && attrs.map_state == xproto::MapState::VIEWABLE
            })
    }

    #[inline]
    fn pointer_target(
        &self,
        event: Window,
        child: Window,
    ) -> Option<Window> {
        if event == self.screen.root || event == x11rb::NONE {
            if child == x11rb::NONE {
                None
            } else {
                Some(child)
            }
        } else {
            Some(event)
        }
    }

    #[inline]
    fn on_map_request(
        &self,
        event: &xproto::MapRequestEvent,
    ) -> Option<Event> {
        Some(Event::MapRequest {
            window: event.window,
        })
    }

    fn on_configure_request(
        &self,
        event: &xproto::ConfigureRequestEvent,
    ) -> Option<Event> {
        let value_mask = u16::from(event.value_mask);
        let has = |flag: xproto::ConfigWindow| value_mask & u16::from(flag) != 0;

        let pos = if has(xproto::ConfigWindow::X) || has(xproto::ConfigWindow::Y) {
            Some(Pos {
                x: event.x as i32,
                y: event.y as i32,
            })
        } else {
            None
        };

        let dim = if has(xproto::ConfigWindow::WIDTH) || has(xproto::ConfigWindow::HEIGHT) {
            Some(Dim {
                w: event.width as u32,
                h: event.height as u32,
            })
        } else {
            None
        };

        Some(Event::ConfigureRequest {
            window: event.window,
            pos,
            dim,
        })
    }

    #[inline]
    fn on_destroy_notify(
        &self,
        event: &xproto::DestroyNotifyEvent,
    ) -> Option<Event> {
        Some(Event::Destroy {
            window: event.window,
        })
    }

    #[inline]
    fn on_enter_notify(
        &self,
        event: &xproto::EnterNotifyEvent,
    ) -> Option<Event> {
        if event.mode != xproto::NotifyMode::NORMAL {
            return None;
        }

        Some(Event::Enter {
            window: event.event,
        })
    }

    #[inline]
    fn on_focus_in(
        &self,
        event: &xproto::FocusInEvent,
    ) -> Option<Event> {
        // grab activation moves focus temporarily
        if event.mode == xproto::NotifyMode::GRAB || event.mode == xproto::NotifyMode::UNGRAB {
            return None;
        }

        Some(Event::FocusIn {
            window: event.event,
        })
    }

    #[inline]
    fn on_key_press(
        &self,
        event: &xproto::KeyPressEvent,
    ) -> Option<Event> {
        Some(Event::Key {
            key_code: KeyCode {
                mask: clean_mask(u16::from(event.state)),
                code: event.detail,
            },
        })
    }

    #[inline]
    fn on_key_release(
        &self,
        event: &xproto::KeyReleaseEvent,
    ) -> Option<Event> {
        Some(Event::KeyRelease {
            key_code: KeyCode {
                mask: clean_mask(u16::from(event.state)),
                code: event.detail,
            },
        })
    }

    fn on_button(
        &self,
        kind: MouseEventKind,
        event: &xproto::ButtonPressEvent,
    ) -> Option<Event> {
        Some(Event::Mouse {
            event: MouseEvent {
                kind,
                window: self.pointer_target(event.event, event.child),
                root_rpos: Pos {
                    x: event.root_x as i32,
                    y: event.root_y as i32,
                },
                time: event.time,
            },
        })
    }

    #[inline]
    fn on_motion_notify(
        &self,
        event: &xproto::MotionNotifyEvent,
    ) -> Option<Event> {
        Some(Event::Mouse {
            event: MouseEvent {
                kind: MouseEventKind::Motion,
                window: self.pointer_target(event.event, event.child),
                root_rpos: Pos {
                    x: event.root_x as i32,
                    y: event.root_y as i32,
                },
                time: event.time,
            },
        })
    }
}

impl<'conn, Conn: connection::Connection> Connection for XConnection<'conn, Conn> {
    #[inline]
    fn root(&self) -> Window {
        self.screen.root
    }

    #[inline]
    fn screen_region(&self) -> Region {
        Region::new(
            0,
            0,
            self.screen.width_in_pixels as u32,
            self.screen.height_in_pixels as u32,
        )
    }

    #[inline]
    fn flush(&self) -> bool {
        self.conn.flush().is_ok()
    }

    fn step(&self) -> Result<Option<Event>> {
        let event = loop {
            if let Some(event) = self.conn.poll_for_event()? {
                break event;
            }

            self.conn.flush()?;

            if !wait_readable(self.stream)? {
                trace!("display wait interrupted by a signal");
                return Ok(None);
            }
        };

        if let XEvent::Error(err) = &event {
            warn!(
                "protocol error {:?} for resource {:#0x} (major opcode {})",
                err.error_kind, err.bad_value, err.major_opcode
            );

            return Ok(None);
        }

        match EventKind::from_response_type(event.raw_response_type()) {
            Some(kind) => trace!("received {:?} event", kind),
            None => return Ok(None),
        }

        Ok(match event {
            XEvent::MapRequest(e) => self.on_map_request(&e),
            XEvent::ConfigureRequest(e) => self.on_configure_request(&e),
            XEvent::DestroyNotify(e) => self.on_destroy_notify(&e),
            XEvent::EnterNotify(e) => self.on_enter_notify(&e),
            XEvent::FocusIn(e) => self.on_focus_in(&e),
            XEvent::KeyPress(e) => self.on_key_press(&e),
            XEvent::KeyRelease(e) => self.on_key_release(&e),
            XEvent::ButtonPress(e) => self.on_button(MouseEventKind::Press, &e),
            XEvent::ButtonRelease(e) => self.on_button(MouseEventKind::Release, &e),
            XEvent::MotionNotify(e) => self.on_motion_notify(&e),
            _ => None,
        })
    }

    fn keymap(&self) -> Result<KeyMap> {
        let setup = self.conn.setup();
        let min_keycode = setup.min_keycode;
        let count = setup
            .max_keycode
            .saturating_sub(min_keycode)
            .saturating_add(1);

        let reply = self
            .conn
            .get_keyboard_mapping(min_keycode, count)?
            .reply()?;

        Ok(Util::keymap_from_keysyms(
            min_keycode,
            reply.keysyms_per_keycode,
            &reply.keysyms,
        ))
    }

    fn top_level_windows(&self) -> Vec<Window> {
        self.conn
            .query_tree(self.screen.root)
            .map_or(Vec::with_capacity(0), |cookie| {
                cookie.reply().map_or(Vec::with_capacity(0), |reply| {
                    reply
                        .children
                        .into_iter()
                        .filter(|&window| self.window_is_adoptable(window))
                        .collect()
                })
            })
    }

    fn cleanup(&self) {
        drop(
            self.conn
                .ungrab_key(xproto::Grab::ANY, self.screen.root, ModMask::ANY),
        );

        drop(self.conn.flush());
    }

    #[inline]
    fn get_window_geometry(
        &self,
        window: Window,
    ) -> Result<Region> {
        Ok(self.conn.get_geometry(window)?.reply().map(|reply| {
            Region::new(
                reply.x as i32,
                reply.y as i32,
                reply.width as u32,
                reply.height as u32,
            )
        })?)
    }

    fn get_window_properties(
        &self,
        window: Window,
    ) -> Result<WindowProperties> {
        Ok(WindowProperties {
            name: self.get_window_name(window),
            class: self.get_window_class(window),
            window_type: self.get_window_type(window),
        })
    }

    fn init_window(
        &self,
        window: Window,
    ) -> Result<()> {
        self.conn
            .change_window_attributes(
                window,
                &xproto::ChangeWindowAttributesAux::default().event_mask(self.window_event_mask),
            )?
            .check()?;

        self.conn.grab_button(
            false,
            window,
            self.button_event_mask,
            xproto::GrabMode::SYNC,
            xproto::GrabMode::ASYNC,
            x11rb::NONE,
            x11rb::NONE,
            xproto::ButtonIndex::ANY,
            ModMask::ANY,
        )?;

        Ok(())
    }

    #[inline]
    fn map_window(
        &self,
        window: Window,
    ) -> Result<()> {
        self.conn.map_window(window)?;
        Ok(())
    }

    #[inline]
    fn destroy_window(
        &self,
        window: Window,
    ) -> Result<()> {
        self.conn.destroy_window(window)?;
        Ok(())
    }

    fn place_window(
        &self,
        window: Window,
        region: &Region,
    ) -> Result<()> {
        self.conn
            .configure_window(
                window,
                &xproto::ConfigureWindowAux::default()
                    .x(region.pos.x)
                    .y(region.pos.y)
                    .width(region.dim.w)
                    .height(region.dim.h),
            )?
            .check()?;

        Ok(())
    }

    #[inline]
    fn stack_window_above(
        &self,
        window: Window,
    ) -> Result<()> {
        self.conn.configure_window(
            window,
            &xproto::ConfigureWindowAux::default().stack_mode(xproto::StackMode::ABOVE),
        )?;

        Ok(())
    }

    #[inline]
    fn focus_window(
        &self,
        window: Window,
    ) -> Result<()> {
        self.conn.set_input_focus(
            xproto::InputFocus::POINTER_ROOT,
            window,
            x11rb::CURRENT_TIME,
        )?;

        Ok(())
    }

    #[inline]
    fn set_window_border_width(
        &self,
        window: Window,
        width: u32,
    ) -> Result<()> {
        self.conn.configure_window(
            window,
            &xproto::ConfigureWindowAux::default().border_width(width),
        )?;

        Ok(())
    }

    #[inline]
    fn set_window_border_color(
        &self,
        window: Window,
        color: u32,
    ) -> Result<()> {
        self.conn.change_window_attributes(
            window,
            &xproto::ChangeWindowAttributesAux::default().border_pixel(color),
        )?;

        Ok(())
    }

    fn send_configure_notify(
        &self,
        window: Window,
        region: &Region,
        border_width: u32,
    ) -> Result<()> {
        let event = xproto::ConfigureNotifyEvent {
            response_type: xproto::CONFIGURE_NOTIFY_EVENT,
            sequence: 0,
            event: window,
            window,
            above_sibling: x11rb::NONE,
            x: region.pos.x as i16,
            y: region.pos.y as i16,
            width: region.dim.w as u16,
            height: region.dim.h as u16,
            border_width: border_width as u16,
            override_redirect: false,
        };

        self.conn
            .send_event(false, window, EventMask::STRUCTURE_NOTIFY, event)?;

        Ok(())
    }

    fn grab_key(
        &self,
        key_code: KeyCode,
    ) -> Result<()> {
        for &locks in lock_variants().iter() {
            self.conn
                .grab_key(
                    false,
                    self.screen.root,
                    ModMask::from(key_code.mask | locks),
                    key_code.code,
                    xproto::GrabMode::ASYNC,
                    xproto::GrabMode::ASYNC,
                )?
                .check()?;
        }

        Ok(())
    }

    #[inline]
    fn ungrab_keys(&self) -> Result<()> {
        self.conn
            .ungrab_key(xproto::Grab::ANY, self.screen.root, ModMask::ANY)?;

        Ok(())
    }

    #[inline]
    fn replay_pointer(
        &self,
        time: u32,
    ) -> Result<()> {
        self.conn.allow_events(xproto::Allow::REPLAY_POINTER, time)?;
        Ok(())
    }

    #[inline]
    fn release_pointer(
        &self,
        time: u32,
    ) -> Result<()> {
        self.conn.allow_events(xproto::Allow::ASYNC_POINTER, time)?;
        Ok(())
    }
}
