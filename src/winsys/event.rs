use crate::geometry::Dim;
use crate::geometry::Pos;
use crate::input::KeyCode;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crate::window::Window;

/// The protocol event types the window manager reacts to.
#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub enum EventKind {
    MapRequest,
    ConfigureRequest,
    DestroyNotify,
    EnterNotify,
    FocusIn,
    KeyPress,
    KeyRelease,
    ButtonPress,
    ButtonRelease,
    MotionNotify,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    MapRequest {
        window: Window,
    },
    ConfigureRequest {
        window: Window,
        pos: Option<Pos>,
        dim: Option<Dim>,
    },
    Destroy {
        window: Window,
    },
    Enter {
        window: Window,
    },
    FocusIn {
        window: Window,
    },
    Key {
        key_code: KeyCode,
    },
    KeyRelease {
        key_code: KeyCode,
    },
    Mouse {
        event: MouseEvent,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::MapRequest {
                ..
            } => EventKind::MapRequest,
            Event::ConfigureRequest {
                ..
            } => EventKind::ConfigureRequest,
            Event::Destroy {
                ..
            } => EventKind::DestroyNotify,
            Event::Enter {
                ..
            } => EventKind::EnterNotify,
            Event::FocusIn {
                ..
            } => EventKind::FocusIn,
            Event::Key {
                ..
            } => EventKind::KeyPress,
            Event::KeyRelease {
                ..
            } => EventKind::KeyRelease,
            Event::Mouse {
                event,
            } => match event.kind {
                MouseEventKind::Press => EventKind::ButtonPress,
                MouseEventKind::Release => EventKind::ButtonRelease,
                MouseEventKind::Motion => EventKind::MotionNotify,
            },
        }
    }
}
