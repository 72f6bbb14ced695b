use crate::model::Model;

use winsys::event::Event;
use winsys::event::EventKind;

/// The fixed set of components events are routed to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Handler {
    Lifecycle,
    FocusInput,
}

impl Handler {
    pub fn for_kind(kind: EventKind) -> Self {
        match kind {
            EventKind::MapRequest | EventKind::ConfigureRequest | EventKind::DestroyNotify => {
                Handler::Lifecycle
            },
            EventKind::EnterNotify
            | EventKind::FocusIn
            | EventKind::KeyPress
            | EventKind::KeyRelease
            | EventKind::ButtonPress
            | EventKind::ButtonRelease
            | EventKind::MotionNotify => Handler::FocusInput,
        }
    }
}

impl<'a> Model<'a> {
    pub fn dispatch(
        &mut self,
        event: Event,
    ) {
        match Handler::for_kind(event.kind()) {
            Handler::Lifecycle => self.handle_lifecycle(event),
            Handler::FocusInput => self.handle_focus_input(event),
        }
    }
}
