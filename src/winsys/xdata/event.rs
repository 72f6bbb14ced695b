pub use crate::event::*;

use x11rb::protocol::xproto;

impl EventKind {
    /// Set on events delivered through `SendEvent` rather than generated by
    /// the server.
    pub const SYNTHETIC_BIT: u8 = 0x80;

    pub fn from_response_type(response_type: u8) -> Option<Self> {
        match response_type & !Self::SYNTHETIC_BIT {
            xproto::MAP_REQUEST_EVENT => Some(Self::MapRequest),
            xproto::CONFIGURE_REQUEST_EVENT => Some(Self::ConfigureRequest),
            xproto::DESTROY_NOTIFY_EVENT => Some(Self::DestroyNotify),
            xproto::ENTER_NOTIFY_EVENT => Some(Self::EnterNotify),
            xproto::FOCUS_IN_EVENT => Some(Self::FocusIn),
            xproto::KEY_PRESS_EVENT => Some(Self::KeyPress),
            xproto::KEY_RELEASE_EVENT => Some(Self::KeyRelease),
            xproto::BUTTON_PRESS_EVENT => Some(Self::ButtonPress),
            xproto::BUTTON_RELEASE_EVENT => Some(Self::ButtonRelease),
            xproto::MOTION_NOTIFY_EVENT => Some(Self::MotionNotify),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_bit_is_masked_before_lookup() {
        let synthetic = xproto::CONFIGURE_REQUEST_EVENT | EventKind::SYNTHETIC_BIT;

        assert_eq!(
            EventKind::from_response_type(synthetic),
            Some(EventKind::ConfigureRequest)
        );
        assert_eq!(
            EventKind::from_response_type(xproto::CONFIGURE_REQUEST_EVENT),
            Some(EventKind::ConfigureRequest)
        );
    }

    #[test]
    fn unhandled_types_have_no_kind() {
        assert_eq!(EventKind::from_response_type(xproto::EXPOSE_EVENT), None);
        assert_eq!(
            EventKind::from_response_type(xproto::PROPERTY_NOTIFY_EVENT | 0x80),
            None
        );
    }
}
