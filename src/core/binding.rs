use crate::model::Model;

impl<'a> Model<'a> {
    /// Replaces all key grabs on the root window with the grabs of the
    /// current configuration. Safe to call repeatedly.
    pub fn grab_bindings(&self) {
        attempt!(self.conn.ungrab_keys(), "release key grabs");

        for binding in self.config.keybindings.iter() {
            match self.conn.grab_key(binding.key_code) {
                Ok(()) => debug!("grabbed keybinding {}", binding.name),
                Err(err) => warn!("unable to grab keybinding {}: {}", binding.name, err),
            }
        }
    }
}
