use crate::util::BuildIdHasher;

use winsys::geometry::Region;
use winsys::window::Window;
use winsys::window::WindowProperties;

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedWindow {
    id: Window,
    geometry: Region,
    focused: bool,
    properties: WindowProperties,
}

impl ManagedWindow {
    pub fn new(
        id: Window,
        geometry: Region,
        properties: WindowProperties,
    ) -> Self {
        Self {
            id,
            geometry,
            focused: false,
            properties,
        }
    }

    #[inline]
    pub fn id(&self) -> Window {
        self.id
    }

    #[inline]
    pub fn geometry(&self) -> Region {
        self.geometry
    }

    #[inline]
    pub fn set_geometry(
        &mut self,
        geometry: Region,
    ) {
        self.geometry = geometry;
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Returns whether the focus state changed.
    #[inline]
    pub fn set_focused(
        &mut self,
        focused: bool,
    ) -> bool {
        let changed = self.focused != focused;
        self.focused = focused;
        changed
    }

    #[inline]
    pub fn properties(&self) -> &WindowProperties {
        &self.properties
    }
}

/// Every top-level window currently under management, keyed by id. Focus
/// is tracked one level up, by the model.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: HashMap<Window, ManagedWindow, BuildIdHasher>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the entry for the window's id.
    #[inline]
    pub fn insert(
        &mut self,
        window: ManagedWindow,
    ) -> Option<ManagedWindow> {
        self.windows.insert(window.id, window)
    }

    #[inline]
    pub fn get(
        &self,
        window: Window,
    ) -> Option<&ManagedWindow> {
        self.windows.get(&window)
    }

    #[inline]
    pub fn get_mut(
        &mut self,
        window: Window,
    ) -> Option<&mut ManagedWindow> {
        self.windows.get_mut(&window)
    }

    #[inline]
    pub fn remove(
        &mut self,
        window: Window,
    ) -> Option<ManagedWindow> {
        self.windows.remove(&window)
    }

    #[inline]
    pub fn contains(
        &self,
        window: Window,
    ) -> bool {
        self.windows.contains_key(&window)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManagedWindow> {
        self.windows.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ManagedWindow> {
        self.windows.values_mut()
    }

    /// Ids in ascending order, for deterministic iteration.
    pub fn ids(&self) -> Vec<Window> {
        let mut ids: Vec<Window> = self.windows.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(id: Window) -> ManagedWindow {
        ManagedWindow::new(id, Region::new(0, 0, 100, 100), WindowProperties::default())
    }

    #[test]
    fn insert_replaces_existing_entry() {
        let mut registry = WindowRegistry::new();

        assert!(registry.insert(window(0x42)).is_none());

        let mut replacement = window(0x42);
        replacement.set_geometry(Region::new(1, 2, 3, 4));

        assert_eq!(registry.insert(replacement).map(|w| w.geometry()), Some(Region::new(0, 0, 100, 100)));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(0x42).map(|w| w.geometry()), Some(Region::new(1, 2, 3, 4)));
    }

    #[test]
    fn remove_releases_entry() {
        let mut registry = WindowRegistry::new();
        registry.insert(window(1));
        registry.insert(window(2));

        assert_eq!(registry.remove(1).map(|w| w.id()), Some(1));
        assert!(registry.remove(1).is_none());
        assert!(!registry.contains(1));
        assert_eq!(registry.ids(), vec![2]);
    }

    #[test]
    fn set_focused_reports_changes() {
        let mut managed = window(7);

        assert!(!managed.is_focused());
        assert!(managed.set_focused(true));
        assert!(!managed.set_focused(true));
        assert!(managed.set_focused(false));
    }

    #[test]
    fn ids_are_sorted() {
        let mut registry = WindowRegistry::new();

        for id in [0x300, 0x10, 0x2000, 0x42].iter() {
            registry.insert(window(*id));
        }

        assert_eq!(registry.ids(), vec![0x10, 0x42, 0x300, 0x2000]);
    }
}
