pub type Window = u32;

/// Client-provided descriptive properties, fetched once when a window is
/// first managed. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowProperties {
    pub name: Option<String>,
    pub class: Option<String>,
    pub window_type: Option<String>,
}

impl WindowProperties {
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    #[inline]
    pub fn class(&self) -> &str {
        self.class.as_deref().unwrap_or("")
    }
}
