/// Viewer state that lives outside the animation
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Show the debug overlay
    pub debug: bool,
    /// Frame updates suspended
    pub paused: bool,
    /// Orbit camera control, decided once at startup
    pub orbit_enabled: bool,
}

impl ViewState {
    pub fn new(debug: bool, orbit_enabled: bool) -> Self {
        ViewState {
            debug,
            paused: false,
            orbit_enabled,
        }
    }
}
