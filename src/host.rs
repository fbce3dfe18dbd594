use log::Level;

/// Registration of a per-frame overlay callback with the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayHandle(pub u64);

/// Viewport-level services a modal tool needs besides projection.
pub trait ViewportHost {
    fn manipulator_visible(&self) -> bool;
    fn set_manipulator_visible(&mut self, visible: bool);

    fn add_overlay(&mut self) -> OverlayHandle;
    fn remove_overlay(&mut self, handle: OverlayHandle);

    fn tag_redraw(&mut self) {}

    /// Shows a message to the user.
    fn report(&mut self, level: Level, message: &str) {
        log::log!(level, "{}", message);
    }
}

/// Host without a window: keeps the state a real viewport would show.
#[derive(Clone, Debug)]
pub struct HeadlessHost {
    pub manipulator: bool,
    pub overlays: Vec<OverlayHandle>,
    pub redraws: usize,
    pub reports: Vec<(Level, String)>,
    next_overlay: u64,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self {
            manipulator: true,
            overlays: vec![],
            redraws: 0,
            reports: vec![],
            next_overlay: 1,
        }
    }
}

impl ViewportHost for HeadlessHost {
    fn manipulator_visible(&self) -> bool {
        self.manipulator
    }

    fn set_manipulator_visible(&mut self, visible: bool) {
        self.manipulator = visible;
    }

    fn add_overlay(&mut self) -> OverlayHandle {
        let handle = OverlayHandle(self.next_overlay);
        self.next_overlay += 1;
        self.overlays.push(handle);
        handle
    }

    fn remove_overlay(&mut self, handle: OverlayHandle) {
        self.overlays.retain(|&h| h != handle);
    }

    fn tag_redraw(&mut self) {
        self.redraws += 1;
    }

    fn report(&mut self, level: Level, message: &str) {
        log::log!(level, "{}", message);
        self.reports.push((level, message.to_string()));
    }
}
