use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::color::Color;

/// Single-slot value handed from one thread to another.
///
/// Writes replace any value not yet taken.
#[derive(Debug, Default)]
pub struct PendingCell<T> {
    slot: Mutex<Option<T>>,
}

impl<T> PendingCell<T> {
    pub fn new() -> Self {
        Self { slot: Mutex::new(None) }
    }

    pub fn put(&self, value: T) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
    }

    pub fn take(&self) -> Option<T> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}

#[inline]
fn pack(width: u32, height: u32) -> u64 {
    (u64::from(width) << 32) | u64::from(height)
}

#[inline]
fn unpack(v: u64) -> (u32, u32) {
    ((v >> 32) as u32, v as u32)
}

/// Window state shared between the event thread and the render thread.
#[derive(Debug)]
pub(crate) struct WindowState {
    active: AtomicBool,
    size: AtomicU64,
    needs_resize: AtomicBool,
    renderer_attached: AtomicBool,
    background: AtomicU32,
    pending_title: PendingCell<String>,
}

impl WindowState {
    pub(crate) fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            active: AtomicBool::new(false),
            size: AtomicU64::new(pack(width, height)),
            needs_resize: AtomicBool::new(false),
            renderer_attached: AtomicBool::new(false),
            background: AtomicU32::new(background.to_rgba()),
            pending_title: PendingCell::new(),
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub(crate) fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Release);
    }

    pub(crate) fn size(&self) -> (u32, u32) {
        unpack(self.size.load(Ordering::Acquire))
    }

    /// Stores the new size and, with a renderer attached, flags the viewport
    /// for the next renderer update.
    pub(crate) fn set_size(&self, width: u32, height: u32) {
        self.size.store(pack(width, height), Ordering::Release);
        if self.renderer_attached.load(Ordering::Acquire) {
            self.needs_resize.store(true, Ordering::Release);
        }
    }

    pub(crate) fn set_renderer_attached(&self, attached: bool) {
        self.renderer_attached.store(attached, Ordering::Release);
        if !attached {
            self.needs_resize.store(false, Ordering::Release);
        }
    }

    pub(crate) fn background(&self) -> Color {
        Color::from_rgba(self.background.load(Ordering::Relaxed))
    }

    pub(crate) fn set_background(&self, color: Color) {
        self.background.store(color.to_rgba(), Ordering::Relaxed);
    }

    pub(crate) fn pending_title(&self) -> &PendingCell<String> {
        &self.pending_title
    }
}

/// Wakes the event thread so it applies deferred window updates.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Render-thread view of a [`Window`](super::Window).
///
/// Cloning is cheap. Mutations are recorded here and applied by the event
/// thread in `Window::update`.
#[derive(Clone)]
pub struct WindowHandle {
    state: Arc<WindowState>,
    waker: Option<Waker>,
}

impl fmt::Debug for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowHandle")
            .field("state", &self.state)
            .field("waker", &self.waker.is_some())
            .finish()
    }
}

impl WindowHandle {
    pub(crate) fn new(state: Arc<WindowState>, waker: Option<Waker>) -> Self {
        Self { state, waker }
    }

    pub(crate) fn state(&self) -> &WindowState {
        &self.state
    }

    fn wake(&self) {
        if let Some(wake) = &self.waker {
            wake();
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Asks the window to close. The frame loop stops after the current frame.
    pub fn close(&self) {
        if self.state.is_active() {
            self.state.set_active(false);
            log::debug!(target: "kiln::window", "window close requested");
            self.wake();
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.state.size()
    }

    pub fn background_color(&self) -> Color {
        self.state.background()
    }

    pub fn set_background_color(&self, color: Color) {
        self.state.set_background(color);
    }

    /// Records a title for the event thread to apply. Only the latest title
    /// is applied.
    pub fn set_needs_to_change_title(&self, title: impl Into<String>) {
        self.state.pending_title().put(title.into());
        self.wake();
    }

    /// Clears the resize flag, returning the size to apply if it was set.
    pub fn take_resize(&self) -> Option<(u32, u32)> {
        self.state
            .needs_resize
            .swap(false, Ordering::AcqRel)
            .then(|| self.state.size())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn pending_cell_keeps_latest() {
        let cell = PendingCell::new();
        cell.put("a".to_string());
        cell.put("b".to_string());
        assert!(cell.is_pending());
        assert_eq!(cell.take().as_deref(), Some("b"));
        assert_eq!(cell.take(), None);
    }

    #[test]
    fn size_packs_both_dimensions() {
        let state = WindowState::new(1920, 1080, Color::default());
        assert_eq!(state.size(), (1920, 1080));
        state.set_size(u32::MAX, 1);
        assert_eq!(state.size(), (u32::MAX, 1));
    }

    #[test]
    fn resize_flag_needs_renderer() {
        let state = Arc::new(WindowState::new(800, 600, Color::default()));
        let handle = WindowHandle::new(state.clone(), None);

        state.set_size(1024, 768);
        assert_eq!(handle.take_resize(), None);

        state.set_renderer_attached(true);
        state.set_size(1280, 720);
        assert_eq!(handle.take_resize(), Some((1280, 720)));
        assert_eq!(handle.take_resize(), None);
    }

    #[test]
    fn title_and_close_wake_event_thread() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = wakes.clone();
        let state = Arc::new(WindowState::new(800, 600, Color::default()));
        state.set_active(true);
        let handle = WindowHandle::new(
            state.clone(),
            Some(Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        );

        handle.set_needs_to_change_title("fps");
        handle.close();
        handle.close();

        assert_eq!(wakes.load(Ordering::SeqCst), 2);
        assert!(!handle.is_active());
        assert_eq!(state.pending_title().take().as_deref(), Some("fps"));
    }

    #[test]
    fn background_round_trips() {
        let state = WindowState::new(1, 1, Color::default());
        let c = Color::new(10, 20, 30, 40);
        state.set_background(c);
        assert_eq!(state.background(), c);
    }
}
