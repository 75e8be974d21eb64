use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::registry::InputRegistry;
use super::types::{Key, MouseButton};

/// Press tracking for one key or button.
#[derive(Debug, Default)]
struct ButtonSlot {
    pressed: AtomicBool,
    /// Set once the current press has been reported as a click.
    reported: AtomicBool,
}

impl ButtonSlot {
    fn set(&self, down: bool) {
        let was_pressed = self.pressed.swap(down, Ordering::AcqRel);
        // A repeated press event for a held key must not report a new click.
        self.reported.store(down && was_pressed, Ordering::Release);
    }

    fn is_down(&self) -> bool {
        self.pressed.load(Ordering::Acquire)
    }

    fn take_click(&self) -> bool {
        self.pressed.load(Ordering::Acquire) && !self.reported.swap(true, Ordering::AcqRel)
    }
}

/// State of a fixed set of keys or buttons, written by the event thread and
/// read by the render thread.
#[derive(Debug)]
pub struct ListenerState<K> {
    slots: Vec<(K, ButtonSlot)>,
}

impl<K: Copy + Eq> ListenerState<K> {
    pub fn new(watched: impl IntoIterator<Item = K>) -> Self {
        let mut slots: Vec<(K, ButtonSlot)> = Vec::new();
        for k in watched {
            if !slots.iter().any(|(s, _)| *s == k) {
                slots.push((k, ButtonSlot::default()));
            }
        }
        Self { slots }
    }

    fn slot(&self, k: K) -> Option<&ButtonSlot> {
        self.slots.iter().find(|(s, _)| *s == k).map(|(_, slot)| slot)
    }

    /// Records a press or release. Returns whether `k` is watched.
    pub fn set(&self, k: K, down: bool) -> bool {
        match self.slot(k) {
            Some(slot) => {
                slot.set(down);
                true
            }
            None => false,
        }
    }

    pub fn is_down(&self, k: K) -> bool {
        self.slot(k).is_some_and(ButtonSlot::is_down)
    }

    /// True once per press: the first query after the press reports it,
    /// later queries return false until the next press.
    pub fn is_clicked(&self, k: K) -> bool {
        self.slot(k).is_some_and(ButtonSlot::take_click)
    }

    pub fn release_all(&self) {
        for (_, slot) in &self.slots {
            slot.set(false);
        }
    }
}

/// Listens to a set of keyboard keys.
///
/// Stays registered for as long as it is alive.
#[derive(Debug, Clone)]
pub struct KeyInput {
    state: Arc<ListenerState<Key>>,
}

impl KeyInput {
    pub fn new(registry: &InputRegistry, keys: impl IntoIterator<Item = Key>) -> Self {
        let state = Arc::new(ListenerState::new(keys));
        registry.register_keys(&state);
        Self { state }
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.state.is_down(key)
    }

    pub fn is_key_clicked(&self, key: Key) -> bool {
        self.state.is_clicked(key)
    }
}

/// Listens to a set of mouse buttons.
#[derive(Debug, Clone)]
pub struct MouseInput {
    state: Arc<ListenerState<MouseButton>>,
}

impl MouseInput {
    pub fn new(registry: &InputRegistry, buttons: impl IntoIterator<Item = MouseButton>) -> Self {
        let state = Arc::new(ListenerState::new(buttons));
        registry.register_buttons(&state);
        Self { state }
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.state.is_down(button)
    }

    pub fn is_button_clicked(&self, button: MouseButton) -> bool {
        self.state.is_clicked(button)
    }

    pub fn is_left_button_down(&self) -> bool {
        self.is_button_down(MouseButton::Left)
    }

    pub fn is_left_button_clicked(&self) -> bool {
        self.is_button_clicked(MouseButton::Left)
    }

    pub fn is_right_button_down(&self) -> bool {
        self.is_button_down(MouseButton::Right)
    }

    pub fn is_right_button_clicked(&self) -> bool {
        self.is_button_clicked(MouseButton::Right)
    }
}
