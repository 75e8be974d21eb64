use std::sync::{Arc, Mutex, PoisonError, Weak};

use super::listener::ListenerState;
use super::types::{ButtonState, Key, MouseButton};

type Listeners<K> = Mutex<Vec<Weak<ListenerState<K>>>>;

/// Routes key and mouse events to every live listener.
///
/// Holds listeners weakly: dropping a `KeyInput` or `MouseInput` removes it
/// from dispatch.
#[derive(Debug, Default)]
pub struct InputRegistry {
    keys: Listeners<Key>,
    buttons: Listeners<MouseButton>,
}

fn dispatch<K>(listeners: &Listeners<K>, f: impl Fn(&ListenerState<K>)) {
    let mut listeners = listeners.lock().unwrap_or_else(PoisonError::into_inner);
    listeners.retain(|weak| match weak.upgrade() {
        Some(listener) => {
            f(&listener);
            true
        }
        None => false,
    });
}

fn live<K>(listeners: &Listeners<K>) -> usize {
    let mut listeners = listeners.lock().unwrap_or_else(PoisonError::into_inner);
    listeners.retain(|weak| weak.strong_count() > 0);
    listeners.len()
}

impl InputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register_keys(&self, listener: &Arc<ListenerState<Key>>) {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::downgrade(listener));
    }

    pub(crate) fn register_buttons(&self, listener: &Arc<ListenerState<MouseButton>>) {
        self.buttons
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::downgrade(listener));
    }

    pub fn dispatch_key(&self, key: Key, state: ButtonState) {
        log::trace!(target: "kiln::input", "key {key:?} {state:?}");
        dispatch(&self.keys, |l| {
            l.set(key, state.is_pressed());
        });
    }

    pub fn dispatch_button(&self, button: MouseButton, state: ButtonState) {
        log::trace!(target: "kiln::input", "mouse {button:?} {state:?}");
        dispatch(&self.buttons, |l| {
            l.set(button, state.is_pressed());
        });
    }

    /// Releases every held key and button, e.g. when the window loses focus.
    pub fn release_all(&self) {
        dispatch(&self.keys, ListenerState::release_all);
        dispatch(&self.buttons, ListenerState::release_all);
    }

    pub fn key_listeners(&self) -> usize {
        live(&self.keys)
    }

    pub fn button_listeners(&self) -> usize {
        live(&self.buttons)
    }
}
