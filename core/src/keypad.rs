use crate::constants::KEY_COUNT;

/// # Keypad
/// The hexadecimal keypad as seen by the CPU; it only ever reads from it.
///
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
pub trait Keypad {
    /// Whether `key` is held down. Values above `0xF` are never pressed.
    fn is_pressed(&self, key: u8) -> bool;

    /// Called on every step of a pending `Fx0A`.
    ///
    /// The first call of a wait starts listening and only presses made after that point count,
    /// so keys that were already down or pressed earlier never satisfy the wait.
    /// Returns the key once one arrives, which ends the wait.
    fn next_press(&mut self) -> Option<u8>;
}

/// Key state kept by a host: which keys are down plus, while `Fx0A` is waiting, the latest press.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keys {
    pressed: [bool; KEY_COUNT],
    waiting: bool,
    latest: Option<u8>,
}

impl Keys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pressed status of `key`; keys outside the pad are ignored
    pub fn press(&mut self, key: u8) {
        if let Some(pressed) = self.pressed.get_mut(usize::from(key)) {
            *pressed = true;
            if self.waiting {
                self.latest = Some(key);
            }
        }
    }

    /// Unset the pressed status of `key`
    pub fn release(&mut self, key: u8) {
        if let Some(pressed) = self.pressed.get_mut(usize::from(key)) {
            *pressed = false;
        }
    }

    pub fn release_all(&mut self) {
        self.pressed = [false; KEY_COUNT];
    }
}

impl Keypad for Keys {
    fn is_pressed(&self, key: u8) -> bool {
        self.pressed.get(usize::from(key)).copied().unwrap_or(false)
    }

    fn next_press(&mut self) -> Option<u8> {
        if !self.waiting {
            self.waiting = true;
            self.latest = None;
            return None;
        }
        let key = self.latest.take();
        if key.is_some() {
            self.waiting = false;
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut keys = Keys::new();
        keys.press(0xE);
        assert!(keys.is_pressed(0xE));
        assert!(!keys.is_pressed(0x1));
        keys.release(0xE);
        assert!(!keys.is_pressed(0xE));
    }

    #[test]
    fn test_out_of_range_keys() {
        let mut keys = Keys::new();
        keys.press(0x10);
        assert!(!keys.is_pressed(0x10));
        assert_eq!(keys.next_press(), None);
    }

    #[test]
    fn test_press_events_are_consumed_once() {
        let mut keys = Keys::new();
        assert_eq!(keys.next_press(), None);
        keys.press(0x3);
        keys.press(0x7);
        assert_eq!(keys.next_press(), Some(0x7));
        // the next wait starts over
        assert_eq!(keys.next_press(), None);
        assert_eq!(keys.next_press(), None);
        // still held
        assert!(keys.is_pressed(0x3));
    }

    #[test]
    fn test_presses_before_a_wait_are_ignored() {
        let mut keys = Keys::new();
        keys.press(0x4);
        keys.release(0x4);
        keys.press(0x2);
        assert_eq!(keys.next_press(), None);
        assert_eq!(keys.next_press(), None);
        keys.press(0x9);
        assert_eq!(keys.next_press(), Some(0x9));
    }
}
