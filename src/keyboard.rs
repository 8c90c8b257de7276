use crate::error::{Result, VmError};

pub const NUM_KEYS: usize = 16;

// The hex keypad      is laid out on the host as
//   1 2 3 C             1 2 3 4
//   4 5 6 D             Q W E R
//   7 8 9 E             A S D F
//   A 0 B F             Z X C V
const KEYMAP: [(char, u8); NUM_KEYS] = [
    ('1', 0x1),
    ('2', 0x2),
    ('3', 0x3),
    ('4', 0xC),
    ('q', 0x4),
    ('w', 0x5),
    ('e', 0x6),
    ('r', 0xD),
    ('a', 0x7),
    ('s', 0x8),
    ('d', 0x9),
    ('f', 0xE),
    ('z', 0xA),
    ('x', 0x0),
    ('c', 0xB),
    ('v', 0xF),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    keys: [bool; NUM_KEYS],
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            keys: [false; NUM_KEYS],
        }
    }

    pub fn reset(&mut self) {
        self.keys = [false; NUM_KEYS];
    }

    fn check(key: u8) -> Result<usize> {
        if (key as usize) < NUM_KEYS {
            Ok(key as usize)
        } else {
            Err(VmError::KeyOutOfRange { key })
        }
    }

    pub fn set_down(&mut self, key: u8, down: bool) -> Result<()> {
        self.keys[Self::check(key)?] = down;
        Ok(())
    }

    pub fn is_down(&self, key: u8) -> Result<bool> {
        Ok(self.keys[Self::check(key)?])
    }

    /// Host symbol to keypad index. `None` for keys that aren't on the keypad.
    pub fn map_symbol(symbol: char) -> Option<u8> {
        let symbol = symbol.to_ascii_lowercase();
        KEYMAP
            .iter()
            .find(|(host, _)| *host == symbol)
            .map(|(_, key)| *key)
    }
}
