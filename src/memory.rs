use log::debug;

use crate::error::{Result, VmError};

pub type TypeAddr = u16; // in reality u12

pub const MEM_SIZE: usize = 4096;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const STACK_DEPTH: usize = 16;
pub const GLYPH_HEIGHT: u16 = 5;

type FontBytes = [u8; GLYPH_HEIGHT as usize * 16];

// hex digits 0-F, loaded at address 0 so that glyph n lives at n * GLYPH_HEIGHT
const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// The 4K address space.
///
/// 000 -> 04F holds the font, programs are loaded at 200. Everything is writable,
/// so a program that scribbles over low memory can corrupt the glyphs; that is how
/// the real machine behaves too.
pub struct Memory {
    bytes: [u8; MEM_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEM_SIZE];
        bytes[..DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);
        Self { bytes }
    }

    fn check(addr: usize) -> Result<usize> {
        if addr < MEM_SIZE {
            Ok(addr)
        } else {
            Err(VmError::MemoryOutOfBounds { address: addr })
        }
    }

    /// Fails unless every address in `addr..addr + len` is inside memory.
    pub fn check_range(&self, addr: TypeAddr, len: usize) -> Result<()> {
        if len == 0 {
            return Self::check(addr as usize).map(|_| ());
        }
        Self::check(addr as usize + len - 1).map(|_| ())
    }

    pub fn set(&mut self, addr: TypeAddr, val: u8) -> Result<()> {
        let addr = Self::check(addr as usize)?;
        self.bytes[addr] = val;
        Ok(())
    }

    pub fn get(&self, addr: TypeAddr) -> Result<u8> {
        let addr = Self::check(addr as usize)?;
        Ok(self.bytes[addr])
    }

    /// Big-endian word: high byte at `addr`, low byte at `addr + 1`.
    pub fn get_word(&self, addr: TypeAddr) -> Result<u16> {
        let hi = self.get(addr)?;
        let lo = Self::check(addr as usize + 1).map(|a| self.bytes[a])?;
        Ok(((hi as u16) << 8) | lo as u16)
    }

    pub fn slice(&self, addr: TypeAddr, len: usize) -> Result<&[u8]> {
        self.check_range(addr, len)?;
        let start = addr as usize;
        Ok(&self.bytes[start..start + len])
    }

    /// Copies `bytes` verbatim to `PROGRAM_START` and returns the entry point.
    pub fn load_program(&mut self, bytes: &[u8]) -> Result<TypeAddr> {
        let start = PROGRAM_START as usize;
        if start + bytes.len() > MEM_SIZE {
            return Err(VmError::ProgramTooLarge {
                size: bytes.len(),
                max_size: MEM_SIZE - start,
            });
        }
        self.bytes[start..start + bytes.len()].copy_from_slice(bytes);
        debug!("loaded {} byte program at {:#05X}", bytes.len(), start);
        Ok(PROGRAM_START)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// Return addresses for `2NNN` / `00EE`.
pub struct Stack {
    addresses: [TypeAddr; STACK_DEPTH],
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    pub fn push(&mut self, addr: TypeAddr) -> Result<()> {
        if self.sp == STACK_DEPTH {
            return Err(VmError::StackOverflow { depth: STACK_DEPTH });
        }
        self.addresses[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<TypeAddr> {
        if self.sp == 0 {
            return Err(VmError::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.addresses[self.sp])
    }

    pub fn len(&self) -> usize {
        self.sp
    }

    pub fn is_empty(&self) -> bool {
        self.sp == 0
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
