// 16 8-bit data registers named V0 to VF
// I -> address register (12 bits)
// Stack of 16 return addresses
//
// Delay & sound timer: count down at 60 times / s until 0, driven by the host
//
// Display res: 64 width, 32 height
//
// 35 opcodes, each 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier

pub mod config;
pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod timer;

pub use config::Config;
pub use decode::{OpCodes, RawInstruction};
pub use display::Screen;
pub use emulator::{CpuState, Emulator};
pub use error::{Result, VmError};
pub use keyboard::Keyboard;
pub use memory::{Memory, Stack};
