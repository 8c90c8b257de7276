/// Everything that can stop the machine.
///
/// All of these are fatal: once the emulator sees one it halts and refuses to run
/// further instructions until it is reset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VmError {
    #[error("memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("program is too large ({size} bytes), max size is {max_size} bytes")]
    ProgramTooLarge { size: usize, max_size: usize },

    #[error("stack overflow: more than {depth} nested calls")]
    StackOverflow { depth: usize },

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("key {key:#04X} is outside the keypad")]
    KeyOutOfRange { key: u8 },

    #[error("machine is halted")]
    Halted,
}

pub type Result<T> = std::result::Result<T, VmError>;
