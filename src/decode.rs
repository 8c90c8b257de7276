use crate::memory::TypeAddr;

/// A fetched 16-bit instruction word and its operand fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstruction {
    code: u16,
}

impl RawInstruction {
    pub fn new(code: u16) -> Self {
        RawInstruction { code }
    }

    // n is starting digit (1 = leftmost), m is length in digits
    pub fn nth_m_digits(&self, n: u8, m: u8) -> u16 {
        // 0110 1100 1111 0001
        //      ---- ---- ----  n = 2, m = 3
        let shift_places = (4 - m - (n - 1)) * 4;
        let mask = (1u32 << (m * 4)) - 1;
        (self.code >> shift_places) & mask as u16
    }

    pub fn identifier(&self) -> u8 {
        self.nth_m_digits(1, 1) as u8
    }

    pub fn nnn(&self) -> TypeAddr {
        self.nth_m_digits(2, 3)
    }

    pub fn x(&self) -> u8 {
        self.nth_m_digits(2, 1) as u8
    }

    pub fn y(&self) -> u8 {
        self.nth_m_digits(3, 1) as u8
    }

    pub fn n(&self) -> u8 {
        self.nth_m_digits(4, 1) as u8
    }

    pub fn kk(&self) -> u8 {
        self.nth_m_digits(3, 2) as u8
    }
}

impl PartialEq<u16> for RawInstruction {
    fn eq(&self, ins: &u16) -> bool {
        ins.eq(&self.code)
    }
}

/// Decoded instructions, named after what they do rather than the mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodes {
    /// 00E0
    ClearScreen,
    /// 00EE, PC = popped return address
    PopSubroutine,
    /// 1NNN
    Jump(TypeAddr),
    /// 2NNN, push PC then jump
    PushSubroutine(TypeAddr),

    /// 3XKK
    SkipEqualConstant(u8, u8),
    /// 4XKK
    SkipNotEqualConstant(u8, u8),
    /// 5XY0
    SkipEqualRegister(u8, u8),
    /// 9XY0
    SkipNotEqualRegister(u8, u8),

    /// 6XKK
    SetRegister(u8, u8),
    /// 7XKK, wraps without touching VF
    AddToRegister(u8, u8),

    /// 8XY0
    CopyRegister(u8, u8),
    /// 8XY1
    Or(u8, u8),
    /// 8XY2
    And(u8, u8),
    /// 8XY3
    XOr(u8, u8),
    /// 8XY4, VF = carry
    Add(u8, u8),
    /// 8XY5, VX = VX - VY, VF = VX > VY
    SubtractForward(u8, u8),
    /// 8XY7, VX = VY - VX, VF = VY > VX
    SubtractBackward(u8, u8),
    /// 8XYE, VF = bit shifted out
    LeftShift(u8, u8),
    /// 8XY6, VF = bit shifted out
    RightShift(u8, u8),

    /// ANNN
    SetIndexRegister(TypeAddr),
    /// BNNN, jump to NNN + V0
    JumpWithOffset(TypeAddr),
    /// CXKK, random byte masked with KK
    Random(u8, u8),
    /// DXYN, XOR an N row sprite from I at (VX, VY), VF = collision
    Display(u8, u8, u8),

    /// EX9E
    SkipIfPressed(u8),
    /// EXA1
    SkipIfNotPressed(u8),

    /// FX07
    CopyDelayToRegister(u8),
    /// FX0A, suspends until a key goes down
    GetKey(u8),
    /// FX15
    CopyRegisterToDelay(u8),
    /// FX18
    CopyRegisterToSound(u8),
    /// FX1E
    AddToIndex(u8),
    /// FX29, I = address of the glyph for VX
    PointChar(u8),
    /// FX33, hundreds / tens / units of VX at I..I+2
    ToDecimal(u8),
    /// FX55, V0..=VX to memory at I
    StoreRegisterToMemory(u8),
    /// FX65, memory at I to V0..=VX
    LoadRegisterFromMemory(u8),

    /// Anything else, including 0NNN machine calls. Kept so it can be reported.
    Unimplemented(u16),
}

impl OpCodes {
    pub fn decode_raw(ins: u16) -> Self {
        let raw = RawInstruction::new(ins);
        let (x, y) = (raw.x(), raw.y());

        // 5XY_ and 9XY_ ignore the low nibble
        match raw.identifier() {
            0x0 => match ins {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::PopSubroutine,
                _ => Self::Unimplemented(ins),
            },
            0x1 => Self::Jump(raw.nnn()),
            0x2 => Self::PushSubroutine(raw.nnn()),
            0x3 => Self::SkipEqualConstant(x, raw.kk()),
            0x4 => Self::SkipNotEqualConstant(x, raw.kk()),
            0x5 => Self::SkipEqualRegister(x, y),
            0x6 => Self::SetRegister(x, raw.kk()),
            0x7 => Self::AddToRegister(x, raw.kk()),
            0x8 => match raw.n() {
                0x0 => Self::CopyRegister(x, y),
                0x1 => Self::Or(x, y),
                0x2 => Self::And(x, y),
                0x3 => Self::XOr(x, y),
                0x4 => Self::Add(x, y),
                0x5 => Self::SubtractForward(x, y),
                0x6 => Self::RightShift(x, y),
                0x7 => Self::SubtractBackward(x, y),
                0xE => Self::LeftShift(x, y),
                _ => Self::Unimplemented(ins),
            },
            0x9 => Self::SkipNotEqualRegister(x, y),
            0xA => Self::SetIndexRegister(raw.nnn()),
            0xB => Self::JumpWithOffset(raw.nnn()),
            0xC => Self::Random(x, raw.kk()),
            0xD => Self::Display(x, y, raw.n()),
            0xE => match raw.kk() {
                0x9E => Self::SkipIfPressed(x),
                0xA1 => Self::SkipIfNotPressed(x),
                _ => Self::Unimplemented(ins),
            },
            0xF => match raw.kk() {
                0x07 => Self::CopyDelayToRegister(x),
                0x0A => Self::GetKey(x),
                0x15 => Self::CopyRegisterToDelay(x),
                0x18 => Self::CopyRegisterToSound(x),
                0x1E => Self::AddToIndex(x),
                0x29 => Self::PointChar(x),
                0x33 => Self::ToDecimal(x),
                0x55 => Self::StoreRegisterToMemory(x),
                0x65 => Self::LoadRegisterFromMemory(x),
                _ => Self::Unimplemented(ins),
            },
            _ => unreachable!("identifier is a single nibble"),
        }
    }
}
