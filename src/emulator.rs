use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{
    config::Config,
    decode::OpCodes,
    display::Screen,
    error::{Result, VmError},
    keyboard::Keyboard,
    memory::{Memory, Stack, TypeAddr, GLYPH_HEIGHT},
    registers::{IndexRegister, ProgramCounter, Registers},
    timer::Timer,
};

/// Where the fetch/execute cycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuState {
    Running,
    /// Suspended inside `FX0A`. The next key-down lands in `register`; `waited`
    /// counts the `step` calls spent here.
    AwaitingKey { register: u8, waited: u32 },
    /// A fatal error occurred. Only `reset` brings the machine back.
    Halted,
}

/// The whole machine. Every piece of state is owned here and only mutated by
/// instruction execution, key events and timer ticks.
///
/// `step` is the fetch stage: it reads the word at PC, moves PC past it and then
/// executes it. `execute` on its own relies on that, so skips add another 2 on top of
/// the already advanced PC and `2NNN` pushes the address of the following instruction.
/// `1NNN`, `2NNN`, `BNNN` and `00EE` set PC absolutely.
pub struct Emulator<R = StdRng> {
    pub regs: Registers,
    pub pc: ProgramCounter,
    pub index: IndexRegister,
    pub mem: Memory,
    pub stack: Stack,
    pub screen: Screen,
    pub keyboard: Keyboard,
    pub delay_timer: Timer,
    pub sound_timer: Timer,
    state: CpuState,
    rng: R,
    config: Config,
    unknown_opcodes: u64,
}

impl Emulator<StdRng> {
    pub fn new(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl Default for Emulator<StdRng> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<R: Rng> Emulator<R> {
    pub fn with_rng(config: Config, rng: R) -> Self {
        Self {
            regs: Registers::new(),
            pc: ProgramCounter::default(),
            index: IndexRegister::default(),
            mem: Memory::new(),
            stack: Stack::new(),
            screen: Screen::new(),
            keyboard: Keyboard::new(),
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
            state: CpuState::Running,
            rng,
            config,
            unknown_opcodes: 0,
        }
    }

    /// Back to power-on state. The random source is kept.
    pub fn reset(&mut self) {
        self.regs = Registers::new();
        self.pc = ProgramCounter::default();
        self.index = IndexRegister::default();
        self.mem = Memory::new();
        self.stack = Stack::new();
        self.screen = Screen::new();
        self.keyboard.reset();
        self.delay_timer = Timer::default();
        self.sound_timer = Timer::default();
        self.state = CpuState::Running;
        self.unknown_opcodes = 0;
    }

    /// Copies the program in and points PC at it.
    pub fn load_program(&mut self, bytes: &[u8]) -> Result<()> {
        let entry = self.mem.load_program(bytes)?;
        self.pc.set_addr(entry);
        Ok(())
    }

    pub fn state(&self) -> CpuState {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state == CpuState::Halted
    }

    pub fn is_awaiting_key(&self) -> bool {
        matches!(self.state, CpuState::AwaitingKey { .. })
    }

    /// How many unknown opcodes have been skipped since the last reset.
    pub fn unknown_opcodes(&self) -> u64 {
        self.unknown_opcodes
    }

    pub fn fetch_decode(&mut self) -> Result<OpCodes> {
        let ins = self.mem.get_word(self.pc.addr())?;
        self.pc.increment();
        Ok(OpCodes::decode_raw(ins))
    }

    /// Runs one instruction, unless the machine is waiting for a key.
    pub fn step(&mut self) -> Result<()> {
        match self.state {
            CpuState::Halted => return Err(VmError::Halted),
            CpuState::AwaitingKey { register, waited } => {
                let waited = waited.saturating_add(1);
                match self.config.key_wait_timeout {
                    Some(limit) if waited >= limit => {
                        warn!("gave up waiting for a key for V{register:X} after {waited} steps");
                        self.state = CpuState::Running;
                    }
                    _ => self.state = CpuState::AwaitingKey { register, waited },
                }
                return Ok(());
            }
            CpuState::Running => {}
        }

        let pc = self.pc.addr();
        let operation = match self.fetch_decode() {
            Ok(operation) => operation,
            Err(err) => return Err(self.halt(err)),
        };
        trace!("{pc:#05X}: {operation:?}");
        self.execute_ins(operation)
    }

    /// Decodes and executes a single opcode. PC must already point past it.
    pub fn execute(&mut self, opcode: u16) -> Result<()> {
        self.execute_ins(OpCodes::decode_raw(opcode))
    }

    /// Refused while halted. While suspended in `FX0A` nothing runs until a key
    /// arrives or the wait is cancelled.
    pub fn execute_ins(&mut self, ins: OpCodes) -> Result<()> {
        match self.state {
            CpuState::Halted => return Err(VmError::Halted),
            CpuState::AwaitingKey { register, .. } => {
                debug!("dropped {ins:?} while waiting for a key for V{register:X}");
                return Ok(());
            }
            CpuState::Running => {}
        }
        if let Err(err) = self.apply(ins) {
            return Err(self.halt(err));
        }
        Ok(())
    }

    fn halt(&mut self, err: VmError) -> VmError {
        warn!("halting at {:#05X}: {err}", self.pc.addr());
        self.state = CpuState::Halted;
        err
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc.increment();
        }
    }

    // Every fallible check runs before the first write, so a failing
    // instruction leaves the machine untouched.
    fn apply(&mut self, ins: OpCodes) -> Result<()> {
        match ins {
            OpCodes::ClearScreen => self.screen.clear(),
            OpCodes::PopSubroutine => {
                let addr = self.stack.pop()?;
                self.pc.set_addr(addr);
            }
            OpCodes::Jump(addr) => self.pc.set_addr(addr),
            OpCodes::PushSubroutine(addr) => {
                // PC already points at the instruction to return to
                self.stack.push(self.pc.addr())?;
                self.pc.set_addr(addr);
            }
            OpCodes::SkipEqualConstant(vx, nn) => self.skip_if(self.regs.get(vx) == nn),
            OpCodes::SkipNotEqualConstant(vx, nn) => self.skip_if(self.regs.get(vx) != nn),
            OpCodes::SkipEqualRegister(vx, vy) => {
                self.skip_if(self.regs.get(vx) == self.regs.get(vy))
            }
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                self.skip_if(self.regs.get(vx) != self.regs.get(vy))
            }
            OpCodes::SetRegister(vx, nn) => self.regs.set_register(vx, nn),
            OpCodes::AddToRegister(vx, nn) => self.regs.add_to_register(vx, nn),

            // 8XY0 - 8XY3 leave VF alone
            OpCodes::CopyRegister(vx, vy) => {
                self.regs.set_register(vx, self.regs.get(vy));
            }
            OpCodes::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) | self.regs.get(vy));
            }
            OpCodes::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) & self.regs.get(vy));
            }
            OpCodes::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) ^ self.regs.get(vy));
            }

            // 8XY4 - 8XYE write VF first and the result second, so with X = F
            // the result is what remains
            OpCodes::Add(vx, vy) => {
                let (sum, carry) = self.regs.get(vx).overflowing_add(self.regs.get(vy));
                self.set_with_flag(vx, sum, carry);
            }
            OpCodes::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.set_with_flag(vx, x.wrapping_sub(y), x > y);
            }
            OpCodes::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.set_with_flag(vx, y.wrapping_sub(x), y > x);
            }
            OpCodes::RightShift(vx, _) => {
                let x = self.regs.get(vx);
                self.set_with_flag(vx, x >> 1, x & 1 == 1);
            }
            OpCodes::LeftShift(vx, _) => {
                let x = self.regs.get(vx);
                self.set_with_flag(vx, x << 1, x & 0x80 != 0);
            }

            OpCodes::SetIndexRegister(addr) => self.index.set_addr(addr),
            OpCodes::JumpWithOffset(addr) => {
                self.pc.set_addr(addr + self.regs.get(0) as TypeAddr);
            }
            OpCodes::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, ransuu & nn);
            }
            OpCodes::Display(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                // one byte per row, 8 pixels wide, read from I to I + N
                let sprite = self.mem.slice(self.index.addr(), height as usize)?;
                let collision = self.screen.draw_sprite(x, y, sprite);
                self.regs.set_flag(collision);
            }
            OpCodes::SkipIfPressed(vx) => {
                let pressed = self.keyboard.is_down(self.regs.get(vx))?;
                self.skip_if(pressed);
            }
            OpCodes::SkipIfNotPressed(vx) => {
                let pressed = self.keyboard.is_down(self.regs.get(vx))?;
                self.skip_if(!pressed);
            }
            OpCodes::CopyDelayToRegister(vx) => self.regs.set_register(vx, self.delay_timer.get()),
            OpCodes::GetKey(vx) => {
                debug!("waiting for a key for V{vx:X}");
                self.state = CpuState::AwaitingKey {
                    register: vx,
                    waited: 0,
                };
            }
            OpCodes::CopyRegisterToDelay(vx) => self.delay_timer.set(self.regs.get(vx)),
            OpCodes::CopyRegisterToSound(vx) => self.sound_timer.set(self.regs.get(vx)),
            OpCodes::AddToIndex(vx) => {
                self.index
                    .set_addr(self.index.addr().wrapping_add(self.regs.get(vx) as TypeAddr));
            }
            OpCodes::PointChar(vx) => {
                let char = self.regs.get(vx) as TypeAddr;
                self.index.set_addr(char * GLYPH_HEIGHT);
            }
            OpCodes::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let addr = self.index.addr();
                self.mem.check_range(addr, 3)?;
                self.mem.set(addr, value / 100)?;
                self.mem.set(addr + 1, value / 10 % 10)?;
                self.mem.set(addr + 2, value % 10)?;
            }
            OpCodes::StoreRegisterToMemory(vx) => {
                let addr = self.index.addr();
                self.mem.check_range(addr, vx as usize + 1)?;
                for reg in 0..=vx {
                    self.mem.set(addr + reg as TypeAddr, self.regs.get(reg))?;
                }
            }
            OpCodes::LoadRegisterFromMemory(vx) => {
                let values = self.mem.slice(self.index.addr(), vx as usize + 1)?;
                for (reg, value) in values.iter().enumerate() {
                    self.regs.set_register(reg as u8, *value);
                }
            }
            OpCodes::Unimplemented(raw) => {
                self.unknown_opcodes += 1;
                warn!(
                    "skipping unknown opcode {raw:04X} at {:#05X}",
                    self.pc.addr().wrapping_sub(2)
                );
            }
        }
        Ok(())
    }

    fn set_with_flag(&mut self, vx: u8, value: u8, flag: bool) {
        self.regs.set_flag(flag);
        self.regs.set_register(vx, value);
    }

    /// Host reports a key going down. Completes a pending `FX0A`.
    pub fn key_down(&mut self, key: u8) -> Result<()> {
        self.keyboard.set_down(key, true)?;
        if let CpuState::AwaitingKey { register, .. } = self.state {
            debug!("key {key:X} resumes wait for V{register:X}");
            self.regs.set_register(register, key);
            self.state = CpuState::Running;
        }
        Ok(())
    }

    pub fn key_up(&mut self, key: u8) -> Result<()> {
        self.keyboard.set_down(key, false)
    }

    /// Presses the keypad key mapped to a host symbol, if there is one.
    pub fn press_symbol(&mut self, symbol: char) -> Option<u8> {
        let key = Keyboard::map_symbol(symbol)?;
        self.key_down(key).ok()?;
        Some(key)
    }

    pub fn release_symbol(&mut self, symbol: char) -> Option<u8> {
        let key = Keyboard::map_symbol(symbol)?;
        self.key_up(key).ok()?;
        Some(key)
    }

    /// Abandons a pending `FX0A`: the target register keeps its value and execution
    /// carries on with the next instruction. Returns false if nothing was pending.
    pub fn cancel_key_wait(&mut self) -> bool {
        if let CpuState::AwaitingKey { register, .. } = self.state {
            debug!("cancelled wait for V{register:X}");
            self.state = CpuState::Running;
            true
        } else {
            false
        }
    }

    /// One tick of the external 60Hz clock. Returns whether the sound timer is
    /// still running.
    pub fn tick_timers(&mut self) -> bool {
        self.delay_timer.tick();
        self.sound_timer.tick()
    }
}
