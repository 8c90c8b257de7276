/// Host clocks these at this rate; the core only exposes the decrement.
pub const TIMER_TICKS_PER_SECOND: u64 = 60;

/// Delay or sound countdown. Counts down towards zero and stops there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    count: u8,
}

impl Timer {
    pub fn new(init_count: u8) -> Self {
        Self { count: init_count }
    }

    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    pub fn get(&self) -> u8 {
        self.count
    }

    pub fn is_active(&self) -> bool {
        self.count > 0
    }

    /// One 60Hz tick. Returns whether the timer is still running afterwards.
    pub fn tick(&mut self) -> bool {
        self.count = self.count.saturating_sub(1);
        self.is_active()
    }
}
