/// Knobs for a single machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Seed for `CXNN`. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// How many `step` calls a pending `FX0A` may wait before it is abandoned.
    /// `None` waits forever.
    pub key_wait_timeout: Option<u32>,
}

impl Config {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_key_wait_timeout(mut self, ticks: u32) -> Self {
        self.key_wait_timeout = Some(ticks);
        self
    }
}
