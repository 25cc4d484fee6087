/// Xorshift32 generator. Every random decision in the simulation draws from one of
/// these so a seed plus an input script reproduces a run exactly.
#[derive(Clone, Copy, Debug)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0xDEAD_BEEF } else { seed },
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn next(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        self.state
    }

    pub fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next() % max
    }

    /// Uniform in `[0, 1)`.
    pub fn next_unit(&mut self) -> f32 {
        (self.next() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform in `[min, max)`.
    pub fn next_range(&mut self, min: f32, max: f32) -> f32 {
        debug_assert!(max >= min);
        min + (max - min) * self.next_unit()
    }

    pub fn chance_pct(&mut self, pct: u32) -> bool {
        self.next_int(100) < pct
    }
}
