//! Random sources for the randomized estimates. Uses SplitMix64: same seed, same sequence.
//! Not cryptographically secure.

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

/// Uniform draws in `[0, 1)`. Injected into the randomized estimates so tests can substitute
/// a seeded or scripted source.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seeds from the operating system, for the dashboard's "different every load" behavior.
    pub fn from_entropy() -> Result<Self, getrandom::Error> {
        let mut bytes = [0_u8; 8];
        getrandom::getrandom(&mut bytes)?;
        Ok(Self::new(u64::from_le_bytes(bytes)))
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }
}

impl RandomSource for Rng {
    /// Top 53 bits scaled into `[0, 1)`.
    #[inline]
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1_u64 << 53) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_draws_repeat() {
        let draws = |seed| {
            let mut rng = Rng::new(seed);
            (0..16).map(|_| rng.next_f64()).collect::<Vec<_>>()
        };
        assert_eq!(draws(7), draws(7));
        assert_ne!(draws(7), draws(8));
    }

    #[test]
    fn unit_draws_stay_in_range() {
        let mut rng = Rng::new(42);
        for _ in 0..10_000 {
            let draw = rng.next_f64();
            assert!((0.0..1.0).contains(&draw), "draw {draw} out of range");
        }
    }

    #[test]
    fn entropy_seeding_succeeds() {
        let mut rng = Rng::from_entropy().expect("os entropy");
        assert!((0.0..1.0).contains(&rng.next_f64()));
    }
}
