//! Random helpers: stochastic rounding and a scripted RNG for tests

use rand::{Rng, RngCore};
use std::collections::VecDeque;

/// Round a non-negative value to a whole number, with the fractional part
/// interpreted as the probability of rounding up. Keeps long-run damage and
/// durability totals unbiased where plain truncation would not.
pub fn round_random(value: f32, rng: &mut impl Rng) -> f32 {
    if value <= 0.0 {
        return 0.0;
    }
    let floor = value.floor();
    let fraction = value - floor;
    if rng.gen::<f32>() < fraction {
        floor + 1.0
    } else {
        floor
    }
}

/// RNG that replays a fixed sequence of `[0, 1)` rolls, for deterministic
/// tests of the probability branches.
///
/// Each scripted roll is encoded in the high 23 bits of one 32-bit word, the
/// bits the standard f32 distribution reads, so one `gen::<f32>()` consumes
/// exactly one roll. Wider draws consume one roll per 32 bits. Panics when
/// asked for more rolls than were scripted, which doubles as proof that a
/// branch consumed no randomness.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    rolls: VecDeque<f32>,
}

impl ScriptedRng {
    pub fn new<I: IntoIterator<Item = f32>>(rolls: I) -> Self {
        ScriptedRng {
            rolls: rolls.into_iter().collect(),
        }
    }

    /// An RNG with no rolls at all; any draw panics.
    pub fn empty() -> Self {
        ScriptedRng::new([])
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let roll = self
            .rolls
            .pop_front()
            .expect("scripted rng ran out of rolls");
        // Inverse of rand's f32 sampling, which keeps the top 23 bits.
        ((roll * (1 << 23) as f32) as u32) << 9
    }

    fn next_u64(&mut self) -> u64 {
        let high = self.next_u32() as u64;
        let low = self.next_u32() as u64;
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_rolls_round_trip() {
        let mut rng = ScriptedRng::new([0.05, 0.5, 0.99]);
        assert!((rng.gen::<f32>() - 0.05).abs() < 1e-6);
        assert!((rng.gen::<f32>() - 0.5).abs() < 1e-6);
        assert!((rng.gen::<f32>() - 0.99).abs() < 1e-6);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn test_wide_draw_consumes_two_rolls() {
        let mut rng = ScriptedRng::new([0.25, 0.75]);
        assert_eq!(rng.next_u64(), 0x4000_0000_C000_0000);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    #[should_panic(expected = "ran out of rolls")]
    fn test_empty_rng_panics_on_draw() {
        let mut rng = ScriptedRng::empty();
        let _ = rng.gen::<f32>();
    }

    #[test]
    fn test_round_random_is_exact_on_integers() {
        let mut rng = ScriptedRng::new([0.999]);
        assert!((round_random(3.0, &mut rng) - 3.0).abs() < f32::EPSILON);
        // Integer input consumes a roll but can never round up.
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn test_round_random_direction() {
        let mut rng = ScriptedRng::new([0.1, 0.9]);
        assert!((round_random(2.5, &mut rng) - 3.0).abs() < f32::EPSILON);
        assert!((round_random(2.5, &mut rng) - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_round_random_never_negative() {
        let mut rng = ScriptedRng::new([0.0]);
        assert!((round_random(-4.2, &mut rng) - 0.0).abs() < f32::EPSILON);
        assert_eq!(rng.remaining(), 1);
    }
}
