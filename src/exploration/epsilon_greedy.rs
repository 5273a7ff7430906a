use rand::Rng;

use crate::{decay::Decay, error::Result, util::check_interval};

use super::Choice;

/// Epsilon greedy exploration policy
///
/// Epsilon is plain mutable state. Whoever drives training decides when and how it decays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f32,
}

impl EpsilonGreedy {
    /// Initialize epsilon greedy policy with an exploration rate in `[0,1]`
    pub fn new(epsilon: f32) -> Result<Self> {
        Ok(Self {
            epsilon: check_interval("epsilon", epsilon, 0.0, 1.0)?,
        })
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f32) -> Result<()> {
        self.epsilon = check_interval("epsilon", epsilon, 0.0, 1.0)?;
        Ok(())
    }

    /// Apply one step of `decay` to epsilon
    pub fn decay<D: Decay>(&mut self, decay: &D) {
        self.epsilon = decay.decay(self.epsilon).clamp(0.0, 1.0);
    }

    /// Explore with probability epsilon, otherwise exploit
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Choice {
        if rng.gen::<f32>() < self.epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use crate::decay::Multiplicative;

    use super::*;

    #[test]
    fn extremes_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let never = EpsilonGreedy::new(0.0).unwrap();
        let always = EpsilonGreedy::new(1.0).unwrap();
        for _ in 0..1000 {
            assert_eq!(never.choose(&mut rng), Choice::Exploit, "epsilon 0 never explores");
            assert_eq!(always.choose(&mut rng), Choice::Explore, "epsilon 1 always explores");
        }
    }

    #[test]
    fn explore_rate_tracks_epsilon() {
        let mut rng = StdRng::seed_from_u64(42);
        let policy = EpsilonGreedy::new(0.3).unwrap();
        let explored = (0..10_000)
            .filter(|_| policy.choose(&mut rng) == Choice::Explore)
            .count();
        assert!((2_700..3_300).contains(&explored), "explored {explored} of 10000");
    }

    #[test]
    fn epsilon_is_validated_and_decays() {
        assert!(EpsilonGreedy::new(1.1).is_err(), "out of range rejected");

        let mut policy = EpsilonGreedy::new(0.6).unwrap();
        assert!(policy.set_epsilon(-0.2).is_err(), "negative rejected");
        assert_eq!(policy.epsilon(), 0.6, "failed set leaves value untouched");

        policy.decay(&Multiplicative::new(0.5, 0.05).unwrap());
        assert_eq!(policy.epsilon(), 0.3);
    }
}
