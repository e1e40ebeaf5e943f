//! Debounce and cooldown state machine
//!
//! The machine is fully described by the hit streak and the cooldown
//! deadline; the phase is derived from them and the current time.

use super::types::{AlertPhase, AlertPolicy, Decision};
use tokio::time::Instant;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertState {
    hit_streak: u32,
    cooldown_until: Option<Instant>,
}

impl AlertState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit_streak(&self) -> u32 {
        self.hit_streak
    }

    pub fn cooldown_until(&self) -> Option<Instant> {
        self.cooldown_until
    }

    pub fn in_cooldown(&self, now: Instant) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }

    pub fn phase(&self, now: Instant) -> AlertPhase {
        if self.in_cooldown(now) {
            AlertPhase::Cooldown
        } else if self.hit_streak == 0 {
            AlertPhase::Idle
        } else {
            AlertPhase::Accumulating
        }
    }

    /// Feed one tick's best score.
    ///
    /// The streak is updated before the cooldown gate, so qualifying ticks
    /// keep counting while the cooldown is open and the first qualifying
    /// tick after it expires fires immediately.
    pub fn observe(&mut self, score: f32, now: Instant, policy: &AlertPolicy) -> Decision {
        if score >= policy.threshold {
            self.hit_streak = self.hit_streak.saturating_add(1);
        } else {
            self.hit_streak = 0;
            return Decision::Reset;
        }

        if self.hit_streak < policy.debounce_count {
            return Decision::Accumulating {
                streak: self.hit_streak,
            };
        }
        if self.in_cooldown(now) {
            return Decision::Suppressed {
                streak: self.hit_streak,
            };
        }

        self.hit_streak = 0;
        self.cooldown_until = Some(now + policy.cooldown);
        Decision::Fire
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn policy(threshold: f32, debounce_count: u32, cooldown_secs: u64) -> AlertPolicy {
        AlertPolicy {
            threshold,
            debounce_count,
            cooldown: Duration::from_secs(cooldown_secs),
        }
    }

    /// Feed scores one second apart; returns the seconds at which alerts fired
    fn run(scores: &[f32], policy: &AlertPolicy) -> (Vec<u64>, AlertState) {
        let start = Instant::now();
        let mut state = AlertState::new();
        let fired = scores
            .iter()
            .enumerate()
            .filter_map(|(t, &score)| {
                let now = start + Duration::from_secs(t as u64);
                state.observe(score, now, policy).fired().then_some(t as u64)
            })
            .collect();
        (fired, state)
    }

    #[test]
    fn test_single_fire_after_interrupted_streak() {
        let (fired, _) = run(&[0.95, 0.2, 0.95, 0.95, 0.95], &policy(0.9, 3, 20));
        assert_eq!(fired, vec![4]);
    }

    #[test]
    fn test_continuous_match_fires_once_within_cooldown() {
        let start = Instant::now();
        let p = policy(0.9, 3, 20);
        let mut state = AlertState::new();
        let mut fired = Vec::new();
        for t in 0..10u64 {
            let now = start + Duration::from_secs(t);
            if state.observe(0.95, now, &p).fired() {
                fired.push(t);
            }
        }
        assert_eq!(fired, vec![2]);
        assert_eq!(state.cooldown_until(), Some(start + Duration::from_secs(22)));
        // t=3..9 qualify after the reset at t=2
        assert_eq!(state.hit_streak(), 7);
        assert_eq!(state.phase(start + Duration::from_secs(9)), AlertPhase::Cooldown);
    }

    #[test]
    fn test_streak_carried_through_cooldown_fires_on_expiry() {
        let start = Instant::now();
        let p = policy(0.9, 3, 20);
        let mut state = AlertState::new();
        for t in 0..22u64 {
            state.observe(0.95, start + Duration::from_secs(t), &p);
        }
        assert!(state.hit_streak() >= 3);
        assert_eq!(
            state.observe(0.95, start + Duration::from_secs(22), &p),
            Decision::Fire
        );
        assert_eq!(state.hit_streak(), 0);
    }

    #[test]
    fn test_zero_cooldown_is_pure_debounce() {
        let scores = [0.95; 12];
        let (fired, _) = run(&scores, &policy(0.9, 3, 0));
        assert_eq!(fired, vec![2, 5, 8, 11]);
        assert!(fired.windows(2).all(|w| w[1] - w[0] >= 3));
    }

    #[test]
    fn test_debounce_of_one_fires_on_first_qualifying_frame() {
        let (fired, _) = run(&[0.1, 0.92, 0.3], &policy(0.9, 1, 5));
        assert_eq!(fired, vec![1]);
    }

    #[test]
    fn test_score_equal_to_threshold_qualifies() {
        let (fired, _) = run(&[0.9], &policy(0.9, 1, 0));
        assert_eq!(fired, vec![0]);
    }

    #[test]
    fn test_streak_is_longest_qualifying_suffix_until_fire() {
        let scores = [0.5, 0.95, 0.91, 0.2, 0.99, 0.93, 0.97, 0.1, 0.95, 0.96];
        let threshold = 0.9;
        // Large debounce so nothing fires and the suffix rule holds everywhere
        let p = policy(threshold, 100, 0);
        let start = Instant::now();
        let mut state = AlertState::new();
        for (k, &score) in scores.iter().enumerate() {
            state.observe(score, start + Duration::from_secs(k as u64), &p);
            let suffix = scores[..=k].iter().rev().take_while(|&&s| s >= threshold).count();
            assert_eq!(state.hit_streak() as usize, suffix, "after tick {k}");
        }
    }

    #[test]
    fn test_decisions_and_phases() {
        let start = Instant::now();
        let p = policy(0.9, 2, 10);
        let mut state = AlertState::new();
        assert_eq!(state.phase(start), AlertPhase::Idle);
        assert_eq!(state.observe(0.95, start, &p), Decision::Accumulating { streak: 1 });
        assert_eq!(state.phase(start), AlertPhase::Accumulating);
        let t1 = start + Duration::from_secs(1);
        assert_eq!(state.observe(0.95, t1, &p), Decision::Fire);
        let t2 = start + Duration::from_secs(2);
        assert_eq!(state.observe(0.95, t2, &p), Decision::Accumulating { streak: 1 });
        let t3 = start + Duration::from_secs(3);
        assert_eq!(state.observe(0.95, t3, &p), Decision::Suppressed { streak: 2 });
        assert_eq!(state.observe(0.1, t3, &p), Decision::Reset);
        assert_eq!(state.phase(t3), AlertPhase::Cooldown);
        assert_eq!(state.phase(start + Duration::from_secs(11)), AlertPhase::Idle);
    }
}
