//! Random draws for prototype placement and ETA jitter

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

/// Source of uniform draws in `[0, 1)`
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;
}

/// Thread-local RNG from `rand`
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when it runs out
///
/// An empty script always yields `0.0`. Values are clamped into `[0, 1)`.
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: AtomicUsize,
}

impl ScriptedRandom {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Always draw the same value
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let i = self.cursor.fetch_add(1, Ordering::Relaxed) % self.values.len();
        self.values[i].clamp(0.0, 1.0 - f64::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_random_in_range() {
        for _ in 0..1000 {
            let u = ThreadRandom.next_unit();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_scripted_cycles() {
        let rng = ScriptedRandom::new(vec![0.1, 0.7]);
        assert_eq!(rng.next_unit(), 0.1);
        assert_eq!(rng.next_unit(), 0.7);
        assert_eq!(rng.next_unit(), 0.1);
    }

    #[test]
    fn test_scripted_empty_and_clamped() {
        assert_eq!(ScriptedRandom::default().next_unit(), 0.0);
        assert!(ScriptedRandom::constant(1.0).next_unit() < 1.0);
        assert_eq!(ScriptedRandom::constant(-3.0).next_unit(), 0.0);
    }
}
