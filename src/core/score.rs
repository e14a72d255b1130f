use serde::{Deserialize, Serialize};

pub const HAPPINESS_MIN: f64 = 0.0;
pub const HAPPINESS_MAX: f64 = 100.0;
pub const MULTIPLIER_MIN: f64 = 1.0;
pub const MULTIPLIER_MAX: f64 = 6.0;

/// Village happiness, kept fractional and clamped to `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Happiness(f64);

impl Happiness {
    pub fn new(value: f64) -> Self {
        Self(clamp_happiness(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Whole percent shown to the player; the stored value is never rounded.
    pub fn display(self) -> u32 {
        self.0.floor() as u32
    }

    pub fn is_full(self) -> bool {
        self.0 >= HAPPINESS_MAX
    }

    pub fn add(&mut self, amount: f64) {
        self.0 = clamp_happiness(self.0 + amount);
    }

    pub fn subtract(&mut self, amount: f64) {
        self.0 = clamp_happiness(self.0 - amount);
    }

    pub fn set(&mut self, value: f64) {
        self.0 = clamp_happiness(value);
    }
}

fn clamp_happiness(value: f64) -> f64 {
    value.clamp(HAPPINESS_MIN, HAPPINESS_MAX)
}

/// Combo multiplier, raised by beats and decayed by the tick timer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComboMultiplier(f64);

impl ComboMultiplier {
    pub fn new() -> Self {
        Self(MULTIPLIER_MIN)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn raise(&mut self, step: f64) {
        self.0 = (self.0 + step).min(MULTIPLIER_MAX);
    }

    pub fn decay(&mut self, step: f64, ticks: u32) {
        self.0 = (self.0 - step * f64::from(ticks)).max(MULTIPLIER_MIN);
    }
}

impl Default for ComboMultiplier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happiness_clamps_on_creation() {
        assert_eq!(Happiness::new(-3.0).value(), 0.0);
        assert_eq!(Happiness::new(140.0).value(), 100.0);
        assert_eq!(Happiness::new(25.0).value(), 25.0);
    }

    #[test]
    fn test_happiness_add_and_subtract_clamp() {
        let mut happiness = Happiness::new(95.0);
        happiness.add(15.0);
        assert_eq!(happiness.value(), 100.0);
        assert!(happiness.is_full());

        let mut happiness = Happiness::new(3.0);
        happiness.subtract(5.0);
        assert_eq!(happiness.value(), 0.0);
    }

    #[test]
    fn test_happiness_display_floors() {
        let mut happiness = Happiness::new(25.0);
        happiness.add(2.0 * 1.6);
        assert!((happiness.value() - 28.2).abs() < 1e-9);
        assert_eq!(happiness.display(), 28);
    }

    #[test]
    fn test_multiplier_saturates_at_six() {
        let mut multiplier = ComboMultiplier::new();
        for _ in 0..50 {
            multiplier.raise(0.6);
            assert!(multiplier.value() <= MULTIPLIER_MAX);
        }
        assert_eq!(multiplier.value(), MULTIPLIER_MAX);
    }

    #[test]
    fn test_multiplier_saturates_at_one() {
        let mut multiplier = ComboMultiplier::new();
        multiplier.raise(0.6);
        multiplier.decay(0.05, 1000);
        assert_eq!(multiplier.value(), MULTIPLIER_MIN);

        multiplier.decay(0.05, 1);
        assert_eq!(multiplier.value(), MULTIPLIER_MIN);
    }

    #[test]
    fn test_multiplier_decay_per_tick() {
        let mut multiplier = ComboMultiplier::new();
        multiplier.raise(0.6);
        multiplier.decay(0.05, 2);
        assert!((multiplier.value() - 1.5).abs() < 1e-9);
    }
}
