use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use crate::config::TimingConfig;
use crate::core::schedule::Deadline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Intro,
    Story,
    Village,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Intro => "intro",
            Stage::Story => "story",
            Stage::Village => "village",
        };
        f.write_str(name)
    }
}

/// How much of the opening cinematic is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IntroPhase {
    Fire,
    Dancers,
    Greeting,
}

/// The opening bonfire scene. Reveals dancers, then the greeting, then
/// asks to move on once its deadline passes.
#[derive(Debug, Clone)]
pub struct IntroCinematic {
    started_at: Duration,
    dancers: Deadline,
    greeting: Deadline,
    ends: Deadline,
    now: Duration,
}

impl IntroCinematic {
    pub fn new(timings: &TimingConfig, now: Duration) -> Self {
        Self {
            started_at: now,
            dancers: Deadline::after(now, timings.dancers_reveal()),
            greeting: Deadline::after(now, timings.greeting_reveal()),
            ends: Deadline::after(now, timings.intro_duration()),
            now,
        }
    }

    pub fn advance(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    pub fn phase(&self) -> IntroPhase {
        if self.greeting.is_due(self.now) {
            IntroPhase::Greeting
        } else if self.dancers.is_due(self.now) {
            IntroPhase::Dancers
        } else {
            IntroPhase::Fire
        }
    }

    pub fn is_finished(&self) -> bool {
        self.ends.is_due(self.now)
    }

    pub fn elapsed(&self) -> Duration {
        self.now.saturating_sub(self.started_at)
    }

    pub fn remaining(&self) -> Duration {
        self.ends.remaining(self.now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_intro_phases() {
        let mut intro = IntroCinematic::new(&TimingConfig::default(), Duration::ZERO);
        assert_eq!(intro.phase(), IntroPhase::Fire);

        intro.advance(ms(1200));
        assert_eq!(intro.phase(), IntroPhase::Dancers);

        intro.advance(ms(3200));
        assert_eq!(intro.phase(), IntroPhase::Greeting);
        assert!(!intro.is_finished());

        intro.advance(ms(8500));
        assert!(intro.is_finished());
        assert_eq!(intro.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_intro_ignores_earlier_time() {
        let mut intro = IntroCinematic::new(&TimingConfig::default(), ms(100));
        intro.advance(ms(5000));
        intro.advance(ms(10));
        assert_eq!(intro.elapsed(), ms(4900));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Intro.to_string(), "intro");
        assert_eq!(Stage::Village.to_string(), "village");
        assert!(IntroPhase::Fire < IntroPhase::Greeting);
    }
}
