use std::time::Duration;
use crate::core::{Offering, Point};
use crate::core::schedule::Deadline;

#[derive(Debug, Clone, PartialEq)]
pub struct Transient<T> {
    pub id: u64,
    pub payload: T,
    pub expires: Deadline,
}

/// Short-lived visual entities that remove themselves once their delay
/// has passed.
#[derive(Debug, Clone)]
pub struct Transients<T> {
    entries: Vec<Transient<T>>,
    ttl: Duration,
    capacity: Option<usize>,
    next_id: u64,
}

impl<T> Transients<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Vec::new(),
            ttl,
            capacity: None,
            next_id: 0,
        }
    }

    /// Keeps only the newest `capacity` entries.
    pub fn with_capacity_limit(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn spawn(&mut self, now: Duration, payload: T) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Transient {
            id,
            payload,
            expires: Deadline::after(now, self.ttl),
        });
        if let Some(capacity) = self.capacity {
            if self.entries.len() > capacity {
                let excess = self.entries.len() - capacity;
                self.entries.drain(..excess);
            }
        }
        id
    }

    pub fn expire(&mut self, now: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.expires.is_due(now));
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transient<T>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// An offering in flight from the pointer towards the fire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Toss {
    pub offering: Offering,
    pub from: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailParticle {
    pub at: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sparkle {
    pub at: Point,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_transients_expire_after_ttl() {
        let mut tosses = Transients::new(ms(800));
        tosses.spawn(ms(0), Toss { offering: Offering::Popcorn, from: Point::default() });
        tosses.spawn(ms(500), Toss { offering: Offering::Rewari, from: Point::default() });

        assert_eq!(tosses.expire(ms(799)), 0);
        assert_eq!(tosses.expire(ms(800)), 1);
        assert_eq!(tosses.len(), 1);
        assert_eq!(tosses.iter().next().unwrap().payload.offering, Offering::Rewari);

        assert_eq!(tosses.expire(ms(1300)), 1);
        assert!(tosses.is_empty());
    }

    #[test]
    fn test_capacity_limit_keeps_newest() {
        let mut trail = Transients::new(ms(400)).with_capacity_limit(3);
        for i in 0..5 {
            trail.spawn(ms(i), TrailParticle { at: Point::new(i as f64, 0.0) });
        }

        let xs: Vec<f64> = trail.iter().map(|t| t.payload.at.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut sparkles = Transients::new(ms(1000));
        let a = sparkles.spawn(ms(0), Sparkle { at: Point::default() });
        let b = sparkles.spawn(ms(0), Sparkle { at: Point::default() });
        assert_ne!(a, b);
    }
}
