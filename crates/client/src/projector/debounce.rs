//! Trailing-edge debouncing of slider input, keyed per (device, attribute).

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Identifies one slider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingKey {
    pub device: String,
    pub attribute: String,
}

impl BindingKey {
    pub fn new(device: &str, attribute: &str) -> Self {
        Self {
            device: device.to_string(),
            attribute: attribute.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingValue {
    value: f64,
    deadline: Instant,
}

/// One pending timer per key; a new input for the same key replaces it.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending: HashMap<BindingKey, PendingValue>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: HashMap::new(),
        }
    }

    /// Start (or restart) the quiet window for `key`.
    pub fn schedule(&mut self, key: BindingKey, value: f64, now: Instant) {
        self.pending.insert(
            key,
            PendingValue {
                value,
                deadline: now + self.quiet,
            },
        );
    }

    /// Drop a pending window without firing it.
    pub fn cancel(&mut self, key: &BindingKey) -> bool {
        self.pending.remove(key).is_some()
    }

    /// Earliest deadline across all keys.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Remove and return every window whose quiet period has elapsed,
    /// ordered by deadline.
    pub fn take_due(&mut self, now: Instant) -> Vec<(BindingKey, f64)> {
        let mut due: Vec<(BindingKey, PendingValue)> = Vec::new();
        self.pending.retain(|key, pending| {
            if pending.deadline <= now {
                due.push((key.clone(), *pending));
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.1.deadline.cmp(&b.1.deadline).then_with(|| a.0.cmp(&b.0)));
        due.into_iter().map(|(key, p)| (key, p.value)).collect()
    }

    pub fn is_pending(&self, key: &BindingKey) -> bool {
        self.pending.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(300);

    #[test]
    fn burst_collapses_to_last_value() {
        let mut debouncer = Debouncer::new(QUIET);
        let key = BindingKey::new("Dimmer", "brightness");
        let t0 = Instant::now();

        debouncer.schedule(key.clone(), 10.0, t0);
        debouncer.schedule(key.clone(), 20.0, t0 + Duration::from_millis(100));
        debouncer.schedule(key.clone(), 30.0, t0 + Duration::from_millis(200));

        // The first window would have expired here, but it was superseded.
        assert!(debouncer.take_due(t0 + Duration::from_millis(350)).is_empty());
        assert_eq!(
            debouncer.take_due(t0 + Duration::from_millis(500)),
            vec![(key.clone(), 30.0)]
        );
        assert!(!debouncer.is_pending(&key));
    }

    #[test]
    fn keys_are_independent() {
        let mut debouncer = Debouncer::new(QUIET);
        let brightness = BindingKey::new("Dimmer", "brightness");
        let setpoint = BindingKey::new("Thermostat", "setpoint");
        let t0 = Instant::now();

        debouncer.schedule(brightness.clone(), 50.0, t0);
        debouncer.schedule(setpoint.clone(), 21.0, t0 + Duration::from_millis(250));
        assert_eq!(debouncer.next_deadline(), Some(t0 + QUIET));

        assert_eq!(
            debouncer.take_due(t0 + QUIET),
            vec![(brightness, 50.0)]
        );
        assert_eq!(
            debouncer.take_due(t0 + Duration::from_millis(550)),
            vec![(setpoint, 21.0)]
        );
        assert_eq!(debouncer.next_deadline(), None);
    }

    #[test]
    fn cancel_drops_pending_value() {
        let mut debouncer = Debouncer::new(QUIET);
        let key = BindingKey::new("Dimmer", "brightness");
        let t0 = Instant::now();
        debouncer.schedule(key.clone(), 50.0, t0);
        assert!(debouncer.cancel(&key));
        assert!(debouncer.take_due(t0 + QUIET).is_empty());
    }
}
