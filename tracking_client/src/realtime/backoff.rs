use std::time::Duration;

const MAX_JITTER: f64 = 0.25;

/// Exponential delay between resubscription attempts, with a little jitter so a fleet of
/// clients does not reconnect in lockstep.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            current: initial,
        }
    }

    pub fn next_delay(&mut self) -> Duration {
        let base = self.current;
        self.current = (self.current * 2).min(self.max);
        base + base.mul_f64(rand::random_range(0.0..=MAX_JITTER))
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(30))
    }
}

#[test]
fn delays_double_until_capped() {
    let mut backoff = Backoff::default();
    let expected_bases = [1, 2, 4, 8, 16, 30, 30];

    for base in expected_bases {
        let delay = backoff.next_delay();
        let base = Duration::from_secs(base);
        assert!(delay >= base && delay <= base.mul_f64(1. + MAX_JITTER), "{delay:?} not within jitter of {base:?}");
    }

    backoff.reset();
    assert!(backoff.next_delay() <= Duration::from_millis(1250));
}
