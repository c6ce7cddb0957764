//! Exponential backoff interval computation.

use std::time::Duration;

use rand::Rng;

/// Exponential backoff with an upper cap and optional jitter.
///
/// The interval for attempt `n` (0-indexed) is
/// `initial_interval * multiplier^n`, capped at `max_interval`. With jitter
/// enabled the capped value is perturbed by a uniformly random factor in
/// `[-10%, +10%]`.
///
/// Stateless: the interval is a pure function of the attempt index (plus the
/// random factor), so one policy can be shared across concurrent senders.
///
/// # Defaults
///
/// - `initial_interval`: 1 second
/// - `max_interval`: 30 seconds
/// - `multiplier`: 2.0
/// - `jitter`: enabled
///
/// # Example
///
/// ```
/// use samhook::webhook::ExponentialBackoff;
/// use std::time::Duration;
///
/// let backoff = ExponentialBackoff::new()
///     .with_initial_interval(Duration::from_millis(500))
///     .with_max_interval(Duration::from_secs(10))
///     .with_jitter(false);
///
/// assert_eq!(backoff.next_interval(0), Duration::from_millis(500));
/// assert_eq!(backoff.next_interval(1), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialBackoff {
    /// Interval before the first retry.
    pub initial_interval: Duration,

    /// Upper bound applied before jitter.
    pub max_interval: Duration,

    /// Growth factor applied per attempt. Never below 1.0.
    pub multiplier: f64,

    /// Whether to perturb intervals by up to ±10%.
    pub jitter: bool,
}

impl ExponentialBackoff {
    /// Default initial interval (1 second).
    pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_secs(1);

    /// Default maximum interval (30 seconds).
    pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(30);

    /// Default multiplier (2.0).
    pub const DEFAULT_MULTIPLIER: f64 = 2.0;

    /// Magnitude of the jitter band, as a fraction of the capped interval.
    pub const JITTER_FRACTION: f64 = 0.1;

    /// Creates a backoff policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            initial_interval: Self::DEFAULT_INITIAL_INTERVAL,
            max_interval: Self::DEFAULT_MAX_INTERVAL,
            multiplier: Self::DEFAULT_MULTIPLIER,
            jitter: true,
        }
    }

    /// Sets the initial interval.
    ///
    /// Raises `max_interval` to match if it would otherwise be smaller.
    #[must_use]
    pub const fn with_initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = interval;
        if self.max_interval.as_nanos() < interval.as_nanos() {
            self.max_interval = interval;
        }
        self
    }

    /// Sets the maximum interval.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is smaller than `initial_interval`.
    #[must_use]
    pub const fn with_max_interval(mut self, interval: Duration) -> Self {
        assert!(
            interval.as_nanos() >= self.initial_interval.as_nanos(),
            "max_interval must be at least initial_interval"
        );
        self.max_interval = interval;
        self
    }

    /// Sets the growth multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `multiplier` is below 1.0 or not finite.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        assert!(
            multiplier.is_finite() && multiplier >= 1.0,
            "multiplier must be at least 1.0"
        );
        self.multiplier = multiplier;
        self
    }

    /// Enables or disables jitter.
    #[must_use]
    pub const fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Computes the wait before the retry following attempt `attempt` (0-indexed).
    ///
    /// With jitter disabled the result is exactly
    /// `min(initial_interval * multiplier^attempt, max_interval)`.
    #[must_use]
    pub fn next_interval(&self, attempt: u32) -> Duration {
        let capped = self.capped_secs(attempt);
        if !self.jitter {
            return self.to_duration(capped);
        }

        let factor = rand::thread_rng().gen_range(-1.0..=1.0);
        self.to_duration(Self::apply_jitter(capped, factor))
    }

    /// Converts seconds back to a `Duration`.
    ///
    /// `as_secs_f64` rounds very large caps (such as `Duration::MAX`) up past
    /// what a `Duration` can hold; those saturate at `max_interval`.
    fn to_duration(&self, secs: f64) -> Duration {
        Duration::try_from_secs_f64(secs).unwrap_or(self.max_interval)
    }

    /// Un-jittered interval in seconds, capped at `max_interval`.
    fn capped_secs(&self, attempt: u32) -> f64 {
        // Saturate the exponent; anything this large is capped anyway
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let raw = self.initial_interval.as_secs_f64() * self.multiplier.powi(exponent);
        let max = self.max_interval.as_secs_f64();
        if raw.is_nan() || raw > max { max } else { raw }
    }

    /// Perturbs `secs` by `factor * JITTER_FRACTION` of itself, `factor` in `[-1, 1]`.
    fn apply_jitter(secs: f64, factor: f64) -> f64 {
        factor.mul_add(secs * Self::JITTER_FRACTION, secs).max(0.0)
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_jitter_stays_within_band() {
        let base = 10.0;
        assert!((ExponentialBackoff::apply_jitter(base, -1.0) - 9.0).abs() < 1e-9);
        assert!((ExponentialBackoff::apply_jitter(base, 1.0) - 11.0).abs() < 1e-9);
        assert!((ExponentialBackoff::apply_jitter(base, 0.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn apply_jitter_never_negative() {
        assert!(ExponentialBackoff::apply_jitter(0.0, -1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn to_duration_saturates_at_max_interval() {
        let backoff = ExponentialBackoff::new().with_max_interval(Duration::MAX);

        assert_eq!(backoff.to_duration(f64::MAX), Duration::MAX);
        assert_eq!(backoff.to_duration(2.5), Duration::from_millis(2500));
    }

    #[test]
    fn capped_secs_handles_overflowing_exponent() {
        let backoff = ExponentialBackoff::new().with_jitter(false);
        let secs = backoff.capped_secs(u32::MAX);

        assert!((secs - 30.0).abs() < f64::EPSILON);
    }
}
