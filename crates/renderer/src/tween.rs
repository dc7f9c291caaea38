use std::time::{Duration, Instant};

/// Interpolation curves available for scalar transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Exponential ease-out: fast start, decelerating into the target.
    ExpoOut,
}

impl Easing {
    fn sample(self, t: f32) -> f32 {
        let clamped = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => clamped,
            Easing::ExpoOut => {
                if clamped >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f32.powf(-10.0 * clamped)
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    from: f32,
    target: f32,
    start: Instant,
    duration: Duration,
    easing: Easing,
}

impl Transition {
    fn value_at(&self, now: Instant) -> (f32, bool) {
        let elapsed = now.saturating_duration_since(self.start);
        let progress = elapsed.as_secs_f32() / self.duration.as_secs_f32().max(f32::EPSILON);
        let mix = self.easing.sample(progress);
        (self.from + (self.target - self.from) * mix, progress >= 1.0)
    }
}

/// A scalar that eases toward a target over a fixed duration.
///
/// Retargeting while a transition is in flight restarts from the current
/// animated value (last-write-wins, transitions are never queued).
#[derive(Debug)]
pub struct AnimatedScalar {
    value: f32,
    transition: Option<Transition>,
}

impl AnimatedScalar {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            transition: None,
        }
    }

    pub fn transition_to(&mut self, target: f32, duration: Duration, easing: Easing, now: Instant) {
        if duration <= Duration::ZERO {
            self.value = target;
            self.transition = None;
            return;
        }
        self.transition = Some(Transition {
            from: self.value,
            target,
            start: now,
            duration,
            easing,
        });
    }

    /// Advances the animation to `now` and returns the current value.
    pub fn sample(&mut self, now: Instant) -> f32 {
        if let Some(transition) = self.transition {
            let (value, finished) = transition.value_at(now);
            self.value = value;
            if finished {
                self.value = transition.target;
                self.transition = None;
            }
        }
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expo_out_decelerates_toward_target() {
        let curve = Easing::ExpoOut;
        let mut last = 0.0;
        let mut last_delta = f32::MAX;
        for step in 1..=10 {
            let sample = curve.sample(step as f32 / 10.0);
            let delta = sample - last;
            assert!(sample > last);
            assert!(delta < last_delta);
            last = sample;
            last_delta = delta;
        }
        assert!((curve.sample(0.0) - 0.0).abs() < 1e-6);
        assert!((curve.sample(1.0) - 1.0).abs() < 1e-6);
        assert!((curve.sample(2.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn scalar_reaches_target_after_duration() {
        let start = Instant::now();
        let mut scalar = AnimatedScalar::new(0.0);
        scalar.transition_to(1.0, Duration::from_secs(1), Easing::Linear, start);

        let mid = scalar.sample(start + Duration::from_millis(500));
        assert!((mid - 0.5).abs() < 1e-3);
        assert!(scalar.is_animating());

        let done = scalar.sample(start + Duration::from_secs(2));
        assert_eq!(done, 1.0);
        assert!(!scalar.is_animating());
    }

    #[test]
    fn retarget_overrides_in_flight_transition() {
        let start = Instant::now();
        let mut scalar = AnimatedScalar::new(0.0);
        scalar.transition_to(1.0, Duration::from_secs(1), Easing::Linear, start);

        // Halfway up, reverse toward zero before the first transition lands.
        let halfway = start + Duration::from_millis(500);
        let value = scalar.sample(halfway);
        assert!((value - 0.5).abs() < 1e-3);
        scalar.transition_to(0.0, Duration::from_secs(1), Easing::Linear, halfway);

        let later = scalar.sample(halfway + Duration::from_millis(500));
        assert!(later < value);
        let settled = scalar.sample(halfway + Duration::from_secs(1));
        assert_eq!(settled, 0.0);
    }

    #[test]
    fn zero_duration_snaps_immediately() {
        let now = Instant::now();
        let mut scalar = AnimatedScalar::new(0.25);
        scalar.transition_to(1.0, Duration::ZERO, Easing::ExpoOut, now);
        assert_eq!(scalar.sample(now), 1.0);
        assert!(!scalar.is_animating());
    }
}
