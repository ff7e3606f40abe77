//! Randomized telemetry used when the backend has no rows
//!
//! Each signal is a slow sinusoid plus uniform jitter, sampled into a
//! bounded rolling window (oldest dropped first).

use std::collections::VecDeque;

use rand::Rng;
use serde::Serialize;

/// Parameters of a simulated signal: `base + sin(t * frequency) * amplitude + U[0,1) * jitter`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalShape {
    /// Resting level
    pub base: f64,
    /// Peak deviation of the sinusoid
    pub amplitude: f64,
    /// Radians per millisecond
    pub frequency: f64,
    /// Width of the uniform noise added on top
    pub jitter: f64,
}

impl SignalShape {
    /// Bearing temperature in degrees Celsius
    pub const TEMPERATURE: Self = Self {
        base: 65.0,
        amplitude: 8.0,
        frequency: 0.0005,
        jitter: 3.0,
    };

    /// Vibration amplitude in mm/s
    pub const VIBRATION: Self = Self {
        base: 2.0,
        amplitude: 1.2,
        frequency: 0.001,
        jitter: 0.4,
    };

    /// Value of the signal at `t_ms`
    pub fn sample<R: Rng + ?Sized>(&self, t_ms: i64, rng: &mut R) -> f64 {
        let wave = (t_ms as f64 * self.frequency).sin() * self.amplitude;
        self.base + wave + rng.gen::<f64>() * self.jitter
    }

    /// Lowest and highest value the signal can produce
    pub fn bounds(&self) -> (f64, f64) {
        (self.base - self.amplitude, self.base + self.amplitude + self.jitter)
    }
}

/// One simulated point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetrySample {
    /// Sample time in milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    /// Signal value
    pub value: f64,
}

/// Rolling window of simulated samples for one signal
#[derive(Debug, Clone)]
pub struct SimulatedSeries {
    shape: SignalShape,
    window: usize,
    limit: f64,
    samples: VecDeque<TelemetrySample>,
}

impl SimulatedSeries {
    /// Create an empty series. `limit` is the level above which the latest
    /// sample counts as elevated.
    pub fn new(shape: SignalShape, window: usize, limit: f64) -> Self {
        Self {
            shape,
            window,
            limit,
            samples: VecDeque::with_capacity(window),
        }
    }

    /// Temperature preset: 15 points, elevated above 75 °C
    pub fn temperature() -> Self {
        Self::new(SignalShape::TEMPERATURE, 15, 75.0)
    }

    /// Vibration preset: 20 points, reference threshold 3.5 mm/s
    pub fn vibration() -> Self {
        Self::new(SignalShape::VIBRATION, 20, 3.5)
    }

    /// Signal parameters
    pub fn shape(&self) -> &SignalShape {
        &self.shape
    }

    /// Elevation threshold
    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Append a sample taken at `t_ms`, dropping the oldest past the window
    pub fn push_sample<R: Rng + ?Sized>(&mut self, t_ms: i64, rng: &mut R) -> TelemetrySample {
        let sample = TelemetrySample {
            timestamp_ms: t_ms,
            value: self.shape.sample(t_ms, rng),
        };

        self.samples.push_back(sample);
        while self.samples.len() > self.window {
            self.samples.pop_front();
        }
        sample
    }

    /// Samples, oldest first
    pub fn samples(&self) -> impl Iterator<Item = &TelemetrySample> {
        self.samples.iter()
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<&TelemetrySample> {
        self.samples.back()
    }

    /// Whether the latest sample is above the limit
    pub fn is_elevated(&self) -> bool {
        self.latest().is_some_and(|s| s.value > self.limit)
    }

    /// Number of samples held
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples were taken yet
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
