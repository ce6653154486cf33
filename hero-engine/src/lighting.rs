// lighting.rs - Time-of-day sun
//
// Intensity follows a cosine peaking at noon. Color is banded:
//   06-08  sunrise, golden warming up
//   08-16  day, blue-shifted white (coolest at noon)
//   16-18  sunset, warming toward orange
//   else   night, dim cool blue
//
// Bands are hand-tuned and do not line up exactly at their edges.

use std::f64::consts::PI;

use glam::Vec3;

use crate::config::LightingConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingSample {
    pub color: Vec3,
    pub intensity: f32,
}

pub fn compute_lighting(hour: f64, config: &LightingConfig) -> LightingSample {
    let hour = if hour.is_finite() { hour.rem_euclid(24.0) } else { 12.0 };

    // 1 at noon, 0 at midnight
    let daylight = 0.5 + 0.5 * (PI * (hour - 12.0) / 12.0).cos();
    let span = (config.intensity_max - config.intensity_min).max(0.0);
    let intensity = config.intensity_min + span * daylight as f32;

    LightingSample { color: band_color(hour), intensity }
}

fn band_color(hour: f64) -> Vec3 {
    let progress = |start: f64, width: f64| ((hour - start) / width) as f32;

    if (6.0..8.0).contains(&hour) {
        let t = progress(6.0, 2.0);
        Vec3::new(1.0, 0.7 + t * 0.2, 0.4 + t * 0.4)
    } else if (8.0..16.0).contains(&hour) {
        // 0 at noon, 1 at either edge
        let t = (2.0 * progress(8.0, 8.0) - 1.0).abs();
        Vec3::new(0.95 - t * 0.1, 0.95, 1.0)
    } else if (16.0..18.0).contains(&hour) {
        let t = progress(16.0, 2.0);
        Vec3::new(1.0, 0.9 - t * 0.2, 0.8 - t * 0.4)
    } else {
        Vec3::new(0.6, 0.7, 0.9)
    }
}

/// Holds the last sample between recomputations.
#[derive(Debug, Clone)]
pub struct SunClock {
    interval_s: f64,
    last_s: Option<f64>,
    current: Option<LightingSample>,
}

impl SunClock {
    pub fn new(interval_s: f64) -> Self {
        Self { interval_s: interval_s.max(0.0), last_s: None, current: None }
    }

    /// Recompute if at least one interval of animation time has passed.
    /// Returns the new sample when it was recomputed this call.
    pub fn refresh(&mut self, elapsed_s: f64, hour: f64, config: &LightingConfig) -> Option<LightingSample> {
        if let Some(last) = self.last_s {
            if elapsed_s - last < self.interval_s {
                return None;
            }
        }
        let sample = compute_lighting(hour, config);
        self.last_s = Some(elapsed_s);
        self.current = Some(sample);
        Some(sample)
    }

    pub fn current(&self) -> Option<LightingSample> {
        self.current
    }
}

/// Accessory (glasses) visibility: automatic from intensity until the user
/// toggles it once, manual for the rest of the session after that.
#[derive(Debug, Clone)]
pub struct AccessoryRule {
    threshold: f32,
    visible: bool,
    manual: bool,
}

impl AccessoryRule {
    pub fn new(threshold: f32) -> Self {
        Self { threshold, visible: true, manual: false }
    }

    pub fn visible(&self) -> bool { self.visible }
    pub fn is_manual(&self) -> bool { self.manual }

    /// Apply the automatic rule. Returns the new visibility if it changed.
    pub fn observe(&mut self, intensity: f32) -> Option<bool> {
        if self.manual { return None; }
        let want = intensity >= self.threshold;
        if want == self.visible { return None; }
        self.visible = want;
        Some(want)
    }

    /// User toggle. Disables the automatic rule permanently.
    pub fn toggle(&mut self) -> bool {
        self.manual = true;
        self.visible = !self.visible;
        self.visible
    }
}
