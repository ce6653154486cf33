// pointer.rs - Cursor tracking with coalescing and easing
//
// Raw mouse events can arrive many times per display refresh. Only the
// latest sample matters; it is committed to the target at most once per
// refresh, and the rendered position eases toward the target every frame.

use glam::Vec2;

#[derive(Debug, Clone)]
pub struct PointerTracker {
    rate: f32,
    position: Vec2,
    target: Vec2,
    latest: Vec2,
    pending: bool,
}

impl PointerTracker {
    /// `rate` is the fraction of the remaining distance covered per tick.
    pub fn new(rate: f32) -> Self {
        Self {
            rate: rate.clamp(f32::EPSILON, 1.0),
            position: Vec2::ZERO,
            target: Vec2::ZERO,
            latest: Vec2::ZERO,
            pending: false,
        }
    }

    /// Record a raw sample in viewport pixels (origin top-left).
    /// Returns true when the caller should schedule a commit for the next
    /// refresh, false when one is already scheduled.
    pub fn on_raw_input(&mut self, px: f32, py: f32, viewport_w: f32, viewport_h: f32) -> bool {
        self.latest = normalize(px, py, viewport_w, viewport_h);
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Promote the latest raw sample to the easing target.
    pub fn commit(&mut self) {
        self.target = self.latest;
        self.pending = false;
    }

    pub fn tick(&mut self) {
        self.position += (self.target - self.position) * self.rate;
    }

    pub fn position(&self) -> Vec2 { self.position }
    pub fn target(&self) -> Vec2 { self.target }
    pub fn is_pending(&self) -> bool { self.pending }
}

/// Pixels to [-1, 1] with x right and y up.
fn normalize(px: f32, py: f32, w: f32, h: f32) -> Vec2 {
    let w = w.max(1.0);
    let h = h.max(1.0);
    let x = px / w * 2.0 - 1.0;
    let y = -(py / h * 2.0 - 1.0);
    let v = Vec2::new(x, y);
    if v.is_finite() { v.clamp(Vec2::NEG_ONE, Vec2::ONE) } else { Vec2::ZERO }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_viewport_pixels() {
        assert_eq!(normalize(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
        assert_eq!(normalize(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
        assert_eq!(normalize(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(normalize(2000.0, -50.0, 800.0, 600.0), Vec2::new(1.0, 1.0));
        assert_eq!(normalize(f32::NAN, 0.0, 800.0, 600.0), Vec2::ZERO);
    }

    #[test]
    fn bursts_coalesce_into_one_commit() {
        let mut p = PointerTracker::new(0.08);
        assert!(p.on_raw_input(0.0, 0.0, 100.0, 100.0));
        assert!(!p.on_raw_input(50.0, 50.0, 100.0, 100.0));
        assert!(!p.on_raw_input(100.0, 50.0, 100.0, 100.0));
        assert_eq!(p.target(), Vec2::ZERO);

        p.commit();
        // The last sample wins
        assert_eq!(p.target(), Vec2::new(1.0, 0.0));
        assert!(!p.is_pending());
        assert!(p.on_raw_input(0.0, 50.0, 100.0, 100.0));
    }

    #[test]
    fn eases_toward_target_without_reaching_it() {
        let mut p = PointerTracker::new(0.08);
        p.on_raw_input(100.0, 50.0, 100.0, 100.0);
        p.commit();

        let mut last = p.position().x;
        for _ in 0..60 {
            p.tick();
            let x = p.position().x;
            assert!(x > last);
            assert!(x < 1.0);
            last = x;
        }
        // 1 - 0.92^60
        assert!((last - 0.9933).abs() < 1e-3);
    }

    #[test]
    fn full_rate_snaps() {
        let mut p = PointerTracker::new(1.0);
        p.on_raw_input(0.0, 100.0, 100.0, 100.0);
        p.commit();
        p.tick();
        assert_eq!(p.position(), Vec2::new(-1.0, -1.0));
    }
}
