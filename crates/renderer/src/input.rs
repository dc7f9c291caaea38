use std::time::{Duration, Instant};

use tracing::debug;

use crate::tween::{AnimatedScalar, Easing};

/// How long the bulge intensity eases toward its new target on hover
/// enter/leave.
pub const HOVER_TWEEN_DURATION: Duration = Duration::from_secs(1);

/// Reports whether the current build targets a touch-primary environment.
///
/// Pure and evaluated once at startup to pick the input-event family; it is
/// never re-evaluated at runtime.
pub fn is_touch_capable() -> bool {
    cfg!(any(target_os = "android", target_os = "ios"))
}

/// Which window-event family the listener is bound to. Exactly one family
/// is bound for the lifetime of the process, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerBackend {
    Mouse,
    Touch,
}

impl PointerBackend {
    pub fn detect() -> Self {
        if is_touch_capable() {
            PointerBackend::Touch
        } else {
            PointerBackend::Mouse
        }
    }
}

/// Window dimensions plus normalized pointer coordinates, raw and smoothed.
///
/// Pointer values are move-event positions divided by the current viewport
/// size. They are deliberately not clamped: a pointer dragged outside the
/// window can report coordinates beyond [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct ViewportState {
    width: u32,
    height: u32,
    pointer: [f32; 2],
    smoothed: [f32; 2],
}

impl ViewportState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            pointer: [0.0, 0.0],
            smoothed: [0.0, 0.0],
        }
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer = [
            (x / self.width as f64) as f32,
            (y / self.height as f64) as f32,
        ];
    }

    /// Moves the smoothed coordinate toward the raw pointer by `factor` on
    /// each axis independently.
    pub fn smooth(&mut self, factor: f32) {
        for axis in 0..2 {
            self.smoothed[axis] += (self.pointer[axis] - self.smoothed[axis]) * factor;
        }
    }

    pub fn pointer(&self) -> [f32; 2] {
        self.pointer
    }

    pub fn smoothed(&self) -> [f32; 2] {
        self.smoothed
    }
}

/// One active touch contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

/// Tracks active touch contacts in contact order.
///
/// The pointer coordinate source is always the first active contact; a
/// reading with zero active contacts must be ignored rather than indexed.
#[derive(Debug, Default)]
pub struct TouchTracker {
    points: Vec<TouchPoint>,
}

impl TouchTracker {
    pub fn started(&mut self, point: TouchPoint) {
        if let Some(existing) = self.points.iter_mut().find(|p| p.id == point.id) {
            *existing = point;
        } else {
            self.points.push(point);
        }
    }

    pub fn moved(&mut self, point: TouchPoint) {
        if let Some(existing) = self.points.iter_mut().find(|p| p.id == point.id) {
            *existing = point;
        }
    }

    pub fn ended(&mut self, id: u64) {
        self.points.retain(|p| p.id != id);
    }

    pub fn primary(&self) -> Option<TouchPoint> {
        self.points.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Hover state of the input listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverPhase {
    Idle,
    Hovering,
}

/// Binds pointer/touch events to the viewport state and drives the eased
/// bulge transitions on hover enter/leave.
#[derive(Debug)]
pub struct InputListener {
    backend: PointerBackend,
    phase: HoverPhase,
    bulge: AnimatedScalar,
    touches: TouchTracker,
}

impl InputListener {
    pub fn new(backend: PointerBackend) -> Self {
        Self {
            backend,
            phase: HoverPhase::Idle,
            bulge: AnimatedScalar::new(0.0),
            touches: TouchTracker::default(),
        }
    }

    pub fn backend(&self) -> PointerBackend {
        self.backend
    }

    pub fn phase(&self) -> HoverPhase {
        self.phase
    }

    /// `Idle -> Hovering`: eases the bulge toward full intensity. A
    /// transition already in flight is overridden from its current value.
    pub fn pointer_entered(&mut self, now: Instant) {
        debug!("pointer entered viewport");
        self.phase = HoverPhase::Hovering;
        self.bulge
            .transition_to(1.0, HOVER_TWEEN_DURATION, Easing::ExpoOut, now);
    }

    /// `Hovering -> Idle`: eases the bulge back toward zero.
    pub fn pointer_left(&mut self, now: Instant) {
        self.phase = HoverPhase::Idle;
        self.bulge
            .transition_to(0.0, HOVER_TWEEN_DURATION, Easing::ExpoOut, now);
    }

    /// Valid in any state; updates the normalized pointer coordinate.
    pub fn pointer_moved(&mut self, x: f64, y: f64, viewport: &mut ViewportState) {
        viewport.pointer_moved(x, y);
    }

    pub fn touch_started(&mut self, point: TouchPoint, now: Instant, viewport: &mut ViewportState) {
        let was_empty = self.touches.is_empty();
        self.touches.started(point);
        if was_empty {
            self.pointer_entered(now);
        }
        self.apply_primary_touch(viewport);
    }

    pub fn touch_moved(&mut self, point: TouchPoint, viewport: &mut ViewportState) {
        self.touches.moved(point);
        self.apply_primary_touch(viewport);
    }

    pub fn touch_ended(&mut self, id: u64, now: Instant) {
        self.touches.ended(id);
        if self.touches.is_empty() {
            self.pointer_left(now);
        }
    }

    /// Reads the first active touch contact into the viewport pointer.
    /// A reading with zero active contacts is a no-op.
    pub fn apply_primary_touch(&mut self, viewport: &mut ViewportState) {
        let Some(primary) = self.touches.primary() else {
            return;
        };
        viewport.pointer_moved(primary.x, primary.y);
    }

    /// Advances the bulge animation to `now` and returns its value.
    pub fn bulge(&mut self, now: Instant) -> f32 {
        self.bulge.sample(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_normalizes_against_viewport_size() {
        let mut viewport = ViewportState::new(800, 600);
        let mut listener = InputListener::new(PointerBackend::Mouse);
        listener.pointer_moved(400.0, 150.0, &mut viewport);
        assert_eq!(viewport.pointer(), [0.5, 0.25]);
    }

    #[test]
    fn pointer_outside_viewport_is_not_clamped() {
        let mut viewport = ViewportState::new(800, 600);
        let mut listener = InputListener::new(PointerBackend::Mouse);
        listener.pointer_moved(1000.0, -60.0, &mut viewport);
        let pointer = viewport.pointer();
        assert!(pointer[0] > 1.0);
        assert!(pointer[1] < 0.0);
    }

    #[test]
    fn smoothing_converges_monotonically() {
        let mut viewport = ViewportState::new(800, 600);
        viewport.pointer_moved(800.0, 600.0);
        let target = viewport.pointer();
        let mut last_distance = f32::MAX;
        for _ in 0..50 {
            viewport.smooth(0.1);
            let smoothed = viewport.smoothed();
            let distance = (target[0] - smoothed[0]).hypot(target[1] - smoothed[1]);
            assert!(distance < last_distance);
            last_distance = distance;
        }
        assert!(last_distance < 0.01);
    }

    #[test]
    fn enter_then_leave_overrides_bulge_target() {
        let start = Instant::now();
        let mut listener = InputListener::new(PointerBackend::Mouse);
        listener.pointer_entered(start);

        // Leave before the enter transition completes.
        let mid = start + Duration::from_millis(300);
        let partial = listener.bulge(mid);
        assert!(partial > 0.0 && partial < 1.0);
        listener.pointer_left(mid);
        assert_eq!(listener.phase(), HoverPhase::Idle);

        // The bulge animates toward zero from the intermediate value.
        let after = listener.bulge(mid + Duration::from_millis(100));
        assert!(after < partial);
        let settled = listener.bulge(mid + Duration::from_secs(2));
        assert_eq!(settled, 0.0);
    }

    #[test]
    fn empty_touch_reading_leaves_pointer_unchanged() {
        let mut viewport = ViewportState::new(800, 600);
        let mut listener = InputListener::new(PointerBackend::Touch);
        listener.pointer_moved(400.0, 300.0, &mut viewport);
        let before = viewport.pointer();

        // A move for an untracked contact leaves the tracker empty; the
        // primary-touch reading must no-op instead of indexing.
        listener.touch_moved(
            TouchPoint {
                id: 9,
                x: 10.0,
                y: 10.0,
            },
            &mut viewport,
        );
        assert_eq!(viewport.pointer(), before);
    }

    #[test]
    fn first_touch_enters_and_last_touch_leaves() {
        let start = Instant::now();
        let mut viewport = ViewportState::new(800, 600);
        let mut listener = InputListener::new(PointerBackend::Touch);

        listener.touch_started(
            TouchPoint {
                id: 1,
                x: 200.0,
                y: 300.0,
            },
            start,
            &mut viewport,
        );
        assert_eq!(listener.phase(), HoverPhase::Hovering);
        assert_eq!(viewport.pointer(), [0.25, 0.5]);

        // A second contact does not retrigger the enter transition, and the
        // first contact stays the coordinate source.
        listener.touch_started(
            TouchPoint {
                id: 2,
                x: 600.0,
                y: 0.0,
            },
            start,
            &mut viewport,
        );
        assert_eq!(viewport.pointer(), [0.25, 0.5]);

        listener.touch_ended(1, start);
        assert_eq!(listener.phase(), HoverPhase::Hovering);
        listener.touch_ended(2, start + Duration::from_millis(10));
        assert_eq!(listener.phase(), HoverPhase::Idle);
    }
}
