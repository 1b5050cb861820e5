//! The owned session aggregate: live settings, the "previous" and committed
//! snapshots, the camera, and the canvas.

use crate::chaos::{ChaosCanvas, SeededRng};
use crate::settings::{CameraOffset, SimulationSettings};

const PAN_SPEED: f64 = 10.0;

pub struct ChaosSession {
    settings: SimulationSettings,
    previous: Option<SimulationSettings>,
    committed: SimulationSettings,
    camera: CameraOffset,
    canvas: ChaosCanvas,
}

impl ChaosSession {
    pub fn new(settings: SimulationSettings, width: usize, height: usize) -> Self {
        let settings = settings.sanitized();
        let mut canvas = ChaosCanvas::new(width, height);
        canvas.rebuild_colors(settings.outer_iterations);
        let mut session = Self {
            settings,
            previous: None,
            committed: settings,
            camera: CameraOffset::default(),
            canvas,
        };
        session.rerender();
        session
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Direct field access for the GUI bindings; call [`ChaosSession::apply_edits`]
    /// after any change.
    pub fn settings_mut(&mut self) -> &mut SimulationSettings {
        &mut self.settings
    }

    pub fn previous(&self) -> Option<&SimulationSettings> {
        self.previous.as_ref()
    }

    /// The last committed settings; what persistence and share codes carry.
    pub fn committed_settings(&self) -> &SimulationSettings {
        &self.committed
    }

    pub fn camera(&self) -> CameraOffset {
        self.camera
    }

    pub fn dimensions(&self) -> [usize; 2] {
        self.canvas.dimensions()
    }

    pub fn pixels(&self) -> &[u8] {
        self.canvas.pixels()
    }

    pub fn color_count(&self) -> usize {
        self.canvas.color_count()
    }

    pub fn rerender(&mut self) {
        self.canvas.render(&self.settings, self.camera);
    }

    /// Per-field edit path: sanitize, rebuild the color table if the
    /// trajectory count moved, rerender. Does not commit.
    pub fn apply_edits(&mut self) {
        self.settings = self.settings.sanitized();
        if self.color_count() != self.settings.outer_iterations as usize {
            self.canvas.rebuild_colors(self.settings.outer_iterations);
        }
        self.rerender();
    }

    /// Marks the live settings as the state to persist and share.
    pub fn commit_edits(&mut self) {
        self.committed = self.settings;
    }

    /// Adopts externally decoded settings (storage blob or share code).
    pub fn apply_settings(&mut self, settings: SimulationSettings) {
        self.settings = settings.sanitized();
        self.refresh();
    }

    pub fn reset_to_default(&mut self) {
        self.previous = Some(self.settings);
        self.settings = SimulationSettings::default();
        self.refresh();
    }

    /// Two-way swap with the snapshot slot; no-op while the slot is empty.
    pub fn restore_previous(&mut self) {
        let Some(previous) = self.previous else {
            return;
        };
        self.previous = Some(std::mem::replace(&mut self.settings, previous));
        self.refresh();
    }

    /// Draws a fresh parameter set from a clock-seeded generator, in the
    /// original's draw order. `offset_min`/`offset_max` stay unordered.
    pub fn randomize(&mut self) {
        self.previous = Some(self.settings);

        let mut rng = SeededRng::from_clock();
        let mut next = SimulationSettings::default();
        next.seed = rng.uniform(0.0, 9999.0).floor() as u64;
        next.periodicity = rng.uniform(1.0, 100.0).floor() as u32;
        next.coupling_constant =
            1.0 - (1.0 + rng.uniform(1.0, 100.0).sqrt()) / rng.uniform(1.0, 100.0);
        next.pi_factor = rng.uniform(1.0, 100.0).floor();
        next.offset_min = rng.uniform(-50.0, 50.0).floor();
        next.offset_max = rng.uniform(-50.0, 50.0).floor();

        self.settings = next.sanitized();
        self.refresh();
    }

    /// One key tick per axis; the step shrinks as the view zooms in.
    pub fn pan(&mut self, direction_x: f64, direction_y: f64) {
        self.camera.x += direction_x * PAN_SPEED / self.settings.scale;
        self.camera.y += direction_y * PAN_SPEED / self.settings.scale;
        self.rerender();
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if self.canvas.dimensions() == [width, height] {
            return;
        }
        self.canvas.resize(width, height);
        self.rerender();
    }

    // Lifecycle operations land here: rebuild colors, rerender, commit.
    fn refresh(&mut self) {
        self.canvas.rebuild_colors(self.settings.outer_iterations);
        self.rerender();
        self.commit_edits();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom_settings() -> SimulationSettings {
        SimulationSettings {
            seed: 77,
            outer_iterations: 12,
            inner_iterations: 34,
            periodicity: 9,
            ..SimulationSettings::default()
        }
    }

    #[test]
    fn reset_then_restore_twice_is_a_true_swap() {
        let a = custom_settings();
        let mut session = ChaosSession::new(a, 64, 64);

        session.reset_to_default();
        assert_eq!(*session.settings(), SimulationSettings::default());
        assert_eq!(session.previous(), Some(&a));

        session.restore_previous();
        assert_eq!(*session.settings(), a);
        assert_eq!(session.previous(), Some(&SimulationSettings::default()));

        session.restore_previous();
        assert_eq!(*session.settings(), SimulationSettings::default());
        assert_eq!(session.previous(), Some(&a));
    }

    #[test]
    fn restore_without_a_snapshot_is_a_no_op() {
        let mut session = ChaosSession::new(custom_settings(), 64, 64);
        session.restore_previous();
        assert_eq!(*session.settings(), custom_settings());
        assert!(session.previous().is_none());
    }

    #[test]
    fn color_table_tracks_outer_iterations_through_every_operation() {
        let mut session = ChaosSession::new(custom_settings(), 64, 64);
        assert_eq!(session.color_count(), 12);

        session.settings_mut().outer_iterations = 5;
        session.apply_edits();
        assert_eq!(session.color_count(), 5);

        session.reset_to_default();
        assert_eq!(session.color_count(), 1000);

        session.randomize();
        assert_eq!(
            session.color_count(),
            session.settings().outer_iterations as usize
        );

        session.restore_previous();
        assert_eq!(session.color_count(), 1000);
    }

    #[test]
    fn randomize_draws_stay_in_their_documented_ranges() {
        let mut session = ChaosSession::new(SimulationSettings::default(), 32, 32);
        for _ in 0..20 {
            session.randomize();
            let s = *session.settings();
            assert!(s.seed < 9999);
            assert!((1..100).contains(&s.periodicity));
            assert!((1.0..100.0).contains(&s.pi_factor));
            assert!((-10.0..1.0).contains(&s.coupling_constant));
            assert!((-50.0..50.0).contains(&s.offset_min));
            assert!((-50.0..50.0).contains(&s.offset_max));
        }
    }

    #[test]
    fn randomize_snapshots_the_outgoing_settings() {
        let a = custom_settings();
        let mut session = ChaosSession::new(a, 32, 32);
        session.randomize();
        assert_eq!(session.previous(), Some(&a));
    }

    #[test]
    fn live_edits_do_not_move_the_committed_snapshot_until_commit() {
        let mut session = ChaosSession::new(custom_settings(), 32, 32);
        assert_eq!(*session.committed_settings(), custom_settings());

        // mid-drag: rendered live, but not yet the persisted state
        session.settings_mut().seed = 4242;
        session.apply_edits();
        assert_eq!(session.settings().seed, 4242);
        assert_eq!(session.committed_settings().seed, 77);

        session.commit_edits();
        assert_eq!(session.committed_settings().seed, 4242);
    }

    #[test]
    fn lifecycle_operations_commit_immediately() {
        let mut session = ChaosSession::new(custom_settings(), 32, 32);

        session.reset_to_default();
        assert_eq!(*session.committed_settings(), SimulationSettings::default());

        session.randomize();
        assert_eq!(session.committed_settings(), session.settings());

        session.restore_previous();
        assert_eq!(session.committed_settings(), session.settings());

        session.apply_settings(custom_settings());
        assert_eq!(*session.committed_settings(), custom_settings());
    }

    #[test]
    fn camera_survives_parameter_lifecycle_operations() {
        let mut session = ChaosSession::new(custom_settings(), 64, 64);
        session.pan(1.0, -1.0);
        let panned = session.camera();
        assert!(panned != CameraOffset::default());

        session.reset_to_default();
        session.randomize();
        session.restore_previous();
        assert_eq!(session.camera(), panned);
    }

    #[test]
    fn pan_step_scales_inversely_with_zoom() {
        let mut settings = custom_settings();
        settings.scale = 10.0;
        let mut session = ChaosSession::new(settings, 64, 64);
        session.pan(1.0, 0.0);
        assert!((session.camera().x - 1.0).abs() < 1e-12);

        settings.scale = 40.0;
        let mut session = ChaosSession::new(settings, 64, 64);
        session.pan(0.0, 1.0);
        assert!((session.camera().y - 0.25).abs() < 1e-12);
    }

    #[test]
    fn resize_rerenders_at_the_new_dimensions() {
        let mut session = ChaosSession::new(custom_settings(), 64, 64);
        session.resize(100, 40);
        assert_eq!(session.dimensions(), [100, 40]);
        assert_eq!(session.pixels().len(), 100 * 40 * 4);

        // same render as a session born at that size
        let twin = ChaosSession::new(custom_settings(), 100, 40);
        assert_eq!(session.pixels(), twin.pixels());
    }

    #[test]
    fn apply_settings_sanitizes_before_rendering() {
        let mut session = ChaosSession::new(SimulationSettings::default(), 32, 32);
        session.apply_settings(SimulationSettings {
            outer_iterations: 0,
            periodicity: 0,
            scale: -1.0,
            ..SimulationSettings::default()
        });
        assert_eq!(session.settings().outer_iterations, 1);
        assert_eq!(session.settings().periodicity, 1);
        assert!(session.settings().scale > 0.0);
        assert_eq!(session.color_count(), 1);
    }
}
