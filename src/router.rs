use clap::ValueEnum;
use log::{debug, info};

use crate::{
    axis::{AxisTransform, Distribution, FrequencyRange},
    bars::BarLayout,
    device::AudioDevice,
    geometry::{LineSegment, Point},
    snap::{SNAP_RADIUS, SnapPoints},
    tone::ToneController,
    view::ViewState,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    #[default]
    Play,
    Line,
    Subdivide,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Play => "PLAY",
            Mode::Line => "LINE",
            Mode::Subdivide => "SUBDIVIDE",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    Wheel { delta_x: f64, delta_y: f64, ctrl_held: bool },
    Pinch { scale: f64 },
    SelectMode(Mode),
    SelectDistribution(Distribution),
    Resize { width: f64, height: f64 },
    ClearLines,
    ToggleSnap,
}

/// Owns the session state and routes normalized input to it.
pub struct InteractionRouter<D> {
    mode: Mode,
    view: ViewState,
    layout: BarLayout,
    range: FrequencyRange,
    tone: ToneController<D>,
    pointer_held: bool,
    drag_start: Option<Point>,
    preview: Option<LineSegment>,
    lines: Vec<LineSegment>,
    snap: SnapPoints,
    snapping: bool,
}

impl<D: AudioDevice> InteractionRouter<D> {
    pub fn new(device: D, layout: BarLayout) -> Self {
        let range = FrequencyRange::AUDIBLE;
        Self {
            mode: Mode::Play,
            view: ViewState::new(layout.width),
            layout,
            range,
            tone: ToneController::new(device, range),
            pointer_held: false,
            drag_start: None,
            preview: None,
            lines: Vec::new(),
            snap: SnapPoints::new(SNAP_RADIUS),
            snapping: false,
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.view.set_distribution(distribution);
        self
    }

    pub fn with_snapping(mut self, snapping: bool) -> Self {
        self.snapping = snapping;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn layout(&self) -> &BarLayout {
        &self.layout
    }

    pub fn axis(&self) -> AxisTransform {
        self.view.transform(self.range)
    }

    pub fn tone(&self) -> &ToneController<D> {
        &self.tone
    }

    pub fn lines(&self) -> &[LineSegment] {
        &self.lines
    }

    pub fn preview_line(&self) -> Option<LineSegment> {
        self.preview
    }

    pub fn snapping(&self) -> bool {
        self.snapping
    }

    pub fn snap_points(&self) -> Vec<Point> {
        let mut points = self.layout.label_anchors(&self.axis());
        points.extend_from_slice(self.snap.intersections());
        points
    }

    /// Frequency currently shown by the waveform preview.
    pub fn playing_frequency(&self) -> Option<f64> {
        self.tone.current_frequency()
    }

    pub fn take_redraw(&mut self) -> bool {
        self.view.take_redraw()
    }

    pub fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => self.pointer_down(Point::new(x, y)),
            InputEvent::PointerMove { x, y } => self.pointer_move(Point::new(x, y)),
            InputEvent::PointerUp { x, y } => self.pointer_up(Point::new(x, y)),
            InputEvent::Wheel {
                delta_x,
                delta_y,
                ctrl_held,
            } => self.view.apply_wheel(delta_x, delta_y, ctrl_held),
            InputEvent::Pinch { scale } => self.view.apply_pinch(scale),
            InputEvent::SelectMode(mode) => self.select_mode(mode),
            InputEvent::SelectDistribution(distribution) => {
                info!("distribution {}", distribution.label());
                self.view.set_distribution(distribution);
            }
            InputEvent::Resize { width, height } => self.resize(width, height),
            InputEvent::ClearLines => {
                debug!("clearing {} lines", self.lines.len());
                self.lines.clear();
                self.snap.clear();
            }
            InputEvent::ToggleSnap => {
                self.snapping = !self.snapping;
                info!("snapping {}", if self.snapping { "on" } else { "off" });
            }
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.tone.tick(dt);
    }

    fn resize(&mut self, width: f64, height: f64) {
        // Minimized windows report a zero-sized canvas.
        if !(width >= 1.0 && height >= 1.0) {
            debug!("ignoring resize to {width}x{height}");
            return;
        }
        self.layout = BarLayout::new(width, height, self.layout.count);
        self.view.set_viewport_width(width);
        self.view.request_redraw();
    }

    fn select_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        self.tone.stop();
        self.pointer_held = false;
        self.drag_start = None;
        self.preview = None;
        info!("mode {} -> {}", self.mode.label(), mode.label());
        self.mode = mode;
    }

    fn pointer_down(&mut self, point: Point) {
        self.pointer_held = true;
        match self.mode {
            Mode::Play => self.play_at(point.x),
            Mode::Line => {
                let start = self.snapped(point);
                self.drag_start = Some(start);
                self.preview = Some(LineSegment::between(start, start));
            }
            Mode::Subdivide => debug!("subdivide is not implemented; ignoring click"),
        }
    }

    fn pointer_move(&mut self, point: Point) {
        if !self.pointer_held {
            return;
        }
        match self.mode {
            Mode::Play => self.play_at(point.x),
            Mode::Line => {
                if let Some(start) = self.drag_start {
                    self.preview = Some(LineSegment::between(start, point));
                }
            }
            Mode::Subdivide => {}
        }
    }

    fn pointer_up(&mut self, point: Point) {
        self.pointer_held = false;
        match self.mode {
            Mode::Play => self.tone.stop(),
            Mode::Line => {
                self.preview = None;
                if let Some(start) = self.drag_start.take() {
                    let end = self.snapped(point);
                    self.commit(LineSegment::between(start, end));
                }
            }
            Mode::Subdivide => {}
        }
    }

    fn play_at(&mut self, x: f64) {
        let frequency = self.axis().to_frequency(x);
        self.tone.set_target(frequency);
    }

    fn snapped(&self, point: Point) -> Point {
        if !self.snapping {
            return point;
        }
        let anchors = self.layout.label_anchors(&self.axis());
        self.snap.snap(point, &anchors)
    }

    fn commit(&mut self, line: LineSegment) {
        let crossings = self.snap.add_line(&line, &self.lines);
        debug!("line committed {line:?} ({crossings} new crossings)");
        self.lines.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        device::RecordingDevice,
        tone::ToneState,
    };

    fn router() -> InteractionRouter<RecordingDevice> {
        InteractionRouter::new(RecordingDevice::new(), BarLayout::new(1200.0, 720.0, 12))
    }

    #[test]
    fn play_press_starts_tone_at_mapped_frequency() {
        let mut r = router();
        r.dispatch(InputEvent::PointerDown { x: 600.0, y: 10.0 });
        let hz = r.playing_frequency().expect("sounding");
        assert!((hz - 810.0).abs() < 1e-9);
    }

    #[test]
    fn play_move_without_press_is_silent() {
        let mut r = router();
        r.dispatch(InputEvent::PointerMove { x: 600.0, y: 10.0 });
        assert_eq!(r.tone().state(), ToneState::Silent);
    }

    #[test]
    fn mode_switch_stops_tone() {
        let mut r = router();
        r.dispatch(InputEvent::PointerDown { x: 600.0, y: 10.0 });
        r.dispatch(InputEvent::SelectMode(Mode::Line));
        assert_eq!(r.playing_frequency(), None);
        r.tick(0.02);
        assert_eq!(r.tone().state(), ToneState::Silent);
    }

    #[test]
    fn mode_switch_ends_held_gesture() {
        let mut r = router().with_mode(Mode::Line);
        r.dispatch(InputEvent::PointerDown { x: 100.0, y: 50.0 });
        r.dispatch(InputEvent::SelectMode(Mode::Play));
        r.dispatch(InputEvent::PointerMove { x: 600.0, y: 50.0 });
        assert_eq!(r.tone().state(), ToneState::Silent);
        assert!(r.tone().device().calls().is_empty());
        assert_eq!(r.preview_line(), None);
    }

    #[test]
    fn subdivide_clicks_do_nothing() {
        let mut r = router().with_mode(Mode::Subdivide);
        r.dispatch(InputEvent::PointerDown { x: 10.0, y: 10.0 });
        r.dispatch(InputEvent::PointerMove { x: 50.0, y: 10.0 });
        r.dispatch(InputEvent::PointerUp { x: 50.0, y: 10.0 });
        assert!(r.lines().is_empty());
        assert!(r.tone().device().calls().is_empty());
    }

    #[test]
    fn line_preview_tracks_pointer() {
        let mut r = router().with_mode(Mode::Line);
        r.dispatch(InputEvent::PointerDown { x: 100.0, y: 50.0 });
        assert_eq!(
            r.preview_line(),
            Some(LineSegment::new(100.0, 50.0, 100.0, 50.0))
        );
        r.dispatch(InputEvent::PointerMove { x: 180.0, y: 60.0 });
        assert_eq!(
            r.preview_line(),
            Some(LineSegment::new(100.0, 50.0, 180.0, 60.0))
        );
        assert!(r.lines().is_empty());
    }

    #[test]
    fn pointer_up_without_down_commits_nothing() {
        let mut r = router().with_mode(Mode::Line);
        r.dispatch(InputEvent::PointerUp { x: 10.0, y: 10.0 });
        assert!(r.lines().is_empty());
    }

    #[test]
    fn snapping_pulls_endpoints_onto_label_anchor() {
        let mut r = router().with_mode(Mode::Line).with_snapping(true);
        let anchor = r.layout().label_anchors(&r.axis())[1];
        r.dispatch(InputEvent::PointerDown {
            x: anchor.x + 6.0,
            y: anchor.y - 8.0,
        });
        r.dispatch(InputEvent::PointerUp { x: 900.0, y: 40.0 });
        let line = r.lines()[0];
        assert_eq!(line.start(), anchor);
        assert_eq!(line.end(), Point::new(900.0, 40.0));
    }

    #[test]
    fn clear_lines_empties_list() {
        let mut r = router().with_mode(Mode::Line);
        r.dispatch(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        r.dispatch(InputEvent::PointerUp { x: 10.0, y: 10.0 });
        assert_eq!(r.lines().len(), 1);
        r.dispatch(InputEvent::ClearLines);
        assert!(r.lines().is_empty());
    }

    #[test]
    fn resize_updates_layout_and_view() {
        let mut r = router();
        r.dispatch(InputEvent::Resize {
            width: 800.0,
            height: 600.0,
        });
        assert_eq!(r.view().viewport_width(), 800.0);
        assert_eq!(r.layout().height, 600.0);
        assert!((r.axis().to_frequency(800.0) - 1600.0).abs() < 1e-9);
    }

    #[test]
    fn minimized_window_keeps_last_layout() {
        let mut r = router();
        r.take_redraw();
        r.dispatch(InputEvent::Resize {
            width: 0.0,
            height: 0.0,
        });
        assert_eq!(r.layout().width, 1200.0);
        assert_eq!(r.view().viewport_width(), 1200.0);
        assert!(!r.take_redraw());
    }
}
