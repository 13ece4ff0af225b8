use macroquad::prelude::*;

use scalemaker::{
    axis::Distribution,
    router::{InputEvent, Mode},
};

/// Wheel notches are reported as lines; the zoom/scroll rates expect pixels.
const WHEEL_PIXELS_PER_LINE: f64 = 10.0;

/// Turns macroquad's polled input state into router events.
pub struct InputAdapter {
    last_pointer: Option<Vec2>,
    pinch_span: Option<f32>,
    screen: (f32, f32),
    distribution: Distribution,
}

impl InputAdapter {
    pub fn new(distribution: Distribution) -> Self {
        Self {
            last_pointer: None,
            pinch_span: None,
            screen: (screen_width(), screen_height()),
            distribution,
        }
    }

    pub fn poll(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        self.poll_resize(&mut events);
        self.poll_keys(&mut events);
        self.poll_pointer(&mut events);
        self.poll_wheel(&mut events);
        self.poll_pinch(&mut events);
        events
    }

    fn poll_resize(&mut self, events: &mut Vec<InputEvent>) {
        let size = (screen_width(), screen_height());
        if size != self.screen {
            self.screen = size;
            events.push(InputEvent::Resize {
                width: size.0 as f64,
                height: size.1 as f64,
            });
        }
    }

    fn poll_keys(&mut self, events: &mut Vec<InputEvent>) {
        for (key, mode) in [
            (KeyCode::Key1, Mode::Play),
            (KeyCode::Key2, Mode::Line),
            (KeyCode::Key3, Mode::Subdivide),
        ] {
            if is_key_pressed(key) {
                events.push(InputEvent::SelectMode(mode));
            }
        }
        if is_key_pressed(KeyCode::D) {
            self.distribution = self.distribution.toggled();
            events.push(InputEvent::SelectDistribution(self.distribution));
        }
        if is_key_pressed(KeyCode::C) {
            events.push(InputEvent::ClearLines);
        }
        if is_key_pressed(KeyCode::S) {
            events.push(InputEvent::ToggleSnap);
        }
    }

    fn poll_pointer(&mut self, events: &mut Vec<InputEvent>) {
        let (x, y) = mouse_position();
        let position = vec2(x, y);
        let (x, y) = (x as f64, y as f64);
        if is_mouse_button_pressed(MouseButton::Left) {
            events.push(InputEvent::PointerDown { x, y });
        } else if is_mouse_button_down(MouseButton::Left) && self.last_pointer != Some(position) {
            events.push(InputEvent::PointerMove { x, y });
        }
        if is_mouse_button_released(MouseButton::Left) {
            events.push(InputEvent::PointerUp { x, y });
        }
        self.last_pointer = Some(position);
    }

    fn poll_wheel(&mut self, events: &mut Vec<InputEvent>) {
        let (wheel_x, wheel_y) = mouse_wheel();
        if wheel_x.abs() <= f32::EPSILON && wheel_y.abs() <= f32::EPSILON {
            return;
        }
        let ctrl_held = is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl);
        let shift_held = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);
        // Plain mice only have a vertical wheel; shift turns it into a pan.
        let (wheel_x, wheel_y) = if shift_held && !ctrl_held {
            (wheel_y, 0.0)
        } else {
            (wheel_x, wheel_y)
        };
        events.push(InputEvent::Wheel {
            delta_x: -(wheel_x as f64) * WHEEL_PIXELS_PER_LINE,
            delta_y: -(wheel_y as f64) * WHEEL_PIXELS_PER_LINE,
            ctrl_held,
        });
    }

    fn poll_pinch(&mut self, events: &mut Vec<InputEvent>) {
        let active: Vec<Vec2> = touches()
            .iter()
            .filter(|touch| !matches!(touch.phase, TouchPhase::Ended | TouchPhase::Cancelled))
            .map(|touch| touch.position)
            .collect();
        if active.len() != 2 {
            self.pinch_span = None;
            return;
        }
        let span = active[0].distance(active[1]);
        if let Some(previous) = self.pinch_span {
            if previous > f32::EPSILON && (span - previous).abs() > f32::EPSILON {
                events.push(InputEvent::Pinch {
                    scale: (span / previous) as f64,
                });
            }
        }
        self.pinch_span = Some(span);
    }
}
