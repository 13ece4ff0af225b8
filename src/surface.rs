#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Region {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stroke {
    Grid,
    Sketch,
    Preview,
    Wave,
    Marker,
}

pub trait DrawSurface {
    fn clear(&mut self, region: Region);
    fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, stroke: Stroke);
    fn fill_text(&mut self, text: &str, x: f32, y: f32);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Region),
    Line {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        stroke: Stroke,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
    },
}

/// A recorded frame. Doubles as a cache for layers that only change when
/// the view does, replayed onto the real surface every frame.
#[derive(Clone, Debug, Default)]
pub struct CommandList {
    commands: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn lines(&self, stroke: Stroke) -> impl Iterator<Item = (f32, f32, f32, f32)> + '_ {
        self.commands.iter().filter_map(move |command| match command {
            DrawCommand::Line {
                x0,
                y0,
                x1,
                y1,
                stroke: s,
            } if *s == stroke => Some((*x0, *y0, *x1, *y1)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = (&str, f32, f32)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, x, y } => Some((text.as_str(), *x, *y)),
            _ => None,
        })
    }

    pub fn replay<S: DrawSurface + ?Sized>(&self, target: &mut S) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(region) => target.clear(*region),
                DrawCommand::Line {
                    x0,
                    y0,
                    x1,
                    y1,
                    stroke,
                } => target.stroke_line(*x0, *y0, *x1, *y1, *stroke),
                DrawCommand::Text { text, x, y } => target.fill_text(text, *x, *y),
            }
        }
    }
}

impl DrawSurface for CommandList {
    fn clear(&mut self, region: Region) {
        self.commands.push(DrawCommand::Clear(region));
    }

    fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, stroke: Stroke) {
        self.commands.push(DrawCommand::Line {
            x0,
            y0,
            x1,
            y1,
            stroke,
        });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            x,
            y,
        });
    }
}
