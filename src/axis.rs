use clap::ValueEnum;

use crate::view::ViewState;

pub const MIN_FREQ: f64 = 20.0;
pub const MAX_FREQ: f64 = 1_600.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrequencyRange {
    pub min_hz: f64,
    pub max_hz: f64,
}

impl FrequencyRange {
    pub const AUDIBLE: FrequencyRange = FrequencyRange {
        min_hz: MIN_FREQ,
        max_hz: MAX_FREQ,
    };

    /// NaN is never contained.
    pub fn contains(&self, hz: f64) -> bool {
        hz >= self.min_hz && hz <= self.max_hz
    }

    fn log_bounds(&self) -> (f64, f64) {
        (self.min_hz.log10(), self.max_hz.log10())
    }
}

impl Default for FrequencyRange {
    fn default() -> Self {
        Self::AUDIBLE
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Distribution {
    #[default]
    Linear,
    #[value(alias = "log")]
    Logarithmic,
}

impl Distribution {
    pub fn label(&self) -> &'static str {
        match self {
            Distribution::Linear => "LINEAR",
            Distribution::Logarithmic => "LOG",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Distribution::Linear => Distribution::Logarithmic,
            Distribution::Logarithmic => Distribution::Linear,
        }
    }
}

/// Maps a horizontal pixel position to a frequency and back.
///
/// Zoom scales around the viewport center and scroll translates afterwards,
/// so `to_pixel` undoes `to_frequency` for every zoom/scroll pair. Neither
/// direction clamps: positions outside the viewport map to frequencies
/// outside the range and callers decide what that means.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisTransform {
    width: f64,
    distribution: Distribution,
    zoom: f64,
    scroll: f64,
    range: FrequencyRange,
}

impl AxisTransform {
    pub fn new(
        width: f64,
        distribution: Distribution,
        zoom: f64,
        scroll: f64,
        range: FrequencyRange,
    ) -> Self {
        Self {
            width,
            distribution,
            zoom,
            scroll,
            range,
        }
    }

    pub fn from_view(view: &ViewState, range: FrequencyRange) -> Self {
        Self::new(
            view.viewport_width(),
            view.distribution(),
            view.zoom(),
            view.scroll(),
            range,
        )
    }

    pub fn to_frequency(&self, pixel_x: f64) -> f64 {
        let center = self.width / 2.0;
        let adjusted = (pixel_x - center) * self.zoom + center - self.scroll;
        let ratio = adjusted / self.width;
        match self.distribution {
            Distribution::Linear => {
                self.range.min_hz + ratio * (self.range.max_hz - self.range.min_hz)
            }
            Distribution::Logarithmic => {
                let (log_min, log_max) = self.range.log_bounds();
                10f64.powf(log_min + ratio * (log_max - log_min))
            }
        }
    }

    pub fn to_pixel(&self, frequency: f64) -> f64 {
        let ratio = match self.distribution {
            Distribution::Linear => {
                (frequency - self.range.min_hz) / (self.range.max_hz - self.range.min_hz)
            }
            Distribution::Logarithmic => {
                let (log_min, log_max) = self.range.log_bounds();
                (frequency.log10() - log_min) / (log_max - log_min)
            }
        };
        let center = self.width / 2.0;
        let x = ratio * self.width;
        (x - center + self.scroll) / self.zoom + center
    }
}
