pub mod axis;
pub mod bars;
pub mod device;
pub mod geometry;
pub mod output;
pub mod preview;
pub mod router;
pub mod snap;
pub mod surface;
pub mod tone;
pub mod view;
pub mod voice;
