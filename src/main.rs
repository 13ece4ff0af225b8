mod canvas;
mod input;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info, warn};
use macroquad::prelude::*;
use tokio::runtime::Runtime;

use canvas::MacroquadSurface;
use input::InputAdapter;
use scalemaker::{
    axis::Distribution,
    bars::{BAR_COUNT, BarLayout, draw_markers, draw_segments},
    device::{AudioDevice, SilentDevice},
    output::AudioEngine,
    preview::WavePreview,
    router::{InteractionRouter, Mode},
    surface::{CommandList, DrawSurface, Region, Stroke},
    voice::{ChannelDevice, VoiceBank, spawn_voice_worker},
};

const PREVIEW_FRACTION: f32 = 1.0 / 8.0;
const STATUS_MARGIN: f32 = 12.0;

#[derive(Parser, Debug)]
#[command(name = "scalemaker")]
#[command(about = "Play and sketch on a zoomable frequency axis")]
struct Cli {
    /// Initial window width in pixels
    #[arg(long, default_value_t = 1200)]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Number of horizontal bars
    #[arg(long, default_value_t = BAR_COUNT)]
    bars: usize,

    /// Frequency spacing along the axis
    #[arg(long, value_enum, default_value_t = Distribution::Linear)]
    distribution: Distribution,

    /// Interaction mode at startup
    #[arg(long, value_enum, default_value_t = Mode::Play)]
    mode: Mode,

    /// Snap line endpoints to labels and crossings
    #[arg(long)]
    snap: bool,

    /// Output level (0.0 - 1.0)
    #[arg(long, default_value_t = 0.8)]
    volume: f32,

    /// Run without opening an audio output
    #[arg(long)]
    mute: bool,
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn window_conf() -> Conf {
    let cli = Cli::parse();
    Conf {
        window_title: "Scalemaker".into(),
        fullscreen: false,
        sample_count: 1,
        window_width: cli.width as i32,
        window_height: cli.height as i32,
        window_resizable: true,
        high_dpi: false,
        ..Default::default()
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("Scalemaker v{}", env!("CARGO_PKG_VERSION"));
    let runtime = Runtime::new().context("tokio runtime")?;
    let (device, _engine) = open_audio(&cli, &runtime);

    let layout = BarLayout::new(screen_width() as f64, screen_height() as f64, cli.bars);
    let mut router = InteractionRouter::new(device, layout)
        .with_mode(cli.mode)
        .with_distribution(cli.distribution)
        .with_snapping(cli.snap);
    info!(
        "mode {}, distribution {}, {} bars",
        cli.mode.label(),
        cli.distribution.label(),
        layout.count
    );

    let mut adapter = InputAdapter::new(cli.distribution);
    let mut preview = WavePreview::new();
    let mut bar_layer = CommandList::new();
    let mut surface = MacroquadSurface;

    loop {
        let dt = get_frame_time();
        for event in adapter.poll() {
            router.dispatch(event);
        }
        router.tick(dt);
        preview.advance(router.playing_frequency(), dt as f64);

        if router.take_redraw() {
            let view = router.view();
            debug!(
                "axis redraw: {} zoom={:.2} scroll={:.1}",
                view.distribution().label(),
                view.zoom(),
                view.scroll()
            );
            bar_layer.reset();
            router.layout().draw(&mut bar_layer, &router.axis());
        }

        bar_layer.replay(&mut surface);
        draw_segments(&mut surface, router.lines(), Stroke::Sketch);
        draw_segments(&mut surface, router.preview_line().iter(), Stroke::Preview);
        if router.snapping() {
            draw_markers(&mut surface, &router.snap_points());
        }
        preview.draw(&mut surface, preview_region());
        draw_status(&mut surface, &router);

        next_frame().await;
    }
}

fn open_audio(cli: &Cli, runtime: &Runtime) -> (Box<dyn AudioDevice>, Option<AudioEngine>) {
    if cli.mute {
        info!("audio muted");
        return (Box::new(SilentDevice::default()), None);
    }
    let bank = VoiceBank::shared(cli.volume);
    match AudioEngine::start(bank.clone()) {
        Ok(engine) => {
            let tx = spawn_voice_worker(runtime, bank);
            (Box::new(ChannelDevice::new(tx)), Some(engine))
        }
        Err(err) => {
            warn!("audio output unavailable ({err:#}); continuing without sound");
            (Box::new(SilentDevice::default()), None)
        }
    }
}

fn preview_region() -> Region {
    let w = screen_width() * PREVIEW_FRACTION;
    let h = screen_height() * PREVIEW_FRACTION;
    Region::new(screen_width() - w, 0.0, w, h)
}

fn draw_status<S, D>(surface: &mut S, router: &InteractionRouter<D>)
where
    S: DrawSurface,
    D: AudioDevice,
{
    let view = router.view();
    let tone = match router.playing_frequency() {
        Some(hz) => format!("{hz:.1} Hz"),
        None => "-".to_owned(),
    };
    let status = format!(
        "{} | {} | zoom {:.2} | scroll {:.0} | {}{}",
        router.mode().label(),
        view.distribution().label(),
        view.zoom(),
        view.scroll(),
        tone,
        if router.snapping() { " | SNAP" } else { "" }
    );
    surface.fill_text(&status, STATUS_MARGIN, screen_height() - STATUS_MARGIN);
}
