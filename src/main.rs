mod app;
mod camera;
mod components;
mod engine;
mod objects;
mod scene;
mod spatial;
mod systems;

use std::time::Duration;

use app::ParkApp;
use clap::Parser;
use engine::input::InputFrame;
use engine::time::FrameTimer;
use hecs::World;
use objects::ObjectName;
use scene::park::build_park;

#[derive(Parser)]
#[command(name = "meadow", about = "Portfolio park simulation")]
struct Args {
    /// Number of frames to simulate before exiting
    #[arg(long, default_value_t = 600)]
    frames: u64,
    /// Seed for the bounce physics
    #[arg(long, default_value_t = 7)]
    seed: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut world = World::new();
    build_park(&mut world);
    let scan = match scene::scan(&mut world) {
        Ok(scan) => scan,
        Err(err) => {
            log::error!("scene scan failed: {err}");
            return;
        }
    };

    let mut app = ParkApp::new(world, scan, 16.0 / 9.0, args.seed);
    app.finish_loading();
    app.start();

    let mut timer = FrameTimer::new();
    let mut now_ms: u64 = 0;

    // Scripted session: walk north for two seconds, then poke a critter and
    // a panel object, then idle while the bounce settles.
    for frame in 0..args.frames {
        std::thread::sleep(Duration::from_millis(16));
        timer.tick();
        now_ms += (timer.dt * 1000.0) as u64;

        let mut input = InputFrame {
            up: frame < 120,
            ..Default::default()
        };
        if frame == 150 {
            if let Some(ndc) = app.ndc_of(ObjectName::Pikachu) {
                input.pointer_ndc = ndc;
                input.clicked = true;
            }
        }
        if frame == 300 {
            if let Some(ndc) = app.ndc_of(ObjectName::Chest) {
                input.pointer_ndc = ndc;
                input.clicked = true;
            }
        }

        let events = app.frame(&input, timer.dt, now_ms);
        for sound in &events.sounds {
            log::debug!("frame {frame}: sound {sound:?}");
        }
        for panel in &events.panels {
            log::info!("frame {frame}: open panel {}", panel.as_str());
        }
    }

    if let Some(player) = &app.player {
        log::info!(
            "session over after {} frames, player at {:?}, {} bounce(s) still running",
            args.frames,
            player.position(),
            app.bounces_running()
        );
    }
}
