//! Headless симуляция horde
//!
//! Игрок ходит по кругу и иногда стреляет, зомби реагируют.
//! `horde_simulation [settings.toml]`: опциональный файл настроек.

use bevy::prelude::*;
use horde_simulation::{
    create_headless_app, format_time, log_error, log_info, spawn_zombie, Arena, HordeSettings,
    HordeWorld, PlayerFired, PlayerPose, SimulationPlugin, ZombieState,
};

const SEED: u64 = 42;
const ZOMBIE_COUNT: usize = 8;
const TICK_COUNT: usize = 60 * 60;

fn load_settings() -> HordeSettings {
    let Some(path) = std::env::args().nth(1) else {
        return HordeSettings::default();
    };

    match HordeSettings::load(&path) {
        Ok(settings) => {
            log_info(&format!("Loaded settings from {}", path));
            settings
        }
        Err(err) => {
            log_error(&format!("Failed to load {}: {}, using defaults", path, err));
            HordeSettings::default()
        }
    }
}

fn main() {
    println!("Starting horde headless simulation (seed: {})", SEED);

    let mut app = create_headless_app(SEED);
    app.add_plugins(SimulationPlugin::new(load_settings(), Arena::default()));

    for i in 0..ZOMBIE_COUNT {
        let angle = i as f32 / ZOMBIE_COUNT as f32 * std::f32::consts::TAU;
        let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * 20.0;
        spawn_zombie(&mut app, position, -position.normalize());
    }

    for tick in 0..TICK_COUNT {
        // Игрок: круг радиуса 8 со скоростью ~4 м/с
        let t = tick as f32 / 60.0;
        let angle = t * 0.5;
        let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * 8.0;
        let velocity = Vec3::new(-angle.sin(), 0.0, angle.cos()) * 4.0;
        *app.world_mut().resource_mut::<PlayerPose>() = PlayerPose {
            position,
            velocity,
            grounded: true,
            present: true,
        };

        if tick % 180 == 0 {
            app.world_mut().send_event(PlayerFired { position });
        }

        app.update();

        if tick % 300 == 0 {
            let world = app.world().non_send_resource::<HordeWorld>();
            let views = world.views();
            let chasing = views.iter().filter(|v| v.state == ZombieState::Chase).count();
            let round = world.round();
            println!(
                "Tick {}: {} zombies ({} chasing), time left {}, score {}",
                tick,
                views.len(),
                chasing,
                format_time(round.time_left()),
                round.score()
            );
            if round.is_game_over() {
                println!("{}", round.status_text());
                break;
            }
        }
    }

    println!("Simulation complete!");
}
