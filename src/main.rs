//! Brawl Arena entry point
//!
//! Native builds run a headless AI-versus-AI exhibition and log the result.
//! The browser build starts from `wasm::wasm_start` in the library.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use brawl_arena::consts::SIM_DT;
    use brawl_arena::sim::{CharacterKind, Controller, GameEvent, GamePhase, TickInput, tick};
    use brawl_arena::{QualityPreset, Settings};

    env_logger::init();
    log::info!("Brawl Arena (native) starting...");

    // brawl-arena [settings.json] [left] [right] [quality]
    let mut args = std::env::args().skip(1);
    let mut settings = match args.next() {
        Some(path) => {
            let path = std::path::Path::new(&path);
            let settings = Settings::load(path);
            if !path.exists() {
                if let Err(e) = settings.save(path) {
                    log::warn!("Could not write default settings: {}", e);
                }
            }
            settings
        }
        None => Settings::default(),
    };
    let left = args
        .next()
        .and_then(|id| CharacterKind::from_id(&id))
        .unwrap_or(CharacterKind::Hero);
    let right = args
        .next()
        .and_then(|id| CharacterKind::from_id(&id))
        .unwrap_or(CharacterKind::DarkMage);
    if let Some(name) = args.next() {
        match QualityPreset::from_str(&name) {
            Some(preset) => settings.quality = preset,
            None => log::warn!("Unknown quality preset {:?}", name),
        }
    }
    log::info!(
        "Quality {} ({} particles max)",
        settings.quality.as_str(),
        settings.max_particles()
    );
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut state = settings.new_match(seed, [left, right]);
    state.controllers = [Controller::Ai, Controller::Ai];
    state.start_match();

    let input = TickInput::default();
    let max_steps = (120.0 / SIM_DT) as usize;
    for _ in 0..max_steps {
        tick(&mut state, &input, SIM_DT);
        for event in state.take_events() {
            match event {
                GameEvent::Hit {
                    attacker,
                    damage,
                    combo,
                    ..
                } => log::debug!("slot {attacker} hit for {damage:.1} (x{combo})"),
                GameEvent::SpecialUsed { caster, ability, .. } => {
                    log::info!("slot {caster} used {ability}")
                }
                GameEvent::Eliminated { slot } => log::info!("slot {slot} eliminated"),
                _ => {}
            }
        }
        if state.phase == GamePhase::Victory {
            break;
        }
    }

    let health: Vec<String> = state
        .characters
        .iter()
        .map(|c| format!("{} {:.0}/{:.0}", c.name, c.health, c.max_health))
        .collect();
    match state.winner_name() {
        Some(winner) => println!(
            "{winner} after {:.1}s ({})",
            state.game_time,
            health.join(", ")
        ),
        None => println!(
            "Time limit reached after {:.1}s ({})",
            state.game_time,
            health.join(", ")
        ),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_start, this is just to satisfy the compiler
}
