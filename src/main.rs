use std::env;

use evodrive::simulation::controls::{Controls, Key};
use evodrive::simulation::params::Params;
use evodrive::simulation::session::Session;
use evodrive::simulation::storage::FileStore;
use macroquad::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod graphics;

/// Builds the log filter from `RUST_LOG` directives, defaulting to `info`.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn load_params() -> Params {
    let Ok(path) = env::var("EVODRIVE_CONFIG") else {
        return Params::default();
    };

    match Params::load_from_file(&path) {
        Ok(params) => {
            info!(path = %path, "loaded parameters");
            params
        }
        Err(e) => {
            warn!(path = %path, error = %e, "failed to load parameters, using defaults");
            Params::default()
        }
    }
}

const ARROWS: [(KeyCode, Key); 4] = [
    (KeyCode::Up, Key::Up),
    (KeyCode::Down, Key::Down),
    (KeyCode::Left, Key::Left),
    (KeyCode::Right, Key::Right),
];

/// Reads the arrow keys into a fresh control snapshot.
fn key_snapshot() -> Controls {
    let mut controls = Controls::default();
    for (code, key) in ARROWS {
        controls.apply_key(key, is_key_down(code));
    }
    controls
}

#[macroquad::main("Evolving Self-Driving Cars")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(env::var("RUST_LOG").ok().as_deref()))
        .init();

    let params = load_params();
    let store = FileStore::new(&params.storage_dir, &params.storage_slot);
    info!(path = %store.path().display(), "using network slot");

    let mut session = Session::new(params, Box::new(store));

    loop {
        if is_key_pressed(KeyCode::S) {
            match session.save_best() {
                Ok(true) => {}
                Ok(false) => warn!("best car has no network to save"),
                Err(e) => error!(error = %e, "failed to save best network"),
            }
        }
        if is_key_pressed(KeyCode::D) {
            if let Err(e) = session.discard_saved() {
                error!(error = %e, "failed to discard saved network");
            }
        }
        if is_key_pressed(KeyCode::R) {
            session.restart();
        }

        session.tick(key_snapshot());

        clear_background(DARKGRAY);
        graphics::draw_session(&session);
        graphics::draw_hud(&session);

        next_frame().await
    }
}

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::log_filter;

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_log_filter_honours_requested_level() {
        assert_eq!(
            log_filter(Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(
            log_filter(Some("evodrive=trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }
}
