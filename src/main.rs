//! Orb Field entry point
//!
//! On the web this mounts the field and the cursor follower onto the page.
//! Natively it runs a headless session and prints the final state.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Container the page reserves for the field
#[cfg(target_arch = "wasm32")]
const CONTAINER_ID: &str = "orb-field";

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    log::info!("Orb Field starting...");
    if !orb_field::web::install_page(CONTAINER_ID) {
        log::warn!("Orb field not mounted");
    }
    orb_field::cursor::init();
}

/// Page teardown hook for the host (SPA route change, unload)
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = unmountPage)]
pub fn unmount_page() -> bool {
    orb_field::web::unmount_page()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use orb_field::consts::FRAME_MS;
    use orb_field::{Bounds, FieldConfig, HeadlessSurface, OrbField};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(42);
    let ticks = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or(600);

    log::info!("Orb Field (native) starting: seed {}, {} ticks", seed, ticks);

    let config = FieldConfig::default();
    let orb_count = config.orb_count;
    let mut field = OrbField::with_seed(config, seed);
    let surface = HeadlessSurface::new(Bounds::new(1280.0, 720.0));
    if !field.start(Some(surface), orb_count) {
        std::process::exit(1);
    }

    for i in 0..ticks {
        field.frame(i as f64 * FRAME_MS);
    }

    if let Some(surface) = field.surface() {
        log::info!("{} ticks, {} element draws", field.ticks(), surface.draws);
    }
    let min_speed = field
        .store()
        .orbs
        .iter()
        .map(|orb| orb.speed())
        .fold(f32::INFINITY, f32::min);
    log::info!("Slowest orb: {:.3} px/tick", min_speed);

    match field.snapshot_json() {
        Ok(json) => println!("{}", json),
        Err(err) => {
            log::error!("Failed to serialize orbs: {}", err);
            std::process::exit(1);
        }
    }
    field.stop();
}
