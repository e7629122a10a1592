//! Browser host
//!
//! Mounts an `OrbField` on a DOM container, drives it from
//! `requestAnimationFrame`, and follows window resizes. The returned handle
//! stops everything, either explicitly or when dropped.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;

use crate::config::FieldConfig;
use crate::consts::FRAME_MS;
use crate::cursor;
use crate::lifecycle::OrbField;
use crate::render::DomSurface;

/// Container attribute holding a JSON `FieldConfig`
pub const CONFIG_ATTRIBUTE: &str = "data-orb-config";

struct Host {
    field: OrbField<DomSurface>,
    /// Pending animation frame, cancelled on stop
    frame_request: Option<i32>,
    last_frame_ms: Option<f64>,
    on_resize: Option<Closure<dyn FnMut(web_sys::Event)>>,
}

/// A running orb field; call `stop()` (or drop it) on unmount
#[wasm_bindgen]
pub struct OrbFieldHandle {
    host: Rc<RefCell<Host>>,
}

/// Start an orb field in `#container_id`. Returns `None` (after logging a
/// warning) when the container is missing.
#[wasm_bindgen]
pub fn mount(container_id: &str, config_json: Option<String>) -> Option<OrbFieldHandle> {
    let config = FieldConfig::from_json_or_default(config_json.as_deref());
    let seed = config.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
    let orb_count = config.orb_count;

    let surface = DomSurface::find(container_id);
    if surface.is_none() {
        log::warn!("Orb container #{} not found", container_id);
    }
    let mut field = OrbField::with_seed(config, seed);
    if !field.start(surface, orb_count) {
        return None;
    }

    let host = Rc::new(RefCell::new(Host {
        field,
        frame_request: None,
        last_frame_ms: None,
        on_resize: None,
    }));
    install_resize_listener(&host);
    request_frame(&host);

    Some(OrbFieldHandle { host })
}

#[wasm_bindgen]
impl OrbFieldHandle {
    /// Cancel the frame loop, detach listeners, and remove every orb element.
    /// Returns false if already stopped.
    pub fn stop(&self) -> bool {
        let Ok(mut host) = self.host.try_borrow_mut() else {
            log::warn!("Orb field busy, stop ignored");
            return false;
        };
        if let Some(window) = web_sys::window() {
            if let Some(id) = host.frame_request.take() {
                let _ = window.cancel_animation_frame(id);
            }
            if let Some(on_resize) = host.on_resize.take() {
                let _ = window.remove_event_listener_with_callback(
                    "resize",
                    on_resize.as_ref().unchecked_ref(),
                );
            }
        }
        host.field.stop()
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.host.borrow().field.is_running()
    }

    /// Current orb positions and velocities as JSON
    pub fn snapshot(&self) -> Option<String> {
        self.host.borrow().field.snapshot_json().ok()
    }
}

impl Drop for OrbFieldHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn install_resize_listener(host: &Rc<RefCell<Host>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let weak = Rc::downgrade(host);
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
        if let Some(host) = weak.upgrade() {
            host.borrow_mut().field.resize_to_surface();
        }
    });
    let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    host.borrow_mut().on_resize = Some(closure);
}

fn request_frame(host: &Rc<RefCell<Host>>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    // Weak: a cancelled callback must not keep the field alive
    let weak = Rc::downgrade(host);
    let closure = Closure::once(move |time: f64| {
        frame(weak, time);
    });
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => host.borrow_mut().frame_request = Some(id),
        Err(err) => log::error!("requestAnimationFrame failed: {:?}", err),
    }
    closure.forget();
}

fn frame(host: Weak<RefCell<Host>>, time: f64) {
    let Some(host) = host.upgrade() else {
        return;
    };
    let dt_ms = {
        let mut h = host.borrow_mut();
        h.frame_request = None;
        // Stopped between scheduling and firing
        if !h.field.is_running() {
            return;
        }
        let dt = h.last_frame_ms.map_or(FRAME_MS, |last| time - last);
        h.last_frame_ms = Some(time);
        h.field.frame(time);
        dt
    };

    cursor::step(dt_ms as f32);
    request_frame(&host);
}

thread_local! {
    static PAGE_FIELD: RefCell<Option<OrbFieldHandle>> = const { RefCell::new(None) };
}

/// Mount the page's field on `#container_id`, reading config from its
/// `data-orb-config` attribute. Returns false if one is already mounted or
/// the container is missing.
pub fn install_page(container_id: &str) -> bool {
    if PAGE_FIELD.with(|slot| slot.borrow().is_some()) {
        log::warn!("Page orb field already mounted");
        return false;
    }
    let config_json = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(container_id))
        .and_then(|el| el.get_attribute(CONFIG_ATTRIBUTE));

    match mount(container_id, config_json) {
        Some(handle) => {
            PAGE_FIELD.with(|slot| *slot.borrow_mut() = Some(handle));
            true
        }
        None => false,
    }
}

/// Stop and drop the page's field, if any
pub fn uninstall_page() -> bool {
    let handle = PAGE_FIELD.with(|slot| slot.borrow_mut().take());
    handle.is_some_and(|handle| handle.stop())
}

/// Undo `install_page` and `cursor::init`. Returns true if either was torn down.
pub fn unmount_page() -> bool {
    let field = uninstall_page();
    let follower = cursor::teardown();
    if field || follower {
        log::info!("Page teardown: field {}, cursor {}", field, follower);
    }
    field || follower
}
