//! Mouse-follow element
//!
//! A soft circle that trails the pointer and grows over interactive
//! elements. There is at most one per page: `init` creates it, `teardown`
//! removes it, and both report whether they did anything.

use std::cell::RefCell;

use glam::Vec2;

/// Parked off-screen until the first pointer move
pub const CURSOR_START: Vec2 = Vec2::new(-100.0, -100.0);
pub const CURSOR_SIZE: f32 = 40.0;
pub const CURSOR_HOVER_SIZE: f32 = 80.0;
/// Time to cover ~95% of the remaining distance
pub const POSITION_EASE_MS: f32 = 500.0;
pub const SIZE_EASE_MS: f32 = 300.0;

/// Class of the follower element
pub const CURSOR_CLASS: &str = "mouse-follow";
/// Hovering any of these enlarges the follower
pub const HOVER_SELECTOR: &str = "a, button, .interactive";
/// Theme colors, resting and over a hover target
pub const CURSOR_COLOR: &str = "hsl(var(--primary))";
pub const CURSOR_HOVER_COLOR: &str = "hsl(var(--accent))";

/// Exponential approach: fraction of the gap closed after `dt_ms`
fn ease_factor(dt_ms: f32, span_ms: f32) -> f32 {
    if span_ms <= 0.0 {
        return 1.0;
    }
    1.0 - (-3.0 * dt_ms.max(0.0) / span_ms).exp()
}

/// Smoothed pointer position and size
#[derive(Debug, Clone, PartialEq)]
pub struct CursorFollower {
    pub pos: Vec2,
    pub size: f32,
    target: Vec2,
    target_size: f32,
    hovering: bool,
}

impl Default for CursorFollower {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorFollower {
    pub fn new() -> Self {
        Self {
            pos: CURSOR_START,
            size: CURSOR_SIZE,
            target: CURSOR_START,
            target_size: CURSOR_SIZE,
            hovering: false,
        }
    }

    pub fn point_at(&mut self, x: f32, y: f32) {
        self.target = Vec2::new(x, y);
    }

    pub fn set_hover(&mut self, hovering: bool) {
        self.hovering = hovering;
        self.target_size = if hovering { CURSOR_HOVER_SIZE } else { CURSOR_SIZE };
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn target_size(&self) -> f32 {
        self.target_size
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Background color; switches immediately while only the size eases
    pub fn color(&self) -> &'static str {
        if self.hovering { CURSOR_HOVER_COLOR } else { CURSOR_COLOR }
    }

    /// Move toward the targets by `dt_ms` of easing
    pub fn advance(&mut self, dt_ms: f32) {
        self.pos += (self.target - self.pos) * ease_factor(dt_ms, POSITION_EASE_MS);
        self.size += (self.target_size - self.size) * ease_factor(dt_ms, SIZE_EASE_MS);
    }

    /// CSS transform centering the element on `pos`
    pub fn transform(&self) -> String {
        let half = self.size * 0.5;
        format!("translate({}px, {}px)", self.pos.x - half, self.pos.y - half)
    }
}

struct Installed {
    follower: CursorFollower,
    #[cfg(target_arch = "wasm32")]
    dom: Option<dom::CursorDom>,
}

thread_local! {
    static FOLLOWER: RefCell<Option<Installed>> = const { RefCell::new(None) };
}

/// Create the page's follower. Returns false if one already exists.
pub fn init() -> bool {
    if is_installed() {
        log::debug!("Cursor follower already installed");
        return false;
    }

    // Listeners call back into `with`, so the slot is filled before they exist
    FOLLOWER.with(|slot| {
        *slot.borrow_mut() = Some(Installed {
            follower: CursorFollower::new(),
            #[cfg(target_arch = "wasm32")]
            dom: None,
        });
    });

    #[cfg(target_arch = "wasm32")]
    {
        let host = dom::CursorDom::install();
        if host.is_none() {
            log::warn!("Cursor follower has no document to attach to");
        }
        FOLLOWER.with(|slot| {
            if let Some(installed) = slot.borrow_mut().as_mut() {
                installed.dom = host;
            }
        });
    }

    log::info!("Cursor follower installed");
    true
}

/// Remove the follower (and its element and listeners). Returns false if absent.
pub fn teardown() -> bool {
    // Take first; dropping the DOM host must not happen under the borrow
    let installed = FOLLOWER.with(|slot| slot.borrow_mut().take());
    match installed {
        Some(installed) => {
            drop(installed);
            log::info!("Cursor follower removed");
            true
        }
        None => false,
    }
}

pub fn is_installed() -> bool {
    FOLLOWER.with(|slot| slot.borrow().is_some())
}

/// Run `f` against the follower, if installed
pub fn with<R>(f: impl FnOnce(&mut CursorFollower) -> R) -> Option<R> {
    FOLLOWER.with(|slot| {
        let mut slot = slot.try_borrow_mut().ok()?;
        slot.as_mut().map(|installed| f(&mut installed.follower))
    })
}

/// Advance the follower by one frame and redraw its element
pub fn step(dt_ms: f32) -> bool {
    FOLLOWER.with(|slot| {
        let Ok(mut slot) = slot.try_borrow_mut() else {
            return false;
        };
        let Some(installed) = slot.as_mut() else {
            return false;
        };
        installed.follower.advance(dt_ms);
        #[cfg(target_arch = "wasm32")]
        if let Some(dom) = &installed.dom {
            dom.draw(&installed.follower);
        }
        true
    })
}

#[cfg(target_arch = "wasm32")]
mod dom {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, EventTarget, HtmlElement, MouseEvent};

    use super::{CURSOR_CLASS, CursorFollower, HOVER_SELECTOR, with};

    type Listener = Closure<dyn FnMut(MouseEvent)>;

    /// Follower element plus the listeners feeding it
    pub(super) struct CursorDom {
        element: HtmlElement,
        document: Document,
        on_move: Listener,
        on_enter: Listener,
        on_leave: Listener,
        hover_targets: Vec<EventTarget>,
    }

    impl CursorDom {
        pub(super) fn install() -> Option<Self> {
            let document = web_sys::window()?.document()?;
            let body = document.body()?;
            let element = document
                .create_element("div")
                .ok()?
                .dyn_into::<HtmlElement>()
                .ok()?;
            element.set_class_name(CURSOR_CLASS);
            body.append_child(&element).ok()?;

            let on_move = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                with(|f| f.point_at(event.client_x() as f32, event.client_y() as f32));
            });
            let _ = document
                .add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref());

            let on_enter = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                with(|f| f.set_hover(true));
            });
            let on_leave = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                with(|f| f.set_hover(false));
            });

            let mut hover_targets = Vec::new();
            if let Ok(nodes) = document.query_selector_all(HOVER_SELECTOR) {
                for i in 0..nodes.length() {
                    let Some(node) = nodes.get(i) else { continue };
                    let target: EventTarget = node.into();
                    let _ = target.add_event_listener_with_callback(
                        "mouseenter",
                        on_enter.as_ref().unchecked_ref(),
                    );
                    let _ = target.add_event_listener_with_callback(
                        "mouseleave",
                        on_leave.as_ref().unchecked_ref(),
                    );
                    hover_targets.push(target);
                }
            }
            log::debug!("Cursor follower tracking {} hover targets", hover_targets.len());

            let dom = Self {
                element,
                document,
                on_move,
                on_enter,
                on_leave,
                hover_targets,
            };
            dom.draw(&CursorFollower::new());
            Some(dom)
        }

        pub(super) fn draw(&self, follower: &CursorFollower) {
            let size = format!("{}px", follower.size);
            let css = self.element.style();
            let _ = css.set_property("width", &size);
            let _ = css.set_property("height", &size);
            let _ = css.set_property("background-color", follower.color());
            let _ = css.set_property("transform", &follower.transform());
        }
    }

    impl Drop for CursorDom {
        fn drop(&mut self) {
            let _ = self.document.remove_event_listener_with_callback(
                "mousemove",
                self.on_move.as_ref().unchecked_ref(),
            );
            for target in &self.hover_targets {
                let _ = target.remove_event_listener_with_callback(
                    "mouseenter",
                    self.on_enter.as_ref().unchecked_ref(),
                );
                let _ = target.remove_event_listener_with_callback(
                    "mouseleave",
                    self.on_leave.as_ref().unchecked_ref(),
                );
            }
            self.element.remove();
        }
    }
}
