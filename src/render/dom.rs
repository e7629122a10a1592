//! DOM surface: one absolutely positioned `div` per orb inside a container

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use super::style::{ORB_BORDER, ORB_CLASS, fill_css, shadow_css, size_css};
use super::{OrbSurface, OrbTransform};
use crate::sim::{Bounds, Orb};

/// Orb elements owned by the field, appended to a host container
pub struct DomSurface {
    document: Document,
    container: HtmlElement,
    /// Indexed like the orb list; `None` where creation failed
    elements: Vec<Option<HtmlElement>>,
}

impl DomSurface {
    /// Look up the container by id; `None` if the page has no such element
    pub fn find(container_id: &str) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let container = document
            .get_element_by_id(container_id)?
            .dyn_into::<HtmlElement>()
            .ok()?;
        Some(Self {
            document,
            container,
            elements: Vec::new(),
        })
    }

    fn create_orb_element(&self, orb: &Orb) -> Option<HtmlElement> {
        let el = self
            .document
            .create_element("div")
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        el.set_class_name(ORB_CLASS);

        let size = size_css(orb.diameter());
        let css = el.style();
        let _ = css.set_property("background", &fill_css(&orb.style));
        let _ = css.set_property("width", &size);
        let _ = css.set_property("height", &size);
        let _ = css.set_property("border", ORB_BORDER);
        let _ = css.set_property("box-shadow", &shadow_css(&orb.style));
        let _ = css.set_property(
            "transform",
            &OrbTransform {
                x: orb.pos.x,
                y: orb.pos.y,
                scale: 1.0,
            }
            .to_css(),
        );
        Some(el)
    }
}

impl OrbSurface for DomSurface {
    fn bounds(&self) -> Bounds {
        let Some(window) = web_sys::window() else {
            return Bounds::new(0.0, 0.0);
        };
        let dim = |v: Result<wasm_bindgen::JsValue, _>| {
            v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
        };
        Bounds::new(dim(window.inner_width()), dim(window.inner_height()))
    }

    fn attach(&mut self, orbs: &[Orb]) {
        self.detach();
        // Stale markup from an earlier mount
        self.container.set_inner_html("");

        for orb in orbs {
            let el = self.create_orb_element(orb);
            match &el {
                Some(el) => {
                    let _ = self.container.append_child(el);
                }
                None => log::warn!("Failed to create element for orb {}", orb.id),
            }
            self.elements.push(el);
        }
    }

    fn draw(&mut self, index: usize, transform: &OrbTransform) {
        if let Some(Some(el)) = self.elements.get(index) {
            let _ = el.style().set_property("transform", &transform.to_css());
        }
    }

    fn detach(&mut self) {
        for el in self.elements.drain(..).flatten() {
            el.remove();
        }
    }
}
