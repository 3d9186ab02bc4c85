//! DOM side of the record-span scan.

use homemap_shared::scan::{DataSpan, ScanCount, HOME_SELECTOR, RENDERED_ATTR, SHAPE_SELECTOR};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use crate::context::Controller;

pub struct DomSpan(Element);

impl DataSpan for DomSpan {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn mark_rendered(&self) {
        if let Err(e) = self.0.set_attribute(RENDERED_ATTR, "true") {
            tracing::warn!("could not mark span rendered: {:?}", e);
        }
    }
}

fn collect(document: &Document, selector: &str) -> Vec<DomSpan> {
    let list = match document.query_selector_all(selector) {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!("{} query failed: {:?}", selector, e);
            return Vec::new();
        }
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .map(DomSpan)
        .collect()
}

/// Draw every shape and home span in `document` not drawn yet.
pub fn render(controller: &mut Controller, document: &Document) -> ScanCount {
    let shapes = collect(document, SHAPE_SELECTOR);
    let homes = collect(document, HOME_SELECTOR);
    controller.render_spans(&shapes, &homes)
}
