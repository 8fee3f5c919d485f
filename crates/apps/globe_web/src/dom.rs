use layers::LabelOverlay;
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

/// Label backed by an absolutely positioned element on the host page.
///
/// A missing element turns every call into a no-op.
pub struct DomLabel {
    element: Option<HtmlElement>,
    text: String,
}

impl DomLabel {
    pub fn attach(element_id: &str) -> Self {
        let element = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(element_id))
            .and_then(|e| e.dyn_into::<HtmlElement>().ok());
        if element.is_none() {
            warn!(element_id, "label element not found; labels disabled");
        }
        Self {
            element,
            text: String::new(),
        }
    }
}

impl LabelOverlay for DomLabel {
    fn show_label(&mut self, text: &str, left_px: f64, top_px: f64) {
        let Some(el) = &self.element else {
            return;
        };
        if self.text != text {
            el.set_text_content(Some(text));
            self.text = text.to_string();
        }
        let style = el.style();
        let _ = style.set_property("left", &format!("{left_px}px"));
        let _ = style.set_property("top", &format!("{top_px}px"));
        let _ = style.set_property("display", "block");
    }

    fn hide_label(&mut self) {
        if let Some(el) = &self.element {
            let _ = el.style().set_property("display", "none");
        }
    }
}
