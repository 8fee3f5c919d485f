/// Floating country label owned by the host page.
pub trait LabelOverlay {
    fn show_label(&mut self, text: &str, left_px: f64, top_px: f64);
    fn hide_label(&mut self);
}

/// In-memory mirror of the label element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelState {
    pub visible: bool,
    pub text: String,
    pub left_px: f64,
    pub top_px: f64,
}

impl LabelOverlay for LabelState {
    fn show_label(&mut self, text: &str, left_px: f64, top_px: f64) {
        self.visible = true;
        if self.text != text {
            self.text.clear();
            self.text.push_str(text);
        }
        self.left_px = left_px;
        self.top_px = top_px;
    }

    fn hide_label(&mut self) {
        self.visible = false;
    }
}
