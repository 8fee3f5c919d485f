use layers::{CountryRegistry, CountryStyle, LabelOverlay};
use scene::ShapeRenderState;
use scene::components::Color;
use tracing::{debug, trace};

/// At most one country is highlighted at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HighlightState {
    #[default]
    Idle,
    Highlighted(String),
}

/// What a pointer update did to the highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightTransition {
    Unchanged,
    Entered(String),
    Switched { from: String, to: String },
    /// Same country still under the pointer; only the label moved.
    Tracked(String),
    Cleared(String),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HighlightOptions {
    /// Label position relative to the pointer.
    pub label_offset_px: [f64; 2],
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            label_offset_px: [10.0, 10.0],
        }
    }
}

#[derive(Debug, Clone)]
pub struct HighlightController {
    state: HighlightState,
    style: CountryStyle,
    opts: HighlightOptions,
}

impl HighlightController {
    pub fn new(style: CountryStyle, opts: HighlightOptions) -> Self {
        Self {
            state: HighlightState::Idle,
            style,
            opts,
        }
    }

    pub fn state(&self) -> &HighlightState {
        &self.state
    }

    pub fn highlighted(&self) -> Option<&str> {
        match &self.state {
            HighlightState::Idle => None,
            HighlightState::Highlighted(name) => Some(name),
        }
    }

    /// Applies the hover result for one pointer position.
    ///
    /// `hit_country` is the country tag of the picked shape; names missing
    /// from `registry` count as no hit.
    pub fn on_pointer<R, L>(
        &mut self,
        hit_country: Option<&str>,
        pointer_px: [f64; 2],
        registry: &CountryRegistry,
        render: &mut R,
        label: &mut L,
    ) -> HighlightTransition
    where
        R: ShapeRenderState + ?Sized,
        L: LabelOverlay + ?Sized,
    {
        let target = hit_country.filter(|name| registry.contains(name));
        let left = pointer_px[0] + self.opts.label_offset_px[0];
        let top = pointer_px[1] + self.opts.label_offset_px[1];

        let transition = match (&self.state, target) {
            (HighlightState::Idle, None) => return HighlightTransition::Unchanged,
            (HighlightState::Highlighted(current), Some(next)) if current == next => {
                label.show_label(next, left, top);
                trace!(country = next, left, top, "label tracked");
                return HighlightTransition::Tracked(next.to_string());
            }
            (HighlightState::Idle, Some(next)) => {
                paint(registry, next, self.style.highlight_color, render);
                label.show_label(next, left, top);
                HighlightTransition::Entered(next.to_string())
            }
            (HighlightState::Highlighted(current), Some(next)) => {
                paint(registry, current, self.style.default_color, render);
                paint(registry, next, self.style.highlight_color, render);
                label.show_label(next, left, top);
                HighlightTransition::Switched {
                    from: current.clone(),
                    to: next.to_string(),
                }
            }
            (HighlightState::Highlighted(current), None) => {
                paint(registry, current, self.style.default_color, render);
                label.hide_label();
                HighlightTransition::Cleared(current.clone())
            }
        };

        self.state = match target {
            Some(next) => HighlightState::Highlighted(next.to_string()),
            None => HighlightState::Idle,
        };
        debug!(?transition, "highlight changed");
        transition
    }
}

fn paint<R>(registry: &CountryRegistry, country: &str, color: Color, render: &mut R)
where
    R: ShapeRenderState + ?Sized,
{
    for &shape in registry.shapes(country).unwrap_or_default() {
        render.set_shape_color(shape, color);
    }
}

#[cfg(test)]
mod tests {
    use super::{HighlightController, HighlightOptions, HighlightState, HighlightTransition};
    use formats::{CountryCollection, GeoFeature, GeoGeometry, GeoPoint};
    use layers::{BoundaryOptions, CountryRegistry, CountryStyle, LabelOverlay};
    use pretty_assertions::assert_eq;
    use scene::components::Color;
    use scene::entity::ShapeId;
    use scene::{ShapeRenderState, World};

    #[derive(Default)]
    struct RecordingRender {
        calls: Vec<(ShapeId, Color)>,
    }

    impl ShapeRenderState for RecordingRender {
        fn set_shape_color(&mut self, shape: ShapeId, color: Color) {
            self.calls.push((shape, color));
        }
    }

    #[derive(Debug, PartialEq)]
    enum LabelCall {
        Show(String, f64, f64),
        Hide,
    }

    #[derive(Default)]
    struct RecordingLabel {
        calls: Vec<LabelCall>,
    }

    impl LabelOverlay for RecordingLabel {
        fn show_label(&mut self, text: &str, left_px: f64, top_px: f64) {
            self.calls.push(LabelCall::Show(text.to_string(), left_px, top_px));
        }

        fn hide_label(&mut self) {
            self.calls.push(LabelCall::Hide);
        }
    }

    fn tri(lon: f64) -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(lon, 0.0),
            GeoPoint::new(lon + 1.0, 0.0),
            GeoPoint::new(lon + 1.0, 1.0),
        ]
    }

    /// "A" has two parts, "B" has one.
    fn registry() -> (CountryRegistry, World) {
        let collection = CountryCollection {
            features: vec![
                GeoFeature {
                    name: "A".to_string(),
                    geometry: GeoGeometry::MultiPolygon(vec![vec![tri(0.0)], vec![tri(5.0)]]),
                },
                GeoFeature {
                    name: "B".to_string(),
                    geometry: GeoGeometry::Polygon(vec![tri(20.0)]),
                },
            ],
            skipped: Vec::new(),
        };
        let mut world = World::new();
        let reg = CountryRegistry::build(
            &collection,
            &BoundaryOptions::default(),
            &CountryStyle::default(),
            &mut world,
        );
        (reg, world)
    }

    fn controller() -> HighlightController {
        HighlightController::new(CountryStyle::default(), HighlightOptions::default())
    }

    #[test]
    fn enter_and_leave_a_country() {
        let (reg, _) = registry();
        let style = CountryStyle::default();
        let a = reg.shapes("A").expect("A").to_vec();
        let mut ctl = controller();
        let mut render = RecordingRender::default();
        let mut label = RecordingLabel::default();

        let t = ctl.on_pointer(Some("A"), [100.0, 50.0], &reg, &mut render, &mut label);
        assert_eq!(t, HighlightTransition::Entered("A".to_string()));
        assert_eq!(ctl.state(), &HighlightState::Highlighted("A".to_string()));
        assert_eq!(
            render.calls,
            a.iter().map(|id| (*id, style.highlight_color)).collect::<Vec<_>>()
        );
        assert_eq!(label.calls, vec![LabelCall::Show("A".to_string(), 110.0, 60.0)]);

        render.calls.clear();
        label.calls.clear();
        let t = ctl.on_pointer(None, [0.0, 0.0], &reg, &mut render, &mut label);
        assert_eq!(t, HighlightTransition::Cleared("A".to_string()));
        assert_eq!(ctl.highlighted(), None);
        assert_eq!(
            render.calls,
            a.iter().map(|id| (*id, style.default_color)).collect::<Vec<_>>()
        );
        assert_eq!(label.calls, vec![LabelCall::Hide]);
    }

    #[test]
    fn switching_restores_previous_country_first() {
        let (reg, _) = registry();
        let style = CountryStyle::default();
        let mut ctl = controller();
        let mut render = RecordingRender::default();
        let mut label = RecordingLabel::default();

        ctl.on_pointer(Some("A"), [0.0, 0.0], &reg, &mut render, &mut label);
        render.calls.clear();

        let t = ctl.on_pointer(Some("B"), [5.0, 5.0], &reg, &mut render, &mut label);
        assert_eq!(
            t,
            HighlightTransition::Switched {
                from: "A".to_string(),
                to: "B".to_string()
            }
        );

        let mut expected: Vec<_> = reg
            .shapes("A")
            .expect("A")
            .iter()
            .map(|id| (*id, style.default_color))
            .collect();
        expected.extend(reg.shapes("B").expect("B").iter().map(|id| (*id, style.highlight_color)));
        assert_eq!(render.calls, expected);
        assert_eq!(ctl.highlighted(), Some("B"));
    }

    #[test]
    fn staying_on_a_country_only_moves_the_label() {
        let (reg, _) = registry();
        let mut ctl = controller();
        let mut render = RecordingRender::default();
        let mut label = RecordingLabel::default();

        ctl.on_pointer(Some("B"), [0.0, 0.0], &reg, &mut render, &mut label);
        render.calls.clear();
        label.calls.clear();

        let t = ctl.on_pointer(Some("B"), [40.0, 30.0], &reg, &mut render, &mut label);
        assert_eq!(t, HighlightTransition::Tracked("B".to_string()));
        assert!(render.calls.is_empty());
        assert_eq!(label.calls, vec![LabelCall::Show("B".to_string(), 50.0, 40.0)]);
    }

    #[test]
    fn idle_miss_does_nothing() {
        let (reg, _) = registry();
        let mut ctl = controller();
        let mut render = RecordingRender::default();
        let mut label = RecordingLabel::default();

        let t = ctl.on_pointer(None, [1.0, 1.0], &reg, &mut render, &mut label);
        assert_eq!(t, HighlightTransition::Unchanged);
        assert!(render.calls.is_empty());
        assert!(label.calls.is_empty());
    }

    #[test]
    fn unknown_country_counts_as_a_miss() {
        let (reg, _) = registry();
        let mut ctl = controller();
        let mut render = RecordingRender::default();
        let mut label = RecordingLabel::default();

        ctl.on_pointer(Some("A"), [0.0, 0.0], &reg, &mut render, &mut label);
        let t = ctl.on_pointer(Some("Atlantis"), [0.0, 0.0], &reg, &mut render, &mut label);
        assert_eq!(t, HighlightTransition::Cleared("A".to_string()));
        assert_eq!(ctl.state(), &HighlightState::Idle);
    }

    #[test]
    fn world_receives_color_commands() {
        let (reg, mut world) = registry();
        let mut ctl = controller();
        let mut label = RecordingLabel::default();
        world.drain_color_commands();

        ctl.on_pointer(Some("A"), [0.0, 0.0], &reg, &mut world, &mut label);
        let commands = world.drain_color_commands();
        assert_eq!(commands.len(), 2);
        for id in reg.shapes("A").expect("A") {
            assert_eq!(world.color(*id), Some(CountryStyle::default().highlight_color));
        }
    }
}
