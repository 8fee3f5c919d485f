use std::collections::HashMap;

use formats::CountryCollection;
use scene::World;
use scene::entity::ShapeId;
use tracing::info;

use crate::boundary::{BoundaryOptions, build_feature_shapes};
use crate::symbology::CountryStyle;

#[derive(Debug, Clone, PartialEq)]
struct CountryEntry {
    name: String,
    shapes: Vec<ShapeId>,
}

/// Country name to the shapes drawn for it.
///
/// Built once; keys are unique and kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryRegistry {
    entries: Vec<CountryEntry>,
    by_name: HashMap<String, usize>,
    all: Vec<ShapeId>,
}

impl CountryRegistry {
    /// Builds every feature's shapes into `world` with the default color and
    /// groups them by country. Features that yield no shape add no key.
    pub fn build(
        collection: &CountryCollection,
        opts: &BoundaryOptions,
        style: &CountryStyle,
        world: &mut World,
    ) -> Self {
        let mut registry = Self::default();

        for feature in &collection.features {
            for built in build_feature_shapes(feature, opts) {
                let id = world.add_shape(built.shape, built.country.as_str(), style.default_color);
                registry.insert(built.country, id);
            }
        }

        info!(
            countries = registry.len(),
            shapes = registry.shape_count(),
            mode = ?opts.mode,
            "country registry built"
        );
        registry
    }

    fn insert(&mut self, name: String, shape: ShapeId) {
        let idx = match self.by_name.get(&name) {
            Some(idx) => *idx,
            None => {
                let idx = self.entries.len();
                self.by_name.insert(name.clone(), idx);
                self.entries.push(CountryEntry {
                    name,
                    shapes: Vec::new(),
                });
                idx
            }
        };
        self.entries[idx].shapes.push(shape);
        self.all.push(shape);
    }

    pub fn shapes(&self, name: &str) -> Option<&[ShapeId]> {
        self.by_name
            .get(name)
            .map(|idx| self.entries[*idx].shapes.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Number of countries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn shape_count(&self) -> usize {
        self.all.len()
    }

    /// Every registered shape in creation order, ungrouped. This is the
    /// candidate list hover picking runs over.
    pub fn all_shapes(&self) -> &[ShapeId] {
        &self.all
    }
}
