use foundation::handles::Handle;

/// Stable index of a boundary shape inside a [`crate::World`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId(pub Handle);

impl ShapeId {
    pub fn new(index: u32) -> Self {
        Self(Handle::new(index))
    }

    pub fn index(&self) -> u32 {
        self.0.index()
    }
}
