use crate::{QuadtreeError, QuadtreeResult, Rect};

/// A node splits once it holds more than this many shapes of its own.
pub const MAX_SHAPES_PER_NODE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Deepest level a node may be created at. The root is level 0.
    ///
    /// Insert, locate and query recurse at most this deep, so very large
    /// values are the caller's responsibility.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config { max_depth: 6 }
    }
}

impl Config {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Rejects a zero `max_depth`, a world box with either extent below 1
    /// since such a box can never contain a shape, and a world box whose far
    /// edges do not fit in `i32`.
    pub fn validate(&self, bounds: Rect) -> QuadtreeResult<()> {
        if self.max_depth < 1 || bounds.is_empty() || !bounds.edges_in_range() {
            return Err(QuadtreeError::InvalidConfig {
                max_depth: self.max_depth,
                bounds,
            });
        }
        Ok(())
    }
}
