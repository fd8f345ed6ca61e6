//! Quadtree error types.

use thiserror::Error;

use crate::Rect;

/// Errors returned by quadtree construction, insertion and iteration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuadtreeError {
    /// Construction parameters cannot describe a usable tree.
    #[error("invalid quadtree configuration (max_depth: {max_depth}, bounds: {bounds:?})")]
    InvalidConfig { max_depth: usize, bounds: Rect },

    /// The shape's bounding box is not fully inside the indexed world.
    #[error("shape {shape:?} is outside of quadtree bounds {bounds:?}")]
    OutOfBounds { shape: Rect, bounds: Rect },

    /// An iterator was advanced past its last element.
    #[error("quadtree iterator is exhausted")]
    Exhausted,
}

pub type QuadtreeResult<T> = Result<T, QuadtreeError>;
