mod config;
mod error;
mod iter;
mod list;
mod quadtree;
mod rect;

/// Anything with an axis-aligned bounding box can be indexed.
pub trait BoundedShape {
    fn bounding_box(&self) -> Rect;

    /// Value equality used to find a stored shape again. Defaults to
    /// comparing bounding boxes.
    fn same_shape(&self, other: &Self) -> bool {
        self.bounding_box() == other.bounding_box()
    }
}

pub trait QuadtreeVisitor<S> {
    fn shape(&mut self, depth: usize, shape: &S);
    fn leaf(&mut self, depth: usize, bounds: Rect);
    fn branch(&mut self, depth: usize, bounds: Rect);
}

pub use config::*;
pub use error::*;
pub use iter::Iter;
pub use quadtree::*;
pub use rect::Rect;
