use std::iter::FusedIterator;

use crate::quadtree::{Locator, Quadtree};
use crate::{QuadtreeError, QuadtreeResult};

/// Cursor into one node: which quadrant to descend into next, and which own
/// shape to yield once all four quadrants are done.
#[derive(Copy, Clone, Debug)]
struct Frame {
    locator: Locator,
    next_child: usize,
    next_shape: usize,
}

impl Frame {
    fn new(locator: Locator) -> Self {
        Self {
            locator,
            next_child: 0,
            next_shape: 0,
        }
    }
}

/// Depth-first iterator over every shape in a [`Quadtree`].
///
/// For each node the four quadrants are exhausted in index order before the
/// node's own shapes are yielded. All traversal state lives here, so any
/// number of iterators can walk the same tree at once. The tree cannot be
/// mutated while an iterator borrows it.
pub struct Iter<'a, S> {
    tree: &'a Quadtree<S>,
    stack: Vec<Frame>,
    remaining: usize,
}

impl<'a, S> Iter<'a, S> {
    pub(crate) fn new(tree: &'a Quadtree<S>) -> Self {
        Self {
            tree,
            stack: vec![Frame::new(tree.root)],
            remaining: tree.size(),
        }
    }

    /// True if another shape is available. Repeated calls without consuming
    /// an element return the same answer.
    pub fn has_next(&mut self) -> bool {
        self.settle()
    }

    /// Next shape, or [`QuadtreeError::Exhausted`] once every shape has been
    /// yielded.
    pub fn try_next(&mut self) -> QuadtreeResult<&'a S> {
        self.next().ok_or(QuadtreeError::Exhausted)
    }

    /// Moves the cursor onto the next unread own shape, descending into and
    /// popping frames as needed. Returns false when the walk is over.
    fn settle(&mut self) -> bool {
        let tree = self.tree;
        while let Some(frame) = self.stack.last_mut() {
            let node = &tree.nodes[frame.locator.0];

            if frame.next_child < 4 {
                let child = node.children.and_then(|children| children[frame.next_child]);
                frame.next_child += 1;
                if let Some(child) = child {
                    self.stack.push(Frame::new(child));
                }
                continue;
            }

            if frame.next_shape < node.shapes.len() {
                return true;
            }
            self.stack.pop();
        }
        false
    }
}

impl<'a, S> Iterator for Iter<'a, S> {
    type Item = &'a S;

    fn next(&mut self) -> Option<&'a S> {
        if !self.settle() {
            return None;
        }
        let tree = self.tree;
        let frame = self.stack.last_mut()?;
        let shape = tree.nodes[frame.locator.0].shapes.get(frame.next_shape)?;
        frame.next_shape += 1;
        self.remaining -= 1;
        Some(shape)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<S> ExactSizeIterator for Iter<'_, S> {}

impl<S> FusedIterator for Iter<'_, S> {}

#[cfg(test)]
mod tests {
    use crate::{Quadtree, QuadtreeError, Rect};

    fn tree_with(shapes: &[Rect]) -> Quadtree<Rect> {
        let mut tree = Quadtree::new(5, Rect::new(0, 0, 100, 100)).unwrap();
        for shape in shapes {
            tree.insert(*shape).unwrap();
        }
        tree
    }

    #[test]
    fn empty() {
        let tree = tree_with(&[]);
        let mut it = tree.iter();
        assert!(!it.has_next());
        assert!(!it.has_next());
        assert_eq!(it.next(), None);
        assert_eq!(it.try_next(), Err(QuadtreeError::Exhausted));
    }

    #[test]
    fn children_before_own_shapes() {
        let mut shapes: Vec<Rect> = (0..10).map(|i| Rect::new(60 + i, 60, 1, 1)).collect();
        shapes.push(Rect::new(1, 1, 1, 1));
        shapes.push(Rect::new(45, 45, 10, 10));
        shapes.push(Rect::new(70, 1, 1, 1));
        let tree = tree_with(&shapes);

        let order: Vec<Rect> = tree.iter().copied().collect();
        assert_eq!(order.len(), 13);
        assert_eq!(order[0], Rect::new(1, 1, 1, 1));
        assert_eq!(order[1], Rect::new(70, 1, 1, 1));
        assert_eq!(&order[2..12], &shapes[..10]);
        assert_eq!(order[12], Rect::new(45, 45, 10, 10));
    }

    #[test]
    fn has_next_is_idempotent() {
        let tree = tree_with(&[Rect::new(1, 1, 1, 1), Rect::new(2, 2, 1, 1)]);
        let mut it = tree.iter();
        assert_eq!(it.len(), 2);
        assert!(it.has_next());
        assert!(it.has_next());
        assert_eq!(it.try_next(), Ok(&Rect::new(1, 1, 1, 1)));
        assert!(it.has_next());
        assert!(it.has_next());
        assert_eq!(it.len(), 1);
        assert_eq!(it.try_next(), Ok(&Rect::new(2, 2, 1, 1)));
        assert!(!it.has_next());
        assert_eq!(it.try_next(), Err(QuadtreeError::Exhausted));
        assert_eq!(it.next(), None);
    }

    #[test]
    fn independent_iterators() {
        let shapes: Vec<Rect> = (0..30).map(|i| Rect::new(i * 3, i * 3, 2, 2)).collect();
        let tree = tree_with(&shapes);

        let mut a = tree.iter();
        let mut b = tree.iter();
        let first_a: Vec<_> = a.by_ref().take(7).collect();
        let all_b: Vec<_> = b.by_ref().collect();
        let rest_a: Vec<_> = a.collect();

        assert_eq!(all_b.len(), 30);
        assert_eq!(first_a.len() + rest_a.len(), 30);
        assert_eq!(&all_b[..7], &first_a[..]);
        assert_eq!(&all_b[7..], &rest_a[..]);
        assert_eq!((&tree).into_iter().count(), 30);
    }
}
