use std::fmt::Debug;

use tracing::{debug, trace};

use crate::config::{Config, MAX_SHAPES_PER_NODE};
use crate::iter::Iter;
use crate::list::List;
use crate::{BoundedShape, QuadtreeError, QuadtreeResult, QuadtreeVisitor, Rect};

/// Handle to the node a shape is stored at.
///
/// Obtained from [`Quadtree::find_locator`] and passed back to
/// [`Quadtree::remove_at`] to skip the search. A locator goes stale once its
/// node is pruned; stale locators are rejected, never dereferenced.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Locator(pub(crate) usize);

pub(crate) struct Node<S> {
    pub(crate) bounds: Rect,
    pub(crate) depth: usize,
    pub(crate) shapes: Vec<S>,
    pub(crate) children: Option<[Option<Locator>; 4]>,
    pub(crate) parent: Option<Locator>,
    /// Own shapes plus every shape below this node.
    pub(crate) count: usize,
}

impl<S> Node<S> {
    fn new(bounds: Rect, depth: usize, parent: Option<Locator>) -> Self {
        Self {
            bounds,
            depth,
            shapes: Vec::new(),
            children: None,
            parent,
            count: 0,
        }
    }

    fn has_children(&self) -> bool {
        self.children
            .map_or(false, |children| children.iter().any(Option::is_some))
    }

    /// Existing child whose quadrant fully contains `bb`.
    fn route(&self, bb: &Rect) -> Option<Locator> {
        let children = self.children?;
        children[self.bounds.quadrant_containing(bb)?]
    }
}

/// Region quadtree over a fixed world rectangle.
///
/// Shapes live at the deepest node whose box fully contains them. A node
/// splits into four lazily created quadrants once it owns more than
/// [`MAX_SHAPES_PER_NODE`] shapes, and empty nodes are pruned as soon as a
/// removal leaves them with nothing below.
pub struct Quadtree<S> {
    pub(crate) root: Locator,
    pub(crate) config: Config,
    pub(crate) nodes: List<Node<S>>,
}

impl<S> Quadtree<S> {
    pub fn bounds(&self) -> Rect {
        self.nodes[self.root.0].bounds
    }

    pub fn max_depth(&self) -> usize {
        self.config.max_depth
    }

    /// Number of stored shapes, O(1).
    pub fn size(&self) -> usize {
        self.nodes[self.root.0].count
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Number of live nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.size()
    }

    /// Recounts every stored shape by walking the whole tree. Should always
    /// agree with [`Quadtree::size`].
    pub fn size_full(&self) -> usize {
        self.count_from(self.root)
    }

    pub fn root(&self) -> NodeRef<'_, S> {
        NodeRef {
            tree: self,
            locator: self.root,
            node: &self.nodes[self.root.0],
        }
    }

    /// View of the node behind `locator`, or `None` if it has been pruned.
    pub fn node(&self, locator: Locator) -> Option<NodeRef<'_, S>> {
        let node = self.nodes.get(locator.0)?;
        Some(NodeRef {
            tree: self,
            locator,
            node,
        })
    }

    /// Depth-first iteration: quadrants 0 to 3, then the node's own shapes.
    pub fn iter(&self) -> Iter<'_, S> {
        Iter::new(self)
    }

    pub fn traverse<V>(&self, visitor: &mut V)
    where
        V: QuadtreeVisitor<S>,
    {
        let mut to_process = vec![self.root];

        while let Some(locator) = to_process.pop() {
            let node = &self.nodes[locator.0];
            match node.children {
                Some(children) if node.has_children() => {
                    visitor.branch(node.depth, node.bounds);
                    to_process.extend(children.into_iter().rev().flatten());
                }
                _ => visitor.leaf(node.depth, node.bounds),
            }
            for shape in &node.shapes {
                visitor.shape(node.depth, shape);
            }
        }
    }

    fn count_from(&self, start: Locator) -> usize {
        let mut size = 0;
        let mut to_process = vec![start];

        while let Some(locator) = to_process.pop() {
            let node = &self.nodes[locator.0];
            size += node.shapes.len();
            if let Some(children) = node.children {
                to_process.extend(children.into_iter().flatten());
            }
        }
        size
    }
}

impl<S> Quadtree<S>
where
    S: BoundedShape,
{
    /// Creates an empty tree over `bounds`.
    ///
    /// Fails if `max_depth` is zero or `bounds` has no area.
    pub fn new(max_depth: usize, bounds: Rect) -> QuadtreeResult<Self> {
        Self::with_config(bounds, Config::new(max_depth))
    }

    pub fn with_config(bounds: Rect, config: Config) -> QuadtreeResult<Self> {
        config.validate(bounds)?;
        let mut nodes = List::new();
        let root = Locator(nodes.insert(Node::new(bounds, 0, None)));
        debug!(?bounds, max_depth = config.max_depth, "created quadtree");
        Ok(Self {
            root,
            config,
            nodes,
        })
    }

    /// Inserts `shape`. Its bounding box must lie fully inside
    /// [`Quadtree::bounds`].
    pub fn insert(&mut self, shape: S) -> QuadtreeResult<()> {
        let bounds = self.bounds();
        let bb = shape.bounding_box();
        if !bounds.contains(&bb) {
            return Err(QuadtreeError::OutOfBounds { shape: bb, bounds });
        }
        self.node_insert(self.root, shape);
        Ok(())
    }

    /// Finds the node holding a shape equal to `shape`.
    ///
    /// Descends to the deepest existing node whose quadrant would take the
    /// shape, then climbs back towards the root scanning own shapes, which is
    /// the reverse of the path insertion takes.
    pub fn find_locator(&self, shape: &S) -> Option<Locator> {
        let bb = shape.bounding_box();
        let mut locator = self.root;
        while let Some(child) = self.nodes[locator.0].route(&bb) {
            locator = child;
        }

        loop {
            let node = &self.nodes[locator.0];
            if node.shapes.iter().any(|s| s.same_shape(shape)) {
                return Some(locator);
            }
            locator = node.parent?;
        }
    }

    pub fn contains(&self, shape: &S) -> bool {
        self.find_locator(shape).is_some()
    }

    /// Removes one shape equal to `shape`. Returns whether anything was
    /// removed.
    pub fn remove(&mut self, shape: &S) -> bool {
        match self.find_locator(shape) {
            Some(locator) => self.remove_at(shape, locator),
            None => false,
        }
    }

    /// Removes one shape equal to `shape` from the node behind `locator`
    /// without searching. Pair with a prior [`Quadtree::find_locator`].
    ///
    /// Returns `false` if the locator is stale or its node holds no equal
    /// shape.
    pub fn remove_at(&mut self, shape: &S, locator: Locator) -> bool {
        let Some(node) = self.nodes.get_mut(locator.0) else {
            return false;
        };
        let Some(index) = node.shapes.iter().position(|s| s.same_shape(shape)) else {
            return false;
        };
        node.shapes.remove(index);

        let mut cursor = Some(locator);
        while let Some(current) = cursor {
            let node = &mut self.nodes[current.0];
            node.count -= 1;
            cursor = node.parent;
        }
        trace!(?locator, "removed shape");

        self.prune(locator);
        true
    }

    /// Every stored shape whose bounding box overlaps `reference`.
    pub fn query_intersecting(&self, reference: Rect) -> Vec<&S> {
        let mut out = Vec::new();
        self.query_intersecting_into(reference, &mut out);
        out
    }

    /// Like [`Quadtree::query_intersecting`] but appends to `out`.
    pub fn query_intersecting_into<'a>(&'a self, reference: Rect, out: &mut Vec<&'a S>) {
        let mut to_process = vec![self.root];

        while let Some(locator) = to_process.pop() {
            let node = &self.nodes[locator.0];
            out.extend(
                node.shapes
                    .iter()
                    .filter(|shape| shape.bounding_box().intersects(&reference)),
            );

            if let Some(children) = node.children {
                // Reversed so quadrants are visited in index order.
                for child in children.into_iter().rev().flatten() {
                    if self.nodes[child.0].bounds.intersects(&reference) {
                        to_process.push(child);
                    }
                }
            }
        }
    }

    fn node_insert(&mut self, start: Locator, shape: S) {
        let bb = shape.bounding_box();
        let mut locator = start;
        loop {
            self.nodes[locator.0].count += 1;
            match self.child_for(locator, &bb) {
                Some(child) => locator = child,
                None => break,
            }
        }

        let node = &mut self.nodes[locator.0];
        let is_leaf = node.children.is_none();
        node.shapes.push(shape);
        trace!(?locator, depth = node.depth, "inserted shape");

        if is_leaf && node.shapes.len() > MAX_SHAPES_PER_NODE && node.depth < self.config.max_depth {
            self.split(locator);
        }
    }

    /// Child of a split node whose quadrant fully contains `bb`, created on
    /// first use. `None` for leaves and for boxes that straddle quadrants.
    fn child_for(&mut self, locator: Locator, bb: &Rect) -> Option<Locator> {
        let node = &self.nodes[locator.0];
        let children = node.children?;
        let index = node.bounds.quadrant_containing(bb)?;
        if let Some(child) = children[index] {
            return Some(child);
        }

        let bounds = node.bounds.quadrants()[index];
        let depth = node.depth + 1;
        let child = Locator(self.nodes.insert(Node::new(bounds, depth, Some(locator))));
        if let Some(children) = self.nodes[locator.0].children.as_mut() {
            children[index] = Some(child);
        }
        Some(child)
    }

    fn split(&mut self, locator: Locator) {
        let node = &mut self.nodes[locator.0];
        node.children = Some([None; 4]);
        let shapes = std::mem::take(&mut node.shapes);
        let (depth, bounds, total) = (node.depth, node.bounds, shapes.len());

        let mut kept = Vec::new();
        for shape in shapes {
            match self.child_for(locator, &shape.bounding_box()) {
                Some(child) => self.node_insert(child, shape),
                None => kept.push(shape),
            }
        }

        debug!(
            depth,
            ?bounds,
            moved = total - kept.len(),
            kept = kept.len(),
            "split node"
        );
        self.nodes[locator.0].shapes = kept;
    }

    /// Climbs from `start` dropping every node left with nothing in its
    /// subtree. A parent whose four slots all end up vacant becomes a leaf.
    fn prune(&mut self, start: Locator) {
        let mut locator = start;
        loop {
            let node = &mut self.nodes[locator.0];
            if node.count > 0 {
                break;
            }
            debug_assert!(!node.has_children());
            node.children = None;
            let Some(parent) = node.parent else {
                break;
            };
            self.prune_children(parent);
            locator = parent;
        }
    }

    fn prune_children(&mut self, locator: Locator) {
        let Some(mut children) = self.nodes[locator.0].children else {
            return;
        };

        for slot in children.iter_mut() {
            if let Some(child) = *slot {
                if self.nodes[child.0].count == 0 {
                    self.erase_subtree(child);
                    *slot = None;
                }
            }
        }

        let node = &mut self.nodes[locator.0];
        node.children = if children.iter().all(Option::is_none) {
            None
        } else {
            Some(children)
        };
    }

    fn erase_subtree(&mut self, locator: Locator) {
        let mut to_process = vec![locator];

        while let Some(current) = to_process.pop() {
            if let Some(node) = self.nodes.erase(current.0) {
                debug!(depth = node.depth, bounds = ?node.bounds, "pruned node");
                if let Some(children) = node.children {
                    to_process.extend(children.into_iter().flatten());
                }
            }
        }
    }
}

impl<S> Quadtree<S>
where
    S: BoundedShape + Debug,
{
    /// Logs every node and shape at debug level.
    pub fn dump(&self) {
        self.traverse(&mut DumpVisitor);
    }
}

struct DumpVisitor;

impl<S: Debug> QuadtreeVisitor<S> for DumpVisitor {
    fn shape(&mut self, depth: usize, shape: &S) {
        debug!(depth, ?shape, "shape");
    }

    fn leaf(&mut self, depth: usize, bounds: Rect) {
        debug!(depth, ?bounds, "leaf");
    }

    fn branch(&mut self, depth: usize, bounds: Rect) {
        debug!(depth, ?bounds, "branch");
    }
}

impl<'a, S> IntoIterator for &'a Quadtree<S> {
    type Item = &'a S;
    type IntoIter = Iter<'a, S>;

    fn into_iter(self) -> Iter<'a, S> {
        self.iter()
    }
}

/// Read-only view of one node.
pub struct NodeRef<'a, S> {
    tree: &'a Quadtree<S>,
    locator: Locator,
    node: &'a Node<S>,
}

impl<S> Clone for NodeRef<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for NodeRef<'_, S> {}

impl<'a, S> NodeRef<'a, S> {
    pub fn locator(&self) -> Locator {
        self.locator
    }

    pub fn bounds(&self) -> Rect {
        self.node.bounds
    }

    pub fn depth(&self) -> usize {
        self.node.depth
    }

    /// Shapes in this subtree, O(1).
    pub fn size(&self) -> usize {
        self.node.count
    }

    /// Shapes in this subtree, recounted.
    pub fn size_full(&self) -> usize {
        self.tree.count_from(self.locator)
    }

    /// Shapes stored at this node itself.
    pub fn shapes(&self) -> &'a [S] {
        &self.node.shapes
    }

    /// True until the node first splits, and again after all its quadrants
    /// have been pruned.
    pub fn is_leaf(&self) -> bool {
        self.node.children.is_none()
    }

    /// Quadrant `index` in NW, NE, SW, SE order, if that child exists.
    pub fn child(&self, index: usize) -> Option<NodeRef<'a, S>> {
        let children = self.node.children?;
        self.tree.node((*children.get(index)?)?)
    }

    pub fn parent(&self) -> Option<NodeRef<'a, S>> {
        self.tree.node(self.node.parent?)
    }
}
