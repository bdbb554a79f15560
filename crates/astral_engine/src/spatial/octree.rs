//! Octree spatial partitioning structure
//!
//! Indexes movable, possibly extended objects inside a cubic universe so the
//! scene can ask "what is stored near this position" without scanning every
//! object each frame. The tree never owns the objects themselves; it stores
//! opaque handles and leaves identity and attributes to the caller.
//!
//! Nodes live in a flat arena and reference their eight octant children by
//! index, which keeps the hot descent loops free of pointer chasing and makes
//! a bulk clear a simple truncation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::foundation::geometry::Aabb;
use crate::foundation::math::Vec3;

/// Errors raised when constructing an octree from an invalid configuration
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum OctreeError {
    /// The minimum subdivision exponent is larger than the root exponent
    #[error("minimum size exponent {min} exceeds size exponent {size}")]
    InvalidExponents {
        /// Exponent of the root half-width
        size: i32,
        /// Exponent below which nodes stop subdividing
        min: i32,
    },

    /// The subdivision slack margin is negative
    #[error("precision must be non-negative, got {0}")]
    NegativePrecision(f32),
}

/// Configuration for octree construction
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OctreeConfig {
    /// The root spans `[-2^size_exponent, +2^size_exponent]` on every axis
    pub size_exponent: i32,

    /// Smallest exponent at which a node may still subdivide; leaves have
    /// half-width `2^min_size_exponent`
    pub min_size_exponent: i32,

    /// Non-negative slack added to object radii in the subdivision test, so
    /// objects close to a splitting plane stay one level higher
    pub precision: f32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            size_exponent: 6,
            min_size_exponent: 0,
            precision: 0.0,
        }
    }
}

impl Config for OctreeConfig {}

/// How an object participates in spatial subdivision
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    /// Zero-radius object; descends to the deepest permitted node
    Point,

    /// Bounded object with the given radius; descends only while the
    /// conservative split test proves it cannot straddle a splitting plane
    Sphere(f32),

    /// Never partitioned; stored at the node it is first offered to. Meant
    /// for unbounded geometry (background planes, skyboxes) that every query
    /// should see.
    Global,
}

/// Index of a node in the tree's backing arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(u32);

impl NodeId {
    const ROOT: Self = Self(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Single node of the octree: one axis-aligned cubic region of space
#[derive(Debug, Clone)]
struct Node<H> {
    bounds: Aabb,
    /// Midpoint of `bounds`, cached because every descent consults it
    center: Vec3,
    /// Remaining subdivision budget; the node half-width is `2^size_exponent`
    size_exponent: i32,
    /// Handles stored directly at this node
    items: Vec<H>,
    /// All eight octant children, allocated together on first split
    children: Option<[NodeId; 8]>,
}

impl<H> Node<H> {
    fn new(bounds: Aabb, size_exponent: i32) -> Self {
        Self {
            bounds,
            center: bounds.center(),
            size_exponent,
            items: Vec::new(),
            children: None,
        }
    }
}

/// Octree spatial partitioning structure
///
/// Generic over the handle type `H`; handles are compared only for equality
/// and copied freely, so small ids (integers, slotmap keys) are the intended
/// use.
#[derive(Debug, Clone)]
pub struct Octree<H> {
    nodes: Vec<Node<H>>,
    config: OctreeConfig,
}

/// Octant index of `position` relative to `center`
///
/// One bit per axis, set when the coordinate is `>=` the center on that axis;
/// ties always go to the upper octant.
fn octant_index(center: Vec3, position: Vec3) -> usize {
    let mut octant = 0;
    if position.x >= center.x {
        octant |= 0b001;
    }
    if position.y >= center.y {
        octant |= 0b010;
    }
    if position.z >= center.z {
        octant |= 0b100;
    }
    octant
}

/// Unit direction from a node center into the given octant, one sign per axis
fn octant_direction(octant: usize) -> Vec3 {
    Vec3::new(
        if octant & 0b001 != 0 { 1.0 } else { -1.0 },
        if octant & 0b010 != 0 { 1.0 } else { -1.0 },
        if octant & 0b100 != 0 { 1.0 } else { -1.0 },
    )
}

impl<H: Copy + PartialEq> Octree<H> {
    /// Create a new octree from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`OctreeError`] when `min_size_exponent > size_exponent` or
    /// the precision margin is negative. These are the only hard failures in
    /// the index; every steady-state operation is infallible.
    pub fn new(config: OctreeConfig) -> Result<Self, OctreeError> {
        if config.min_size_exponent > config.size_exponent {
            return Err(OctreeError::InvalidExponents {
                size: config.size_exponent,
                min: config.min_size_exponent,
            });
        }
        if config.precision < 0.0 {
            return Err(OctreeError::NegativePrecision(config.precision));
        }

        let half_width = 2.0_f32.powi(config.size_exponent);
        let bounds = Aabb::from_center_extents(Vec3::zeros(), Vec3::repeat(half_width));

        Ok(Self {
            nodes: vec![Node::new(bounds, config.size_exponent)],
            config,
        })
    }

    /// The configuration this octree was built with
    #[must_use]
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// World-space bounds of the whole indexed region
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.nodes[NodeId::ROOT.index()].bounds
    }

    /// Insert a handle at a position with the given extent
    ///
    /// The handle descends from the root one octant at a time. At each node
    /// the conservative split test offsets the position toward the node
    /// center by `radius + precision` per axis; only if the offset point maps
    /// to the same octant can the object not straddle a splitting plane, and
    /// it is pushed one level deeper. Otherwise it is stored at the current
    /// node. Descent always stops at the minimum node size, and
    /// [`Extent::Global`] objects are stored at the root without any
    /// partitioning.
    ///
    /// Duplicate inserts are not detected; the index is a multiset.
    pub fn insert(&mut self, handle: H, position: Vec3, extent: Extent) {
        let radius = match extent {
            Extent::Global => {
                // global objects stay at the node they are first offered to
                self.nodes[NodeId::ROOT.index()].items.push(handle);
                return;
            }
            Extent::Point => 0.0,
            Extent::Sphere(radius) => radius,
        };

        let padded = radius + self.config.precision;
        let mut id = NodeId::ROOT;
        loop {
            let node = &self.nodes[id.index()];
            if node.size_exponent <= self.config.min_size_exponent {
                break;
            }

            let octant = octant_index(node.center, position);
            if padded > 0.0 {
                // conservative split test: if pulling the position toward the
                // center by the padded radius changes its octant, the volume
                // straddles a splitting plane and must stay at this node
                let pulled = position - octant_direction(octant) * padded;
                if octant != octant_index(node.center, pulled) {
                    break;
                }
            }

            let children = self.ensure_children(id);
            id = children[octant];
        }

        self.nodes[id.index()].items.push(handle);
    }

    /// Remove a handle, descending by position
    ///
    /// The search tries the current node's item list first and then follows
    /// the single child octant containing `position`. The position MUST be
    /// the one the handle was inserted with; removing at any other position
    /// silently returns `false` and leaves the index unchanged. Callers
    /// should treat repeated misses as a sign of a desynchronized position
    /// cache, not as an error.
    pub fn remove(&mut self, handle: H, position: Vec3) -> bool {
        let mut id = NodeId::ROOT;
        loop {
            let node = &mut self.nodes[id.index()];
            if let Some(slot) = node.items.iter().position(|item| *item == handle) {
                node.items.swap_remove(slot);
                return true;
            }

            match node.children {
                Some(children) => id = children[octant_index(node.center, position)],
                None => return false,
            }
        }
    }

    /// Move a handle from one position to another
    ///
    /// Equivalent to [`Octree::remove`] at the old position followed by
    /// [`Octree::insert`] at the new one; the two steps are not atomic. The
    /// index is derived data, so a caller that dies in between simply
    /// rebuilds it next session. Returns whether the old entry was found.
    pub fn move_object(
        &mut self,
        handle: H,
        extent: Extent,
        old_position: Vec3,
        new_position: Vec3,
    ) -> bool {
        let found = self.remove(handle, old_position);
        self.insert(handle, new_position, extent);
        found
    }

    /// Remove every item and release all child nodes
    ///
    /// The tree becomes a fresh, empty, root-only octree with the same
    /// configuration.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        let root = &mut self.nodes[NodeId::ROOT.index()];
        root.items.clear();
        root.children = None;
    }

    /// Collect every stored handle
    ///
    /// This walks the whole tree and is intended for debugging and teardown,
    /// not per-frame queries; prefer [`Octree::get_near`] in a frame loop.
    #[must_use]
    pub fn get_all(&self) -> Vec<H> {
        self.nodes
            .iter()
            .flat_map(|node| node.items.iter().copied())
            .collect()
    }

    /// Collect every stored handle matching a predicate
    ///
    /// Full-tree traversal, same cost caveat as [`Octree::get_all`].
    pub fn get_all_matching(&self, mut predicate: impl FnMut(&H) -> bool) -> Vec<H> {
        self.nodes
            .iter()
            .flat_map(|node| node.items.iter().copied())
            .filter(|item| predicate(item))
            .collect()
    }

    /// Collect the handles stored along the path from the root to the leaf
    /// containing `position`
    ///
    /// This is a coarse "is there anything roughly here" query: it returns
    /// the items of every ancestor node plus the one octant chain containing
    /// the position. Items that are geometrically close but stored under a
    /// sibling octant are NOT returned; callers needing a true radius query
    /// must probe several offset positions themselves. That trade-off is what
    /// keeps the query O(depth), and it is deliberate.
    #[must_use]
    pub fn get_near(&self, position: Vec3) -> Vec<H> {
        self.get_near_matching(position, |_| true)
    }

    /// [`Octree::get_near`] filtered by a predicate
    pub fn get_near_matching(
        &self,
        position: Vec3,
        mut predicate: impl FnMut(&H) -> bool,
    ) -> Vec<H> {
        let mut found = Vec::new();
        let mut id = NodeId::ROOT;
        loop {
            let node = &self.nodes[id.index()];
            found.extend(node.items.iter().copied().filter(|item| predicate(item)));

            match node.children {
                Some(children) => id = children[octant_index(node.center, position)],
                None => break,
            }
        }
        found
    }

    /// Total number of stored handles
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().map(|node| node.items.len()).sum()
    }

    /// Whether the index holds no handles at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|node| node.items.is_empty())
    }

    /// Return the ids of all eight children of `id`, allocating them if this
    /// is the node's first split
    fn ensure_children(&mut self, id: NodeId) -> [NodeId; 8] {
        if let Some(children) = self.nodes[id.index()].children {
            return children;
        }

        let (center, child_extents, child_exponent) = {
            let node = &self.nodes[id.index()];
            (node.center, node.bounds.extents() * 0.5, node.size_exponent - 1)
        };

        let mut children = [NodeId::ROOT; 8];
        for (octant, slot) in children.iter_mut().enumerate() {
            let child_center = center + octant_direction(octant).component_mul(&child_extents);
            let child_bounds = Aabb::from_center_extents(child_center, child_extents);

            let child_id = NodeId(u32::try_from(self.nodes.len()).expect("octree arena overflow"));
            self.nodes.push(Node::new(child_bounds, child_exponent));
            *slot = child_id;
        }

        self.nodes[id.index()].children = Some(children);
        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> Octree<u32> {
        // root half-width 16, leaves half-width 1
        Octree::new(OctreeConfig {
            size_exponent: 4,
            min_size_exponent: 0,
            precision: 0.0,
        })
        .unwrap()
    }

    #[test]
    fn test_invalid_exponents_rejected() {
        let result = Octree::<u32>::new(OctreeConfig {
            size_exponent: 2,
            min_size_exponent: 5,
            precision: 0.0,
        });
        assert_eq!(
            result.unwrap_err(),
            OctreeError::InvalidExponents { size: 2, min: 5 }
        );
    }

    #[test]
    fn test_negative_precision_rejected() {
        let result = Octree::<u32>::new(OctreeConfig {
            size_exponent: 4,
            min_size_exponent: 0,
            precision: -0.5,
        });
        assert!(matches!(result, Err(OctreeError::NegativePrecision(_))));
    }

    #[test]
    fn test_root_bounds_follow_size_exponent() {
        let octree = small_tree();
        let bounds = octree.bounds();
        assert_eq!(bounds.min, Vec3::repeat(-16.0));
        assert_eq!(bounds.max, Vec3::repeat(16.0));
    }

    #[test]
    fn test_point_insert_remove_round_trip() {
        let mut octree = small_tree();
        let position = Vec3::new(3.2, -1.5, 7.7);

        octree.insert(1, position, Extent::Point);
        assert_eq!(octree.len(), 1);

        assert!(octree.remove(1, position));
        assert!(octree.is_empty());
        // every node in the arena must be empty, not just the root
        assert!(octree.nodes.iter().all(|node| node.items.is_empty()));
    }

    #[test]
    fn test_point_descends_to_minimum_size() {
        let mut octree = small_tree();
        octree.insert(1, Vec3::new(3.2, -1.5, 7.7), Extent::Point);

        let holder = octree
            .nodes
            .iter()
            .find(|node| !node.items.is_empty())
            .unwrap();
        assert_eq!(holder.size_exponent, 0);
        assert!(holder.bounds.contains_point(Vec3::new(3.2, -1.5, 7.7)));
    }

    #[test]
    fn test_bounded_insert_remove_round_trip() {
        let mut octree = small_tree();
        let position = Vec3::new(8.0, 8.0, 8.0);

        octree.insert(7, position, Extent::Sphere(1.5));
        assert!(octree.get_all().contains(&7));

        assert!(octree.remove(7, position));
        assert!(!octree.get_all().contains(&7));
        assert!(octree.is_empty());
    }

    #[test]
    fn test_remove_at_wrong_position_misses() {
        let mut octree = small_tree();
        let position = Vec3::new(10.0, 10.0, 10.0);

        octree.insert(3, position, Extent::Point);
        // different octant: the descent never visits the node holding 3
        assert!(!octree.remove(3, Vec3::new(-10.0, 10.0, 10.0)));
        assert_eq!(octree.len(), 1);

        assert!(octree.remove(3, position));
    }

    #[test]
    fn test_global_object_stays_at_root() {
        let mut octree = small_tree();
        octree.insert(42, Vec3::new(9.0, 9.0, 9.0), Extent::Global);

        assert!(octree.nodes[0].items.contains(&42));
        assert!(octree.nodes[0].children.is_none());
        // and every path sees it
        assert!(octree.get_near(Vec3::new(-9.0, -9.0, -9.0)).contains(&42));
    }

    #[test]
    fn test_straddling_object_stored_at_ancestor() {
        let mut octree = small_tree();
        // radius reaches across the root's splitting planes from either side
        octree.insert(5, Vec3::new(0.5, 0.5, 0.5), Extent::Sphere(4.0));

        assert!(octree.nodes[0].items.contains(&5));
        // visible from both octants it overlaps
        assert!(octree.get_near(Vec3::new(10.0, 10.0, 10.0)).contains(&5));
        assert!(octree.get_near(Vec3::new(-10.0, -10.0, -10.0)).contains(&5));
    }

    #[test]
    fn test_bounded_object_descends_when_clear_of_planes() {
        let mut octree = small_tree();
        octree.insert(5, Vec3::new(8.0, 8.0, 8.0), Extent::Sphere(1.0));

        // comfortably inside the (+,+,+) octant, so the root holds nothing
        assert!(octree.nodes[0].items.is_empty());
        assert!(octree.get_near(Vec3::new(8.0, 8.0, 8.0)).contains(&5));
    }

    #[test]
    fn test_precision_keeps_near_plane_objects_higher() {
        let loose = {
            let mut octree = small_tree();
            octree.insert(1, Vec3::new(1.0, 8.0, 8.0), Extent::Sphere(0.9));
            octree.nodes[0].items.len()
        };
        let padded = {
            let mut octree = Octree::new(OctreeConfig {
                size_exponent: 4,
                min_size_exponent: 0,
                precision: 0.5,
            })
            .unwrap();
            octree.insert(1, Vec3::new(1.0, 8.0, 8.0), Extent::Sphere(0.9));
            octree.nodes[0].items.len()
        };

        // without padding the sphere clears the x=0 plane and descends;
        // with 0.5 slack it is treated as straddling and stays at the root
        assert_eq!(loose, 0);
        assert_eq!(padded, 1);
    }

    #[test]
    fn test_get_near_ignores_sibling_octants() {
        let mut octree = small_tree();
        octree.insert(1, Vec3::new(10.0, 10.0, 10.0), Extent::Sphere(1.0));
        octree.insert(2, Vec3::new(-10.0, -10.0, -10.0), Extent::Sphere(1.0));

        let near_a = octree.get_near(Vec3::new(10.0, 10.0, 10.0));
        assert!(near_a.contains(&1));
        assert!(!near_a.contains(&2));

        let near_b = octree.get_near(Vec3::new(-10.0, -10.0, -10.0));
        assert!(near_b.contains(&2));
        assert!(!near_b.contains(&1));
    }

    #[test]
    fn test_move_across_octants() {
        let mut octree = small_tree();
        let old_position = Vec3::new(10.0, 10.0, 10.0);
        let new_position = Vec3::new(-10.0, 10.0, 10.0);

        octree.insert(9, old_position, Extent::Sphere(1.0));
        assert!(octree.move_object(9, Extent::Sphere(1.0), old_position, new_position));

        assert!(octree.get_near(new_position).contains(&9));
        assert!(!octree.get_near(old_position).contains(&9));
        assert_eq!(octree.len(), 1);
    }

    #[test]
    fn test_min_size_forces_leaf_storage() {
        let mut octree = Octree::new(OctreeConfig {
            size_exponent: 3,
            min_size_exponent: 3,
            precision: 0.0,
        })
        .unwrap();

        octree.insert(1, Vec3::new(5.0, 5.0, 5.0), Extent::Point);
        assert!(octree.nodes[0].items.contains(&1));
        assert!(octree.nodes[0].children.is_none());
    }

    #[test]
    fn test_clear_resets_to_empty_root() {
        let mut octree = small_tree();
        for id in 0u8..20 {
            let offset = f32::from(id) - 10.0;
            octree.insert(u32::from(id), Vec3::repeat(offset), Extent::Point);
        }
        assert!(octree.nodes.len() > 1);

        octree.clear();
        assert!(octree.is_empty());
        assert_eq!(octree.nodes.len(), 1);
        assert!(octree.nodes[0].children.is_none());
        assert_eq!(octree.bounds().max, Vec3::repeat(16.0));
    }

    #[test]
    fn test_get_all_matching_filters() {
        let mut octree = small_tree();
        octree.insert(1, Vec3::new(4.0, 4.0, 4.0), Extent::Point);
        octree.insert(2, Vec3::new(-4.0, 4.0, 4.0), Extent::Point);
        octree.insert(3, Vec3::new(4.0, -4.0, 4.0), Extent::Point);

        let odd = octree.get_all_matching(|handle| handle % 2 == 1);
        assert_eq!(odd.len(), 2);
        assert!(odd.contains(&1));
        assert!(odd.contains(&3));
    }

    #[test]
    fn test_ties_go_to_upper_octant() {
        let octree = small_tree();
        let center = octree.nodes[0].center;
        assert_eq!(octant_index(center, center), 0b111);
    }

    #[test]
    fn test_children_partition_parent_exactly() {
        let mut octree = small_tree();
        for id in 0..8_u32 {
            let direction = octant_direction(id as usize);
            octree.insert(id, direction * 10.0, Extent::Point);
        }

        for node in &octree.nodes {
            let Some(children) = node.children else {
                continue;
            };
            for (octant, child_id) in children.iter().enumerate() {
                let child = &octree.nodes[child_id.index()];
                let expected_extents = node.bounds.extents() * 0.5;
                let expected_center =
                    node.center + octant_direction(octant).component_mul(&expected_extents);

                assert_eq!(child.bounds.extents(), expected_extents);
                assert_eq!(child.center, expected_center);
                assert_eq!(child.size_exponent, node.size_exponent - 1);
            }
        }
    }
}
