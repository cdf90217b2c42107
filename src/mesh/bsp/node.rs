//! BSP tree node data structure and its operations

use crate::float_types::Real;
use crate::mesh::plane::{BACK, COPLANAR, FRONT, Plane};
use crate::mesh::polygon::Polygon;

/// Picks splitting planes by sampling candidate polygons and scoring the
/// split they would produce.
#[derive(Debug, Clone, Copy)]
pub struct BalancedSplittingStrategy {
    /// Weight for spanning polygons
    pub span_weight: Real,
    /// Weight for front/back imbalance
    pub balance_weight: Real,
    /// Number of candidate planes examined
    pub sample_size: usize,
}

impl Default for BalancedSplittingStrategy {
    fn default() -> Self {
        Self {
            span_weight: 8.0,
            balance_weight: 1.0,
            sample_size: 20,
        }
    }
}

impl BalancedSplittingStrategy {
    /// Index of the polygon whose plane scores best; `None` only for an
    /// empty slice.
    pub fn pick_best_splitter(&self, polygons: &[Polygon]) -> Option<usize> {
        // candidates are spread over the slice rather than taken from its head
        let stride = (polygons.len() / self.sample_size.max(1)).max(1);
        (0..polygons.len())
            .step_by(stride)
            .take(self.sample_size)
            .map(|index| {
                let plane = &polygons[index].plane;
                let (mut num_front, mut num_back, mut num_spanning) = (0i64, 0i64, 0i64);
                for poly in polygons {
                    match plane.classify_polygon(poly) {
                        COPLANAR => {},
                        FRONT => num_front += 1,
                        BACK => num_back += 1,
                        _ => num_spanning += 1,
                    }
                }
                let score = self.span_weight * num_spanning as Real
                    + self.balance_weight * ((num_front - num_back) as Real).abs();
                (score, index)
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, index)| index)
    }
}

/// A BSP tree node, containing polygons plus optional front/back subtrees
#[derive(Debug, Clone, Default)]
pub struct Node {
    /// Splitting plane for this node *or* **None** for a leaf that
    /// only stores polygons.
    pub plane: Option<Plane>,

    /// Polygons in *front* half‑spaces.
    pub front: Option<Box<Node>>,

    /// Polygons in *back* half‑spaces.
    pub back: Option<Box<Node>>,

    /// Polygons that lie *exactly* on `plane`
    /// (after the node has been built).
    pub polygons: Vec<Polygon>,
}

impl Node {
    /// Create a new empty BSP node
    pub const fn new() -> Self {
        Self {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    /// Creates a new BSP node from polygons
    pub fn from_polygons(polygons: &[Polygon]) -> Self {
        let mut node = Self::new();
        if !polygons.is_empty() {
            node.build(polygons);
        }
        node
    }

    /// Convert solid space to empty space and empty space to solid space.
    pub fn invert(&mut self) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.polygons.iter_mut().for_each(Polygon::flip);
            if let Some(plane) = node.plane.as_mut() {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);
            if let Some(front) = node.front.as_mut() {
                stack.push(&mut **front);
            }
            if let Some(back) = node.back.as_mut() {
                stack.push(&mut **back);
            }
        }
    }

    /// Remove all polygons in `polygons` that are inside this BSP tree.
    ///
    /// Polygons reaching a missing back child are inside and dropped;
    /// coplanar polygons follow their own orientation.
    pub fn clip_polygons(&self, polygons: &[Polygon]) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![(self, polygons.to_vec())];

        while let Some((node, polys)) = stack.pop() {
            let Some(plane) = node.plane.as_ref() else {
                result.extend(polys);
                continue;
            };

            let mut front_polys = Vec::with_capacity(polys.len());
            let mut back_polys = Vec::with_capacity(polys.len());

            for polygon in &polys {
                let (coplanar_front, coplanar_back, front_parts, back_parts) =
                    plane.split_polygon(polygon);
                front_polys.extend(coplanar_front);
                front_polys.extend(front_parts);
                back_polys.extend(coplanar_back);
                back_polys.extend(back_parts);
            }

            match &node.front {
                Some(front_node) if !front_polys.is_empty() => {
                    stack.push((&**front_node, front_polys));
                },
                Some(_) => {},
                None => result.extend(front_polys),
            }

            if let Some(back_node) = &node.back {
                if !back_polys.is_empty() {
                    stack.push((&**back_node, back_polys));
                }
            }
        }
        result
    }

    /// Remove all polygons in this BSP tree that are inside the other BSP tree
    pub fn clip_to(&mut self, bsp: &Node) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.polygons = bsp.clip_polygons(&node.polygons);
            if let Some(front) = node.front.as_mut() {
                stack.push(&mut **front);
            }
            if let Some(back) = node.back.as_mut() {
                stack.push(&mut **back);
            }
        }
    }

    /// Return all polygons in this BSP tree
    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            result.extend_from_slice(&node.polygons);
            stack.extend(
                [&node.front, &node.back]
                    .into_iter()
                    .filter_map(|child| child.as_deref()),
            );
        }
        result
    }

    /// Build (or extend) a BSP tree from the given polygons
    pub fn build(&mut self, polygons: &[Polygon]) {
        if polygons.is_empty() {
            return;
        }
        let strategy = BalancedSplittingStrategy::default();
        let mut stack = vec![(self, polygons.to_vec())];

        while let Some((node, mut polys)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }

            // A new node keeps the polygon its plane came from without
            // splitting it, so each child receives fewer polygons than its
            // parent even when that polygon straddles its own plane.
            if node.plane.is_none() {
                let Some(index) = strategy.pick_best_splitter(&polys) else {
                    continue;
                };
                let source = polys.swap_remove(index);
                node.plane = Some(source.plane.clone());
                node.polygons.push(source);
            }
            let Some(plane) = node.plane.as_ref() else {
                continue;
            };

            let mut front = Vec::with_capacity(polys.len() / 2);
            let mut back = Vec::with_capacity(polys.len() / 2);

            for polygon in &polys {
                let (coplanar_front, coplanar_back, front_parts, back_parts) =
                    plane.split_polygon(polygon);
                node.polygons.extend(coplanar_front);
                node.polygons.extend(coplanar_back);
                front.extend(front_parts);
                back.extend(back_parts);
            }

            if !front.is_empty() {
                let front_node = node.front.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((&mut **front_node, front));
            }

            if !back.is_empty() {
                let back_node = node.back.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((&mut **back_node, back));
            }
        }
    }
}
