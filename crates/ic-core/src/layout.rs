//! Containment layout engine.
//!
//! Turns a flat resource list into a fully positioned [`SceneGraph`] in
//! three passes:
//!
//! 1. **Sizing**, bottom-up. Leaves take their type's base size; containers
//!    wrap their children's grid plus padding, header and footer bands, and
//!    are clamped up to their type minimum.
//! 2. **Positioning**, top-down. Children sit on the same grid used for
//!    sizing, relative to their parent's top-left. Roots are arranged by a
//!    rank-based pass over the dependency edges.
//! 3. **Absolute resolution**. Every node's world bounds are resolved once,
//!    so rendering and hit-testing read the same numbers.
//!
//! The output depends only on the inputs: no state is carried between passes.

use crate::error::LayoutError;
use crate::geometry::{Point, Rect, Size};
use crate::hierarchy::Hierarchy;
use crate::model::{DependencyEdge, ResourceNode, TypeCatalog};
use crate::scene::{SceneEdge, SceneGraph, SceneNode};
use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Axis along which dependency ranks of root resources advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankDirection {
    #[default]
    LeftToRight,
    TopToBottom,
}

/// Tunable spacing for the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Maximum grid columns inside a container.
    pub columns: usize,
    pub column_gap: f32,
    pub row_gap: f32,
    /// Band reserved above a container's children for its label.
    pub header_height: f32,
    /// Band reserved below a container's children for the add-child control.
    pub footer_height: f32,
    /// Gap between roots sharing a rank.
    pub root_gap: f32,
    /// Gap between consecutive ranks.
    pub rank_gap: f32,
    pub direction: RankDirection,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            column_gap: 16.0,
            row_gap: 16.0,
            header_height: 36.0,
            footer_height: 28.0,
            root_gap: 48.0,
            rank_gap: 96.0,
            direction: RankDirection::LeftToRight,
        }
    }
}

impl LayoutConfig {
    /// Copy with every spacing finite and non-negative and at least one
    /// column. Values that fail fall back to their defaults.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let clean = |v: f32, fallback: f32| {
            if v.is_finite() { v.max(0.0) } else { fallback }
        };
        Self {
            columns: self.columns.max(1),
            column_gap: clean(self.column_gap, defaults.column_gap),
            row_gap: clean(self.row_gap, defaults.row_gap),
            header_height: clean(self.header_height, defaults.header_height),
            footer_height: clean(self.footer_height, defaults.footer_height),
            root_gap: clean(self.root_gap, defaults.root_gap),
            rank_gap: clean(self.rank_gap, defaults.rank_gap),
            direction: self.direction,
        }
    }
}

/// Lay out `resources` and build the scene graph.
///
/// Fails only if the parent links contain a cycle (nothing is laid out in
/// that case) or if the engine breaks its own invariants.
pub fn layout(
    resources: &[ResourceNode],
    catalog: &TypeCatalog,
    edges: &[DependencyEdge],
    config: &LayoutConfig,
) -> Result<SceneGraph, LayoutError> {
    let config = &config.sanitized();
    let hierarchy = Hierarchy::build(resources)?;
    let measured = measure_all(&hierarchy, catalog, config);
    let mut relative = vec![Point::ORIGIN; hierarchy.len()];
    position_children(&hierarchy, &measured, config, &mut relative);
    for (i, origin) in place_roots(&hierarchy, &measured, edges, config) {
        relative[i] = origin;
    }

    let nodes = resolve_absolute(&hierarchy, &measured, &relative, config);
    let scene_edges = edges
        .iter()
        .filter(|e| e.from != e.to && hierarchy.contains(e.from) && hierarchy.contains(e.to))
        .map(|e| SceneEdge {
            from: e.from,
            to: e.to,
            kind: e.kind,
        })
        .collect();

    log::debug!(
        "layout: {} resources, {} roots, {} edges",
        hierarchy.len(),
        hierarchy.root_indices().len(),
        edges.len()
    );
    SceneGraph::assemble(nodes, scene_edges)
}

// ─── Pass 1: sizing ──────────────────────────────────────────────────────

/// Column widths and row heights of a container's child grid.
#[derive(Debug, Clone, Default)]
struct Grid {
    columns: usize,
    col_widths: SmallVec<[f32; 4]>,
    row_heights: SmallVec<[f32; 4]>,
}

impl Grid {
    fn new(sizes: &[Size], max_columns: usize) -> Self {
        let columns = max_columns.max(1).min(sizes.len());
        let rows = if columns == 0 {
            0
        } else {
            sizes.len().div_ceil(columns)
        };
        let mut grid = Grid {
            columns,
            col_widths: SmallVec::from_elem(0.0, columns),
            row_heights: SmallVec::from_elem(0.0, rows),
        };
        for (k, size) in sizes.iter().enumerate() {
            let (c, r) = (k % columns, k / columns);
            grid.col_widths[c] = grid.col_widths[c].max(size.width);
            grid.row_heights[r] = grid.row_heights[r].max(size.height);
        }
        grid
    }

    fn content_size(&self, config: &LayoutConfig) -> Size {
        Size::new(
            span(&self.col_widths, config.column_gap),
            span(&self.row_heights, config.row_gap),
        )
    }

    /// Offset of cell `k` from the content origin.
    fn cell_offset(&self, k: usize, config: &LayoutConfig) -> Point {
        let (c, r) = (k % self.columns, k / self.columns);
        let x: f32 = self.col_widths[..c].iter().sum::<f32>() + c as f32 * config.column_gap;
        let y: f32 = self.row_heights[..r].iter().sum::<f32>() + r as f32 * config.row_gap;
        Point::new(x, y)
    }
}

/// Sum of `tracks` plus `gap` between each adjacent pair.
fn span(tracks: &[f32], gap: f32) -> f32 {
    if tracks.is_empty() {
        return 0.0;
    }
    tracks.iter().sum::<f32>() + gap * (tracks.len() - 1) as f32
}

#[derive(Debug, Clone, Default)]
struct Measured {
    size: Size,
    container: bool,
    padding: f32,
    grid: Grid,
}

fn measure_all(h: &Hierarchy<'_>, catalog: &TypeCatalog, config: &LayoutConfig) -> Vec<Measured> {
    // Pre-order from the roots; walked in reverse, every child is measured
    // before its parent. Nesting depth never touches the call stack.
    let mut order = Vec::with_capacity(h.len());
    let mut stack: Vec<usize> = h.root_indices().to_vec();
    while let Some(i) = stack.pop() {
        order.push(i);
        stack.extend_from_slice(h.child_indices(i));
    }

    let mut out = vec![Measured::default(); h.len()];
    for &i in order.iter().rev() {
        let child_sizes: Vec<Size> = h.child_indices(i).iter().map(|&c| out[c].size).collect();
        out[i] = measure(h, i, &child_sizes, catalog, config);
    }
    out
}

fn measure(
    h: &Hierarchy<'_>,
    i: usize,
    child_sizes: &[Size],
    catalog: &TypeCatalog,
    config: &LayoutConfig,
) -> Measured {
    let metrics = catalog.metrics(&h.record(i).kind);
    let container = metrics.container || !child_sizes.is_empty();
    let padding = metrics.padding();

    if container {
        let grid = Grid::new(child_sizes, config.columns);
        let content = grid.content_size(config);
        let min = metrics.min_size();
        let size = Size::new(
            (content.width + 2.0 * padding).max(min.width),
            (config.header_height + content.height + 2.0 * padding + config.footer_height)
                .max(min.height),
        );
        Measured {
            size,
            container,
            padding,
            grid,
        }
    } else {
        Measured {
            size: metrics.base_size(),
            container,
            padding: 0.0,
            grid: Grid::default(),
        }
    }
}

// ─── Pass 2: positioning ─────────────────────────────────────────────────

fn position_children(
    h: &Hierarchy<'_>,
    measured: &[Measured],
    config: &LayoutConfig,
    relative: &mut [Point],
) {
    for (i, m) in measured.iter().enumerate() {
        let origin = Point::new(m.padding, config.header_height + m.padding);
        for (k, &child) in h.child_indices(i).iter().enumerate() {
            let cell = m.grid.cell_offset(k, config);
            relative[child] = origin.add(cell);
        }
    }
}

/// World positions for every root.
///
/// Pinned roots are placed first, in input order; a pin that would land on
/// an earlier one slides down until it is `root_gap` clear. The ranked roots
/// are laid out from the world origin and the block only moves down when one
/// of its members would touch a pinned root.
fn place_roots(
    h: &Hierarchy<'_>,
    measured: &[Measured],
    edges: &[DependencyEdge],
    config: &LayoutConfig,
) -> Vec<(usize, Point)> {
    let mut placed = Vec::with_capacity(h.root_indices().len());
    let mut pinned: Vec<Rect> = Vec::new();
    let mut free: Vec<usize> = Vec::new();

    for &root in h.root_indices() {
        match h.record(root).position {
            Some(p) if p.x.is_finite() && p.y.is_finite() => {
                let wanted = Rect::from_origin_size(p, measured[root].size);
                let r = wanted.translate(0.0, clearance(&[wanted], &pinned, config.root_gap));
                if r.y != wanted.y {
                    log::debug!(
                        "pinned root {} overlaps another pin; moved from y={} to y={}",
                        h.record(root).id,
                        wanted.y,
                        r.y
                    );
                }
                pinned.push(r);
                placed.push((root, r.origin()));
            }
            _ => free.push(root),
        }
    }

    let block = rank_block(h, measured, &free, edges, config);
    let rects: Vec<Rect> = block
        .iter()
        .map(|&(root, p)| Rect::from_origin_size(p, measured[root].size))
        .collect();
    let dy = clearance(&rects, &pinned, config.root_gap);
    placed.extend(block.into_iter().map(|(root, p)| (root, p.offset(0.0, dy))));
    placed
}

/// Ranked roots laid out from the world origin.
fn rank_block(
    h: &Hierarchy<'_>,
    measured: &[Measured],
    free: &[usize],
    edges: &[DependencyEdge],
    config: &LayoutConfig,
) -> Vec<(usize, Point)> {
    let ranks = rank_roots(h, free, edges);
    let along = |s: Size| match config.direction {
        RankDirection::LeftToRight => s.width,
        RankDirection::TopToBottom => s.height,
    };
    let across = |s: Size| match config.direction {
        RankDirection::LeftToRight => s.height,
        RankDirection::TopToBottom => s.width,
    };

    let mut block = Vec::with_capacity(free.len());
    let mut rank_offset = 0.0;
    for rank in &ranks {
        let mut cross_offset = 0.0;
        let mut thickness: f32 = 0.0;
        for &root in rank {
            let size = measured[root].size;
            let p = match config.direction {
                RankDirection::LeftToRight => Point::new(rank_offset, cross_offset),
                RankDirection::TopToBottom => Point::new(cross_offset, rank_offset),
            };
            block.push((root, p));
            cross_offset += across(size) + config.root_gap;
            thickness = thickness.max(along(size));
        }
        rank_offset += thickness + config.rank_gap;
    }
    block
}

/// Smallest downward shift that keeps every rect in `moving` at least `gap`
/// away from every rect in `fixed`.
fn clearance(moving: &[Rect], fixed: &[Rect], gap: f32) -> f32 {
    let too_close = |a: &Rect, b: &Rect| {
        a.x < b.right() + gap
            && b.x < a.right() + gap
            && a.y < b.bottom() + gap
            && b.y < a.bottom() + gap
    };
    // Every candidate shift comes from a fixed (moving, fixed) pair and the
    // shift only grows, so this settles after at most one step per pair.
    let mut dy = 0.0f32;
    loop {
        let needed = moving
            .iter()
            .flat_map(|m| {
                let moved = m.translate(0.0, dy);
                fixed
                    .iter()
                    .filter(move |f| too_close(&moved, f))
                    .map(move |f| f.bottom() + gap - m.y)
            })
            .fold(dy, f32::max);
        if needed <= dy {
            return dy;
        }
        dy = needed;
    }
}

/// Group `roots` into ranks by their dependency edges, ordered inside each
/// rank to keep connected roots close.
fn rank_roots(h: &Hierarchy<'_>, roots: &[usize], edges: &[DependencyEdge]) -> Vec<Vec<usize>> {
    if roots.is_empty() {
        return Vec::new();
    }

    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(roots.len(), edges.len());
    let mut node_of: HashMap<usize, NodeIndex> = HashMap::with_capacity(roots.len());
    for &root in roots {
        node_of.insert(root, graph.add_node(root));
    }

    let root_of = |mut i: usize| {
        while let Some(p) = h.parent_index(i) {
            i = p;
        }
        i
    };

    // Lift each dependency to the roots containing its endpoints. The
    // prerequisite (`to`) ranks before the dependent (`from`).
    let mut seen = HashSet::new();
    for edge in edges {
        let (Some(from), Some(to)) = (h.index_of(edge.from), h.index_of(edge.to)) else {
            continue;
        };
        let (Some(&dependent), Some(&prerequisite)) =
            (node_of.get(&root_of(from)), node_of.get(&root_of(to)))
        else {
            continue;
        };
        if dependent != prerequisite && seen.insert((prerequisite, dependent)) {
            graph.add_edge(prerequisite, dependent, ());
        }
    }

    let back = back_edges(&graph);
    let dag = graph.filter_map(|_, &n| Some(n), |e, _| (!back.contains(&e)).then_some(()));

    let order = match petgraph::algo::toposort(&dag, None) {
        Ok(order) => order,
        Err(_) => {
            log::warn!("root dependency graph still cyclic; falling back to input order");
            dag.node_indices().collect()
        }
    };

    let mut rank_of = vec![0usize; dag.node_count()];
    for &n in &order {
        rank_of[n.index()] = dag
            .neighbors_directed(n, Direction::Incoming)
            .map(|p| rank_of[p.index()] + 1)
            .max()
            .unwrap_or(0);
    }

    let rank_count = rank_of.iter().max().map_or(0, |r| r + 1);
    let mut ranks: Vec<Vec<NodeIndex>> = vec![Vec::new(); rank_count];
    for n in dag.node_indices() {
        ranks[rank_of[n.index()]].push(n);
    }

    // Barycenter ordering: average slot of each node's prerequisites,
    // ties broken by input order.
    let mut slot = vec![0.0f32; dag.node_count()];
    for rank in &mut ranks {
        let key = |n: NodeIndex| {
            let preds: Vec<f32> = dag
                .neighbors_directed(n, Direction::Incoming)
                .map(|p| slot[p.index()])
                .collect();
            if preds.is_empty() {
                f32::MAX
            } else {
                preds.iter().sum::<f32>() / preds.len() as f32
            }
        };
        let mut keyed: Vec<(f32, NodeIndex)> = rank.iter().map(|&n| (key(n), n)).collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.index().cmp(&b.1.index())));
        *rank = keyed.into_iter().map(|(_, n)| n).collect();
        for (k, n) in rank.iter().enumerate() {
            slot[n.index()] = k as f32;
        }
    }

    ranks
        .into_iter()
        .map(|rank| rank.into_iter().map(|n| dag[n]).collect())
        .collect()
}

/// Edges closing a cycle, found by DFS in node insertion order.
fn back_edges(graph: &DiGraph<usize, ()>) -> HashSet<EdgeIndex> {
    const UNSEEN: u8 = 0;
    const ACTIVE: u8 = 1;
    const DONE: u8 = 2;

    let outgoing = |n: NodeIndex| {
        let mut out: Vec<(EdgeIndex, NodeIndex)> = graph
            .edges_directed(n, Direction::Outgoing)
            .map(|e| (e.id(), e.target()))
            .collect();
        out.sort_by_key(|(e, _)| e.index());
        out
    };

    let mut state = vec![UNSEEN; graph.node_count()];
    let mut back = HashSet::new();
    for start in graph.node_indices() {
        if state[start.index()] != UNSEEN {
            continue;
        }
        state[start.index()] = ACTIVE;
        // (node, its outgoing edges, next edge to follow)
        let mut stack = vec![(start, outgoing(start), 0usize)];
        while let Some(frame) = stack.last_mut() {
            let n = frame.0;
            let Some(&(e, target)) = frame.1.get(frame.2) else {
                state[n.index()] = DONE;
                stack.pop();
                continue;
            };
            frame.2 += 1;
            match state[target.index()] {
                ACTIVE => {
                    back.insert(e);
                }
                UNSEEN => {
                    state[target.index()] = ACTIVE;
                    stack.push((target, outgoing(target), 0));
                }
                _ => {}
            }
        }
    }
    back
}

// ─── Pass 3: absolute resolution ─────────────────────────────────────────

fn resolve_absolute(
    h: &Hierarchy<'_>,
    measured: &[Measured],
    relative: &[Point],
    config: &LayoutConfig,
) -> Vec<SceneNode> {
    let mut nodes = Vec::with_capacity(h.len());
    let mut stack: Vec<(usize, Point, usize)> = h
        .root_indices()
        .iter()
        .rev()
        .map(|&r| (r, Point::ORIGIN, 0))
        .collect();

    while let Some((i, parent_origin, depth)) = stack.pop() {
        let record = h.record(i);
        let m = &measured[i];
        let origin = parent_origin.add(relative[i]);
        let children = h.child_indices(i);

        nodes.push(SceneNode {
            id: record.id,
            kind: record.kind.clone(),
            label: record.display_label().to_string(),
            status: record.status,
            bounds: Rect::from_origin_size(origin, m.size),
            relative: relative[i],
            is_container: m.container,
            padding: m.padding,
            header_height: if m.container { config.header_height } else { 0.0 },
            footer_height: if m.container { config.footer_height } else { 0.0 },
            children: children.iter().map(|&c| h.record(c).id).collect(),
            depth,
            parent: h.parent_index(i).map(|p| h.record(p).id),
        });

        for &child in children.iter().rev() {
            stack.push((child, origin, depth + 1));
        }
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ResourceId;
    use crate::model::TypeMetrics;
    use pretty_assertions::assert_eq;

    fn catalog() -> TypeCatalog {
        TypeCatalog::new(TypeMetrics::leaf(100.0, 50.0))
            .with("net", TypeMetrics::container(200.0, 150.0))
            .with("sub", TypeMetrics::container(120.0, 100.0).with_padding(10.0))
    }

    fn bounds(scene: &SceneGraph, id: &str) -> Rect {
        scene.get(ResourceId::intern(id)).unwrap().bounds
    }

    #[test]
    fn grid_span_and_offsets() {
        let config = LayoutConfig::default();
        let sizes = [
            Size::new(10.0, 5.0),
            Size::new(30.0, 8.0),
            Size::new(20.0, 4.0),
            Size::new(40.0, 6.0),
        ];
        let grid = Grid::new(&sizes, 3);
        assert_eq!(grid.col_widths.as_slice(), &[40.0, 30.0, 20.0]);
        assert_eq!(grid.row_heights.as_slice(), &[8.0, 6.0]);
        assert_eq!(grid.cell_offset(3, &config), Point::new(0.0, 8.0 + 16.0));
        assert_eq!(grid.cell_offset(2, &config), Point::new(40.0 + 30.0 + 32.0, 0.0));
        assert_eq!(
            grid.content_size(&config),
            Size::new(90.0 + 32.0, 14.0 + 16.0)
        );
    }

    #[test]
    fn leaf_takes_base_size() {
        let resources = vec![ResourceNode::new("l_leaf", "thing")];
        let scene = layout(&resources, &catalog(), &[], &LayoutConfig::default()).unwrap();
        assert_eq!(bounds(&scene, "l_leaf"), Rect::new(0.0, 0.0, 100.0, 50.0));
        assert!(!scene.get(ResourceId::intern("l_leaf")).unwrap().is_container);
    }

    #[test]
    fn nested_children_are_relative_to_parent() {
        let config = LayoutConfig::default();
        let resources = vec![
            ResourceNode::new("l_net", "net"),
            ResourceNode::new("l_sub", "sub").with_parent("l_net"),
            ResourceNode::new("l_vm", "vm").with_parent("l_sub"),
        ];
        let scene = layout(&resources, &catalog(), &[], &config).unwrap();
        let net = bounds(&scene, "l_net");
        let sub = bounds(&scene, "l_sub");
        let vm = bounds(&scene, "l_vm");

        assert_eq!(sub.x, net.x + 16.0);
        assert_eq!(sub.y, net.y + config.header_height + 16.0);
        assert_eq!(vm.x, sub.x + 10.0);
        assert_eq!(vm.y, sub.y + config.header_height + 10.0);

        let vm_node = scene.get(ResourceId::intern("l_vm")).unwrap();
        assert_eq!(vm_node.relative, Point::new(10.0, config.header_height + 10.0));
        assert_eq!(vm_node.depth, 2);
    }

    #[test]
    fn dependency_ranks_left_to_right() {
        let config = LayoutConfig::default();
        let resources = vec![
            ResourceNode::new("l_app", "thing"),
            ResourceNode::new("l_db", "thing"),
            ResourceNode::new("l_cache", "thing"),
        ];
        // app depends on db and cache.
        let edges = vec![
            DependencyEdge::new("l_app", "l_db"),
            DependencyEdge::new("l_app", "l_cache"),
        ];
        let scene = layout(&resources, &catalog(), &edges, &config).unwrap();
        let app = bounds(&scene, "l_app");
        let db = bounds(&scene, "l_db");
        let cache = bounds(&scene, "l_cache");
        assert_eq!(db.x, 0.0);
        assert_eq!(cache.x, 0.0);
        assert_eq!(app.x, 100.0 + config.rank_gap);
        assert_eq!(cache.y, db.bottom() + config.root_gap);
        assert_eq!(scene.edges().len(), 2);
    }

    #[test]
    fn dependency_cycles_between_roots_still_lay_out() {
        let resources = vec![
            ResourceNode::new("l_cyc_a", "thing"),
            ResourceNode::new("l_cyc_b", "thing"),
        ];
        let edges = vec![
            DependencyEdge::new("l_cyc_a", "l_cyc_b"),
            DependencyEdge::new("l_cyc_b", "l_cyc_a"),
        ];
        let scene = layout(&resources, &catalog(), &edges, &LayoutConfig::default()).unwrap();
        assert!(!bounds(&scene, "l_cyc_a").intersects(&bounds(&scene, "l_cyc_b")));
    }

    #[test]
    fn top_to_bottom_direction_swaps_axes() {
        let config = LayoutConfig {
            direction: RankDirection::TopToBottom,
            ..LayoutConfig::default()
        };
        let resources = vec![
            ResourceNode::new("l_ttb_app", "thing"),
            ResourceNode::new("l_ttb_db", "thing"),
        ];
        let edges = vec![DependencyEdge::new("l_ttb_app", "l_ttb_db")];
        let scene = layout(&resources, &catalog(), &edges, &config).unwrap();
        assert_eq!(bounds(&scene, "l_ttb_db").origin(), Point::ORIGIN);
        assert_eq!(
            bounds(&scene, "l_ttb_app").origin(),
            Point::new(0.0, 50.0 + config.rank_gap)
        );
    }

    #[test]
    fn ranked_roots_stay_at_origin_when_clear_of_pins() {
        let config = LayoutConfig::default();
        let resources = vec![
            ResourceNode::new("l_pin", "thing").pinned_at(500.0, 400.0),
            ResourceNode::new("l_free", "thing"),
        ];
        let scene = layout(&resources, &catalog(), &[], &config).unwrap();
        assert_eq!(bounds(&scene, "l_pin").origin(), Point::new(500.0, 400.0));
        assert_eq!(bounds(&scene, "l_free").origin(), Point::ORIGIN);
    }

    #[test]
    fn ranked_block_moves_below_a_colliding_pin() {
        let config = LayoutConfig::default();
        let resources = vec![
            ResourceNode::new("l_pin_hit", "thing").pinned_at(50.0, 20.0),
            ResourceNode::new("l_free_a", "thing"),
            ResourceNode::new("l_free_b", "thing"),
        ];
        let scene = layout(&resources, &catalog(), &[], &config).unwrap();
        let pin = bounds(&scene, "l_pin_hit");
        let a = bounds(&scene, "l_free_a");
        let b = bounds(&scene, "l_free_b");
        assert_eq!(pin.origin(), Point::new(50.0, 20.0));
        assert_eq!(a.origin(), Point::new(0.0, pin.bottom() + config.root_gap));
        // The block moves as one.
        assert_eq!(b.y - a.y, 50.0 + config.root_gap);
        assert!(!a.intersects(&pin) && !b.intersects(&pin));
    }

    #[test]
    fn overlapping_pins_are_separated_in_input_order() {
        let config = LayoutConfig::default();
        let resources = vec![
            ResourceNode::new("l_po_a", "net").pinned_at(0.0, 0.0),
            ResourceNode::new("l_po_b", "net").pinned_at(100.0, 100.0),
            ResourceNode::new("l_po_c", "net").pinned_at(20.0, 10.0),
        ];
        let scene = layout(&resources, &catalog(), &[], &config).unwrap();
        let a = bounds(&scene, "l_po_a");
        let b = bounds(&scene, "l_po_b");
        let c = bounds(&scene, "l_po_c");

        assert_eq!(a.origin(), Point::ORIGIN);
        assert_eq!(b.origin(), Point::new(100.0, a.bottom() + config.root_gap));
        assert_eq!(c.x, 20.0);
        assert!(c.y >= b.bottom() + config.root_gap);
        for (x, y) in [(a, b), (a, c), (b, c)] {
            assert!(!x.intersects(&y), "{x:?} overlaps {y:?}");
        }
    }

    #[test]
    fn clearance_is_zero_without_contact() {
        let fixed = [Rect::new(0.0, 0.0, 10.0, 10.0)];
        assert_eq!(clearance(&[Rect::new(30.0, 0.0, 10.0, 10.0)], &fixed, 8.0), 0.0);
        assert_eq!(clearance(&[Rect::new(15.0, 0.0, 10.0, 10.0)], &fixed, 8.0), 18.0);
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        let catalog = TypeCatalog::new(TypeMetrics::container(50.0, 50.0));
        let depth = 5_000;
        let resources: Vec<ResourceNode> = (0..depth)
            .map(|k| {
                let node = ResourceNode::new(&format!("l_deep_{k}"), "box");
                if k == 0 {
                    node
                } else {
                    node.with_parent(&format!("l_deep_{}", k - 1))
                }
            })
            .collect();
        let scene = layout(&resources, &catalog, &[], &LayoutConfig::default()).unwrap();
        assert_eq!(scene.len(), depth);
        let innermost = scene
            .get(ResourceId::intern(&format!("l_deep_{}", depth - 1)))
            .unwrap();
        assert_eq!(innermost.depth, depth - 1);
        let outermost = bounds(&scene, "l_deep_0");
        assert!(outermost.encloses(&innermost.bounds, 16.0));
    }

    #[test]
    fn long_dependency_chain_between_roots() {
        let n = 5_000;
        let resources: Vec<ResourceNode> = (0..n)
            .map(|k| ResourceNode::new(&format!("l_chain_{k}"), "thing"))
            .collect();
        let edges: Vec<DependencyEdge> = (1..n)
            .map(|k| DependencyEdge::new(&format!("l_chain_{k}"), &format!("l_chain_{}", k - 1)))
            .chain([DependencyEdge::new("l_chain_0", &format!("l_chain_{}", n - 1))])
            .collect();
        let scene = layout(&resources, &catalog(), &edges, &LayoutConfig::default()).unwrap();
        assert_eq!(scene.len(), n);
    }

    #[test]
    fn hostile_config_is_sanitized() {
        let config: LayoutConfig = serde_json::from_str(
            r#"{"columns": 0, "columnGap": -40, "rowGap": -40, "headerHeight": -5, "rootGap": -100}"#,
        )
        .unwrap();
        let clean = config.sanitized();
        assert_eq!(clean.columns, 1);
        assert_eq!(clean.column_gap, 0.0);
        assert_eq!(clean.row_gap, 0.0);
        assert_eq!(clean.header_height, 0.0);
        assert_eq!(clean.root_gap, 0.0);

        let weird = LayoutConfig {
            column_gap: f32::NAN,
            rank_gap: f32::INFINITY,
            ..LayoutConfig::default()
        }
        .sanitized();
        assert_eq!(weird.column_gap, LayoutConfig::default().column_gap);
        assert_eq!(weird.rank_gap, LayoutConfig::default().rank_gap);

        let resources = vec![
            ResourceNode::new("l_hc_net", "net"),
            ResourceNode::new("l_hc_a", "thing").with_parent("l_hc_net"),
            ResourceNode::new("l_hc_b", "thing").with_parent("l_hc_net"),
            ResourceNode::new("l_hc_c", "thing").with_parent("l_hc_net"),
        ];
        let scene = layout(&resources, &catalog(), &[], &config).unwrap();
        let kids: Vec<Rect> = ["l_hc_a", "l_hc_b", "l_hc_c"]
            .iter()
            .map(|k| bounds(&scene, k))
            .collect();
        for (i, a) in kids.iter().enumerate() {
            assert!(a.x.is_finite() && a.y.is_finite());
            for b in &kids[i + 1..] {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn pinned_position_is_ignored_for_nested_resources() {
        let resources = vec![
            ResourceNode::new("l_pn_net", "net"),
            ResourceNode::new("l_pn_vm", "vm")
                .with_parent("l_pn_net")
                .pinned_at(900.0, 900.0),
        ];
        let scene = layout(&resources, &catalog(), &[], &LayoutConfig::default()).unwrap();
        assert!(bounds(&scene, "l_pn_net").encloses(&bounds(&scene, "l_pn_vm"), 16.0));
    }

    #[test]
    fn cycle_fails_fast() {
        let resources = vec![
            ResourceNode::new("l_c1", "net").with_parent("l_c2"),
            ResourceNode::new("l_c2", "net").with_parent("l_c1"),
        ];
        assert!(matches!(
            layout(&resources, &catalog(), &[], &LayoutConfig::default()),
            Err(LayoutError::Cycle { .. })
        ));
    }

    #[test]
    fn edges_to_missing_resources_are_dropped() {
        let resources = vec![ResourceNode::new("l_lonely", "thing")];
        let edges = vec![
            DependencyEdge::new("l_lonely", "l_nowhere"),
            DependencyEdge::new("l_lonely", "l_lonely"),
        ];
        let scene = layout(&resources, &catalog(), &edges, &LayoutConfig::default()).unwrap();
        assert!(scene.edges().is_empty());
    }
}
