//! Device connectivity graph.
//!
//! A [`Topology`] is an undirected, connected graph over physical nodes
//! `0..n`. All-pairs distances and next-hop pointers are computed once at
//! construction; afterwards the topology is read-only and can be shared by
//! any number of routing runs.
//!
//! # Examples
//!
//! ```
//! use qroute_compile::Topology;
//!
//! let path = Topology::linear(4).unwrap();
//! assert!(path.is_adjacent(1, 2));
//! assert_eq!(path.distance(0, 3), 3);
//! assert_eq!(path.shortest_path(0, 3), vec![0, 1, 2, 3]);
//!
//! // Disconnected graphs are rejected.
//! assert!(Topology::new(4, [(0, 1), (2, 3)]).is_err());
//! ```

use std::collections::BTreeMap;

use petgraph::algo::connected_components;
use petgraph::graph::UnGraph;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::{CompileError, CompileResult};

/// Distance marker for unreachable pairs while the table is being built.
const UNREACHABLE: u32 = u32::MAX;

/// Undirected connectivity graph with precomputed shortest paths.
///
/// ## Invariants
///
/// - The graph has at least one node and exactly one connected component.
/// - `distance` is symmetric, zero on the diagonal and satisfies the
///   triangle inequality.
/// - `next_hop(a, b)` is the smallest-id neighbor of `a` that lies on a
///   shortest path to `b`, so path reconstruction is deterministic.
#[derive(Debug, Clone)]
pub struct Topology {
    num_nodes: u32,
    /// Deduplicated edges, each stored once with the smaller endpoint first.
    edges: Vec<(u32, u32)>,
    /// Sorted adjacency lists.
    adjacency: Vec<Vec<u32>>,
    dist_matrix: Vec<Vec<u32>>,
    next_matrix: Vec<Vec<u32>>,
}

impl Topology {
    /// Build a topology from a node count and an edge list.
    ///
    /// Duplicate edges, including reversed pairs, are ignored. Fails with
    /// [`CompileError::InvalidTopology`] if there are no nodes, an endpoint
    /// is out of range, an edge is a self-loop, or the graph is disconnected.
    pub fn new(num_nodes: u32, edges: impl IntoIterator<Item = (u32, u32)>) -> CompileResult<Self> {
        if num_nodes == 0 {
            return Err(CompileError::InvalidTopology(
                "topology has no nodes".to_string(),
            ));
        }

        let mut seen = FxHashSet::default();
        let mut edge_list = Vec::new();
        let mut adjacency = vec![Vec::new(); num_nodes as usize];

        for (a, b) in edges {
            if a >= num_nodes || b >= num_nodes {
                return Err(CompileError::InvalidTopology(format!(
                    "edge ({a}, {b}) references a node outside 0..{num_nodes}"
                )));
            }
            if a == b {
                return Err(CompileError::InvalidTopology(format!(
                    "self-loop on node {a}"
                )));
            }
            let key = (a.min(b), a.max(b));
            if seen.insert(key) {
                edge_list.push(key);
                adjacency[a as usize].push(b);
                adjacency[b as usize].push(a);
            }
        }

        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
        }

        let mut graph = UnGraph::<(), ()>::with_capacity(num_nodes as usize, edge_list.len());
        for _ in 0..num_nodes {
            graph.add_node(());
        }
        graph.extend_with_edges(edge_list.iter().copied());
        let components = connected_components(&graph);
        if components != 1 {
            return Err(CompileError::InvalidTopology(format!(
                "graph has {components} connected components, expected 1"
            )));
        }

        let mut topology = Self {
            num_nodes,
            edges: edge_list,
            adjacency,
            dist_matrix: Vec::new(),
            next_matrix: Vec::new(),
        };
        topology.precompute_distances();

        debug!(
            "Built topology with {} nodes, {} edges",
            topology.num_nodes,
            topology.edges.len()
        );

        Ok(topology)
    }

    /// Build a topology from an adjacency description.
    ///
    /// The keys define the node set, which must be exactly `0..n`. Every
    /// listed neighbor must list the node back; an asymmetric description is
    /// rejected rather than silently symmetrized.
    pub fn from_adjacency(adjacency: &BTreeMap<u32, Vec<u32>>) -> CompileResult<Self> {
        let num_nodes = u32::try_from(adjacency.len())
            .map_err(|_| CompileError::InvalidTopology("too many nodes".to_string()))?;

        if let Some((&last, _)) = adjacency.last_key_value() {
            if last + 1 != num_nodes {
                return Err(CompileError::InvalidTopology(format!(
                    "node ids must be 0..{num_nodes}, found node {last}"
                )));
            }
        }

        let mut edges = Vec::new();
        for (&node, neighbors) in adjacency {
            for &neighbor in neighbors {
                let back = adjacency
                    .get(&neighbor)
                    .is_some_and(|list| list.contains(&node));
                if !back {
                    return Err(CompileError::InvalidTopology(format!(
                        "node {node} lists {neighbor} as a neighbor but not the other way round"
                    )));
                }
                edges.push((node, neighbor));
            }
        }

        Self::new(num_nodes, edges)
    }

    /// Create a linear topology (0-1-2-3-...).
    pub fn linear(n: u32) -> CompileResult<Self> {
        Self::new(n, (1..n).map(|i| (i - 1, i)))
    }

    /// Create a ring topology (a linear chain closed back onto node 0).
    pub fn ring(n: u32) -> CompileResult<Self> {
        let closing = (n > 2).then_some((n - 1, 0));
        Self::new(n, (1..n).map(|i| (i - 1, i)).chain(closing))
    }

    /// Create a star topology (node 0 connected to all others).
    pub fn star(n: u32) -> CompileResult<Self> {
        Self::new(n, (1..n).map(|i| (0, i)))
    }

    /// Create a fully connected topology.
    pub fn full(n: u32) -> CompileResult<Self> {
        Self::new(n, (0..n).flat_map(|i| ((i + 1)..n).map(move |j| (i, j))))
    }

    /// Create a `rows x cols` grid; node `r * cols + c` sits at row `r`,
    /// column `c`.
    pub fn grid(rows: u32, cols: u32) -> CompileResult<Self> {
        let num_nodes = rows.checked_mul(cols).ok_or_else(|| {
            CompileError::InvalidTopology(format!("grid {rows}x{cols} has too many nodes"))
        })?;
        let index = move |r: u32, c: u32| r * cols + c;
        let horizontal =
            (0..rows).flat_map(move |r| (1..cols).map(move |c| (index(r, c - 1), index(r, c))));
        let vertical =
            (1..rows).flat_map(move |r| (0..cols).map(move |c| (index(r - 1, c), index(r, c))));
        Self::new(num_nodes, horizontal.chain(vertical))
    }

    /// All-pairs shortest paths via Floyd–Warshall, then canonical next hops.
    #[allow(clippy::needless_range_loop)]
    fn precompute_distances(&mut self) {
        let n = self.num_nodes as usize;
        let mut dist = vec![vec![UNREACHABLE; n]; n];

        for (i, row) in dist.iter_mut().enumerate() {
            row[i] = 0;
            for &j in &self.adjacency[i] {
                row[j as usize] = 1;
            }
        }

        for k in 0..n {
            for i in 0..n {
                let dik = dist[i][k];
                if dik == UNREACHABLE {
                    continue;
                }
                for j in 0..n {
                    let dkj = dist[k][j];
                    if dkj != UNREACHABLE && dik + dkj < dist[i][j] {
                        dist[i][j] = dik + dkj;
                    }
                }
            }
        }

        // The first hop from i toward j is the smallest neighbor of i that is
        // one step closer to j. Adjacency lists are sorted, so the first match
        // wins.
        let mut next = vec![vec![0_u32; n]; n];
        for i in 0..n {
            for j in 0..n {
                next[i][j] = if i == j {
                    j as u32
                } else {
                    self.adjacency[i]
                        .iter()
                        .copied()
                        .find(|&w| dist[w as usize][j] + 1 == dist[i][j])
                        .unwrap_or(j as u32)
                };
            }
        }

        self.dist_matrix = dist;
        self.next_matrix = next;
    }

    /// Number of physical nodes.
    #[inline]
    pub fn num_nodes(&self) -> u32 {
        self.num_nodes
    }

    /// Deduplicated edge list, smaller endpoint first.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Neighbors of `node`, in ascending order.
    #[inline]
    pub fn neighbors(&self, node: u32) -> &[u32] {
        &self.adjacency[node as usize]
    }

    /// Number of neighbors of `node`.
    #[inline]
    pub fn degree(&self, node: u32) -> usize {
        self.adjacency[node as usize].len()
    }

    /// Check if two nodes share an edge.
    #[inline]
    pub fn is_adjacent(&self, a: u32, b: u32) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    /// Shortest-path hop count between two nodes.
    #[inline]
    pub fn distance(&self, a: u32, b: u32) -> u32 {
        self.dist_matrix[a as usize][b as usize]
    }

    /// First node after `a` on the canonical shortest path toward `b`.
    #[inline]
    pub fn next_hop(&self, a: u32, b: u32) -> u32 {
        self.next_matrix[a as usize][b as usize]
    }

    /// Shortest path from `a` to `b`, both endpoints included.
    pub fn shortest_path(&self, a: u32, b: u32) -> Vec<u32> {
        let mut path = Vec::with_capacity(self.distance(a, b) as usize + 1);
        path.push(a);
        let mut current = a;
        while current != b {
            current = self.next_hop(current, b);
            path.push(current);
        }
        path
    }

    /// Largest distance between any two nodes.
    pub fn diameter(&self) -> u32 {
        self.dist_matrix
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

/// Serializable description of a topology.
///
/// Accepts either an explicit edge list or an adjacency mapping:
///
/// ```
/// use qroute_compile::topology::TopologyDescription;
///
/// let edges: TopologyDescription =
///     serde_json::from_str(r#"{"num_nodes": 3, "edges": [[0, 1], [1, 2]]}"#).unwrap();
/// let adjacency: TopologyDescription =
///     serde_json::from_str(r#"{"adjacency": {"0": [1], "1": [0, 2], "2": [1]}}"#).unwrap();
///
/// let a = edges.build().unwrap();
/// let b = adjacency.build().unwrap();
/// assert_eq!(a.edges(), b.edges());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TopologyDescription {
    /// Node count plus undirected edge list.
    Edges { num_nodes: u32, edges: Vec<(u32, u32)> },
    /// Node to neighbor-list mapping.
    Adjacency {
        #[serde(deserialize_with = "node_keyed")]
        adjacency: BTreeMap<u32, Vec<u32>>,
    },
}

/// JSON object keys are strings; node ids are parsed from them.
fn node_keyed<'de, D>(deserializer: D) -> Result<BTreeMap<u32, Vec<u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    BTreeMap::<String, Vec<u32>>::deserialize(deserializer)?
        .into_iter()
        .map(|(key, neighbors)| {
            key.trim()
                .parse()
                .map(|node| (node, neighbors))
                .map_err(|_| serde::de::Error::custom(format!("invalid node id '{key}'")))
        })
        .collect()
}

impl TopologyDescription {
    /// Validate the description and precompute distances.
    pub fn build(&self) -> CompileResult<Topology> {
        match self {
            TopologyDescription::Edges { num_nodes, edges } => {
                Topology::new(*num_nodes, edges.iter().copied())
            }
            TopologyDescription::Adjacency { adjacency } => Topology::from_adjacency(adjacency),
        }
    }
}

impl From<&Topology> for TopologyDescription {
    fn from(topology: &Topology) -> Self {
        TopologyDescription::Edges {
            num_nodes: topology.num_nodes(),
            edges: topology.edges().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_distances() {
        let t = Topology::linear(5).unwrap();
        assert!(t.is_adjacent(0, 1));
        assert!(t.is_adjacent(1, 0));
        assert!(!t.is_adjacent(0, 2));
        assert_eq!(t.distance(0, 4), 4);
        assert_eq!(t.distance(4, 0), 4);
        assert_eq!(t.shortest_path(4, 1), vec![4, 3, 2, 1]);
        assert_eq!(t.diameter(), 4);
    }

    #[test]
    fn test_star_distances() {
        let t = Topology::star(5).unwrap();
        assert_eq!(t.degree(0), 4);
        assert_eq!(t.degree(3), 1);
        assert_eq!(t.distance(1, 2), 2);
        assert_eq!(t.shortest_path(1, 2), vec![1, 0, 2]);
    }

    #[test]
    fn test_ring_wraps() {
        let t = Topology::ring(6).unwrap();
        assert!(t.is_adjacent(5, 0));
        assert_eq!(t.distance(0, 4), 2);
        assert_eq!(t.shortest_path(0, 4), vec![0, 5, 4]);
    }

    #[test]
    fn test_grid_tie_break_smallest_hop() {
        // 0 1 2
        // 3 4 5
        let t = Topology::grid(2, 3).unwrap();
        assert_eq!(t.num_nodes(), 6);
        assert_eq!(t.edges().len(), 7);
        assert_eq!(t.distance(0, 5), 3);
        // Both 1 and 3 start a shortest path from 0 to 5; 1 is smaller.
        assert_eq!(t.next_hop(0, 5), 1);
        assert_eq!(t.shortest_path(0, 5), vec![0, 1, 2, 5]);
        // From 5 toward 0, candidates are 2 and 4.
        assert_eq!(t.shortest_path(5, 0), vec![5, 2, 1, 0]);
    }

    #[test]
    fn test_distance_table_invariants() {
        let t = Topology::grid(3, 3).unwrap();
        let n = t.num_nodes();
        for a in 0..n {
            assert_eq!(t.distance(a, a), 0);
            for b in 0..n {
                assert_eq!(t.distance(a, b), t.distance(b, a));
                let path = t.shortest_path(a, b);
                assert_eq!(path.len() as u32, t.distance(a, b) + 1);
                for w in path.windows(2) {
                    assert!(t.is_adjacent(w[0], w[1]));
                }
                for c in 0..n {
                    assert!(t.distance(a, c) <= t.distance(a, b) + t.distance(b, c));
                }
            }
        }
    }

    #[test]
    fn test_duplicate_edges_ignored() {
        let t = Topology::new(3, [(0, 1), (1, 0), (1, 2), (0, 1)]).unwrap();
        assert_eq!(t.edges(), &[(0, 1), (1, 2)]);
        assert_eq!(t.neighbors(1), &[0, 2]);
    }

    #[test]
    fn test_invalid_topologies() {
        assert!(matches!(
            Topology::new(0, []),
            Err(CompileError::InvalidTopology(_))
        ));
        assert!(matches!(
            Topology::new(3, [(0, 1), (1, 3)]),
            Err(CompileError::InvalidTopology(_))
        ));
        assert!(matches!(
            Topology::new(2, [(1, 1)]),
            Err(CompileError::InvalidTopology(_))
        ));
        assert!(matches!(
            Topology::new(4, [(0, 1), (2, 3)]),
            Err(CompileError::InvalidTopology(_))
        ));
        assert!(matches!(
            Topology::linear(0),
            Err(CompileError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_single_node_is_valid() {
        let t = Topology::new(1, []).unwrap();
        assert_eq!(t.num_nodes(), 1);
        assert_eq!(t.shortest_path(0, 0), vec![0]);
    }

    #[test]
    fn test_from_adjacency() {
        let adjacency = BTreeMap::from([
            (0, vec![1]),
            (1, vec![0, 2]),
            (2, vec![1, 3]),
            (3, vec![2]),
        ]);
        let t = Topology::from_adjacency(&adjacency).unwrap();
        assert_eq!(t.num_nodes(), 4);
        assert_eq!(t.distance(0, 3), 3);
    }

    #[test]
    fn test_from_adjacency_rejects_asymmetry() {
        let adjacency = BTreeMap::from([(0, vec![1]), (1, vec![])]);
        assert!(matches!(
            Topology::from_adjacency(&adjacency),
            Err(CompileError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_from_adjacency_rejects_gaps() {
        let adjacency = BTreeMap::from([(0, vec![2]), (2, vec![0])]);
        assert!(matches!(
            Topology::from_adjacency(&adjacency),
            Err(CompileError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_description_roundtrip() {
        let t = Topology::star(4).unwrap();
        let desc = TopologyDescription::from(&t);
        let json = serde_json::to_string(&desc).unwrap();
        let back: TopologyDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(back.build().unwrap().edges(), t.edges());
    }

    #[test]
    fn test_description_from_adjacency_json() {
        let desc: TopologyDescription =
            serde_json::from_str(r#"{"adjacency": {"0": [1], "1": [0, 2], "2": [1]}}"#).unwrap();
        assert_eq!(
            desc,
            TopologyDescription::Adjacency {
                adjacency: BTreeMap::from([(0, vec![1]), (1, vec![0, 2]), (2, vec![1])]),
            }
        );
        let t = desc.build().unwrap();
        assert_eq!(t.edges(), Topology::linear(3).unwrap().edges());

        // Serialized adjacency maps parse back.
        let json = serde_json::to_string(&desc).unwrap();
        let back: TopologyDescription = serde_json::from_str(&json).unwrap();
        assert_eq!(back, desc);
    }

    #[test]
    fn test_description_rejects_bad_node_key() {
        let result =
            serde_json::from_str::<TopologyDescription>(r#"{"adjacency": {"a": [1], "1": [0]}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_grid_overflow_rejected() {
        for (rows, cols) in [(65536, 65536), (u32::MAX, 2)] {
            assert!(matches!(
                Topology::grid(rows, cols),
                Err(CompileError::InvalidTopology(_))
            ));
        }
    }
}
