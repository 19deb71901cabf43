#![no_main]

use libfuzzer_sys::fuzz_target;
use pathscope::graph::{
    algorithms::{compute_dominators, shortest_paths, undirected_shortest_paths, DepthFirstSearch},
    DirectedGraph, NodeId, UndirectedGraph,
};

// First byte: vertex count. Then (source, target, weight) byte triples.
fuzz_target!(|data: &[u8]| {
    let Some((&count, rest)) = data.split_first() else {
        return;
    };
    let count = usize::from(count % 64) + 1;
    let edges: Vec<(usize, usize, f64)> = rest
        .chunks_exact(3)
        .map(|c| (usize::from(c[0]) % count, usize::from(c[1]) % count, f64::from(c[2])))
        .collect();

    let Ok(directed) = DirectedGraph::from_edges(vec![(); count], edges.iter().copied()) else {
        return;
    };
    let Ok(undirected) = UndirectedGraph::from_edges(vec![(); count], edges.iter().copied()) else {
        return;
    };
    let root = NodeId::new(0);

    let _ = DepthFirstSearch::directed(&directed).compute(None);
    if let Ok(paths) = shortest_paths(&directed, Some(root), |e| *directed.edge(e).unwrap_or(&0.0)) {
        for node in 0..count {
            let _ = paths.try_get_path(NodeId::new(node));
        }
    }
    let _ = undirected_shortest_paths(&undirected, None, |e| *undirected.edge(e).unwrap_or(&0.0));
    if let Ok(dominators) = compute_dominators(&directed, root) {
        let _ = dominators.dominance_frontiers(&directed);
    }
});
