//! 线图结构不变式的随机测试

use pcbed_core::geometry::Line;
use pcbed_core::line_graph::LineGraph;
use pcbed_core::math::Point2;
use pcbed_core::point_table::Vertex;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    /// 两个新点之间加边
    AddFresh(u8, u8, u8, u8),
    /// 从已有点（按下标取模）到新点加边
    AddShared(usize, u8, u8),
    /// 连接两个已有点
    Connect(usize, usize),
    /// 删除第 n 条边（按边数取模）
    Remove(usize),
    Compact,
}

fn op() -> impl Strategy<Value = Op> {
    // 小网格，使坐标重合频繁出现
    prop_oneof![
        (0u8..4, 0u8..4, 0u8..4, 0u8..4).prop_map(|(a, b, c, d)| Op::AddFresh(a, b, c, d)),
        (any::<usize>(), 0u8..4, 0u8..4).prop_map(|(i, x, y)| Op::AddShared(i, x, y)),
        (any::<usize>(), any::<usize>()).prop_map(|(i, j)| Op::Connect(i, j)),
        any::<usize>().prop_map(Op::Remove),
        Just(Op::Compact),
    ]
}

fn apply(graph: &mut LineGraph, op: &Op) {
    match *op {
        Op::AddFresh(a, b, c, d) => {
            let start = Vertex::new(f64::from(a), f64::from(b));
            let end = Vertex::new(f64::from(c), f64::from(d));
            let _ = graph.add(start, end);
        }
        Op::AddShared(i, x, y) => {
            if let Some(shared) = nth_vertex(graph, i) {
                let _ = graph.add(shared, Vertex::new(f64::from(x), f64::from(y)));
            }
        }
        Op::Connect(i, j) => {
            if let (Some(a), Some(b)) = (nth_vertex(graph, i), nth_vertex(graph, j)) {
                let _ = graph.add(a, b);
            }
        }
        Op::Remove(n) => {
            if graph.edge_count() > 0 {
                let line = graph.edge(n % graph.edge_count()).unwrap().line();
                graph.remove(&line).unwrap();
            }
        }
        Op::Compact => {
            graph.compact();
        }
    }
}

fn nth_vertex(graph: &LineGraph, n: usize) -> Option<Vertex> {
    if graph.point_count() == 0 {
        return None;
    }
    graph.vertex(n % graph.point_count())
}

proptest! {
    #[test]
    fn indices_stay_dense_and_valid(ops in prop::collection::vec(op(), 1..40)) {
        let mut graph = LineGraph::new();
        for op in &ops {
            apply(&mut graph, op);
            prop_assert!(graph.is_consistent(), "broken after {:?}", op);
        }
    }

    #[test]
    fn compact_is_idempotent(ops in prop::collection::vec(op(), 1..40)) {
        let mut graph = LineGraph::new();
        for op in &ops {
            apply(&mut graph, op);
        }
        graph.compact();
        let points = graph.point_count();
        let edges = graph.edge_count();

        prop_assert_eq!(graph.compact(), 0);
        prop_assert_eq!(graph.point_count(), points);
        prop_assert_eq!(graph.edge_count(), edges);

        // 合并后没有坐标相同的两个点
        let positions: Vec<Point2> = graph.positions().collect();
        for (i, a) in positions.iter().enumerate() {
            prop_assert!(positions[i + 1..].iter().all(|b| b != a));
        }
    }

    #[test]
    fn add_then_remove_restores_counts(
        ops in prop::collection::vec(op(), 0..20),
        x in 100.0f64..200.0,
        y in 100.0f64..200.0,
    ) {
        let mut graph = LineGraph::new();
        for op in &ops {
            apply(&mut graph, op);
        }
        let points = graph.point_count();
        let edges = graph.edge_count();

        let start = Vertex::new(x, y);
        let end = Vertex::new(x + 1.0, y);
        prop_assert!(graph.add(start, end).unwrap());
        prop_assert!(graph.remove(&Line::new(start.position, end.position)).unwrap());

        prop_assert_eq!(graph.point_count(), points);
        prop_assert_eq!(graph.edge_count(), edges);
        prop_assert!(graph.is_consistent());
    }
}
