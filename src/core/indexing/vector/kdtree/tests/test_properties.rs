// src/core/indexing/vector/kdtree/tests/test_properties.rs

#[cfg(test)]
mod property_tests {
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    use crate::core::indexing::vector::kdtree::{
        build_kdtree, find_knn, linear_scan_knn, KdNode, KdTree, Neighbor, SearchParams,
    };
    use crate::core::types::{Embedding, PointId, VectorData};

    /// Points on a coarse integer grid so duplicates and axis ties show up.
    fn random_points(rng: &mut StdRng, n: usize, dimension: usize) -> Vec<(VectorData, PointId)> {
        (0..n)
            .map(|i| {
                let data = (0..dimension).map(|_| rng.gen_range(-10..=10) as f32).collect();
                (VectorData::from_vec(data), i as PointId)
            })
            .collect()
    }

    fn random_query(rng: &mut StdRng, dimension: usize) -> VectorData {
        VectorData::from_vec((0..dimension).map(|_| rng.gen_range(-12.0..12.0)).collect())
    }

    fn sorted_distances(neighbors: &[Neighbor]) -> Vec<f32> {
        let mut d: Vec<f32> = neighbors.iter().map(|n| n.distance).collect();
        d.sort_by(f32::total_cmp);
        d
    }

    fn preorder_ids<E: Embedding>(tree: &KdTree<E>) -> Vec<PointId> {
        let mut ids = Vec::new();
        tree.walk(|node, _| ids.push(node.id()));
        ids
    }

    fn subtree_coords<E: Embedding>(node: Option<&KdNode<E>>, axis: usize, out: &mut Vec<f32>) {
        if let Some(n) = node {
            out.push(n.embedding().coordinate(axis));
            subtree_coords(n.left(), axis, out);
            subtree_coords(n.right(), axis, out);
        }
    }

    #[test]
    fn test_height_is_minimal_for_every_size() {
        for n in 0..=130usize {
            let points: Vec<(f32, PointId)> = (0..n).map(|i| (i as f32, i as PointId)).collect();
            let tree = build_kdtree(points, 0).unwrap();
            // ceil(log2(n + 1))
            let expected = (usize::BITS - n.leading_zeros()) as usize;
            assert_eq!(tree.height(), expected, "height for n = {}", n);
            assert_eq!(tree.len(), n);
        }
    }

    #[test]
    fn test_partition_invariant_holds_everywhere() {
        let mut rng = StdRng::seed_from_u64(7);
        for dimension in 1..=4 {
            let tree = build_kdtree(random_points(&mut rng, 200, dimension), dimension).unwrap();
            tree.walk(|node, depth| {
                let axis = depth % dimension;
                let split = node.embedding().coordinate(axis);

                let mut left = Vec::new();
                subtree_coords(node.left(), axis, &mut left);
                assert!(left.iter().all(|&c| c <= split), "left subtree above split");

                let mut right = Vec::new();
                subtree_coords(node.right(), axis, &mut right);
                assert!(right.iter().all(|&c| c >= split), "right subtree below split");
            });
        }
    }

    #[test]
    fn test_k_at_least_n_returns_every_point_once() {
        let mut rng = StdRng::seed_from_u64(11);
        let points = random_points(&mut rng, 60, 3);
        let tree = build_kdtree(points, 3).unwrap();

        for k in [60, 61, 1000] {
            let query = random_query(&mut rng, 3);
            let results = find_knn(&tree, &query, SearchParams::exact(k)).unwrap();
            let mut ids: Vec<PointId> = results.iter().map(|n| n.id).collect();
            ids.sort_unstable();
            assert_eq!(ids, (0..60).collect::<Vec<PointId>>());
        }
    }

    #[test]
    fn test_exact_search_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(23);
        for dimension in 1..=5 {
            let points = random_points(&mut rng, 300, dimension);
            let tree = build_kdtree(points.clone(), dimension).unwrap();

            for _ in 0..40 {
                let query = random_query(&mut rng, dimension);
                let k = rng.gen_range(1..=20);
                let from_tree = find_knn(&tree, &query, SearchParams::exact(k)).unwrap();
                let brute = linear_scan_knn(&points, &query, dimension, k).unwrap();

                assert_eq!(from_tree.len(), k);
                assert_eq!(sorted_distances(&from_tree), sorted_distances(&brute));
            }
        }
    }

    #[test]
    fn test_scalar_search_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(5);
        let points: Vec<(f32, PointId)> =
            (0..500).map(|i| (rng.gen_range(-1000.0..1000.0), i)).collect();
        let tree = build_kdtree(points.clone(), 0).unwrap();

        for _ in 0..100 {
            let query: f32 = rng.gen_range(-1100.0..1100.0);
            let from_tree = find_knn(&tree, &query, SearchParams::exact(7)).unwrap();
            let brute = linear_scan_knn(&points, &query, 1, 7).unwrap();
            assert_eq!(sorted_distances(&from_tree), sorted_distances(&brute));
        }
    }

    #[test]
    fn test_approximate_search_stays_within_bound() {
        let mut rng = StdRng::seed_from_u64(31);
        let points = random_points(&mut rng, 400, 3);
        let tree = build_kdtree(points.clone(), 3).unwrap();

        for epsilon in [0.1f32, 0.5, 2.0] {
            for _ in 0..30 {
                let query = random_query(&mut rng, 3);
                let approx = find_knn(&tree, &query, SearchParams::exact(5).with_epsilon(epsilon))
                    .unwrap();
                let exact = linear_scan_knn(&points, &query, 3, 5).unwrap();

                assert_eq!(approx.len(), 5);
                let approx_d = sorted_distances(&approx);
                let exact_d = sorted_distances(&exact);
                for (a, e) in approx_d.iter().zip(exact_d.iter()) {
                    assert!(*a >= *e - 1e-5);
                }
                // The K-th result is at most (1 + epsilon) times the true K-th.
                assert!(approx_d[4] <= exact_d[4] * (1.0 + epsilon) + 1e-4);
            }
        }
    }

    #[test]
    fn test_build_is_deterministic_regardless_of_input_order() {
        let mut rng = StdRng::seed_from_u64(3);
        let points = random_points(&mut rng, 257, 2);

        let first = build_kdtree(points.clone(), 2).unwrap();
        let second = build_kdtree(points.clone(), 2).unwrap();
        assert_eq!(preorder_ids(&first), preorder_ids(&second));

        let mut shuffled = points;
        shuffled.shuffle(&mut rng);
        let third = build_kdtree(shuffled, 2).unwrap();
        assert_eq!(preorder_ids(&first), preorder_ids(&third));
    }

    #[test]
    fn test_concurrent_queries_share_one_tree() {
        let mut rng = StdRng::seed_from_u64(99);
        let points = random_points(&mut rng, 500, 4);
        let tree = build_kdtree(points.clone(), 4).unwrap();
        let queries: Vec<VectorData> = (0..8).map(|_| random_query(&mut rng, 4)).collect();

        std::thread::scope(|scope| {
            for query in &queries {
                let tree = &tree;
                let points = &points;
                scope.spawn(move || {
                    let from_tree = find_knn(tree, query, SearchParams::exact(10)).unwrap();
                    let brute = linear_scan_knn(points, query, 4, 10).unwrap();
                    assert_eq!(sorted_distances(&from_tree), sorted_distances(&brute));
                });
            }
        });
    }
}
