//! TreeSHAP - exact Shapley values for tree ensembles
//!
//! Path-dependent algorithm (Lundberg et al., "Consistent Individualized
//! Feature Attribution for Tree Ensembles"): one walk per tree, tracking for
//! each feature on the current path the fraction of cover that flows down
//! when the feature is unknown (`zero_fraction`) and whether the instance
//! itself follows the path (`one_fraction`).
//!
//! Per tree: `sum(phi) + expected_value == leaf value reached by x`.

use super::tree::{Node, Tree};

#[derive(Debug, Clone, Copy, Default)]
struct PathElement {
    /// Split feature, `None` for the root sentinel
    feature: Option<usize>,
    zero_fraction: f64,
    one_fraction: f64,
    pweight: f64,
}

/// Add the Shapley contributions of `tree` for instance `x` into `phi`
pub fn accumulate(tree: &Tree, x: &[f32], phi: &mut [f64]) {
    recurse(tree, 0, x, phi, &[], 0, 1.0, 1.0, None);
}

#[allow(clippy::too_many_arguments)]
fn recurse(
    tree: &Tree,
    id: usize,
    x: &[f32],
    phi: &mut [f64],
    parent_path: &[PathElement],
    unique_depth: usize,
    zero_fraction: f64,
    one_fraction: f64,
    feature: Option<usize>,
) {
    let mut path = Vec::with_capacity(unique_depth + 1);
    path.extend_from_slice(&parent_path[..unique_depth]);
    path.push(PathElement::default());
    extend(&mut path, unique_depth, zero_fraction, one_fraction, feature);

    let node = tree.node(id);
    match *node {
        Node::Leaf { value, .. } => {
            for i in 1..=unique_depth {
                let weight = unwound_sum(&path, unique_depth, i);
                let el = path[i];
                if let Some(f) = el.feature {
                    phi[f] += weight * (el.one_fraction - el.zero_fraction) * value as f64;
                }
            }
        }
        Node::Split { feature: split, left, right, cover, .. } => {
            let hot = Tree::next(node, x).unwrap_or(left);
            let cold = if hot == left { right } else { left };

            let (hot_zero, cold_zero) = if cover > 0.0 {
                (tree.node(hot).cover() / cover, tree.node(cold).cover() / cover)
            } else {
                (0.5, 0.5)
            };

            let mut depth = unique_depth;
            let mut incoming_zero = 1.0;
            let mut incoming_one = 1.0;

            // a feature seen higher up the path is folded into this split
            if let Some(k) = (1..=depth).find(|&k| path[k].feature == Some(split)) {
                incoming_zero = path[k].zero_fraction;
                incoming_one = path[k].one_fraction;
                unwind(&mut path, depth, k);
                depth -= 1;
            }

            recurse(tree, hot, x, phi, &path, depth + 1, hot_zero * incoming_zero, incoming_one, Some(split));
            recurse(tree, cold, x, phi, &path, depth + 1, cold_zero * incoming_zero, 0.0, Some(split));
        }
    }
}

fn extend(path: &mut [PathElement], depth: usize, zero_fraction: f64, one_fraction: f64, feature: Option<usize>) {
    path[depth] = PathElement {
        feature,
        zero_fraction,
        one_fraction,
        pweight: if depth == 0 { 1.0 } else { 0.0 },
    };

    let d = depth as f64;
    for i in (0..depth).rev() {
        let fi = i as f64;
        path[i + 1].pweight += one_fraction * path[i].pweight * (fi + 1.0) / (d + 1.0);
        path[i].pweight = zero_fraction * path[i].pweight * (d - fi) / (d + 1.0);
    }
}

fn unwind(path: &mut [PathElement], depth: usize, index: usize) {
    let one_fraction = path[index].one_fraction;
    let zero_fraction = path[index].zero_fraction;
    let d = depth as f64;
    let mut next_one_portion = path[depth].pweight;

    for i in (0..depth).rev() {
        let fi = i as f64;
        if one_fraction != 0.0 {
            let tmp = path[i].pweight;
            path[i].pweight = next_one_portion * (d + 1.0) / ((fi + 1.0) * one_fraction);
            next_one_portion = tmp - path[i].pweight * zero_fraction * (d - fi) / (d + 1.0);
        } else {
            path[i].pweight = path[i].pweight * (d + 1.0) / (zero_fraction * (d - fi));
        }
    }

    for i in index..depth {
        path[i].feature = path[i + 1].feature;
        path[i].zero_fraction = path[i + 1].zero_fraction;
        path[i].one_fraction = path[i + 1].one_fraction;
    }
}

/// Total permutation weight of the path with element `index` removed
fn unwound_sum(path: &[PathElement], depth: usize, index: usize) -> f64 {
    let one_fraction = path[index].one_fraction;
    let zero_fraction = path[index].zero_fraction;
    let d = depth as f64;
    let mut next_one_portion = path[depth].pweight;
    let mut total = 0.0;

    for i in (0..depth).rev() {
        let fi = i as f64;
        if one_fraction != 0.0 {
            let tmp = next_one_portion * (d + 1.0) / ((fi + 1.0) * one_fraction);
            total += tmp;
            next_one_portion = path[i].pweight - tmp * zero_fraction * ((d - fi) / (d + 1.0));
        } else if zero_fraction != 0.0 {
            total += (path[i].pweight / zero_fraction) / ((d - fi) / (d + 1.0));
        }
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::artifact::{Flag, TreeJson};

    fn tree(json: TreeJson, features: usize) -> Tree {
        Tree::from_json(&json, features).unwrap()
    }

    /// x0 < 0.5 → -0.6, else x1 < 2500 → 0.1 / 0.4
    fn two_feature_tree() -> Tree {
        tree(
            TreeJson {
                left_children: vec![1, -1, 3, -1, -1],
                right_children: vec![2, -1, 4, -1, -1],
                split_indices: vec![0, 0, 1, 0, 0],
                split_conditions: vec![0.5, -0.6, 2500.0, 0.1, 0.4],
                default_left: vec![Flag::Int(0); 5],
                sum_hessian: vec![100.0, 20.0, 80.0, 30.0, 50.0],
                split_type: vec![],
            },
            3,
        )
    }

    /// Splits on x0 twice along one path
    fn repeated_feature_tree() -> Tree {
        tree(
            TreeJson {
                left_children: vec![1, -1, 3, -1, -1],
                right_children: vec![2, -1, 4, -1, -1],
                split_indices: vec![0, 0, 0, 0, 0],
                split_conditions: vec![1.0, -1.0, 5.0, 0.5, 2.0],
                default_left: vec![Flag::Bool(true); 5],
                sum_hessian: vec![10.0, 4.0, 6.0, 3.0, 3.0],
                split_type: vec![],
            },
            1,
        )
    }

    fn shap(tree: &Tree, x: &[f32]) -> Vec<f64> {
        let mut phi = vec![0.0; x.len()];
        accumulate(tree, x, &mut phi);
        phi
    }

    #[test]
    fn test_matches_hand_computed_shapley_values() {
        let tree = two_feature_tree();
        let phi = shap(&tree, &[1.0, 5000.0, 7.0]);

        // v() = 0.11, v(x0) = 0.2875, v(x1) = 0.2, v(x0,x1) = 0.4
        assert!((phi[0] - 0.18875).abs() < 1e-6, "{:?}", phi);
        assert!((phi[1] - 0.10125).abs() < 1e-6, "{:?}", phi);
        assert_eq!(phi[2], 0.0);
    }

    #[test]
    fn test_additivity() {
        let tree = two_feature_tree();
        for x in [[0.0f32, 100.0, 0.0], [1.0, 100.0, 0.0], [1.0, 2500.0, 0.0], [0.0, 9999.0, 1.0]] {
            let phi = shap(&tree, &x);
            let total = tree.expected_value() + phi.iter().sum::<f64>();
            assert!((total - tree.predict(&x) as f64).abs() < 1e-6, "x = {:?}", x);
        }
    }

    #[test]
    fn test_repeated_feature_gets_everything() {
        let tree = repeated_feature_tree();
        for x in [[0.0f32], [3.0], [7.0]] {
            let phi = shap(&tree, &x);
            let expected = tree.predict(&x) as f64 - tree.expected_value();
            assert!((phi[0] - expected).abs() < 1e-6, "x = {:?}: {:?}", x, phi);
        }
    }

    #[test]
    fn test_single_leaf_tree_attributes_nothing() {
        let tree = tree(
            TreeJson {
                left_children: vec![-1],
                right_children: vec![-1],
                split_indices: vec![0],
                split_conditions: vec![0.3],
                default_left: vec![Flag::Int(0)],
                sum_hessian: vec![12.0],
                split_type: vec![],
            },
            2,
        );
        assert_eq!(shap(&tree, &[1.0, 2.0]), vec![0.0, 0.0]);
        assert!((tree.expected_value() - 0.3).abs() < 1e-6);
    }
}
