//! Regression tree
//!
//! Validated, evaluation-ready form of one `TreeJson`.

use super::artifact::TreeJson;
use super::error::{ModelError, ModelResult};

/// A node of a regression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
        default_left: bool,
        cover: f64,
    },
    Leaf {
        value: f32,
        cover: f64,
    },
}

impl Node {
    pub fn cover(&self) -> f64 {
        match self {
            Node::Split { cover, .. } | Node::Leaf { cover, .. } => *cover,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Build from the artifact form.
    ///
    /// Children must point forward (`child > parent`), which is how XGBoost
    /// numbers nodes and guarantees the walk terminates.
    pub fn from_json(tree: &TreeJson, num_features: usize) -> ModelResult<Self> {
        let n = tree.left_children.len();
        let lengths = [
            tree.right_children.len(),
            tree.split_indices.len(),
            tree.split_conditions.len(),
            tree.default_left.len(),
            tree.sum_hessian.len(),
        ];
        if n == 0 || lengths.iter().any(|&len| len != n) {
            return Err(ModelError::Malformed(format!(
                "tree arrays have inconsistent lengths ({} nodes, {:?})",
                n, lengths
            )));
        }
        if tree.split_type.iter().any(|&t| t != 0) {
            return Err(ModelError::Unsupported("categorical splits".to_string()));
        }

        let mut nodes = Vec::with_capacity(n);
        for id in 0..n {
            let cover = tree.sum_hessian[id] as f64;
            let (left, right) = (tree.left_children[id], tree.right_children[id]);

            if left == -1 {
                nodes.push(Node::Leaf { value: tree.split_conditions[id], cover });
                continue;
            }

            let child = |c: i32| -> ModelResult<usize> {
                if c <= id as i32 || c as usize >= n {
                    return Err(ModelError::Malformed(format!(
                        "node {} has invalid child {}",
                        id, c
                    )));
                }
                Ok(c as usize)
            };

            let feature = tree.split_indices[id] as usize;
            if feature >= num_features {
                return Err(ModelError::Malformed(format!(
                    "node {} splits on feature {} of {}",
                    id, feature, num_features
                )));
            }

            nodes.push(Node::Split {
                feature,
                threshold: tree.split_conditions[id],
                left: child(left)?,
                right: child(right)?,
                default_left: tree.default_left[id].is_set(),
                cover,
            });
        }

        Ok(Self { nodes })
    }

    pub fn node(&self, id: usize) -> &Node {
        &self.nodes[id]
    }

    /// Child the instance follows at a split (`x < threshold` goes left,
    /// missing values take the default branch)
    pub fn next(node: &Node, x: &[f32]) -> Option<usize> {
        match *node {
            Node::Leaf { .. } => None,
            Node::Split { feature, threshold, left, right, default_left, .. } => {
                let value = x[feature];
                let go_left = if value.is_nan() { default_left } else { value < threshold };
                Some(if go_left { left } else { right })
            }
        }
    }

    /// Leaf value reached by `x`
    pub fn predict(&self, x: &[f32]) -> f32 {
        let mut id = 0;
        loop {
            let node = &self.nodes[id];
            match Self::next(node, x) {
                Some(child) => id = child,
                None => {
                    if let Node::Leaf { value, .. } = node {
                        return *value;
                    }
                    return 0.0;
                }
            }
        }
    }

    /// Cover-weighted mean leaf value (the tree's output with nothing known)
    pub fn expected_value(&self) -> f64 {
        self.expected_from(0)
    }

    fn expected_from(&self, id: usize) -> f64 {
        match &self.nodes[id] {
            Node::Leaf { value, .. } => *value as f64,
            Node::Split { left, right, cover, .. } => {
                let (l, r) = (&self.nodes[*left], &self.nodes[*right]);
                if *cover <= 0.0 {
                    return 0.5 * (self.expected_from(*left) + self.expected_from(*right));
                }
                (l.cover() * self.expected_from(*left) + r.cover() * self.expected_from(*right))
                    / cover
            }
        }
    }
}
