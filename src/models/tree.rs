//! Regression tree stored in flat array form

use serde::{Deserialize, Serialize};

/// Child index marking a leaf node
pub const LEAF: i64 = -1;

/// Binary regression tree.
///
/// Node `i` is described by the `i`-th entry of every array. Internal nodes
/// send a sample left when `features[feature[i]] <= threshold[i]`. Leaves
/// have `children_left[i] == children_right[i] == -1` and output `value[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<f64>,
}

impl RegressionTree {
    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        self.value.len()
    }

    /// Check the structure of the tree.
    ///
    /// Children must point strictly forward so traversal always terminates.
    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        let n = self.value.len();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_left.len() != n
            || self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
        {
            return Err(format!(
                "node arrays have different lengths (left={}, right={}, feature={}, threshold={}, value={})",
                self.children_left.len(),
                self.children_right.len(),
                self.feature.len(),
                self.threshold.len(),
                n
            ));
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);

            if left == LEAF || right == LEAF {
                if left != right {
                    return Err(format!("node {} has exactly one child", node));
                }
                if !self.value[node].is_finite() {
                    return Err(format!("leaf {} has a non-finite value", node));
                }
                continue;
            }

            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!("node {} has invalid child index {}", node, child));
                }
            }
            if self.feature[node] < 0 || self.feature[node] >= feature_count as i64 {
                return Err(format!(
                    "node {} splits on feature {} (model has {} features)",
                    node, self.feature[node], feature_count
                ));
            }
            if !self.threshold[node].is_finite() {
                return Err(format!("node {} has a non-finite threshold", node));
            }
        }

        Ok(())
    }

    /// Walk the tree for one sample and return the leaf value.
    ///
    /// Returns `None` if the sample is too short for a split feature or the
    /// tree is malformed (short arrays, a child that does not point forward).
    pub fn predict(&self, features: &[f64]) -> Option<f64> {
        let mut node = 0usize;
        loop {
            let left = *self.children_left.get(node)?;
            if left == LEAF {
                return self.value.get(node).copied();
            }
            let feature = usize::try_from(*self.feature.get(node)?).ok()?;
            let split = *features.get(feature)?;
            let next = if split <= *self.threshold.get(node)? {
                left
            } else {
                *self.children_right.get(node)?
            };
            let next = usize::try_from(next).ok()?;
            if next <= node {
                return None;
            }
            node = next;
        }
    }
}

#[cfg(test)]
impl RegressionTree {
    pub(crate) fn leaf(value: f64) -> Self {
        Self {
            children_left: vec![LEAF],
            children_right: vec![LEAF],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![value],
        }
    }

    pub(crate) fn stump(feature: i64, threshold: f64, left: f64, right: f64) -> Self {
        Self {
            children_left: vec![1, LEAF, LEAF],
            children_right: vec![2, LEAF, LEAF],
            feature: vec![feature, -2, -2],
            threshold: vec![threshold, -2.0, -2.0],
            value: vec![(left + right) / 2.0, left, right],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stump_traversal() {
        let tree = RegressionTree::stump(2, 100.0, 3.1, 4.2);
        assert!(tree.validate(8).is_ok());

        assert_eq!(tree.predict(&[0.0, 0.0, 99.0]), Some(3.1));
        assert_eq!(tree.predict(&[0.0, 0.0, 100.0]), Some(3.1));
        assert_eq!(tree.predict(&[0.0, 0.0, 100.5]), Some(4.2));
    }

    #[test]
    fn test_short_sample() {
        let tree = RegressionTree::stump(5, 1.0, 3.0, 4.0);
        assert_eq!(tree.predict(&[1.0, 2.0]), None);
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        let tree: RegressionTree = serde_json::from_str(
            r#"{
                "children_left": [1, 0],
                "children_right": [1, -1],
                "feature": [0, 0],
                "threshold": [0.5, 0.5],
                "value": [1.0, 2.0]
            }"#,
        )
        .unwrap();
        assert!(tree.validate(8).is_err());
    }

    #[test]
    fn test_validate_rejects_mismatched_arrays() {
        let tree: RegressionTree = serde_json::from_str(
            r#"{
                "children_left": [-1],
                "children_right": [-1],
                "feature": [],
                "threshold": [0.0],
                "value": [3.0]
            }"#,
        )
        .unwrap();
        assert!(tree.validate(8).is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_feature() {
        let tree = RegressionTree::stump(8, 1.0, 3.0, 4.0);
        assert!(tree.validate(8).is_err());
        assert!(tree.validate(9).is_ok());
    }

    #[test]
    fn test_unvalidated_malformed_tree() {
        let cyclic: RegressionTree = serde_json::from_str(
            r#"{
                "children_left": [0],
                "children_right": [0],
                "feature": [0],
                "threshold": [0.5],
                "value": [3.0]
            }"#,
        )
        .unwrap();
        assert_eq!(cyclic.predict(&[0.0]), None);

        let short_arrays: RegressionTree = serde_json::from_str(
            r#"{
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [],
                "threshold": [],
                "value": [3.0, 3.1, 4.2]
            }"#,
        )
        .unwrap();
        assert_eq!(short_arrays.predict(&[0.0]), None);

        let dangling_child: RegressionTree = serde_json::from_str(
            r#"{
                "children_left": [5],
                "children_right": [6],
                "feature": [0],
                "threshold": [0.5],
                "value": [3.0]
            }"#,
        )
        .unwrap();
        assert_eq!(dangling_child.predict(&[0.0]), None);
    }

    #[test]
    fn test_leaf_only_tree() {
        let tree = RegressionTree::leaf(3.7);
        assert!(tree.validate(8).is_ok());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict(&[]), Some(3.7));
    }
}
