//! CART decision tree with Gini impurity, used as the forest's base learner.

use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::index;

/// Growth limits for one tree
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Features examined at each split
    pub max_features: usize,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        counts: Vec<usize>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A fitted classification tree
#[derive(Debug, Clone)]
pub(crate) struct DecisionTree {
    root: Node,
}

/// Best split found at a node
struct Candidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

impl DecisionTree {
    /// Grow a tree on the rows listed in `sample` (duplicates allowed).
    pub(crate) fn fit(
        x: &Array2<f64>,
        y: &[usize],
        sample: Vec<usize>,
        n_classes: usize,
        params: TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let root = build(x, y, sample, n_classes, params, 0, rng);
        Self { root }
    }

    /// Class counts of the leaf reached by `row`
    pub(crate) fn leaf_counts(&self, row: ArrayView1<f64>) -> &[usize] {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { counts } => return counts,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold { &**left } else { &**right };
                }
            }
        }
    }

    /// Majority class of the leaf reached by `row` (ties → smaller label)
    pub(crate) fn predict_row(&self, row: ArrayView1<f64>) -> usize {
        argmax(self.leaf_counts(row))
    }

    pub(crate) fn depth(&self) -> usize {
        fn depth(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + depth(left).max(depth(right)),
            }
        }
        depth(&self.root)
    }
}

/// Index of the largest count, first wins on ties
pub(crate) fn argmax(counts: &[usize]) -> usize {
    let mut best = 0;
    for (k, &c) in counts.iter().enumerate() {
        if c > counts[best] {
            best = k;
        }
    }
    best
}

fn build(
    x: &Array2<f64>,
    y: &[usize],
    sample: Vec<usize>,
    n_classes: usize,
    params: TreeParams,
    depth: usize,
    rng: &mut StdRng,
) -> Node {
    let mut counts = vec![0usize; n_classes];
    for &i in &sample {
        counts[y[i]] += 1;
    }

    let n = sample.len();
    let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
    let too_deep = params.max_depth.is_some_and(|d| depth >= d);
    if pure || too_deep || n < params.min_samples_split {
        return Node::Leaf { counts };
    }

    let parent = gini(&counts, n);
    let Some(best) = best_split(x, y, &sample, n_classes, params.max_features, rng) else {
        return Node::Leaf { counts };
    };
    if best.impurity >= parent - 1e-12 {
        return Node::Leaf { counts };
    }

    let (left, right): (Vec<usize>, Vec<usize>) = sample
        .into_iter()
        .partition(|&i| x[[i, best.feature]] <= best.threshold);

    Node::Split {
        feature: best.feature,
        threshold: best.threshold,
        left: Box::new(build(x, y, left, n_classes, params, depth + 1, rng)),
        right: Box::new(build(x, y, right, n_classes, params, depth + 1, rng)),
    }
}

/// Lowest weighted Gini over a random subset of features, thresholds at
/// midpoints between consecutive distinct values.
fn best_split(
    x: &Array2<f64>,
    y: &[usize],
    sample: &[usize],
    n_classes: usize,
    max_features: usize,
    rng: &mut StdRng,
) -> Option<Candidate> {
    let n = sample.len();
    let n_features = x.ncols();
    let mut best: Option<Candidate> = None;
    let mut order = sample.to_vec();

    for feature in index::sample(rng, n_features, max_features.min(n_features)) {
        order.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));

        let mut left = vec![0usize; n_classes];
        let mut right = vec![0usize; n_classes];
        for &i in &order {
            right[y[i]] += 1;
        }

        for k in 0..n - 1 {
            let i = order[k];
            left[y[i]] += 1;
            right[y[i]] -= 1;

            let here = x[[i, feature]];
            let next = x[[order[k + 1], feature]];
            if next <= here {
                continue;
            }

            let n_left = k + 1;
            let n_right = n - n_left;
            let impurity = (n_left as f64 * gini(&left, n_left)
                + n_right as f64 * gini(&right, n_right))
                / n as f64;

            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                best = Some(Candidate {
                    feature,
                    threshold: here + (next - here) / 2.0,
                    impurity,
                });
            }
        }
    }

    best
}
