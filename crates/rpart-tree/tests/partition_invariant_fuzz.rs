//! Property/fuzz-style invariants for partition-tree operations.
//!
//! Random operation streams run against the public `PartitionTree` API; after
//! each step the suite checks ID uniqueness, ratio bounds, layout tiling, and
//! that the previous revision was left untouched.

use std::collections::BTreeSet;

use proptest::prelude::*;
use rpart_core::{PaletteColors, Rgb};
use rpart_tree::{
    IdAllocator, MAX_TREE_DEPTH, Node, NodePath, PartitionTree, RATIO_MAX, RATIO_MIN, Rect,
    SplitDirection, TreeSnapshot,
};

#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn next_u16_range(&mut self, min: u16, max: u16) -> u16 {
        debug_assert!(min <= max);
        let span = u64::from(max - min + 1);
        min + (self.next_u64() % span) as u16
    }

    fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u64() % len as u64) as usize
    }

    fn choose_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 0
    }

    /// Ratio in roughly `[-0.5, 1.5)`, so clamping gets exercised too.
    fn next_raw_ratio(&mut self) -> f64 {
        (self.next_u64() % 2000) as f64 / 1000.0 - 0.5
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Operation {
    Split(NodePath, SplitDirection),
    Remove(NodePath),
    SetRatio(NodePath, f64),
}

fn palette() -> PaletteColors {
    PaletteColors::new(vec![
        Rgb::new(230, 57, 70),
        Rgb::new(69, 123, 157),
        Rgb::new(42, 157, 143),
        Rgb::new(233, 196, 106),
    ])
}

fn split_paths(tree: &PartitionTree) -> Vec<NodePath> {
    let mut out = Vec::new();
    tree.visit(|path, node| {
        if !node.is_leaf() {
            out.push(path.clone());
        }
    });
    out
}

fn random_operation(tree: &PartitionTree, rng: &mut Lcg) -> Operation {
    let leaves = tree.leaves();
    let splits = split_paths(tree);

    let mut candidates = vec![0usize]; // Split
    if leaves.len() > 1 {
        candidates.push(1); // Remove
        candidates.push(2); // SetRatio
    }

    match candidates[rng.choose_index(candidates.len())] {
        1 => {
            let (path, _) = &leaves[rng.choose_index(leaves.len())];
            Operation::Remove(path.clone())
        }
        2 => {
            let path = splits[rng.choose_index(splits.len())].clone();
            Operation::SetRatio(path, rng.next_raw_ratio())
        }
        _ => {
            // Only a full tree has every leaf at the limit, so this is never empty.
            let splittable: Vec<&NodePath> = leaves
                .iter()
                .map(|(path, _)| path)
                .filter(|path| path.depth() < MAX_TREE_DEPTH)
                .collect();
            let path = splittable[rng.choose_index(splittable.len())];
            let direction = if rng.choose_bool() {
                SplitDirection::Horizontal
            } else {
                SplitDirection::Vertical
            };
            Operation::Split(path.clone(), direction)
        }
    }
}

fn apply(
    tree: &PartitionTree,
    operation: &Operation,
    ids: &mut IdAllocator,
    colors: &mut PaletteColors,
) -> PartitionTree {
    let next = match operation {
        Operation::Split(path, direction) => tree.split(path, *direction, ids, colors),
        Operation::Remove(path) => tree.remove(path),
        Operation::SetRatio(path, ratio) => tree.set_ratio(path, *ratio),
    };
    next.unwrap_or_else(|err| panic!("operation {operation:?} failed: {err}"))
}

fn assert_tree_invariants(tree: &PartitionTree) {
    let mut seen = BTreeSet::new();
    tree.visit(|path, node| {
        assert!(seen.insert(node.id()), "duplicate id {} at {path}", node.id());
        if let Node::Split(split) = node {
            let ratio = split.ratio.get();
            assert!(
                (RATIO_MIN..=RATIO_MAX).contains(&ratio),
                "ratio {ratio} out of range at {path}"
            );
        }
    });
    assert_eq!(seen.len(), tree.len());
    assert_eq!(tree.leaf_count() * 2 - 1, tree.len());
}

fn assert_layout_tiles(tree: &PartitionTree, area: Rect) {
    let layout = tree.solve_layout(area);
    assert_eq!(layout, tree.solve_layout(area), "layout must be deterministic");
    assert_eq!(layout.regions().len(), tree.leaf_count());
    assert_eq!(layout.dividers().len(), tree.len() - tree.leaf_count());

    let mut covered = 0u32;
    for region in layout.regions() {
        let rect = region.rect;
        assert!(rect.x >= area.x && rect.y >= area.y);
        assert!(rect.right() <= area.right() && rect.bottom() <= area.bottom());
        covered += rect.area();
    }
    assert_eq!(covered, area.area(), "leaves must tile the canvas");
}

fn run_sequence(seed: u64, steps: usize) -> (PartitionTree, Vec<Operation>) {
    let mut ids = IdAllocator::default();
    let mut colors = palette();
    let mut tree = PartitionTree::new(&mut ids, &mut colors).expect("root");
    let mut rng = Lcg::new(seed);
    let mut applied = Vec::with_capacity(steps);

    for _ in 0..steps {
        let operation = random_operation(&tree, &mut rng);
        let before = tree.clone();
        let before_hash = before.state_hash();

        tree = apply(&tree, &operation, &mut ids, &mut colors);

        assert_eq!(before.state_hash(), before_hash, "input revision mutated");
        assert_tree_invariants(&tree);
        let area = Rect::new(
            rng.next_u16_range(0, 8),
            rng.next_u16_range(0, 8),
            rng.next_u16_range(1, 160),
            rng.next_u16_range(1, 60),
        );
        assert_layout_tiles(&tree, area);
        applied.push(operation);
    }

    (tree, applied)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_operation_sequences_preserve_invariants(
        seed in any::<u64>(),
        steps in 20usize..120,
    ) {
        let (tree, _) = run_sequence(seed, steps);
        assert_tree_invariants(&tree);
    }

    #[test]
    fn random_operation_sequences_replay_deterministically(
        seed in any::<u64>(),
        steps in 20usize..80,
    ) {
        let (final_tree, operations) = run_sequence(seed, steps);

        let mut ids = IdAllocator::default();
        let mut colors = palette();
        let mut replay = PartitionTree::new(&mut ids, &mut colors).expect("root");
        for operation in &operations {
            replay = apply(&replay, operation, &mut ids, &mut colors);
        }
        prop_assert_eq!(replay.state_hash(), final_tree.state_hash());
        prop_assert_eq!(&replay, &final_tree);
    }

    #[test]
    fn snapshots_survive_json_after_random_edits(
        seed in any::<u64>(),
        steps in 1usize..60,
    ) {
        let (tree, _) = run_sequence(seed, steps);
        let json = serde_json::to_string(&tree.to_snapshot()).expect("serialize");
        let snapshot: TreeSnapshot = serde_json::from_str(&json).expect("deserialize");
        let restored = PartitionTree::from_snapshot(&snapshot).expect("valid snapshot");
        prop_assert_eq!(restored.state_hash(), tree.state_hash());
    }
}

#[test]
fn removing_every_leaf_but_one_returns_to_a_single_region() {
    let (mut tree, _) = run_sequence(7, 60);
    while tree.leaf_count() > 1 {
        let (path, _) = tree.leaves().pop().expect("at least two leaves");
        tree = tree.remove(&path).expect("remove leaf");
        assert_tree_invariants(&tree);
    }
    assert!(tree.root().is_leaf());
    assert_layout_tiles(&tree, Rect::new(0, 0, 80, 24));
}
