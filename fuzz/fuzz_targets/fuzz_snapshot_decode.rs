#![no_main]

use libfuzzer_sys::fuzz_target;
use rpart_tree::{PartitionTree, RATIO_MAX, RATIO_MIN, Rect, TreeSnapshot};

fuzz_target!(|data: &[u8]| {
    // First two bytes pick the canvas (1..=120 x 1..=60); the rest is JSON.
    if data.len() < 2 {
        return;
    }
    let width = u16::from(data[0] % 120) + 1;
    let height = u16::from(data[1] % 60) + 1;

    let Ok(snapshot) = serde_json::from_slice::<TreeSnapshot>(&data[2..]) else {
        return;
    };
    let Ok(tree) = PartitionTree::from_snapshot(&snapshot) else {
        return;
    };

    tree.visit(|_, node| {
        if let Some(split) = node.as_split() {
            let ratio = split.ratio.get();
            assert!((RATIO_MIN..=RATIO_MAX).contains(&ratio), "ratio escaped clamp");
        }
    });

    let area = Rect::new(0, 0, width, height);
    let layout = tree.solve_layout(area);
    let covered: u32 = layout.regions().iter().map(|region| region.rect.area()).sum();
    assert_eq!(covered, area.area(), "leaves must tile the canvas");

    // Re-encoding an accepted tree must be accepted again.
    let again = PartitionTree::from_snapshot(&tree.to_snapshot()).expect("re-decode");
    assert_eq!(again.state_hash(), tree.state_hash());
});
