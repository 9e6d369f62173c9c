#![no_main]

use std::collections::BTreeSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rpart_core::RandomColors;
use rpart_tree::{Editor, EditorConfig, EditorEvent, NodePath, SplitDirection};

#[derive(Debug, Arbitrary)]
enum FuzzEvent {
    Split { path: Vec<u8>, vertical: bool },
    Remove { path: Vec<u8> },
    SetRatio { path: Vec<u8>, ratio: f64 },
    PointerDown { x: i16, y: i16 },
    PointerMove { x: i16, y: i16 },
    PointerUp { x: i16, y: i16 },
    Resize { width: u8, height: u8 },
}

fn path(raw: &[u8]) -> NodePath {
    // Mostly valid indices, occasionally out of range.
    NodePath::from(
        raw.iter()
            .take(12)
            .map(|byte| usize::from(byte % 3))
            .collect::<Vec<_>>(),
    )
}

impl From<FuzzEvent> for EditorEvent {
    fn from(event: FuzzEvent) -> Self {
        match event {
            FuzzEvent::Split { path: raw, vertical } => Self::Split {
                path: path(&raw),
                direction: if vertical {
                    SplitDirection::Vertical
                } else {
                    SplitDirection::Horizontal
                },
            },
            FuzzEvent::Remove { path: raw } => Self::Remove { path: path(&raw) },
            FuzzEvent::SetRatio { path: raw, ratio } => Self::SetRatio {
                path: path(&raw),
                ratio,
            },
            FuzzEvent::PointerDown { x, y } => Self::PointerDown {
                x: i32::from(x),
                y: i32::from(y),
            },
            FuzzEvent::PointerMove { x, y } => Self::PointerMove {
                x: i32::from(x),
                y: i32::from(y),
            },
            FuzzEvent::PointerUp { x, y } => Self::PointerUp {
                x: i32::from(x),
                y: i32::from(y),
            },
            FuzzEvent::Resize { width, height } => Self::Resize {
                width: u16::from(width),
                height: u16::from(height),
            },
        }
    }
}

fuzz_target!(|events: Vec<FuzzEvent>| {
    let mut editor = Editor::new(EditorConfig::default(), RandomColors::seeded(0))
        .expect("default config is valid");

    for event in events.into_iter().take(256) {
        let before = editor.tree().clone();
        if editor.apply(event.into()).is_err() {
            assert_eq!(editor.tree(), &before, "rejected event changed the tree");
        }

        let mut ids = BTreeSet::new();
        editor.tree().visit(|_, node| {
            assert!(ids.insert(node.id()), "duplicate node id {}", node.id());
        });

        let canvas = editor.canvas();
        let covered: u32 = editor
            .layout()
            .regions()
            .iter()
            .map(|region| region.rect.area())
            .sum();
        assert_eq!(covered, canvas.area(), "leaves must tile the canvas");
    }
});
