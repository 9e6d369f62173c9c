//! Event scripts: replay a list of editor events and report the outcome.
//!
//! ```json
//! { "events": [
//!     { "op": "split", "path": [], "direction": "horizontal" },
//!     { "op": "pointer_down", "x": 40, "y": 3 },
//!     { "op": "pointer_move", "x": 20, "y": 3 },
//!     { "op": "pointer_up", "x": 20, "y": 3 }
//! ] }
//! ```

use std::path::Path;

use rpart_core::{ColorSource, Rect};
use rpart_tree::{Editor, EditorEffect, EditorEvent, TreeSnapshot};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use crate::error::{CliError, Result};
use crate::settings::load_json;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Script {
    pub events: Vec<EditorEvent>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        load_json(path)
    }
}

/// What happened to one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    pub index: usize,
    pub op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<EditorEffect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Final state after replaying a script.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub canvas: Rect,
    pub revision: u64,
    pub leaf_count: usize,
    pub depth: usize,
    /// FNV-1a structural hash of the final tree, as 16 hex digits.
    pub state_hash: String,
    pub steps: Vec<StepRecord>,
    pub tree: TreeSnapshot,
}

/// Replay `script` against `editor`.
///
/// The first rejected event aborts the run unless `keep_going` is set, in
/// which case the rejection is recorded and replay continues.
pub fn run_script<C: ColorSource>(
    editor: &mut Editor<C>,
    script: Script,
    keep_going: bool,
) -> Result<RunReport> {
    let _span = info_span!("script.run", events = script.events.len(), keep_going).entered();
    let mut steps = Vec::with_capacity(script.events.len());

    for (index, event) in script.events.into_iter().enumerate() {
        let op = event.op();
        match editor.apply(event) {
            Ok(effect) => {
                debug!(index, op, "event applied");
                steps.push(StepRecord {
                    index,
                    op,
                    effect: Some(effect),
                    error: None,
                });
            }
            Err(source) if keep_going => steps.push(StepRecord {
                index,
                op,
                effect: None,
                error: Some(source.to_string()),
            }),
            Err(source) => return Err(CliError::EventRejected { index, op, source }),
        }
    }

    let tree = editor.tree();
    Ok(RunReport {
        canvas: editor.canvas(),
        revision: editor.revision(),
        leaf_count: tree.leaf_count(),
        depth: tree.depth(),
        state_hash: format!("{:016x}", tree.state_hash()),
        steps,
        tree: tree.to_snapshot(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpart_core::{PaletteColors, Rgb};
    use rpart_tree::{EditorConfig, NodePath, PartitionError};

    fn editor() -> Editor<PaletteColors> {
        Editor::new(
            EditorConfig::default(),
            PaletteColors::new(vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)]),
        )
        .expect("default config")
    }

    fn script(json: &str) -> Script {
        serde_json::from_str(json).expect("script")
    }

    #[test]
    fn replay_reports_every_step() {
        let mut editor = editor();
        let report = run_script(
            &mut editor,
            script(
                r#"{"events": [
                    {"op": "split", "path": [], "direction": "horizontal"},
                    {"op": "pointer_down", "x": 40, "y": 5},
                    {"op": "pointer_move", "x": 20, "y": 5},
                    {"op": "pointer_up", "x": 20, "y": 5}
                ]}"#,
            ),
            false,
        )
        .expect("valid script");

        assert_eq!(report.steps.len(), 4);
        assert_eq!(report.steps[0].op, "split");
        assert!(matches!(
            report.steps[2].effect,
            Some(EditorEffect::DragUpdated(_))
        ));
        assert_eq!(report.leaf_count, 2);
        assert_eq!(report.revision, 2);
        assert_eq!(report.state_hash.len(), 16);

        // 40 -> 20 on an 80-cell canvas moves the ratio from 0.5 to 0.25.
        let split = editor.tree().root().as_split().expect("split");
        assert_eq!(split.ratio.get(), 0.25);
    }

    #[test]
    fn first_rejection_aborts_without_keep_going() {
        let mut editor = editor();
        let error = run_script(
            &mut editor,
            script(r#"{"events": [{"op": "remove", "path": []}]}"#),
            false,
        )
        .expect_err("root removal");
        assert!(matches!(
            error,
            CliError::EventRejected {
                index: 0,
                op: "remove",
                source: PartitionError::InvalidPath { .. }
            }
        ));
    }

    #[test]
    fn keep_going_records_rejections() {
        let mut editor = editor();
        let report = run_script(
            &mut editor,
            script(
                r#"{"events": [
                    {"op": "remove", "path": [1]},
                    {"op": "split", "path": [], "direction": "vertical"}
                ]}"#,
            ),
            true,
        )
        .expect("keep going");
        assert_eq!(
            report.steps[0].error.as_deref(),
            Some("no node at path /1")
        );
        assert!(report.steps[0].effect.is_none());
        assert!(report.steps[1].error.is_none());
        assert_eq!(editor.tree().leaf_count(), 2);
        assert!(editor.tree().node_at(&NodePath::from([1])).is_some());
    }

    #[test]
    fn report_serializes_with_snapshot() {
        let mut editor = editor();
        let report = run_script(&mut editor, Script::default(), false).expect("empty script");
        let value = serde_json::to_value(&report).expect("serialize");
        assert_eq!(value["tree"]["schema_version"], 1);
        assert_eq!(value["tree"]["root"]["kind"], "leaf");
        assert_eq!(value["canvas"]["width"], 80);
        assert!(value["steps"].as_array().is_some_and(Vec::is_empty));
    }
}
