use crate::record::ProjectedRecord;
use crate::types::WorkItemKind;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Directives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveMode {
    SingleTask,
}

/// Workflow policy handed to the calling agent together with a work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directives {
    pub mode: DirectiveMode,
    pub target_id: String,
    pub stop_after_fix: bool,
    pub ask_commit_after_fix: bool,
    pub wait_before_next: bool,
    pub forbidden_actions: Vec<String>,
    pub required_first_output: String,
    pub commit_suggestion: String,
}

const FORBIDDEN_ACTIONS: &[&str] = &[
    "start work on another work item before the user replies",
    "bundle changes for several work items into one commit",
    "commit or push without explicit confirmation",
    "change the work item's state in the tracker",
    "refactor code unrelated to this work item",
];

pub fn build_directives(rec: &ProjectedRecord) -> Directives {
    let target_id = rec.identifier().to_string();
    Directives {
        mode: DirectiveMode::SingleTask,
        required_first_output: required_first_output(&target_id),
        commit_suggestion: commit_suggestion(&target_id, rec.kind(), rec.title()),
        target_id,
        stop_after_fix: true,
        ask_commit_after_fix: true,
        wait_before_next: true,
        forbidden_actions: FORBIDDEN_ACTIONS.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn required_first_output(target_id: &str) -> String {
    format!(
        "[single-task mode] Working on {target_id} only. \
         I will stop after the fix and ask before committing."
    )
}

/// `#<id> <prefix>: <title>`. A leading `#` already on the id is not doubled.
pub fn commit_suggestion(id: &str, kind: WorkItemKind, title: &str) -> String {
    let id = id.trim_start_matches('#');
    if id.is_empty() {
        format!("{}: {title}", kind.commit_prefix())
    } else {
        format!("#{id} {}: {title}", kind.commit_prefix())
    }
}

// ---------------------------------------------------------------------------
// Static protocols
// ---------------------------------------------------------------------------

const BUG_ANALYSIS_PROTOCOL: &str = "\
## Root-cause analysis protocol (mandatory for bugs)

Do not edit any code until every step below is complete and the trace
template is filled in. A fix without a traced root cause will be rejected.

1. **Reproduce.** State the exact input, environment and steps that trigger
   the failure. If it cannot be reproduced, say so and stop.
2. **Locate the symptom.** Name the file, function and line where the wrong
   behavior becomes observable (error message, bad value, crash site).
3. **Trace the data backwards.** Follow the faulty value from the symptom to
   its origin, one call or assignment at a time. Cite each hop as
   `file:line`.
4. **Identify the root cause.** Name the first point where actual behavior
   diverges from intended behavior. Explain why, with evidence from the code,
   not from guesses.
5. **Check the blast radius.** List every other caller or code path that
   depends on the faulty logic and state whether each is affected.
6. **Propose the minimal fix.** Describe the smallest change at the root
   cause that corrects the behavior, and how it will be verified.

### Trace template

```text
Symptom:      <what the user sees>
Location:     <file:line where it surfaces>
Trace:
  1. <file:line> <what happens here>
  2. <file:line> <what happens here>
  ...
Root cause:   <file:line> <why it is wrong>
Blast radius: <other affected paths, or none>
Fix:          <minimal change>
Verification: <test or manual check>
```
";

/// Static instruction blocks keyed by classification.
const PROTOCOLS: &[(WorkItemKind, &str)] = &[(WorkItemKind::Bug, BUG_ANALYSIS_PROTOCOL)];

pub fn protocol_for(kind: WorkItemKind) -> Option<&'static str> {
    PROTOCOLS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, text)| *text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
