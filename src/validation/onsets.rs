//! Tracking which definitions have been opened by Onset across a series of
//! strings, so that Offset and Inset can be checked against them.

use serde_json::json;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use super::def_carriers;
use crate::language::{split_reference, DefDict, HedString};
use crate::problem::{ErrorCode, Issue};

/// Open temporal events, keyed by lower cased Def reference (name and any
/// value). Counts rather than flags, so K onsets followed by K offsets of
/// the same reference balance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnsetState {
    open: BTreeMap<String, (String, usize)>,
}

impl OnsetState {
    pub fn new() -> OnsetState {
        OnsetState::default()
    }

    pub fn is_empty(&self) -> bool {
        self.open
            .is_empty()
    }

    pub fn is_open(&self, reference: &str) -> bool {
        self.open
            .contains_key(&reference.to_lowercase())
    }

    /// References still open, as first written.
    pub fn open_names(&self) -> Vec<&str> {
        self.open
            .values()
            .map(|(written, _)| written.as_str())
            .collect()
    }

    fn start(&mut self, reference: &str) {
        let entry = self
            .open
            .entry(reference.to_lowercase())
            .or_insert_with(|| (reference.to_string(), 0));
        entry.1 += 1;
    }

    fn finish(&mut self, reference: &str) -> bool {
        let key = reference.to_lowercase();
        match self
            .open
            .get_mut(&key)
        {
            Some(entry) => {
                entry.1 -= 1;
                if entry.1 == 0 {
                    self.open
                        .remove(&key);
                }
                true
            }
            None => false,
        }
    }
}

/// Check the temporal groups of one string, in order, against and into the
/// running state. Groups without exactly one Def are reported elsewhere and
/// skipped here.
pub fn check_onsets(hed: &HedString, definitions: &DefDict, state: &mut OnsetState) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut this_row = HashSet::new();

    for (anchor, group) in hed.find_top_level_tags(&["Onset", "Offset", "Inset"]) {
        let carriers = def_carriers(hed, group);
        if carriers.len() != 1 {
            continue;
        }
        let (def, _) = carriers[0];
        let reference = hed
            .tag(def)
            .extension();
        let (name, value) = split_reference(reference);

        if let Some(entry) = definitions.get(name) {
            let problem = match (entry.takes_value, value) {
                (true, None) => Some("is missing the value its definition requires"),
                (false, Some(_)) => Some("has a value but its definition takes none"),
                _ => None,
            };
            if let Some(problem) = problem {
                issues.push(Issue::for_tag(
                    ErrorCode::OnsetPlaceholderWrong,
                    hed.tag_subject(def),
                    json!({ "problem": problem }),
                ));
                continue;
            }
        }

        let tag = hed.tag(anchor);
        let subject = hed.group_subject(group);
        if tag.is("Onset") {
            if !this_row.insert(reference.to_lowercase()) {
                issues.push(Issue::for_tag(
                    ErrorCode::OnsetSameDefsOneRow,
                    subject,
                    serde_json::Value::Null,
                ));
                continue;
            }
            state.start(reference);
        } else if tag.is("Offset") {
            if !state.finish(reference) {
                issues.push(Issue::for_tag(
                    ErrorCode::OffsetBeforeOnset,
                    subject,
                    serde_json::Value::Null,
                ));
            }
        } else if !state.is_open(reference) {
            issues.push(Issue::for_tag(
                ErrorCode::InsetBeforeOnset,
                subject,
                serde_json::Value::Null,
            ));
        }
    }

    debug!("{} temporal events open", state.open.len());
    issues
}
