//! Whether the reserved tags heading a top level group fit together, and
//! whether the rest of the group is what they call for.

use serde_json::{json, Value};

use super::{def_carriers, def_expand_tag, join_texts};
use crate::language::{GroupId, HedString, TagId};
use crate::problem::{ErrorCode, Issue, Subject};
use crate::schema::{subgroup_bounds, ReservedTag, ReservedTags};

/// Which codes a group's problems are reported under, by the reserved tag
/// heading it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Temporal,
    Duration,
    Other,
}

impl Family {
    fn of(name: &str) -> Family {
        match name.to_lowercase().as_str() {
            "onset" | "offset" | "inset" => Family::Temporal,
            "duration" | "delay" => Family::Duration,
            _ => Family::Other,
        }
    }

    fn not_allowed(&self) -> ErrorCode {
        match self {
            Family::Temporal => ErrorCode::OnsetTagOutsideOfGroup,
            Family::Duration => ErrorCode::DurationHasOtherTags,
            Family::Other => ErrorCode::TagsNotAllowed,
        }
    }

    fn bounds(&self) -> ErrorCode {
        match self {
            Family::Temporal => ErrorCode::OnsetWrongNumberGroups,
            Family::Duration => ErrorCode::DurationWrongNumberGroups,
            Family::Other => ErrorCode::ReservedTagGroupError,
        }
    }
}

pub fn check_reserved(hed: &HedString, reserved: &ReservedTags) -> Vec<Issue> {
    let mut issues = Vec::new();
    for group in hed.top_level_groups() {
        let present: Vec<(TagId, &ReservedTag)> = hed
            .direct_tags(group)
            .into_iter()
            .filter_map(|id| {
                let tag = hed.tag(id);
                if tag.is("Def") || tag.is("Def-expand") {
                    return None;
                }
                reserved
                    .lookup(tag)
                    .map(|rule| (id, rule))
            })
            .collect();

        if present
            .iter()
            .any(|(_, rule)| rule.top_level_tag_group)
        {
            issues.extend(check_group(hed, group, &present));
        }
    }
    issues
}

fn not_allowed(code: ErrorCode, subject: Subject<'_>, others: &str) -> Issue {
    Issue::for_tag(code, subject, json!({ "others": others }))
}

fn check_group(hed: &HedString, group: GroupId, present: &[(TagId, &ReservedTag)]) -> Vec<Issue> {
    let (anchor, rule) = match present
        .iter()
        .find(|(_, rule)| rule.top_level_tag_group)
    {
        Some(found) => *found,
        None => return Vec::new(),
    };
    let family = Family::of(&rule.name);
    let subject = hed.tag_subject(anchor);
    let text = |id: TagId| {
        hed.tag(id)
            .text
            .as_str()
    };

    // the same reserved tag twice
    for (i, (_, first)) in present
        .iter()
        .enumerate()
    {
        for (id, second) in &present[i + 1..] {
            if first
                .name
                .eq_ignore_ascii_case(&second.name)
            {
                return vec![not_allowed(family.not_allowed(), subject, text(*id))];
            }
        }
    }

    // pairs neither side allows
    for (id, first) in present {
        let refused: Vec<&str> = present
            .iter()
            .filter(|(other, second)| other != id && !first.allows(&second.name))
            .map(|(other, _)| text(*other))
            .collect();
        if !refused.is_empty() {
            return vec![not_allowed(
                family.not_allowed(),
                hed.tag_subject(*id),
                &join_texts(refused),
            )];
        }
    }

    // a Definition's body is checked where definitions are extracted
    if rule
        .name
        .eq_ignore_ascii_case("Definition")
    {
        return Vec::new();
    }

    let mut issues = Vec::new();
    let rules: Vec<&ReservedTag> = present
        .iter()
        .map(|(_, rule)| *rule)
        .collect();

    let content: Vec<GroupId> = hed
        .direct_groups(group)
        .into_iter()
        .filter(|child| def_expand_tag(hed, *child).is_none())
        .collect();
    let (minimum, maximum) = subgroup_bounds(&rules);
    let found = content.len();
    if found < minimum || maximum.map_or(false, |maximum| found > maximum) {
        let others = if content.is_empty() {
            "none".to_string()
        } else {
            join_texts(
                content
                    .iter()
                    .map(|child| hed.group_text(*child)),
            )
        };
        let maximum = match maximum {
            Some(maximum) => json!(maximum),
            None => json!("unbounded"),
        };
        issues.push(Issue::for_tag(
            family.bounds(),
            subject,
            json!({
                "minimum": minimum,
                "maximum": maximum,
                "found": found,
                "others": others,
            }),
        ));
    }

    let carriers = def_carriers(hed, group);
    let requires_def = rules
        .iter()
        .any(|rule| rule.requires_def);
    let carrier_text = |(id, expand): &(TagId, Option<GroupId>)| match expand {
        Some(child) => hed.group_text(*child),
        None => text(*id),
    };
    if requires_def {
        if carriers.is_empty() {
            issues.push(Issue::for_tag(ErrorCode::OnsetNoDefTagFound, subject, Value::Null));
        } else if carriers.len() > 1 {
            issues.push(Issue::for_tag(
                ErrorCode::OnsetTooManyDefs,
                subject,
                json!({ "others": join_texts(carriers[1..].iter().map(carrier_text)) }),
            ));
        }
    }

    // anything else at this level
    let mut others: Vec<&str> = hed
        .direct_tags(group)
        .into_iter()
        .filter(|id| {
            let tag = hed.tag(*id);
            !present
                .iter()
                .any(|(reserved, _)| reserved == id)
                && !tag.is("Def")
        })
        .map(text)
        .collect();
    if !requires_def {
        others.extend(
            carriers
                .iter()
                .map(carrier_text),
        );
    }
    if !others.is_empty() {
        issues.push(not_allowed(family.not_allowed(), subject, &join_texts(others)));
    }

    issues
}
