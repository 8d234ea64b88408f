use serde::Deserialize;
use tracing::{debug, info};

use super::{characters, definitions, defs, groups, onsets, reserved, tags, OnsetState};
use crate::language::{Composite, DefDict, HedString, TagId};
use crate::parsing;
use crate::problem::{Context, ContextType, ErrorHandler, Issue};
use crate::schema::{ReservedTags, SchemaProvider};

/// Switches controlling a validation run. Readable from a configuration
/// file; absent keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Keep warnings as well as errors.
    pub check_for_warnings: bool,
    /// Permit `#` placeholders outside definitions, as in sidecar templates.
    pub allow_placeholders: bool,
    pub allow_definitions: bool,
    /// Check for tags the schema marks required. Off when validating a
    /// fragment of what will eventually be a complete annotation.
    pub require_full_string: bool,
    pub check_temporal: bool,
}

impl Default for ValidatorOptions {
    fn default() -> ValidatorOptions {
        ValidatorOptions {
            check_for_warnings: true,
            allow_placeholders: false,
            allow_definitions: true,
            require_full_string: true,
            check_temporal: true,
        }
    }
}

/// Validates HED strings against a schema (or, lacking one, just their
/// structure), accumulating the definitions found along the way.
pub struct HedValidator<'s> {
    schema: Option<&'s dyn SchemaProvider>,
    reserved: &'s ReservedTags,
    definitions: DefDict,
    options: ValidatorOptions,
}

impl<'s> HedValidator<'s> {
    pub fn new(
        schema: Option<&'s dyn SchemaProvider>,
        reserved: &'s ReservedTags,
        options: ValidatorOptions,
    ) -> HedValidator<'s> {
        HedValidator {
            schema,
            reserved,
            definitions: DefDict::new(),
            options,
        }
    }

    /// Start from definitions gathered elsewhere.
    pub fn with_definitions(mut self, definitions: DefDict) -> HedValidator<'s> {
        self.definitions = definitions;
        self
    }

    pub fn definitions(&self) -> &DefDict {
        &self.definitions
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// A handler configured to match these options.
    pub fn handler(&self) -> ErrorHandler {
        ErrorHandler::new(
            self.options
                .check_for_warnings,
        )
    }

    /// Parse and resolve a string without validating it beyond what that
    /// takes; used for converting between forms.
    pub fn parse(&self, content: &str) -> (HedString, Vec<Issue>) {
        let (mut hed, mut issues) = parsing::parse(content);
        if !issues.is_empty() {
            return (hed, issues);
        }
        let ids: Vec<_> = hed
            .tag_ids()
            .collect();
        issues.extend(parsing::resolve(&mut hed, self.schema, &ids));
        (hed, issues)
    }

    /// Validate a single string on its own.
    pub fn validate(&mut self, content: &str, handler: &mut ErrorHandler) -> Vec<Issue> {
        let mut state = OnsetState::new();
        let context = handler.error_context();
        let mut issues = self.run(content, &mut state, &context);
        handler.add_context_and_filter(&mut issues);
        issues
    }

    /// Validate a row made of several named column pieces, joined and
    /// checked as one string. Issues located in a piece are attributed to
    /// its column; positions stay relative to the joined string.
    pub fn validate_row<S: AsRef<str>>(
        &mut self,
        pieces: &[(S, S)],
        handler: &mut ErrorHandler,
    ) -> Vec<Issue> {
        let composite = Composite::join(pieces);
        let mut state = OnsetState::new();
        let context = handler.error_context();
        let mut issues = self.run(&composite.text, &mut state, &context);

        for issue in issues.iter_mut() {
            let located = issue
                .char_index
                .and_then(|index| composite.locate(index));
            if let Some((piece, _)) = located {
                let name = composite.pieces[piece]
                    .name
                    .clone();
                issue
                    .context
                    .push((ContextType::Column, name.into()));
            }
        }

        handler.add_context_and_filter(&mut issues);
        issues
    }

    /// Validate strings in order as consecutive rows of one recording, so
    /// that Offset and Inset are checked against earlier Onsets. Rows are
    /// numbered from 1. Events still open at the end are returned in the
    /// state.
    pub fn validate_series<S: AsRef<str>>(
        &mut self,
        rows: &[S],
        handler: &mut ErrorHandler,
    ) -> (Vec<Issue>, OnsetState) {
        let mut state = OnsetState::new();
        let mut issues = Vec::new();
        for (i, row) in rows
            .iter()
            .enumerate()
        {
            handler.push_error_context(ContextType::Row, i + 1);
            let context = handler.error_context();
            let mut found = self.run(row.as_ref(), &mut state, &context);
            handler.add_context_and_filter(&mut found);
            handler.pop_error_context();
            issues.extend(found);
        }
        info!("Validated {} rows, {} issues", rows.len(), issues.len());
        (issues, state)
    }

    fn placeholders_permitted(&self, hed: &HedString, id: TagId) -> bool {
        self.options
            .allow_placeholders
            || hed.in_definition(id)
    }

    fn run(&mut self, content: &str, state: &mut OnsetState, context: &[Context]) -> Vec<Issue> {
        let (mut hed, mut issues) = parsing::parse(content);
        if !issues.is_empty() {
            debug!("Unbalanced parentheses, not validating further");
            return issues;
        }

        let flagged = characters::check_string(
            content,
            self.options
                .allow_placeholders,
        );
        let positions: Vec<usize> = flagged
            .iter()
            .filter_map(|issue| issue.char_index)
            .collect();
        issues.extend(flagged);

        let delimiters = parsing::check_delimiters(content);
        if !delimiters.is_empty() {
            issues.extend(delimiters);
            return issues;
        }

        // tags with bad characters are not resolved
        let mut clean = Vec::new();
        for id in hed.tag_ids() {
            let tag = hed.tag(id);
            let problems =
                characters::check_tag_characters(tag, self.placeholders_permitted(&hed, id), &positions);
            let touched = positions
                .iter()
                .any(|index| {
                    tag.span
                        .contains(*index)
                });
            if problems.is_empty() && !touched {
                clean.push(id);
            }
            issues.extend(problems);
        }

        let resolution = parsing::resolve(&mut hed, self.schema, &clean);
        let resolved = clean.len() == hed.tag_count()
            && !resolution
                .iter()
                .any(Issue::is_error);
        issues.extend(resolution);

        let mut faulty = Vec::new();
        for id in hed.tag_ids() {
            let found = tags::check_tag(
                self.schema,
                self.reserved,
                &hed,
                id,
                self.placeholders_permitted(&hed, id),
            );
            if found
                .iter()
                .any(Issue::is_error)
            {
                faulty.push(id);
            }
            issues.extend(found);
        }

        issues.extend(groups::check_empty_groups(&hed));
        issues.extend(groups::check_duplicates(&hed));
        issues.extend(groups::check_placement(&hed, self.schema, self.reserved, &faulty));
        issues.extend(groups::check_multiple_top_tags(&hed, self.schema, self.reserved));

        if self
            .options
            .allow_definitions
        {
            issues.extend(definitions::extract_definitions(
                &hed,
                self.schema,
                &mut self.definitions,
                context,
            ));
        } else {
            issues.extend(definitions::check_definition_location(&hed));
        }

        if resolved {
            if let Some(schema) = self.schema {
                issues.extend(groups::check_required_unique(
                    &hed,
                    schema,
                    self.options
                        .require_full_string,
                ));
            }
        }

        issues.extend(reserved::check_reserved(&hed, self.reserved));
        issues.extend(defs::check_defs(&hed, &self.definitions, self.schema));
        if self
            .options
            .check_temporal
        {
            issues.extend(onsets::check_onsets(&hed, &self.definitions, state));
        }

        debug!("{} issues in '{}'", issues.len(), content);
        issues
    }
}
