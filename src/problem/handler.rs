use tracing::debug;

use super::context::{Context, ContextStack, ContextType, ContextValue};
use super::issue::Issue;

/// Attaches the ambient location to issues and applies the severity floor.
/// One handler belongs to one validation pass; it is not shared between
/// concurrent units of work.
#[derive(Debug, Clone, Default)]
pub struct ErrorHandler {
    contexts: ContextStack,
    check_for_warnings: bool,
}

impl ErrorHandler {
    pub fn new(check_for_warnings: bool) -> ErrorHandler {
        ErrorHandler {
            contexts: ContextStack::new(),
            check_for_warnings,
        }
    }

    pub fn check_for_warnings(&self) -> bool {
        self.check_for_warnings
    }

    pub fn push_error_context(&mut self, kind: ContextType, value: impl Into<ContextValue>) {
        self.contexts
            .push(kind, value.into());
    }

    pub fn pop_error_context(&mut self) -> Context {
        self.contexts
            .pop()
    }

    pub fn reset_error_context(&mut self) {
        self.contexts
            .reset();
    }

    pub fn error_context_is_empty(&self) -> bool {
        self.contexts
            .is_empty()
    }

    pub fn error_context(&self) -> Vec<Context> {
        self.contexts
            .snapshot()
    }

    /// Stamp each issue with a snapshot of the current context (outermost
    /// first, ahead of any context the issue already carries) and drop
    /// warnings unless they were asked for.
    pub fn add_context_and_filter(&self, issues: &mut Vec<Issue>) {
        let before = issues.len();
        if !self.check_for_warnings {
            issues.retain(|issue| issue.is_error());
        }

        let snapshot = self
            .contexts
            .snapshot();
        if !snapshot.is_empty() {
            for issue in issues.iter_mut() {
                issue
                    .context
                    .splice(0..0, snapshot.iter().cloned());
            }
        }

        if before != issues.len() {
            debug!("Dropped {} warnings", before - issues.len());
        }
    }

    /// Convenience for a single issue built in the current context.
    pub fn format_error(&self, issue: Issue) -> Vec<Issue> {
        let mut issues = vec![issue];
        self.add_context_and_filter(&mut issues);
        issues
    }
}
