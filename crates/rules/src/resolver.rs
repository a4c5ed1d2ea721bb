//! Rule set resolution: merge the default scope with one project's rules and
//! order the result for evaluation.

use tracing::debug;

use crate::schema::{ClassificationRule, DEFAULT_SCOPE};

/// Select `Default`-scoped rules followed by `project_name`-scoped rules and
/// sort them by descending priority. Equal priorities keep that
/// concatenation order.
pub fn resolve(all_rules: &[ClassificationRule], project_name: &str) -> Vec<ClassificationRule> {
    resolve_with_scope(all_rules, project_name, DEFAULT_SCOPE)
}

/// [`resolve`] with a custom default scope tag.
///
/// A project named like the default scope selects the default rules once.
pub fn resolve_with_scope(
    all_rules: &[ClassificationRule],
    project_name: &str,
    default_scope: &str,
) -> Vec<ClassificationRule> {
    let defaults = all_rules.iter().filter(|r| r.project == default_scope);
    let project = all_rules
        .iter()
        .filter(|r| project_name != default_scope && r.project == project_name);

    let mut merged: Vec<ClassificationRule> = defaults.chain(project).cloned().collect();
    // `sort_by` is stable.
    merged.sort_by(|a, b| b.priority.cmp(&a.priority));

    debug!(
        project = %project_name,
        selected = merged.len(),
        total = all_rules.len(),
        "resolved rule set"
    );
    merged
}
