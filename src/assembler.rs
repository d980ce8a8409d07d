use {
    crate::{Action, Condition, Minimizer, Policy, Resource, Statement, StringLikeList, SynthError},
    log::{debug, warn},
    std::collections::{BTreeMap, BTreeSet},
};

/// Turns built statements into a policy document.
///
/// The assembler guarantees that no action appears in more than one statement. An action granted by several
/// resource-scoped statements is granted once on the union of their resources. An action present in a resource-scoped
/// statement is removed from wildcard statements. Statements left without actions are dropped and the survivors are
/// numbered `Statement1`, `Statement2`, ... in canonical order.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolicyAssembler<'a> {
    minimizer: Option<Minimizer<'a>>,
}

impl<'a> PolicyAssembler<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimize each statement's actions after deduplication.
    pub fn with_minimizer(mut self, minimizer: Minimizer<'a>) -> Self {
        self.minimizer = Some(minimizer);
        self
    }

    /// # Errors
    /// `EmptyPolicy` if no statement keeps at least one action.
    pub fn assemble(&self, statements: Vec<Statement>) -> Result<Policy, SynthError> {
        let mut statements = merge_scoped(statements);
        statements.sort_by(Statement::canonical_cmp);

        // Resource-scoped statements sort first, so anything already seen is dropped from a wildcard statement.
        let mut seen: BTreeSet<Action> = BTreeSet::new();
        for statement in statements.iter_mut() {
            statement.retain_actions(|action| {
                if seen.contains(action) {
                    debug!("Dropping {action} from a wildcard statement; it is already granted");
                    false
                } else {
                    true
                }
            });
            seen.extend(statement.action().iter().cloned());
        }

        statements.retain(|s| !s.action().is_empty());

        if let Some(minimizer) = &self.minimizer {
            for statement in statements.iter_mut() {
                minimizer.minimize_statement(statement);
            }
            statements.sort_by(Statement::canonical_cmp);
        }

        if statements.is_empty() {
            return Err(SynthError::EmptyPolicy(vec![]));
        }

        for (i, statement) in statements.iter_mut().enumerate() {
            statement.set_sid(format!("Statement{}", i + 1));
        }

        Ok(Policy::new(statements))
    }
}

/// Regroup resource-scoped statements so that each action is granted by exactly one of them, on the union of the
/// resources it was granted on. Statements that grant the same action under different conditions are not merged;
/// the action keeps its first grant. Wildcard statements pass through unchanged.
fn merge_scoped(statements: Vec<Statement>) -> Vec<Statement> {
    let (mut scoped, wildcard): (Vec<Statement>, Vec<Statement>) =
        statements.into_iter().partition(|s| !s.is_wildcard());
    scoped.sort_by(Statement::canonical_cmp);

    let mut grants: BTreeMap<Action, (BTreeSet<Resource>, Option<Condition>)> = BTreeMap::new();
    for statement in scoped.iter() {
        for action in statement.action() {
            match grants.get_mut(action) {
                None => {
                    let resources = statement.resource().iter().cloned().collect();
                    grants.insert(action.clone(), (resources, statement.condition().cloned()));
                }
                Some((resources, condition)) if condition.as_ref() == statement.condition() => {
                    resources.extend(statement.resource().iter().cloned());
                }
                Some(_) => warn!("{action} is granted under different conditions; keeping the first grant"),
            }
        }
    }

    let mut groups: BTreeMap<(BTreeSet<Resource>, Option<Condition>), BTreeSet<Action>> = BTreeMap::new();
    for (action, key) in grants {
        groups.entry(key).or_default().insert(action);
    }

    let mut merged: Vec<Statement> = groups
        .into_iter()
        .map(|((resources, condition), actions)| {
            Statement::from_parts(actions, StringLikeList::List(resources.into_iter().collect()), condition)
        })
        .collect();
    merged.extend(wildcard);
    merged
}
