use {
    crate::{
        condition::merge_condition_blocks, Action, ActionDefinition, CandidateAction, Catalog, ConditionBlock, Resource,
        ResourceArn, ResourceTarget, Statement, StringLikeList,
    },
    log::{debug, trace, warn},
    std::collections::{BTreeMap, BTreeSet},
};

/// The default cap on dependent-action expansion rounds.
pub const DEFAULT_MAX_DEPENDENCY_ROUNDS: usize = 8;

/// Everything known about one action granted on specific resources.
struct ScopedAction<'a> {
    definition: &'a ActionDefinition,
    arns: BTreeSet<ResourceArn>,
    resource_types: BTreeSet<String>,
}

/// Groups candidate actions into the smallest set of statements that grants exactly what was asked for.
///
/// Actions bound to resources share a statement only when they are bound to the same ARNs and the same caller-supplied
/// conditions apply to them. Everything bound to `*` goes into one statement. Dependent actions declared by the
/// catalog are added on `*` unless they are already present.
#[derive(Clone, Copy, Debug)]
pub struct StatementComposer<'a> {
    catalog: &'a Catalog,
    conditions: &'a [ConditionBlock],
    max_dependency_rounds: usize,
}

impl<'a> StatementComposer<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            conditions: &[],
            max_dependency_rounds: DEFAULT_MAX_DEPENDENCY_ROUNDS,
        }
    }

    /// Condition blocks to attach to resource-scoped statements. Blocks without values are ignored.
    pub fn with_conditions(mut self, conditions: &'a [ConditionBlock]) -> Self {
        for block in conditions.iter().filter(|block| block.is_empty()) {
            warn!("Ignoring {} condition on {} with no values", block.operator(), block.key());
        }
        self.conditions = conditions;
        self
    }

    pub fn with_max_dependency_rounds(mut self, max_dependency_rounds: usize) -> Self {
        self.max_dependency_rounds = max_dependency_rounds;
        self
    }

    /// Build statements from candidates. The result does not depend on the order of `candidates` and is sorted
    /// resource-scoped first, then by first action.
    pub fn build<I: IntoIterator<Item = CandidateAction<'a>>>(&self, candidates: I) -> Vec<Statement> {
        let mut candidates: BTreeSet<CandidateAction<'a>> = candidates.into_iter().collect();
        self.add_dependencies(&mut candidates);

        let mut scoped: BTreeMap<Action, ScopedAction<'a>> = BTreeMap::new();
        let mut wildcard: BTreeSet<Action> = BTreeSet::new();

        for candidate in candidates.iter() {
            let action = match self.to_action(candidate.action()) {
                Some(action) => action,
                None => continue,
            };

            match candidate.scope() {
                ResourceTarget::Resource(resource) if !candidate.action().is_wildcard_only() => {
                    let entry = scoped.entry(action).or_insert_with(|| ScopedAction {
                        definition: candidate.action(),
                        arns: BTreeSet::new(),
                        resource_types: BTreeSet::new(),
                    });
                    entry.arns.insert(resource.resource_arn().clone());
                    entry.resource_types.insert(resource.resource_type().to_string());
                }
                _ => {
                    wildcard.insert(action);
                }
            }
        }

        let mut groups: BTreeMap<(BTreeSet<ResourceArn>, Vec<usize>), BTreeSet<Action>> = BTreeMap::new();
        for (action, entry) in scoped {
            let blocks = self.applicable_conditions(entry.definition, &entry.resource_types);
            trace!("{action}: {} ARN(s), condition blocks {blocks:?}", entry.arns.len());
            groups.entry((entry.arns, blocks)).or_default().insert(action);
        }

        let mut statements: Vec<Statement> = groups
            .into_iter()
            .map(|((arns, blocks), actions)| {
                let resources: Vec<Resource> = arns.into_iter().map(Resource::Arn).collect();
                let condition = if blocks.is_empty() {
                    None
                } else {
                    Some(merge_condition_blocks(blocks.iter().map(|&i| &self.conditions[i])))
                };
                Statement::from_parts(actions, StringLikeList::List(resources), condition)
            })
            .collect();

        if !wildcard.is_empty() {
            statements.push(Statement::from_parts(wildcard, StringLikeList::Single(Resource::Any), None));
        }

        statements.sort_by(Statement::canonical_cmp);
        statements
    }

    /// Add the dependent actions of every candidate on `*`, repeating until nothing new is added or the round cap is
    /// reached.
    fn add_dependencies(&self, candidates: &mut BTreeSet<CandidateAction<'a>>) {
        let mut present: BTreeSet<String> =
            candidates.iter().map(|c| c.action().qualified_name().to_ascii_lowercase()).collect();
        let mut frontier: Vec<&'a ActionDefinition> = candidates.iter().map(|c| c.action()).collect();

        for _ in 0..self.max_dependency_rounds {
            let mut added = Vec::new();
            for definition in frontier {
                for dependent in definition.dependent_actions() {
                    let dependency = match self.catalog.lookup_qualified(dependent) {
                        Ok(dependency) => dependency,
                        Err(e) => {
                            debug!("Ignoring dependent action {dependent} of {}: {e}", definition.qualified_name());
                            continue;
                        }
                    };

                    if present.insert(dependency.qualified_name().to_ascii_lowercase()) {
                        trace!("{} depends on {}", definition.qualified_name(), dependency.qualified_name());
                        candidates.insert(CandidateAction::new(dependency, ResourceTarget::Wildcard));
                        added.push(dependency);
                    }
                }
            }

            if added.is_empty() {
                return;
            }
            frontier = added;
        }

        if frontier.iter().any(|d| !d.dependent_actions().is_empty()) {
            warn!("Dependent actions still unresolved after {} rounds; stopping", self.max_dependency_rounds);
        }
    }

    /// Indexes of the caller-supplied condition blocks that apply to an action bound to the given resource types.
    fn applicable_conditions(&self, definition: &ActionDefinition, resource_types: &BTreeSet<String>) -> Vec<usize> {
        let mut keys: Vec<&String> = definition.condition_keys().iter().collect();
        if let Ok(service) = self.catalog.service(definition.service()) {
            for rt in resource_types.iter().filter_map(|name| service.resource_type(name)) {
                keys.extend(rt.condition_keys());
            }
        }

        self.conditions
            .iter()
            .enumerate()
            .filter(|(_, block)| !block.is_empty())
            .filter(|(_, block)| block.is_global() || block.is_supported_by(keys.iter().copied()))
            .map(|(i, _)| i)
            .collect()
    }

    fn to_action(&self, definition: &ActionDefinition) -> Option<Action> {
        match definition.to_action() {
            Ok(action) => Some(action),
            Err(e) => {
                warn!("Skipping catalog action {}: {e}", definition.qualified_name());
                None
            }
        }
    }
}
