use {
    crate::{AccessLevel, ActionDefinition, Catalog, ResolvedResource, SynthError, SynthesisNote},
    log::trace,
    std::{
        cmp::Ordering,
        collections::BTreeSet,
        fmt::{Display, Formatter, Result as FmtResult},
        hash::{Hash, Hasher},
        str::FromStr,
    },
};

/// What a candidate action will be granted on.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ResourceTarget {
    /// Specific ARNs of a resource type.
    Resource(ResolvedResource),

    /// The `*` resource.
    Wildcard,
}

impl ResourceTarget {
    #[inline]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }
}

impl Display for ResourceTarget {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Resource(r) => f.write_str(r.arn()),
            Self::Wildcard => f.write_str("*"),
        }
    }
}

/// A catalog action paired with the resource it should be granted on.
#[derive(Clone, Debug)]
pub struct CandidateAction<'a> {
    action: &'a ActionDefinition,
    scope: ResourceTarget,
}

impl<'a> CandidateAction<'a> {
    pub fn new(action: &'a ActionDefinition, scope: ResourceTarget) -> Self {
        Self {
            action,
            scope,
        }
    }

    #[inline]
    pub fn action(&self) -> &'a ActionDefinition {
        self.action
    }

    #[inline]
    pub fn scope(&self) -> &ResourceTarget {
        &self.scope
    }

    fn key(&self) -> (&str, &str, &ResourceTarget) {
        (self.action.service(), self.action.name(), &self.scope)
    }
}

impl PartialEq for CandidateAction<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for CandidateAction<'_> {}

impl PartialOrd for CandidateAction<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CandidateAction<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl Hash for CandidateAction<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state)
    }
}

impl Display for CandidateAction<'_> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}:{} on {}", self.action.service(), self.action.name(), self.scope)
    }
}

/// The result of expanding one request item.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Expansion<'a> {
    pub candidates: BTreeSet<CandidateAction<'a>>,
    pub notes: Vec<SynthesisNote>,
}

/// Expands access levels into the catalog actions that satisfy them.
#[derive(Clone, Copy, Debug)]
pub struct Expander<'a> {
    catalog: &'a Catalog,
    include_wildcard_only: bool,
}

impl<'a> Expander<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            include_wildcard_only: true,
        }
    }

    /// Whether expanding against a specific resource also pulls in the service's wildcard-only actions at the same
    /// access level. When disabled, wildcard-only actions are only used as a fallback.
    pub fn with_wildcard_only(mut self, include_wildcard_only: bool) -> Self {
        self.include_wildcard_only = include_wildcard_only;
        self
    }

    /// Select every action of `service` at one of `access_levels` that can be granted on `target`.
    ///
    /// If a resource type has no action at a requested level, the service's wildcard-only actions at that level are
    /// used instead and a [SynthesisNote::WildcardFallback] is recorded. An empty `access_levels` is an error rather
    /// than an empty expansion.
    pub fn expand<S: AsRef<str>>(
        &self,
        service: &str,
        target: &ResourceTarget,
        access_levels: &[S],
    ) -> Result<Expansion<'a>, SynthError> {
        let levels: BTreeSet<AccessLevel> =
            access_levels.iter().map(|l| AccessLevel::from_str(l.as_ref())).collect::<Result<_, _>>()?;
        if levels.is_empty() {
            let subject = match target {
                ResourceTarget::Resource(resource) => resource.arn().to_string(),
                ResourceTarget::Wildcard => format!("{service}:*"),
            };
            return Err(SynthError::NoAccessLevels(subject));
        }

        let definition = self.catalog.service(service)?;
        let mut result = Expansion::default();

        for level in levels {
            let wildcard_only = definition.actions().iter().filter(|a| a.access_level() == level && a.is_wildcard_only());

            match target {
                ResourceTarget::Wildcard => {
                    let before = result.candidates.len();
                    result.candidates.extend(wildcard_only.map(|a| CandidateAction::new(a, ResourceTarget::Wildcard)));
                    if result.candidates.len() == before {
                        result.notes.push(SynthesisNote::NoMatchingActions {
                            subject: format!("{}:* ({level})", definition.prefix()),
                        });
                    }
                }

                ResourceTarget::Resource(resource) => {
                    let scoped: Vec<CandidateAction<'a>> = definition
                        .actions()
                        .iter()
                        .filter(|a| a.access_level() == level && a.supports_resource_type(resource.resource_type()))
                        .map(|a| CandidateAction::new(a, target.clone()))
                        .collect();
                    let wildcard: Vec<CandidateAction<'a>> =
                        wildcard_only.map(|a| CandidateAction::new(a, ResourceTarget::Wildcard)).collect();

                    if !scoped.is_empty() {
                        result.candidates.extend(scoped);
                        if self.include_wildcard_only {
                            result.candidates.extend(wildcard);
                        }
                    } else if !wildcard.is_empty() {
                        trace!("No {level} action of {} supports {}; falling back to *", service, resource.resource_type());
                        result.candidates.extend(wildcard);
                        result.notes.push(SynthesisNote::WildcardFallback {
                            service: definition.prefix().to_string(),
                            resource_type: resource.resource_type().to_string(),
                            access_level: level,
                        });
                    } else {
                        result.notes.push(SynthesisNote::NoMatchingActions {
                            subject: format!("{} ({level})", resource.arn()),
                        });
                    }
                }
            }
        }

        for candidate in result.candidates.iter() {
            trace!("Candidate: {candidate}");
        }

        Ok(result)
    }
}
