use {
    crate::{
        builder::DEFAULT_MAX_DEPENDENCY_ROUNDS, AccessLevel, AccessRequest, ActionDefinition, ArnResolver,
        CandidateAction, Catalog, ConditionBlock, Expander, Minimizer, Policy, PolicyAssembler, ResolvedResource,
        ResourceArn, ResourceTarget, StatementComposer, SynthError, Template,
    },
    derive_builder::Builder,
    log::{debug, trace},
    serde::Serialize,
    std::{
        collections::BTreeSet,
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// A request item that could not be used, and why.
#[derive(Debug, Eq, PartialEq)]
pub struct RequestFailure {
    subject: String,
    error: SynthError,
}

impl RequestFailure {
    pub fn new<S: Into<String>>(subject: S, error: SynthError) -> Self {
        Self {
            subject: subject.into(),
            error,
        }
    }

    /// The offending ARN, service, or action.
    #[inline]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[inline]
    pub fn error(&self) -> &SynthError {
        &self.error
    }
}

impl Display for RequestFailure {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}: {}", self.subject, self.error)
    }
}

/// Something the caller should know about a synthesized policy that is not an error.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SynthesisNote {
    /// No action at the access level supports the resource type, so the service's wildcard-only actions at that
    /// level were granted on `*` instead.
    WildcardFallback {
        service: String,
        resource_type: String,
        access_level: AccessLevel,
    },

    /// A request item matched no actions at all.
    NoMatchingActions {
        subject: String,
    },

    /// An action requested on `*` supports resource-level permissions, so it was not granted.
    NotWildcardOnly {
        action: String,
    },
}

impl Display for SynthesisNote {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::WildcardFallback {
                service,
                resource_type,
                access_level,
            } => write!(
                f,
                "No {access_level} action of {service} supports {resource_type}; wildcard-only {access_level} actions \
                 were granted on * instead"
            ),
            Self::NoMatchingActions {
                subject,
            } => write!(f, "No actions matched {subject}"),
            Self::NotWildcardOnly {
                action,
            } => write!(f, "{action} supports resource ARNs; request it with an ARN instead of *"),
        }
    }
}

/// The outcome of a synthesis run: the policy plus everything that was skipped or substituted along the way.
#[derive(Debug, Eq, PartialEq)]
pub struct Synthesis {
    policy: Policy,
    failures: Vec<RequestFailure>,
    notes: Vec<SynthesisNote>,
}

impl Synthesis {
    #[inline]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    #[inline]
    pub fn failures(&self) -> &[RequestFailure] {
        &self.failures
    }

    #[inline]
    pub fn notes(&self) -> &[SynthesisNote] {
        &self.notes
    }

    pub fn into_policy(self) -> Policy {
        self.policy
    }
}

/// Synthesizes least-privilege policies from request items against a catalog.
///
/// A synthesizer holds no mutable state; one instance (or many sharing a catalog) may be used from any number of
/// threads at once.
#[derive(Builder, Clone, Debug)]
pub struct PolicySynthesizer<'a> {
    catalog: &'a Catalog,

    /// Condition blocks to attach to resource-scoped statements whose actions support their keys.
    #[builder(setter(into), default)]
    conditions: Vec<ConditionBlock>,

    /// Minimize statement actions to prefix wildcards no shorter than this many characters.
    #[builder(setter(strip_option), default)]
    minimize: Option<usize>,

    /// Also grant wildcard-only actions at the requested access levels when expanding an ARN.
    #[builder(default = "true")]
    include_wildcard_only: bool,

    #[builder(default = "DEFAULT_MAX_DEPENDENCY_ROUNDS")]
    max_dependency_rounds: usize,
}

/// Per-run working state.
#[derive(Default)]
struct Collected<'a> {
    candidates: BTreeSet<CandidateAction<'a>>,
    failures: Vec<RequestFailure>,
    notes: Vec<SynthesisNote>,
}

impl<'a> PolicySynthesizer<'a> {
    pub fn builder() -> PolicySynthesizerBuilder<'a> {
        PolicySynthesizerBuilder::default()
    }

    /// A synthesizer with default settings.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            conditions: Vec::new(),
            minimize: None,
            include_wildcard_only: true,
            max_dependency_rounds: DEFAULT_MAX_DEPENDENCY_ROUNDS,
        }
    }

    #[inline]
    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Synthesize a policy from request items.
    ///
    /// Items that fail to resolve are reported in [Synthesis::failures] and do not stop the run.
    ///
    /// # Errors
    /// `EmptyPolicy`, carrying the per-item failures, if no item yields a usable action.
    pub fn synthesize(&self, requests: &[AccessRequest]) -> Result<Synthesis, SynthError> {
        let mut collected = Collected::default();
        for request in requests {
            trace!("Request: {request}");
            self.collect(request, &mut collected);
        }

        let statements = StatementComposer::new(self.catalog)
            .with_conditions(&self.conditions)
            .with_max_dependency_rounds(self.max_dependency_rounds)
            .build(collected.candidates);

        let mut assembler = PolicyAssembler::new();
        if let Some(min_chars) = self.minimize {
            assembler = assembler.with_minimizer(Minimizer::new(self.catalog, min_chars));
        }

        match assembler.assemble(statements) {
            Ok(policy) => Ok(Synthesis {
                policy,
                failures: collected.failures,
                notes: collected.notes,
            }),
            Err(SynthError::EmptyPolicy(_)) => {
                debug!("No usable actions; {} request item(s) failed", collected.failures.len());
                Err(SynthError::EmptyPolicy(collected.failures))
            }
            Err(e) => Err(e),
        }
    }

    pub fn synthesize_template(&self, template: &Template) -> Result<Synthesis, SynthError> {
        self.synthesize(&template.requests())
    }

    fn collect(&self, request: &AccessRequest, collected: &mut Collected<'a>) {
        let expander = Expander::new(self.catalog).with_wildcard_only(self.include_wildcard_only);

        match request {
            AccessRequest::Arn {
                arn,
                access_levels,
            } => {
                let expansion = ArnResolver::new(self.catalog).resolve(arn).and_then(|resolved| {
                    let service = resolved.service().to_string();
                    expander.expand(&service, &ResourceTarget::Resource(resolved), access_levels)
                });
                match expansion {
                    Ok(expansion) => {
                        collected.candidates.extend(expansion.candidates);
                        collected.notes.extend(expansion.notes);
                    }
                    Err(e) => collected.failures.push(RequestFailure::new(arn.as_str(), e)),
                }
            }

            AccessRequest::Actions {
                service,
                actions,
            } => {
                for action in actions {
                    match self.lookup_action(service, action) {
                        Ok(definition) => match self.scope_action(definition) {
                            Ok(candidates) => collected.candidates.extend(candidates),
                            Err(e) => collected.failures.push(RequestFailure::new(action.as_str(), e)),
                        },
                        Err(e) => collected.failures.push(RequestFailure::new(action.as_str(), e)),
                    }
                }
            }

            AccessRequest::ServiceWildcard {
                service,
                wildcard_access_levels,
            } => match expander.expand(service, &ResourceTarget::Wildcard, wildcard_access_levels) {
                Ok(expansion) => {
                    collected.candidates.extend(expansion.candidates);
                    collected.notes.extend(expansion.notes);
                }
                Err(e) => collected.failures.push(RequestFailure::new(service.as_str(), e)),
            },

            AccessRequest::WildcardOnly {
                wildcard_only_actions,
            } => {
                for action in wildcard_only_actions {
                    match self.catalog.lookup_qualified(action) {
                        Ok(definition) if definition.is_wildcard_only() => {
                            collected.candidates.insert(CandidateAction::new(definition, ResourceTarget::Wildcard));
                        }
                        Ok(definition) => collected.notes.push(SynthesisNote::NotWildcardOnly {
                            action: definition.qualified_name(),
                        }),
                        Err(e) => collected.failures.push(RequestFailure::new(action.as_str(), e)),
                    }
                }
            }
        }
    }

    /// Look up an explicitly requested action. It may be written as `Name` or as `service:Name`.
    fn lookup_action(&self, service: &str, action: &str) -> Result<&'a ActionDefinition, SynthError> {
        let (prefix, name) = action.split_once(':').unwrap_or((service, action));
        if prefix.is_empty() || name.is_empty() || !prefix.eq_ignore_ascii_case(service) {
            return Err(SynthError::InvalidAction(action.to_string()));
        }

        self.catalog.lookup_action(service, name)
    }

    /// Scope an explicitly requested action to the ARN formats of its resource types. Only wildcard-only actions are
    /// granted on `*`; an action whose resource types are all undefined or unusable is refused.
    fn scope_action(&self, definition: &'a ActionDefinition) -> Result<Vec<CandidateAction<'a>>, SynthError> {
        if definition.is_wildcard_only() {
            return Ok(vec![CandidateAction::new(definition, ResourceTarget::Wildcard)]);
        }

        let service = self.catalog.service(definition.service())?;
        let scoped: Vec<CandidateAction<'a>> = definition
            .resource_types()
            .iter()
            .filter_map(|name| {
                let rt = service.resource_type(name);
                if rt.is_none() {
                    debug!("{}: resource type {} is not defined", definition.qualified_name(), name);
                }
                rt
            })
            .filter_map(|rt| match ResourceArn::from_str(rt.arn_pattern()) {
                Ok(arn) => {
                    let resolved = ResolvedResource::new(service.prefix(), rt.name(), arn);
                    Some(CandidateAction::new(definition, ResourceTarget::Resource(resolved)))
                }
                Err(_) => {
                    debug!("{}: ARN format of {} is unusable", definition.qualified_name(), rt.name());
                    None
                }
            })
            .collect();

        if scoped.is_empty() {
            Err(SynthError::UnknownResourceType(format!(
                "{}:{}",
                service.prefix(),
                definition.resource_types().join(",")
            )))
        } else {
            Ok(scoped)
        }
    }
}
