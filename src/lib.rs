#![warn(clippy::all)]
pub(crate) mod access_level;
pub(crate) mod action;
pub(crate) mod assembler;
pub(crate) mod builder;
pub(crate) mod catalog;
pub(crate) mod condition;
pub(crate) mod error;
pub(crate) mod expander;
pub(crate) mod minimize;
pub(crate) mod policy;
pub(crate) mod query;
pub(crate) mod request;
pub(crate) mod resolver;
pub(crate) mod resource;
pub(crate) mod statement;
pub(crate) mod synthesis;

#[macro_use]
pub(crate) mod serutil;

pub use {
    access_level::AccessLevel,
    action::Action,
    assembler::PolicyAssembler,
    builder::{StatementComposer, DEFAULT_MAX_DEPENDENCY_ROUNDS},
    catalog::{
        ActionDefinition, ArnPattern, Catalog, ConditionKeyDefinition, ResourceTypeDefinition, ServiceDefinition,
        ServiceMap,
    },
    condition::{Condition, ConditionBlock, ConditionMap, ConditionOp},
    error::SynthError,
    expander::{CandidateAction, Expander, Expansion, ResourceTarget},
    minimize::Minimizer,
    policy::{Policy, POLICY_VERSION},
    query::{CatalogQuery, ALL_SERVICES},
    request::{AccessRequest, ActionsTemplate, CrudTemplate, Template, WildcardOnlySection},
    resolver::{ArnResolver, ResolvedResource},
    resource::{Resource, ResourceArn, ResourceList},
    serutil::{ListKind, StringLikeList},
    statement::{Effect, ScopeKind, Statement, StatementBuilder, StatementBuilderError, StatementList},
    synthesis::{
        PolicySynthesizer, PolicySynthesizerBuilder, PolicySynthesizerBuilderError, RequestFailure, Synthesis,
        SynthesisNote,
    },
};
