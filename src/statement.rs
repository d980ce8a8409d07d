use {
    crate::{display_json, Action, Condition, Resource, ResourceList},
    derive_builder::Builder,
    serde::{ser::Serializer, Serialize},
    std::{
        cmp::Ordering,
        collections::BTreeSet,
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

/// The effect of a synthesized statement. Synthesis only ever grants access.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Effect {
    #[default]
    Allow,
}

impl Display for Effect {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Allow => f.write_str("Allow"),
        }
    }
}

impl Serialize for Effect {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Whether a statement is bound to specific ARNs or to the `*` resource.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ScopeKind {
    ResourceScoped,
    Wildcard,
}

#[derive(Builder, Clone, Debug, Eq, PartialEq, Serialize)]
#[builder(build_fn(validate = "Self::validate"))]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    sid: Option<String>,

    #[builder(default)]
    effect: Effect,

    /// Sorted and free of duplicates.
    #[builder(setter(custom))]
    action: Vec<Action>,

    #[builder(setter(into))]
    resource: ResourceList,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    condition: Option<Condition>,
}

impl Statement {
    pub fn builder() -> StatementBuilder {
        StatementBuilder::default()
    }

    #[inline]
    pub fn sid(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    #[inline]
    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    #[inline]
    pub fn action(&self) -> &[Action] {
        &self.action
    }

    #[inline]
    pub fn resource(&self) -> &ResourceList {
        &self.resource
    }

    #[inline]
    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    /// A statement that names the `*` resource anywhere is wildcard-scoped.
    pub fn scope_kind(&self) -> ScopeKind {
        if self.resource.iter().any(Resource::is_any) {
            ScopeKind::Wildcard
        } else {
            ScopeKind::ResourceScoped
        }
    }

    #[inline]
    pub fn is_wildcard(&self) -> bool {
        self.scope_kind() == ScopeKind::Wildcard
    }

    /// The canonical statement order: resource-scoped before wildcard, then by first action name. The remaining
    /// fields only break ties so the order is total.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.scope_kind()
            .cmp(&other.scope_kind())
            .then_with(|| self.action.first().cmp(&other.action.first()))
            .then_with(|| self.action.cmp(&other.action))
            .then_with(|| self.resource.cmp(&other.resource))
            .then_with(|| self.condition.cmp(&other.condition))
    }

    /// Assemble a statement from parts already known to be non-empty.
    pub(crate) fn from_parts(actions: BTreeSet<Action>, resource: ResourceList, condition: Option<Condition>) -> Self {
        Self {
            sid: None,
            effect: Effect::Allow,
            action: actions.into_iter().collect(),
            resource,
            condition,
        }
    }

    pub(crate) fn set_sid<S: Into<String>>(&mut self, sid: S) {
        self.sid = Some(sid.into());
    }

    pub(crate) fn retain_actions<F: FnMut(&Action) -> bool>(&mut self, f: F) {
        self.action.retain(f);
    }

    pub(crate) fn replace_actions<I: IntoIterator<Item = Action>>(&mut self, actions: I) {
        self.action = actions.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
    }
}

display_json!(Statement);

impl StatementBuilder {
    /// Set the statement's actions. Duplicates are removed and the result is sorted.
    pub fn action<I: IntoIterator<Item = Action>>(&mut self, actions: I) -> &mut Self {
        let actions: BTreeSet<Action> = actions.into_iter().collect();
        self.action = Some(actions.into_iter().collect());
        self
    }

    fn validate(&self) -> Result<(), StatementBuilderError> {
        let mut errors = Vec::with_capacity(2);
        match &self.action {
            None => errors.push("Action must be set."),
            Some(actions) if actions.is_empty() => errors.push("Action cannot be empty."),
            _ => (),
        }

        match &self.resource {
            None => errors.push("Resource must be set."),
            Some(resources) if resources.is_empty() => errors.push("Resource cannot be empty."),
            _ => (),
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(StatementBuilderError::ValidationError(errors.join(" ")))
        }
    }
}

pub type StatementList = Vec<Statement>;

#[cfg(test)]
mod tests {
    use {
        crate::{Action, ConditionBlock, ConditionOp, Effect, Resource, ScopeKind, Statement},
        indoc::indoc,
        pretty_assertions::assert_eq,
        std::{cmp::Ordering, str::FromStr},
    };

    fn action(s: &str) -> Action {
        Action::from_str(s).unwrap()
    }

    fn arn(s: &str) -> Resource {
        Resource::from_str(s).unwrap()
    }

    #[test_log::test]
    fn test_builder() {
        let err = Statement::builder().build().unwrap_err();
        assert_eq!(err.to_string(), "Action must be set. Resource must be set.");

        let err = Statement::builder().action(vec![]).resource(Resource::Any).build().unwrap_err();
        assert_eq!(err.to_string(), "Action cannot be empty.");

        let err = Statement::builder().action(vec![action("s3:GetObject")]).resource(vec![]).build().unwrap_err();
        assert_eq!(err.to_string(), "Resource cannot be empty.");

        let s = Statement::builder()
            .sid("Statement1")
            .action(vec![action("s3:PutObject"), action("s3:GetObject"), action("s3:PutObject")])
            .resource(vec![arn("arn:aws:s3:::bucket/*")])
            .build()
            .unwrap();
        assert_eq!(s.sid(), Some("Statement1"));
        assert_eq!(*s.effect(), Effect::Allow);
        assert_eq!(s.action(), &[action("s3:GetObject"), action("s3:PutObject")]);
        assert_eq!(s.scope_kind(), ScopeKind::ResourceScoped);
        assert!(s.condition().is_none());
    }

    #[test_log::test]
    fn test_display() {
        let condition = crate::condition::merge_condition_blocks(&[ConditionBlock::new(
            ConditionOp::StringEquals,
            "s3:prefix",
            vec!["home/".to_string()],
        )]);
        let s = Statement::builder()
            .sid("Statement1")
            .action(vec![action("s3:ListBucket")])
            .resource(vec![arn("arn:aws:s3:::bucket")])
            .condition(condition)
            .build()
            .unwrap();

        assert_eq!(
            s.to_string(),
            indoc! { r#"
            {
                "Sid": "Statement1",
                "Effect": "Allow",
                "Action": [
                    "s3:ListBucket"
                ],
                "Resource": [
                    "arn:aws:s3:::bucket"
                ],
                "Condition": {
                    "StringEquals": {
                        "s3:prefix": "home/"
                    }
                }
            }"# }
        );

        let w = Statement::builder().action(vec![action("s3:ListAllMyBuckets")]).resource(Resource::Any).build().unwrap();
        assert_eq!(
            w.to_string(),
            indoc! { r#"
            {
                "Effect": "Allow",
                "Action": [
                    "s3:ListAllMyBuckets"
                ],
                "Resource": "*"
            }"# }
        );
    }

    #[test_log::test]
    fn test_canonical_order() {
        let wildcard = Statement::builder().action(vec![action("a:A")]).resource(Resource::Any).build().unwrap();
        let scoped_b =
            Statement::builder().action(vec![action("s3:B")]).resource(vec![arn("arn:aws:s3:::b")]).build().unwrap();
        let scoped_a =
            Statement::builder().action(vec![action("s3:A")]).resource(vec![arn("arn:aws:s3:::z")]).build().unwrap();

        assert!(wildcard.is_wildcard());
        assert_eq!(scoped_a.canonical_cmp(&scoped_b), Ordering::Less);
        assert_eq!(scoped_b.canonical_cmp(&wildcard), Ordering::Less);
        assert_eq!(wildcard.canonical_cmp(&wildcard.clone()), Ordering::Equal);

        let mut statements = vec![wildcard.clone(), scoped_b.clone(), scoped_a.clone()];
        statements.sort_by(Statement::canonical_cmp);
        assert_eq!(statements, vec![scoped_a, scoped_b, wildcard]);
    }
}
