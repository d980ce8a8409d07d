use {
    crate::{display_json, Action, StatementList},
    serde::{
        ser::{SerializeMap, Serializer},
        Serialize,
    },
};

/// The policy-language version stamped on every synthesized document.
pub const POLICY_VERSION: &str = "2012-10-17";

/// A synthesized identity policy document.
///
/// Documents are only produced by the assembler, so every document holds at least one statement, statements are in
/// canonical order with `Statement{n}` SIDs, and no action appears in more than one statement.
///
/// This does not derive Serialize so that the element order (`Version`, then `Statement`) is fixed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Policy {
    statement: StatementList,
}

impl Policy {
    pub(crate) fn new(statement: StatementList) -> Self {
        Self {
            statement,
        }
    }

    #[inline]
    pub fn version(&self) -> &'static str {
        POLICY_VERSION
    }

    #[inline]
    pub fn statement(&self) -> &StatementList {
        &self.statement
    }

    /// Every action granted by the document, in statement order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.statement.iter().flat_map(|s| s.action().iter())
    }
}

display_json!(Policy);

impl Serialize for Policy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_map(Some(2))?;
        state.serialize_entry("Version", POLICY_VERSION)?;
        state.serialize_entry("Statement", &self.statement)?;
        state.end()
    }
}
