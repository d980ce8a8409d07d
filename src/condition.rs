use {
    crate::serutil::StringLikeList,
    serde::{Deserialize, Serialize},
    std::{
        collections::{BTreeMap, BTreeSet},
        fmt::{Debug, Display, Formatter, Result as FmtResult},
    },
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum ConditionOp {
    ArnEquals,
    ArnEqualsIfExists,
    ArnLike,
    ArnLikeIfExists,
    ArnNotEquals,
    ArnNotEqualsIfExists,
    ArnNotLike,
    ArnNotLikeIfExists,
    BinaryEquals,
    BinaryEqualsIfExists,
    Bool,
    BoolIfExists,
    DateEquals,
    DateEqualsIfExists,
    DateGreaterThan,
    DateGreaterThanEquals,
    DateGreaterThanEqualsIfExists,
    DateGreaterThanIfExists,
    DateLessThan,
    DateLessThanEquals,
    DateLessThanEqualsIfExists,
    DateLessThanIfExists,
    DateNotEquals,
    DateNotEqualsIfExists,
    IpAddress,
    IpAddressIfExists,
    NotIpAddress,
    NotIpAddressIfExists,
    Null,
    NumericEquals,
    NumericEqualsIfExists,
    NumericGreaterThan,
    NumericGreaterThanEquals,
    NumericGreaterThanEqualsIfExists,
    NumericGreaterThanIfExists,
    NumericLessThan,
    NumericLessThanEquals,
    NumericLessThanEqualsIfExists,
    NumericLessThanIfExists,
    NumericNotEquals,
    NumericNotEqualsIfExists,
    StringEquals,
    StringEqualsIfExists,
    StringEqualsIgnoreCase,
    StringEqualsIgnoreCaseIfExists,
    StringLike,
    StringLikeIfExists,
    StringNotEquals,
    StringNotEqualsIfExists,
    StringNotEqualsIgnoreCase,
    StringNotEqualsIgnoreCaseIfExists,
    StringNotLike,
    StringNotLikeIfExists,
}

impl Display for ConditionOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(self, f)
    }
}

pub type ConditionMap = BTreeMap<String, StringLikeList<String>>;
pub type Condition = BTreeMap<ConditionOp, ConditionMap>;

/// Condition keys with this prefix are global: every request carries them, so they apply to every action.
const GLOBAL_CONDITION_KEY_PREFIX: &str = "aws:";

/// A caller-supplied condition: one operator, one key, and the values to compare against.
///
/// Condition blocks are attached verbatim to every resource-scoped statement whose actions support the key.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionBlock {
    operator: ConditionOp,
    key: String,
    values: Vec<String>,
}

impl ConditionBlock {
    pub fn new<K: Into<String>>(operator: ConditionOp, key: K, values: Vec<String>) -> Self {
        Self {
            operator,
            key: key.into(),
            values,
        }
    }

    #[inline]
    pub fn operator(&self) -> ConditionOp {
        self.operator
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// A block with no values cannot be written as a condition and is never attached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn is_global(&self) -> bool {
        self.key.to_ascii_lowercase().starts_with(GLOBAL_CONDITION_KEY_PREFIX)
    }

    /// Whether this block's key is one of `supported`. Catalog keys may end in a placeholder
    /// (`s3:ResourceTag/${TagKey}`), which matches any non-empty suffix.
    pub fn is_supported_by<'a, I: IntoIterator<Item = &'a String>>(&self, supported: I) -> bool {
        supported.into_iter().any(|catalog_key| condition_key_matches(catalog_key, &self.key))
    }
}

pub(crate) fn condition_key_matches(catalog_key: &str, key: &str) -> bool {
    let catalog_key = catalog_key.to_ascii_lowercase();
    let key = key.to_ascii_lowercase();

    match catalog_key.find("${") {
        None => catalog_key == key,
        Some(pos) => key.len() > pos && key.starts_with(&catalog_key[..pos]),
    }
}

/// Merge condition blocks into a statement condition. Values supplied for the same operator and key are unioned.
/// Blocks without values are skipped.
pub(crate) fn merge_condition_blocks<'a, I: IntoIterator<Item = &'a ConditionBlock>>(blocks: I) -> Condition {
    let mut merged: BTreeMap<ConditionOp, BTreeMap<String, BTreeSet<String>>> = BTreeMap::new();
    for block in blocks.into_iter().filter(|block| !block.is_empty()) {
        merged
            .entry(block.operator)
            .or_default()
            .entry(block.key.clone())
            .or_default()
            .extend(block.values.iter().cloned());
    }

    merged
        .into_iter()
        .map(|(op, keys)| {
            let map = keys
                .into_iter()
                .map(|(key, values)| {
                    let mut values: Vec<String> = values.into_iter().collect();
                    let list = if values.len() == 1 {
                        StringLikeList::Single(values.remove(0))
                    } else {
                        StringLikeList::List(values)
                    };
                    (key, list)
                })
                .collect();
            (op, map)
        })
        .collect()
}
