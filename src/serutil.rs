use {
    serde::{
        ser::{SerializeSeq, Serializer},
        Serialize,
    },
    std::{
        cmp::Ordering,
        fmt::{Display, Formatter, Result as FmtResult},
        ops::Index,
        slice::Iter,
    },
};

/// Implement Display for a given class by formatting it as pretty-printed JSON.
#[macro_export]
macro_rules! display_json {
    ($cls:ident) => {
        impl std::fmt::Display for $cls {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                $crate::serutil::write_json(self, f)
            }
        }
    };
}

/// Implement FromStr for a given class by parsing it as JSON.
#[macro_export]
macro_rules! from_str_json {
    ($cls:ident) => {
        impl ::std::str::FromStr for $cls {
            type Err = ::serde_json::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match ::serde_json::from_str::<Self>(s) {
                    Ok(result) => Ok(result),
                    Err(e) => {
                        ::log::debug!("Failed to parse: {}: {:?}", s, e);
                        Err(e)
                    }
                }
            }
        }
    };
}

/// Write a serializable value as JSON pretty-printed with a four-space indent.
pub(crate) fn write_json<T: Serialize + ?Sized>(value: &T, f: &mut Formatter) -> FmtResult {
    let buf = Vec::new();
    let serde_formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(buf, serde_formatter);
    if let Err(e) = value.serialize(&mut ser) {
        log::error!("Failed to serialize: {}", e);
        return Err(std::fmt::Error {});
    }

    match std::str::from_utf8(&ser.into_inner()) {
        Ok(s) => f.write_str(s),
        Err(e) => {
            log::error!("JSON serialization contained non-UTF-8 characters: {}", e);
            Err(std::fmt::Error {})
        }
    }
}

/// Whether a [StringLikeList] is rendered as a bare element or as a JSON array.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ListKind {
    Single,
    List,
}

/// A policy element that IAM allows to be either a single value or a list of values, e.g. `"Resource": "*"` versus
/// `"Resource": ["arn:...", "arn:..."]`.
#[derive(Clone, Debug, Eq)]
pub enum StringLikeList<T> {
    Single(T),
    List(Vec<T>),
}

impl<T> StringLikeList<T> {
    #[inline]
    pub fn kind(&self) -> ListKind {
        match self {
            Self::Single(_) => ListKind::Single,
            Self::List(_) => ListKind::List,
        }
    }

    pub fn to_vec(&self) -> Vec<&T> {
        match self {
            Self::Single(v) => vec![v],
            Self::List(v) => v.iter().collect(),
        }
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        match self {
            Self::Single(v) => std::slice::from_ref(v).iter(),
            Self::List(v) => v.iter(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(_) => false,
            Self::List(v) => v.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::List(v) => v.len(),
        }
    }
}

impl<T: PartialEq> PartialEq for StringLikeList<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Single(v1), Self::Single(v2)) => v1 == v2,
            (Self::List(v1), Self::List(v2)) => v1 == v2,
            (Self::Single(v1), Self::List(v2)) => v2.len() == 1 && v1 == &v2[0],
            (Self::List(v1), Self::Single(v2)) => v1.len() == 1 && &v1[0] == v2,
        }
    }
}

/// Ordered by element sequence, so `Single(x)` and `List(vec![x])` compare equal here as they do under `PartialEq`.
impl<T: Ord> PartialOrd for StringLikeList<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for StringLikeList<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T> From<T> for StringLikeList<T> {
    fn from(v: T) -> Self {
        Self::Single(v)
    }
}

impl<T> From<Vec<T>> for StringLikeList<T> {
    fn from(v: Vec<T>) -> Self {
        Self::List(v)
    }
}

impl<T> Index<usize> for StringLikeList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        match self {
            Self::Single(v) => {
                if index == 0 {
                    v
                } else {
                    panic!("index out of bounds: the len is 1 but the index is {}", index);
                }
            }
            Self::List(v) => &v[index],
        }
    }
}

impl<T: Display> Serialize for StringLikeList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Single(v) => serializer.collect_str(v),
            Self::List(v) => {
                let mut seq = serializer.serialize_seq(Some(v.len()))?;
                for e in v {
                    seq.serialize_element(&e.to_string())?;
                }
                seq.end()
            }
        }
    }
}

impl<T: Display> Display for StringLikeList<T> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write_json(self, f)
    }
}
