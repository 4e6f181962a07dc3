use serde::{Deserialize, Serialize};

/// Reference to a sibling record gathered in the same pass. It must resolve
/// inside the graph that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrictRef(String);

/// Nullable link that may point outside the graph or at nothing at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionalRef(String);

/// Ordered list of permissive links (`linked*Ids`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefList(Vec<String>);

impl StrictRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl OptionalRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl RefList {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ids.into_iter().map(Into::into).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for StrictRef {
    fn from(value: &str) -> Self {
        StrictRef::new(value)
    }
}

impl From<&str> for OptionalRef {
    fn from(value: &str) -> Self {
        OptionalRef::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{OptionalRef, RefList, StrictRef};

    #[test]
    fn references_serialize_as_bare_ids() {
        let strict = serde_json::to_string(&StrictRef::new("ch-1")).expect("strict ref should encode");
        assert_eq!(strict, "\"ch-1\"");

        let optional: Option<OptionalRef> =
            serde_json::from_str("null").expect("null optional ref should decode");
        assert!(optional.is_none());

        let list: RefList =
            serde_json::from_str("[\"a\",\"b\"]").expect("ref list should decode");
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(list.len(), 2);
    }
}
