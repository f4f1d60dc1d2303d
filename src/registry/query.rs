/// Person queries: predicate filtering, pagination and field projection
use crate::{
    error::{PrError, PrResult},
    registry::models::{AttributeMap, Identity, Person},
};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_OFFSET: usize = 0;
pub const DEFAULT_LIMIT: usize = 100;

/// Parsed person-list query
#[derive(Debug, Clone, PartialEq)]
pub struct PersonQuery {
    /// Biographic attributes an identity must carry with exactly these values
    pub predicates: IndexMap<String, String>,
    pub offset: usize,
    pub limit: usize,
    /// Fields to project; empty means "return identifiers"
    pub names: Vec<String>,
}

impl Default for PersonQuery {
    fn default() -> Self {
        Self {
            predicates: IndexMap::new(),
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
            names: Vec::new(),
        }
    }
}

impl PersonQuery {
    /// Build a query from raw query-string pairs.
    ///
    /// `names` may repeat. Any key other than `names`, `offset`, `limit` and
    /// `attributeNames` becomes a predicate; a repeated predicate keeps its last value.
    pub fn from_pairs<I>(pairs: I) -> PrResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();

        for (key, value) in pairs {
            match key.as_str() {
                "offset" => query.offset = parse_bound("offset", &value)?,
                "limit" => query.limit = parse_bound("limit", &value)?,
                "names" => query.names.push(value),
                "attributeNames" => {}
                _ => {
                    query.predicates.insert(key, value);
                }
            }
        }

        Ok(query)
    }
}

fn parse_bound(name: &str, value: &str) -> PrResult<usize> {
    value.trim().parse::<usize>().map_err(|_| {
        PrError::Validation(format!(
            "{} must be a non-negative integer, got '{}'",
            name, value
        ))
    })
}

/// Result of a person listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PersonListing {
    Ids(Vec<String>),
    Projections(Vec<AttributeMap>),
}

impl PersonListing {
    pub fn len(&self) -> usize {
        match self {
            PersonListing::Ids(ids) => ids.len(),
            PersonListing::Projections(projections) => projections.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// True when the identity carries every predicate with exactly its value
pub fn identity_satisfies(identity: &Identity, predicates: &IndexMap<String, String>) -> bool {
    predicates.iter().all(|(key, expected)| {
        matches!(identity.biographic_data.get(key), Some(Value::String(stored)) if stored == expected)
    })
}

/// Identifiers of persons with any identity satisfying the predicates,
/// in scan order, sliced to `[offset, offset + limit)`.
///
/// Persons without identities never match.
pub fn list_persons<'a, I>(
    persons: I,
    predicates: &IndexMap<String, String>,
    offset: usize,
    limit: usize,
) -> Vec<String>
where
    I: IntoIterator<Item = &'a Person>,
{
    persons
        .into_iter()
        .filter(|person| {
            person
                .identities
                .iter()
                .any(|identity| identity_satisfies(identity, predicates))
        })
        .skip(offset)
        .take(limit)
        .map(|person| person.person_id.clone())
        .collect()
}

/// Requested fields from each person's latest identity
pub fn project_attributes<'a, I, S>(persons: I, names: &[S]) -> Vec<AttributeMap>
where
    I: IntoIterator<Item = &'a Person>,
    S: AsRef<str>,
{
    persons
        .into_iter()
        .map(|person| {
            person
                .last_identity()
                .map(|identity| identity.select(names))
                .unwrap_or_default()
        })
        .collect()
}

/// Requested fields from the person's latest identity.
///
/// A person without identities is reported as not found.
pub fn read_attributes<S: AsRef<str>>(person: &Person, names: &[S]) -> PrResult<AttributeMap> {
    let identity = person.last_identity().ok_or_else(|| {
        PrError::NotFound(format!("person {} has no identity", person.person_id))
    })?;
    Ok(identity.select(names))
}
