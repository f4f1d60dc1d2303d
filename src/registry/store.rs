/// Person repository - sole owner of person and identity state
use crate::{
    error::{PrError, PrResult},
    registry::{
        matcher,
        models::{AttributeMap, Discrepancy, Identity, Person},
        query::{self, PersonListing, PersonQuery},
    },
};
use indexmap::IndexMap;
use tokio::sync::{RwLock, RwLockReadGuard};

/// In-memory person repository.
///
/// Persons are kept in insertion order, which is the order listings scan them.
/// Each operation holds the lock for its whole check-then-act sequence.
#[derive(Default)]
pub struct PersonRepository {
    persons: RwLock<IndexMap<String, Person>>,
}

/// Consistent read-only view of the repository
pub struct PersonsView<'a> {
    guard: RwLockReadGuard<'a, IndexMap<String, Person>>,
}

impl<'a> PersonsView<'a> {
    /// All persons with their identifiers, in insertion order.
    /// Each call starts a fresh scan over the same snapshot.
    pub fn all_persons(&self) -> impl Iterator<Item = (&str, &Person)> + '_ {
        self.guard
            .iter()
            .map(|(person_id, person)| (person_id.as_str(), person))
    }

    pub fn get(&self, person_id: &str) -> Option<&Person> {
        self.guard.get(person_id)
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}

impl PersonRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a read-only view for a multi-step scan
    pub async fn read(&self) -> PersonsView<'_> {
        PersonsView {
            guard: self.persons.read().await,
        }
    }

    /// Register a new person with no identities
    pub async fn create_person(&self, person_id: &str, attributes: AttributeMap) -> PrResult<()> {
        if person_id.is_empty() {
            return Err(PrError::Validation("personId cannot be empty".to_string()));
        }

        let mut persons = self.persons.write().await;
        if persons.contains_key(person_id) {
            return Err(PrError::Conflict(format!("person {} already exists", person_id)));
        }

        persons.insert(person_id.to_string(), Person::new(person_id, attributes));
        Ok(())
    }

    /// Append an identity to an existing person
    pub async fn create_identity(&self, person_id: &str, identity: Identity) -> PrResult<()> {
        let mut persons = self.persons.write().await;
        let person = persons
            .get_mut(person_id)
            .ok_or_else(|| PrError::NotFound(format!("person {} not found", person_id)))?;

        if person.has_identity(&identity.identity_id) {
            return Err(PrError::Conflict(format!(
                "identity {} already exists for person {}",
                identity.identity_id, person_id
            )));
        }

        person.identities.push(identity);
        Ok(())
    }

    /// Get a copy of a person record
    pub async fn get_person(&self, person_id: &str) -> PrResult<Person> {
        self.read()
            .await
            .get(person_id)
            .cloned()
            .ok_or_else(|| PrError::NotFound(format!("person {} not found", person_id)))
    }

    /// Match attributes against the person's first identity
    pub async fn match_person(
        &self,
        person_id: &str,
        attributes: &AttributeMap,
    ) -> PrResult<Vec<Discrepancy>> {
        let view = self.read().await;
        let person = view
            .get(person_id)
            .ok_or_else(|| PrError::NotFound(format!("person {} not found", person_id)))?;
        matcher::match_attributes(person, attributes)
    }

    /// Filter, paginate and optionally project persons
    pub async fn list_persons(&self, query: &PersonQuery) -> PersonListing {
        let view = self.read().await;
        let ids = query::list_persons(
            view.all_persons().map(|(_, person)| person),
            &query.predicates,
            query.offset,
            query.limit,
        );

        if query.names.is_empty() {
            return PersonListing::Ids(ids);
        }

        let page = ids.iter().filter_map(|person_id| view.get(person_id));
        PersonListing::Projections(query::project_attributes(page, &query.names))
    }

    /// Requested fields from the person's latest identity
    pub async fn read_attributes(&self, person_id: &str, names: &[String]) -> PrResult<AttributeMap> {
        let view = self.read().await;
        let person = view
            .get(person_id)
            .ok_or_else(|| PrError::NotFound(format!("person {} not found", person_id)))?;
        query::read_attributes(person, names)
    }

    /// Number of persons and identities currently stored
    pub async fn counts(&self) -> (usize, usize) {
        let view = self.read().await;
        let identities = view
            .all_persons()
            .map(|(_, person)| person.identities.len())
            .sum();
        (view.len(), identities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::models::MatchErrorCode;
    use serde_json::{json, Value};

    fn object(value: Value) -> AttributeMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    async fn repository_with_alice() -> PersonRepository {
        let repo = PersonRepository::new();
        repo.create_person("p1", AttributeMap::new()).await.unwrap();
        repo.create_identity("p1", Identity::new("i1", object(json!({"name": "Alice", "age": "30"}))))
            .await
            .unwrap();
        repo
    }

    #[tokio::test]
    async fn test_create_person_conflict() {
        let repo = PersonRepository::new();
        repo.create_person("p1", object(json!({"status": "ACTIVE"}))).await.unwrap();

        let result = repo.create_person("p1", AttributeMap::new()).await;
        assert!(matches!(result, Err(PrError::Conflict(_))));

        // The original record is untouched
        let person = repo.get_person("p1").await.unwrap();
        assert_eq!(person.attributes, object(json!({"status": "ACTIVE"})));
        assert!(person.identities.is_empty());
    }

    #[tokio::test]
    async fn test_create_person_rejects_empty_id() {
        let repo = PersonRepository::new();
        assert!(matches!(
            repo.create_person("", AttributeMap::new()).await,
            Err(PrError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_identity() {
        let repo = repository_with_alice().await;

        let duplicate = repo.create_identity("p1", Identity::new("i1", AttributeMap::new())).await;
        assert!(matches!(duplicate, Err(PrError::Conflict(_))));

        let unknown = repo.create_identity("nobody", Identity::new("i1", AttributeMap::new())).await;
        assert!(matches!(unknown, Err(PrError::NotFound(_))));

        repo.create_identity("p1", Identity::new("i2", AttributeMap::new())).await.unwrap();
        let ids: Vec<_> = repo
            .get_person("p1")
            .await
            .unwrap()
            .identities
            .into_iter()
            .map(|identity| identity.identity_id)
            .collect();
        assert_eq!(ids, vec!["i1", "i2"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_identity_creation_has_one_winner() {
        let repo = std::sync::Arc::new(PersonRepository::new());
        repo.create_person("p1", AttributeMap::new()).await.unwrap();

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.create_identity("p1", Identity::new("i1", AttributeMap::new()))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(()) => created += 1,
                Err(PrError::Conflict(_)) => {}
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(repo.get_person("p1").await.unwrap().identities.len(), 1);
    }

    #[tokio::test]
    async fn test_same_identity_id_under_different_persons() {
        let repo = repository_with_alice().await;
        repo.create_person("p2", AttributeMap::new()).await.unwrap();
        repo.create_identity("p2", Identity::new("i1", AttributeMap::new())).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_person_not_found() {
        let repo = PersonRepository::new();
        assert!(matches!(repo.get_person("p1").await, Err(PrError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_match_person() {
        let repo = repository_with_alice().await;

        let result = repo
            .match_person("p1", &object(json!({"name": "Alice", "age": "31"})))
            .await
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].attribute_name, "age");
        assert_eq!(result[0].error_code, MatchErrorCode::Mismatch);

        repo.create_person("p2", AttributeMap::new()).await.unwrap();
        assert!(matches!(
            repo.match_person("p2", &AttributeMap::new()).await,
            Err(PrError::NotFound(_))
        ));
        assert!(matches!(
            repo.match_person("nobody", &AttributeMap::new()).await,
            Err(PrError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_in_insertion_order() {
        let repo = PersonRepository::new();
        for id in ["c", "a", "b"] {
            repo.create_person(id, AttributeMap::new()).await.unwrap();
            repo.create_identity(id, Identity::new("i1", object(json!({"city": "X"}))))
                .await
                .unwrap();
        }
        repo.create_person("empty", AttributeMap::new()).await.unwrap();

        let listing = repo.list_persons(&PersonQuery::default()).await;
        assert_eq!(
            listing,
            PersonListing::Ids(vec!["c".to_string(), "a".to_string(), "b".to_string()])
        );
    }

    #[tokio::test]
    async fn test_list_with_projection() {
        let repo = repository_with_alice().await;
        let query = PersonQuery {
            names: vec!["age".to_string(), "city".to_string()],
            ..PersonQuery::default()
        };

        let listing = repo.list_persons(&query).await;
        assert_eq!(listing, PersonListing::Projections(vec![object(json!({"age": "30"}))]));
    }

    #[tokio::test]
    async fn test_read_attributes_is_idempotent() {
        let repo = repository_with_alice().await;
        let names = vec!["name".to_string()];

        let first = repo.read_attributes("p1", &names).await.unwrap();
        let second = repo.read_attributes("p1", &names).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, object(json!({"name": "Alice"})));
    }

    #[tokio::test]
    async fn test_read_attributes_not_found() {
        let repo = repository_with_alice().await;
        repo.create_person("p2", AttributeMap::new()).await.unwrap();

        assert!(matches!(
            repo.read_attributes("nobody", &[]).await,
            Err(PrError::NotFound(_))
        ));
        assert!(matches!(
            repo.read_attributes("p2", &[]).await,
            Err(PrError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_view_scan_is_restartable() {
        let repo = repository_with_alice().await;
        repo.create_person("p2", AttributeMap::new()).await.unwrap();

        let view = repo.read().await;
        let first: Vec<_> = view.all_persons().map(|(id, _)| id.to_string()).collect();
        let second: Vec<_> = view.all_persons().map(|(id, _)| id.to_string()).collect();
        assert_eq!(first, second);
        assert_eq!(view.len(), 2);
    }

    #[tokio::test]
    async fn test_counts() {
        let repo = repository_with_alice().await;
        repo.create_person("p2", AttributeMap::new()).await.unwrap();
        assert_eq!(repo.counts().await, (2, 1));
    }
}
