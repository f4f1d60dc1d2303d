/// Registry domain models
use crate::error::{PrError, PrResult};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Schemaless key/value mapping, kept in submission order
pub type AttributeMap = Map<String, Value>;

/// Payload key holding an identity's biographic data
pub const BIOGRAPHIC_DATA_KEY: &str = "biographicData";

/// Payload key holding an identity's identifier
pub const IDENTITY_ID_KEY: &str = "identityId";

/// A registered person and the identities attached to it
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub person_id: String,
    pub attributes: AttributeMap,
    pub identities: Vec<Identity>,
}

impl Person {
    /// New person with no identities
    pub fn new(person_id: impl Into<String>, attributes: AttributeMap) -> Self {
        Self {
            person_id: person_id.into(),
            attributes,
            identities: Vec::new(),
        }
    }

    /// Earliest registered identity
    pub fn first_identity(&self) -> Option<&Identity> {
        self.identities.first()
    }

    /// Most recently registered identity
    pub fn last_identity(&self) -> Option<&Identity> {
        self.identities.last()
    }

    pub fn has_identities(&self) -> bool {
        !self.identities.is_empty()
    }

    pub fn has_identity(&self, identity_id: &str) -> bool {
        self.identities
            .iter()
            .any(|identity| identity.identity_id == identity_id)
    }
}

/// Biographic record attached to a person, immutable once stored
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub identity_id: String,
    pub biographic_data: AttributeMap,
    /// Remaining payload fields (biometric data, context...), stored as submitted
    pub extra: AttributeMap,
}

impl Identity {
    pub fn new(identity_id: impl Into<String>, biographic_data: AttributeMap) -> Self {
        Self {
            identity_id: identity_id.into(),
            biographic_data,
            extra: AttributeMap::new(),
        }
    }

    /// Build an identity from a request payload.
    ///
    /// A missing `biographicData` is stored as an empty mapping; any value other
    /// than a JSON object is rejected. The path identifier wins over an
    /// `identityId` field in the payload.
    pub fn from_payload(identity_id: impl Into<String>, mut payload: AttributeMap) -> PrResult<Self> {
        let biographic_data = match payload.remove(BIOGRAPHIC_DATA_KEY) {
            None | Some(Value::Null) => AttributeMap::new(),
            Some(Value::Object(data)) => data,
            Some(_) => {
                return Err(PrError::Validation(format!(
                    "{} must be a JSON object",
                    BIOGRAPHIC_DATA_KEY
                )))
            }
        };
        payload.remove(IDENTITY_ID_KEY);

        Ok(Self {
            identity_id: identity_id.into(),
            biographic_data,
            extra: payload,
        })
    }

    /// Requested biographic fields present on this identity; absent names are skipped
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> AttributeMap {
        names
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                self.biographic_data
                    .get(name)
                    .map(|value| (name.to_string(), value.clone()))
            })
            .collect()
    }
}

/// Reason an attribute failed to match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchErrorCode {
    /// Attribute not present on the reference identity
    Missing = 0,
    /// Attribute present with a different value
    Mismatch = 1,
}

impl Serialize for MatchErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// One attribute that did not match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Discrepancy {
    pub attribute_name: String,
    pub error_code: MatchErrorCode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> AttributeMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_identity_from_payload_splits_biographic_data() {
        let payload = object(json!({
            "identityId": "ignored",
            "biographicData": {"name": "Alice"},
            "biometricData": [{"type": "FINGER"}]
        }));

        let identity = Identity::from_payload("id-1", payload).unwrap();
        assert_eq!(identity.identity_id, "id-1");
        assert_eq!(identity.biographic_data, object(json!({"name": "Alice"})));
        assert_eq!(identity.extra, object(json!({"biometricData": [{"type": "FINGER"}]})));
    }

    #[test]
    fn test_identity_without_biographic_data() {
        let identity = Identity::from_payload("id-1", AttributeMap::new()).unwrap();
        assert!(identity.biographic_data.is_empty());
    }

    #[test]
    fn test_identity_rejects_non_object_biographic_data() {
        let payload = object(json!({"biographicData": "Alice"}));
        assert!(matches!(
            Identity::from_payload("id-1", payload),
            Err(PrError::Validation(_))
        ));
    }

    #[test]
    fn test_select_skips_absent_fields() {
        let identity = Identity::new("id-1", object(json!({"name": "Alice", "age": "30"})));
        assert_eq!(identity.select(&["age", "city"]), object(json!({"age": "30"})));
        assert!(identity.select::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_discrepancy_serializes_numeric_code() {
        let discrepancy = Discrepancy {
            attribute_name: "age".to_string(),
            error_code: MatchErrorCode::Mismatch,
        };
        assert_eq!(
            serde_json::to_value(&discrepancy).unwrap(),
            json!({"attributeName": "age", "errorCode": 1})
        );
    }
}
