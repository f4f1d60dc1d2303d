/// Attribute matching against a person's reference identity
use crate::{
    error::{PrError, PrResult},
    registry::models::{AttributeMap, Discrepancy, MatchErrorCode, Person},
};

/// Compare candidate attributes with the person's first identity.
///
/// Returns one discrepancy per attribute that is missing or different, in the
/// order the attributes were submitted. An empty list is a full match.
pub fn match_attributes(person: &Person, query: &AttributeMap) -> PrResult<Vec<Discrepancy>> {
    let reference = person.first_identity().ok_or_else(|| {
        PrError::NotFound(format!("person {} has no identity", person.person_id))
    })?;

    let discrepancies = query
        .iter()
        .filter_map(|(name, value)| {
            let error_code = match reference.biographic_data.get(name) {
                None => MatchErrorCode::Missing,
                Some(stored) if stored != value => MatchErrorCode::Mismatch,
                Some(_) => return None,
            };
            Some(Discrepancy {
                attribute_name: name.clone(),
                error_code,
            })
        })
        .collect();

    Ok(discrepancies)
}
