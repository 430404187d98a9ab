use super::ServiceError;

pub const DEFAULT_TOP_LIMIT: usize = 10;
pub const MAX_TOP_LIMIT: usize = 100;

const MAX_SUBJECT_LEN: usize = 128;

/// Identifies one dish: a restaurant and the dish's position on its menu.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DishKey {
    pub subject: String,
    pub sub_index: u32,
}

impl DishKey {
    pub fn new(subject: impl Into<String>, sub_index: u32) -> Result<Self, ServiceError> {
        let subject = subject.into();
        if subject.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "restaurant id must not be empty".to_string(),
            ));
        }
        if subject.len() > MAX_SUBJECT_LEN {
            return Err(ServiceError::InvalidInput(format!(
                "restaurant id must be at most {MAX_SUBJECT_LEN} bytes"
            )));
        }
        Ok(Self { subject, sub_index })
    }

    /// Parse the two path tokens of `/{subject}/{subIndex}`.
    pub fn parse(subject: &str, sub_index: &str) -> Result<Self, ServiceError> {
        let sub_index = sub_index.trim().parse::<u32>().map_err(|_| {
            ServiceError::InvalidInput(format!(
                "invalid dish index '{sub_index}': expected a non-negative integer"
            ))
        })?;
        Self::new(subject, sub_index)
    }
}

/// Coerce the optional `limit` path token of the top-N route. Anything that
/// is not a positive integer falls back to the default.
pub fn parse_top_limit(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .map(|n| (n as u64).min(MAX_TOP_LIMIT as u64) as usize)
        .unwrap_or(DEFAULT_TOP_LIMIT)
}

/// Photo ids that do not parse cannot exist.
pub fn parse_photo_id(raw: &str) -> Result<u64, ServiceError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ServiceError::PhotoNotFound)
}
