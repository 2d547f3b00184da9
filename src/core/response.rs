use std::collections::{HashMap, HashSet};
use serde_json::Value;
use tracing::{debug, warn};
use crate::models::{RankedRecommendation, ScholarshipRecord, ScoredCandidate};

pub const ID_FIELD: &str = "product_id";
pub const REASON_FIELD: &str = "reason";

/// First bracket-delimited span in free text
///
/// The generator may wrap its JSON in prose. Scanning left to right, the first
/// `[` (or `{`) that has a matching closer somewhere after it opens the span,
/// which then runs to the last such closer.
pub fn extract_json_span(text: &str) -> Option<&str> {
    for (start, ch) in text.char_indices() {
        let closer = match ch {
            '[' => ']',
            '{' => '}',
            _ => continue,
        };
        if let Some(end) = text.rfind(closer) {
            if end > start {
                return Some(&text[start..=end]);
            }
        }
    }
    None
}

/// Parse a raw generator response into its list of items
///
/// `None` when no JSON span exists, it fails to parse, or it is not an array.
pub fn parse_items(raw: &str) -> Option<Vec<Value>> {
    let span = extract_json_span(raw)?;

    match serde_json::from_str::<Value>(span) {
        Ok(Value::Array(items)) => Some(items),
        Ok(_) => {
            warn!("Generator returned JSON that is not an array");
            None
        }
        Err(e) => {
            let preview: String = raw.chars().take(200).collect();
            warn!("Failed to parse generator JSON: {} - response: '{}...'", e, preview);
            None
        }
    }
}

/// Keep items whose identifier was offered in the sample
///
/// An item is accepted when it is an object with a non-empty string
/// `product_id` that exactly equals a sampled id. A missing or blank `reason`
/// is replaced by `missing_reason`. Repeated ids keep their first occurrence.
/// Order is preserved.
pub fn validate_items(
    items: Vec<Value>,
    sample: &[ScoredCandidate],
    missing_reason: &str,
) -> Vec<RankedRecommendation> {
    let offered: HashMap<&str, &ScholarshipRecord> = sample
        .iter()
        .map(|c| (c.record.product_id.as_str(), &c.record))
        .collect();
    let mut accepted_ids = HashSet::new();

    let mut accepted = Vec::new();
    for item in items {
        let Some(object) = item.as_object() else {
            debug!("Rejected non-object item: {}", item);
            continue;
        };

        let product_id = match object.get(ID_FIELD).and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id,
            _ => {
                debug!("Rejected item without {}: {}", ID_FIELD, item);
                continue;
            }
        };

        let Some(record) = offered.get(product_id) else {
            debug!("Rejected unknown {} '{}'", ID_FIELD, product_id);
            continue;
        };

        let reason = match object.get(REASON_FIELD).and_then(Value::as_str) {
            Some(reason) if !reason.trim().is_empty() => reason,
            _ => {
                debug!("No {} for '{}', using the generic one", REASON_FIELD, product_id);
                missing_reason
            }
        };

        if !accepted_ids.insert(product_id.to_string()) {
            debug!("Dropped repeated {} '{}'", ID_FIELD, product_id);
            continue;
        }

        debug!("Accepted '{}'", product_id);
        accepted.push(RankedRecommendation {
            product_id: product_id.to_string(),
            reason: reason.trim().to_string(),
            scholarship: (*record).clone(),
        });
    }

    accepted
}
