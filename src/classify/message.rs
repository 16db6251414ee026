//! Maps raw fault-message text to a failure category.

use crate::model::{CategorizedMessage, FailureCategory};

/// Keyword groups scanned against the uppercased message, in priority order.
/// First group with any hit wins, so a message containing both "DETECTED"
/// and "NODE" is still Jammed.
const KEYWORD_RULES: &[(&[&str], FailureCategory)] = &[
    (&["DETECTED", "RESTART"], FailureCategory::Jammed),
    (
        &["VOLTAGE", "CURRENT", "NODE", "MANUAL"],
        FailureCategory::MechanicalError,
    ),
    (
        &["FAULT", "ERROR", "BLOCKED", "WAITING"],
        FailureCategory::Full,
    ),
    (&["E-STOP"], FailureCategory::EStop),
];

/// Classifies a fault message into a [`CategorizedMessage`].
///
/// Total function: unmatched non-empty text is passed through verbatim as
/// [`CategorizedMessage::Freeform`], and an empty message maps to
/// [`FailureCategory::Other`]. The caller is expected to trim the message
/// first.
pub fn classify_message(raw: &str) -> CategorizedMessage {
    let upper = raw.to_uppercase();

    for (keywords, category) in KEYWORD_RULES {
        if keywords.iter().any(|k| upper.contains(k)) {
            return CategorizedMessage::Known(*category);
        }
    }

    if raw.is_empty() {
        CategorizedMessage::Known(FailureCategory::Other)
    } else {
        CategorizedMessage::Freeform(raw.to_string())
    }
}
