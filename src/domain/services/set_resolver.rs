//! Active set resolution
//!
//! Picks the configuration set that governs a legal entity on a date, from
//! descriptors alone.

use std::cmp::{Ordering, Reverse};

use chrono::NaiveDate;

use crate::domain::entities::SetDescriptor;
use crate::domain::value_objects::Dimension;

/// Preference: exact legal entity over wildcard, then highest version, then
/// lexically smallest `config_id`.
pub fn resolve_active<'d>(
    descriptors: &'d [SetDescriptor],
    legal_entity: &str,
    as_of: NaiveDate,
    allow_drafts: bool,
) -> Option<&'d SetDescriptor> {
    let mut eligible: Vec<&SetDescriptor> = descriptors
        .iter()
        .filter(|d| d.status.is_selectable(allow_drafts))
        .filter(|d| d.legal_entity.admits(Some(legal_entity)))
        .filter(|d| d.window.contains(as_of))
        .collect();

    eligible.sort_by(|a, b| rank(a).cmp(&rank(b)).then_with(|| a.config_id.cmp(&b.config_id)));

    let chosen = *eligible.first()?;
    let tied: Vec<&str> = eligible
        .iter()
        .take_while(|d| rank(d).cmp(&rank(chosen)) == Ordering::Equal)
        .map(|d| d.config_id.as_str())
        .collect();
    if tied.len() > 1 {
        tracing::warn!(
            legal_entity,
            %as_of,
            tied = ?tied,
            chosen = chosen.config_id.as_str(),
            "several configuration sets qualify equally; choosing lexically first"
        );
    }

    tracing::debug!(
        legal_entity,
        %as_of,
        config_id = chosen.config_id.as_str(),
        version = chosen.version,
        candidates = eligible.len(),
        "resolved active configuration set"
    );
    Some(chosen)
}

fn rank(d: &SetDescriptor) -> (bool, Reverse<u32>) {
    (matches!(d.legal_entity, Dimension::Any), Reverse(d.version))
}
