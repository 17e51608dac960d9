//! Posting event
//!
//! The business event handed to the selector by the posting pipeline.

use chrono::NaiveDate;

use crate::domain::value_objects::{
    format_date, AttrValue, AttributeSource, EventAttributes, ScopeQuery,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingEvent {
    pub event_type: String,
    pub effective_date: NaiveDate,
    pub scope: ScopeQuery,
    pub attributes: EventAttributes,
}

impl PostingEvent {
    pub fn new(event_type: impl Into<String>, effective_date: NaiveDate, scope: ScopeQuery) -> Self {
        Self {
            event_type: event_type.into(),
            effective_date,
            scope,
            attributes: EventAttributes::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    fn intrinsic(&self, name: &str) -> Option<AttrValue> {
        let value = match name {
            "event_type" => AttrValue::from(self.event_type.as_str()),
            "effective_date" => AttrValue::from(format_date(self.effective_date)),
            "legal_entity" => AttrValue::from(self.scope.legal_entity.as_str()),
            "jurisdiction" => AttrValue::from(self.scope.jurisdiction.clone()?),
            "regulatory_regime" => AttrValue::from(self.scope.regulatory_regime.clone()?),
            _ => return None,
        };
        Some(value)
    }
}

impl AttributeSource for PostingEvent {
    /// Explicit attributes win over the event's own envelope fields.
    fn attribute(&self, name: &str) -> Option<AttrValue> {
        self.attributes
            .attribute(name)
            .or_else(|| self.intrinsic(name))
    }
}
