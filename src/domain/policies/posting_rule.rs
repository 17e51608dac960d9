//! Posting Rule
//!
//! The one interface for anything the selector can dispatch to.

use chrono::NaiveDate;

use crate::domain::entities::CompiledPolicy;
use crate::domain::value_objects::{AttributeSource, EffectiveWindow, Scope, ScopeQuery};

pub trait PostingRule {
    fn name(&self) -> &str;

    fn event_type(&self) -> &str;

    fn precedence(&self) -> u32;

    fn scope(&self) -> &Scope;

    fn window(&self) -> &EffectiveWindow;

    /// True when every guard holds for the given attributes.
    fn guards_pass(&self, attributes: &dyn AttributeSource) -> bool;

    /// Structural applicability: scope compatible and date inside the window.
    fn applies_to(&self, as_of: NaiveDate, query: &ScopeQuery) -> bool {
        self.scope().admits(query) && self.window().contains(as_of)
    }
}

impl PostingRule for CompiledPolicy {
    fn name(&self) -> &str {
        CompiledPolicy::name(self)
    }

    fn event_type(&self) -> &str {
        CompiledPolicy::event_type(self)
    }

    fn precedence(&self) -> u32 {
        CompiledPolicy::precedence(self)
    }

    fn scope(&self) -> &Scope {
        CompiledPolicy::scope(self)
    }

    fn window(&self) -> &EffectiveWindow {
        CompiledPolicy::window(self)
    }

    fn guards_pass(&self, attributes: &dyn AttributeSource) -> bool {
        self.guards().iter().all(|g| g.evaluate(attributes))
    }
}
