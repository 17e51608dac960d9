//! Policy selector
//!
//! Runtime dispatch over a compiled pack. A miss is an ordinary result
//! ([`Dispatch::NoMatch`]), not an error.

use chrono::NaiveDate;

use crate::domain::entities::{CompiledPolicy, CompiledPolicyPack, PostingEvent};
use crate::domain::policies::PostingRule;
use crate::domain::value_objects::{AttributeSource, ScopeQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch<'p> {
    Matched(&'p CompiledPolicy),
    NoMatch,
}

impl<'p> Dispatch<'p> {
    pub fn policy(&self) -> Option<&'p CompiledPolicy> {
        match self {
            Dispatch::Matched(policy) => Some(policy),
            Dispatch::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Dispatch::Matched(_))
    }
}

pub struct PolicySelector<'p> {
    pack: &'p CompiledPolicyPack,
}

impl<'p> PolicySelector<'p> {
    pub fn new(pack: &'p CompiledPolicyPack) -> Self {
        Self { pack }
    }

    /// Structural dispatch: event type, date and scope. Guards are not
    /// consulted.
    pub fn select(&self, event_type: &str, as_of: NaiveDate, scope: &ScopeQuery) -> Dispatch<'p> {
        self.pick(event_type, as_of, scope, None)
    }

    /// Dispatch for a concrete event; candidates whose guards fail are
    /// skipped.
    pub fn select_event(&self, event: &PostingEvent) -> Dispatch<'p> {
        self.pick(
            &event.event_type,
            event.effective_date,
            &event.scope,
            Some(event as &dyn AttributeSource),
        )
    }

    fn pick(
        &self,
        event_type: &str,
        as_of: NaiveDate,
        scope: &ScopeQuery,
        attributes: Option<&dyn AttributeSource>,
    ) -> Dispatch<'p> {
        let mut eligible: Vec<&'p CompiledPolicy> = self
            .pack
            .candidates(event_type)
            .filter(|p| p.applies_to(as_of, scope))
            .filter(|p| attributes.map_or(true, |a| p.guards_pass(a)))
            .collect();

        let Some(best) = eligible
            .iter()
            .map(|p| (p.precedence(), p.specificity()))
            .max()
        else {
            tracing::debug!(event_type, %as_of, "no applicable policy");
            return Dispatch::NoMatch;
        };

        eligible.retain(|p| (p.precedence(), p.specificity()) == best);
        eligible.sort_by(|a, b| a.name().cmp(b.name()));

        if eligible.len() > 1 {
            let names: Vec<&str> = eligible.iter().map(|p| p.name()).collect();
            tracing::warn!(
                config_id = self.pack.config_id(),
                event_type,
                %as_of,
                tied = ?names,
                chosen = names[0],
                "dispatch tie survived validation; choosing lexically first policy"
            );
        }

        eligible
            .first()
            .map_or(Dispatch::NoMatch, |p| Dispatch::Matched(*p))
    }
}
