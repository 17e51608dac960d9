//! Scope value objects
//!
//! A policy scope has three independent dimensions (legal entity,
//! jurisdiction, regulatory regime). Each dimension is either a concrete
//! value or the `*` wildcard.

use std::fmt;

/// Wildcard marker used in configuration files.
pub const WILDCARD: &str = "*";

/// One scope dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Dimension {
    #[default]
    Any,
    Exact(String),
}

impl Dimension {
    /// Parse a raw configuration value. Absent, empty and `*` are all wildcards.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some(WILDCARD) => Dimension::Any,
            Some(value) => Dimension::Exact(value.to_string()),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Dimension::Any)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Dimension::Any => WILDCARD,
            Dimension::Exact(value) => value,
        }
    }

    /// Two dimensions overlap when either is a wildcard or both are equal.
    pub fn overlaps(&self, other: &Dimension) -> bool {
        match (self, other) {
            (Dimension::Any, _) | (_, Dimension::Any) => true,
            (Dimension::Exact(a), Dimension::Exact(b)) => a == b,
        }
    }

    /// Whether a request value is admitted.
    ///
    /// An unspecified request value is only admitted by a wildcard.
    pub fn admits(&self, requested: Option<&str>) -> bool {
        match self {
            Dimension::Any => true,
            Dimension::Exact(value) => requested == Some(value.as_str()),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scope of a policy or configuration set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Scope {
    pub legal_entity: Dimension,
    pub jurisdiction: Dimension,
    pub regulatory_regime: Dimension,
}

impl Scope {
    /// Scope matching everything.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn new(legal_entity: Dimension, jurisdiction: Dimension, regime: Dimension) -> Self {
        Self {
            legal_entity,
            jurisdiction,
            regulatory_regime: regime,
        }
    }

    pub fn from_raw(
        legal_entity: Option<&str>,
        jurisdiction: Option<&str>,
        regime: Option<&str>,
    ) -> Self {
        Self::new(
            Dimension::parse(legal_entity),
            Dimension::parse(jurisdiction),
            Dimension::parse(regime),
        )
    }

    pub fn with_legal_entity(mut self, value: impl Into<String>) -> Self {
        self.legal_entity = Dimension::Exact(value.into());
        self
    }

    pub fn with_jurisdiction(mut self, value: impl Into<String>) -> Self {
        self.jurisdiction = Dimension::Exact(value.into());
        self
    }

    pub fn with_regime(mut self, value: impl Into<String>) -> Self {
        self.regulatory_regime = Dimension::Exact(value.into());
        self
    }

    /// Dimensions in tie-break order, paired with their configuration key.
    pub fn dimensions(&self) -> [(&'static str, &Dimension); 3] {
        [
            ("legal_entity", &self.legal_entity),
            ("jurisdiction", &self.jurisdiction),
            ("regulatory_regime", &self.regulatory_regime),
        ]
    }

    pub fn wildcard_count(&self) -> usize {
        self.dimensions()
            .iter()
            .filter(|(_, d)| d.is_wildcard())
            .count()
    }

    /// Number of concrete dimensions; higher is more specific.
    pub fn specificity(&self) -> usize {
        3 - self.wildcard_count()
    }

    /// True when some request could be admitted by both scopes.
    pub fn overlaps(&self, other: &Scope) -> bool {
        self.legal_entity.overlaps(&other.legal_entity)
            && self.jurisdiction.overlaps(&other.jurisdiction)
            && self.regulatory_regime.overlaps(&other.regulatory_regime)
    }

    pub fn admits(&self, query: &ScopeQuery) -> bool {
        self.legal_entity.admits(Some(&query.legal_entity))
            && self.jurisdiction.admits(query.jurisdiction.as_deref())
            && self.regulatory_regime.admits(query.regulatory_regime.as_deref())
    }

    /// Dimensions on which `self` contradicts or widens `outer`.
    ///
    /// A wildcard inherits the outer value, so only a differing concrete
    /// value is a conflict.
    pub fn conflicts_with(&self, outer: &Scope) -> Vec<&'static str> {
        self.dimensions()
            .iter()
            .zip(outer.dimensions().iter())
            .filter_map(|((key, inner), (_, outer))| match (inner, outer) {
                (Dimension::Exact(a), Dimension::Exact(b)) if a != b => Some(*key),
                _ => None,
            })
            .collect()
    }

    /// Effective scope inside `outer`: each wildcard dimension takes the
    /// outer value.
    pub fn narrowed_by(&self, outer: &Scope) -> Scope {
        let pick = |inner: &Dimension, outer: &Dimension| match inner {
            Dimension::Any => outer.clone(),
            exact => exact.clone(),
        };
        Scope::new(
            pick(&self.legal_entity, &outer.legal_entity),
            pick(&self.jurisdiction, &outer.jurisdiction),
            pick(&self.regulatory_regime, &outer.regulatory_regime),
        )
    }

    /// Per-dimension specificity flags, used for index ordering.
    pub(crate) fn concrete_flags(&self) -> [bool; 3] {
        [
            !self.legal_entity.is_wildcard(),
            !self.jurisdiction.is_wildcard(),
            !self.regulatory_regime.is_wildcard(),
        ]
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.legal_entity, self.jurisdiction, self.regulatory_regime
        )
    }
}

/// Scope of an incoming request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeQuery {
    pub legal_entity: String,
    pub jurisdiction: Option<String>,
    pub regulatory_regime: Option<String>,
}

impl ScopeQuery {
    pub fn entity(legal_entity: impl Into<String>) -> Self {
        Self {
            legal_entity: legal_entity.into(),
            jurisdiction: None,
            regulatory_regime: None,
        }
    }

    pub fn with_jurisdiction(mut self, value: impl Into<String>) -> Self {
        self.jurisdiction = Some(value.into());
        self
    }

    pub fn with_regime(mut self, value: impl Into<String>) -> Self {
        self.regulatory_regime = Some(value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_treats_missing_and_star_as_wildcard() {
        assert_eq!(Dimension::parse(None), Dimension::Any);
        assert_eq!(Dimension::parse(Some("*")), Dimension::Any);
        assert_eq!(Dimension::parse(Some(" ")), Dimension::Any);
        assert_eq!(
            Dimension::parse(Some("ACME")),
            Dimension::Exact("ACME".to_string())
        );
    }

    #[test]
    fn overlap_with_wildcard() {
        let any = Scope::any();
        let acme = Scope::any().with_legal_entity("ACME");
        let other = Scope::any().with_legal_entity("GLOBEX");

        assert!(any.overlaps(&acme));
        assert!(acme.overlaps(&any));
        assert!(!acme.overlaps(&other));
    }

    #[test]
    fn specificity_counts_concrete_dimensions() {
        assert_eq!(Scope::any().specificity(), 0);
        assert_eq!(
            Scope::any()
                .with_legal_entity("ACME")
                .with_jurisdiction("US")
                .specificity(),
            2
        );
    }

    #[test]
    fn unspecified_request_dimension_only_admits_wildcard() {
        let query = ScopeQuery::entity("ACME");
        assert!(Scope::any().admits(&query));
        assert!(Scope::any().with_legal_entity("ACME").admits(&query));
        assert!(!Scope::any().with_jurisdiction("US").admits(&query));
        assert!(Scope::any()
            .with_jurisdiction("US")
            .admits(&query.clone().with_jurisdiction("US")));
    }

    #[test]
    fn conflicts_only_on_differing_concrete_values() {
        let outer = Scope::any().with_jurisdiction("US");
        assert!(Scope::any().conflicts_with(&outer).is_empty());
        assert!(Scope::any()
            .with_jurisdiction("US")
            .with_legal_entity("ACME")
            .conflicts_with(&outer)
            .is_empty());
        assert_eq!(
            Scope::any().with_jurisdiction("UK").conflicts_with(&outer),
            vec!["jurisdiction"]
        );
    }

    #[test]
    fn wildcards_take_the_outer_value_when_narrowed() {
        let outer = Scope::any().with_legal_entity("ACME").with_jurisdiction("US");
        let narrowed = Scope::any().with_regime("GAAP").narrowed_by(&outer);
        assert_eq!(narrowed.to_string(), "ACME/US/GAAP");
        assert_eq!(Scope::any().narrowed_by(&Scope::any()), Scope::any());
    }

    #[test]
    fn display_uses_slash_separated_dimensions() {
        let scope = Scope::any().with_legal_entity("ACME");
        assert_eq!(scope.to_string(), "ACME/*/*");
    }
}
