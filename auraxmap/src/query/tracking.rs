//! Tracked-entity filtering strategies.
//!
//! The backend history knows two ways of curating the "tracked" subsets
//! of continents and servers: an operator-maintained name allow-list,
//! and a tracking flag carried by the backend rows themselves. Neither
//! is authoritative, so both are supported and the operator picks one
//! per entity kind in the configuration.

use std::collections::BTreeSet;

/// Strategy for restricting the tracked continent/server endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrackingFilter {
    /// Keep entities whose backend row carries the tracking flag.
    #[default]
    SourceFlag,
    /// Keep entities whose name appears in the operator's allow-list.
    AllowList(BTreeSet<String>),
}

impl TrackingFilter {
    /// Build an allow-list filter from names.
    pub fn allow_list<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TrackingFilter::AllowList(names.into_iter().map(Into::into).collect())
    }

    /// Whether an entity passes the filter.
    ///
    /// `source_flagged` is the backend's tracking flag for the entity;
    /// it is ignored by the allow-list strategy.
    pub fn keeps(&self, name: &str, source_flagged: bool) -> bool {
        match self {
            TrackingFilter::SourceFlag => source_flagged,
            TrackingFilter::AllowList(names) => names.contains(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_flag_follows_backend() {
        let filter = TrackingFilter::SourceFlag;
        assert!(filter.keeps("Cobalt", true));
        assert!(!filter.keeps("Cobalt", false));
    }

    #[test]
    fn test_allow_list_ignores_backend_flag() {
        let filter = TrackingFilter::allow_list(["Cobalt", "Miller"]);
        assert!(filter.keeps("Cobalt", false));
        assert!(filter.keeps("Miller", true));
        assert!(!filter.keeps("Emerald", true));
    }

    #[test]
    fn test_default_is_source_flag() {
        assert_eq!(TrackingFilter::default(), TrackingFilter::SourceFlag);
    }
}
