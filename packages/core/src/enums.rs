//! Closed-set enumerations decoded from raw wire strings.
//!
//! Decoding is tolerant: a raw string that matches no known case is treated
//! as absent, and is dropped from lists. This keeps older clients working
//! when the API adds new values.

use std::fmt::Debug;
use std::hash::Hash;

use tracing::debug;

/// An enumeration with a fixed table of wire strings.
///
/// Implementors provide [`WireEnum::CASES`]; the lookups are derived from it.
///
/// ```rust,ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Color { Red, Blue }
///
/// impl WireEnum for Color {
///     const CASES: &'static [(&'static str, Self)] = &[("red", Color::Red), ("blue", Color::Blue)];
/// }
///
/// assert_eq!(Color::coerce("red"), Some(Color::Red));
/// assert_eq!(Color::coerce("green"), None);
/// ```
pub trait WireEnum: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Wire string to case, one entry per case.
    const CASES: &'static [(&'static str, Self)];

    /// The case for `raw`, or `None` if it is not a known value.
    fn coerce(raw: &str) -> Option<Self> {
        Self::CASES
            .iter()
            .find(|(wire, _)| *wire == raw)
            .map(|(_, case)| *case)
    }

    /// Coerce every item, silently dropping unknown values. Order of the
    /// surviving items is preserved.
    fn coerce_all<I, S>(raws: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raws.into_iter()
            .filter_map(|raw| {
                let raw = raw.as_ref();
                let case = Self::coerce(raw);
                if case.is_none() {
                    debug!("dropping unrecognised enum value {raw:?}");
                }
                case
            })
            .collect()
    }

    /// The wire string for this case.
    fn as_wire(self) -> &'static str {
        Self::CASES
            .iter()
            .find(|(_, case)| *case == self)
            .map(|(wire, _)| *wire)
            .unwrap_or_default()
    }
}

/// Connection key type for models that expose no connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoConnections {}

impl WireEnum for NoConnections {
    const CASES: &'static [(&'static str, Self)] = &[];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Preference {
        CollectionChange,
        PrivacyChange,
        ReviewPage,
        VideoDetail,
    }

    impl WireEnum for Preference {
        const CASES: &'static [(&'static str, Self)] = &[
            ("COLLECTION_CHANGE", Preference::CollectionChange),
            ("PRIVACY_CHANGE", Preference::PrivacyChange),
            ("REVIEW_PAGE", Preference::ReviewPage),
            ("VIDEO_DETAIL", Preference::VideoDetail),
        ];
    }

    #[test]
    fn coerce_known_and_unknown() {
        assert_eq!(Preference::coerce("REVIEW_PAGE"), Some(Preference::ReviewPage));
        assert_eq!(Preference::coerce("review_page"), None);
        assert_eq!(Preference::coerce(""), None);
    }

    #[test]
    fn coerce_all_drops_unknown_and_keeps_order() {
        let raw = ["COLLECTION_CHANGE", "BOGUS", "PRIVACY_CHANGE"];
        assert_eq!(
            Preference::coerce_all(raw),
            vec![Preference::CollectionChange, Preference::PrivacyChange]
        );
    }

    #[test]
    fn coerce_all_of_nothing_known_is_empty() {
        let raw = vec!["NOPE".to_string(), "ALSO_NOPE".to_string()];
        assert!(Preference::coerce_all(&raw).is_empty());
    }

    #[test]
    fn as_wire_roundtrips_cases() {
        for (wire, case) in Preference::CASES {
            assert_eq!(case.as_wire(), *wire);
        }
    }

    #[test]
    fn no_connections_has_no_cases() {
        assert_eq!(NoConnections::coerce("videos"), None);
    }
}
