//! Property tests for username canonicalization.

use proptest::prelude::*;

use ldapsync::domain::value_objects::Username;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: canonicalizing a canonical name changes nothing.
    #[test]
    fn property_canonicalize_is_idempotent(raw in "[A-Za-z_ ]{0,24}") {
        if let Some(once) = Username::canonicalize(&raw) {
            let twice = Username::canonicalize(once.as_str()).unwrap();
            prop_assert_eq!(once, twice);
        }
    }

    /// PROPERTY: spelling variants of one name collapse to one key.
    #[test]
    fn property_spelling_variants_match(
        first in "[a-z]{1,8}",
        last in "[a-z]{1,8}",
    ) {
        let plain = Username::canonicalize(&format!("{first} {last}")).unwrap();
        let shouting = Username::canonicalize(&format!("  {}_{}  ", first.to_uppercase(), last)).unwrap();
        let spaced = Username::canonicalize(&format!("{first}   {last}")).unwrap();
        prop_assert_eq!(&plain, &shouting);
        prop_assert_eq!(&plain, &spaced);
    }

    /// PROPERTY: canonicalize never panics and never yields blank names.
    #[test]
    fn property_canonicalize_never_blank(raw in ".{0,64}") {
        if let Some(name) = Username::canonicalize(&raw) {
            prop_assert!(!name.as_str().is_empty());
            prop_assert_eq!(name.as_str().trim(), name.as_str());
        }
    }
}
