use crate::config::ResolvedConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{Country, OverrideRule, RawEntry};
use std::cmp::Ordering;
use tracing::{debug, info};

/// Converts source entries into an ordered list of countries.
///
/// Each entry must carry both the configured name and code children. Override
/// rules are applied in list order: the rule at 1-based position `i` gives the
/// country with a case-insensitively equal code `sort_order = i` and replaces its
/// name with the rule's display name. Rules for codes not in the list are skipped.
///
/// The result is ordered by [`compare_countries`].
///
/// # Returns
///
/// `None` when `entries` is absent or empty, otherwise the ordered countries.
///
/// # Errors
///
/// Returns `MalformedEntry` for the first entry missing a required child element.
pub fn convert(
    entries: Option<&[RawEntry]>,
    rules: &[OverrideRule],
    config: &ResolvedConfig,
) -> AppResult<Option<Vec<Country>>> {
    let entries = match entries {
        Some(entries) if !entries.is_empty() => entries,
        _ => return Ok(None),
    };

    let mut countries = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let name = required_child(entry, index, &config.country_name_element)?;
            let code = required_child(entry, index, &config.country_code_element)?;
            Ok(Country::new(name, code))
        })
        .collect::<AppResult<Vec<_>>>()?;

    apply_overrides(&mut countries, rules);
    countries.sort_by(compare_countries);

    info!(
        countries = countries.len(),
        overrides = rules.len(),
        "Countries converted"
    );
    Ok(Some(countries))
}

fn required_child<'a>(entry: &'a RawEntry, index: usize, element: &str) -> AppResult<&'a str> {
    entry
        .child_value(element)
        .ok_or_else(|| AppError::MalformedEntry {
            index,
            element: element.to_string(),
        })
}

fn apply_overrides(countries: &mut [Country], rules: &[OverrideRule]) {
    for (position, rule) in rules.iter().enumerate() {
        let Some(country) = countries.iter_mut().find(|c| c.has_code(&rule.code)) else {
            debug!(code = %rule.code, "No country for override rule, skipping");
            continue;
        };
        country.sort_order = Some(position + 1);
        country.name = rule.display_name.clone();
        debug!(
            code = %country.code,
            sort_order = position + 1,
            name = %country.name,
            "Override applied"
        );
    }
}

/// Total order used for the exported list.
///
/// Countries with a sort order come first, ascending by sort order. Ties, and all
/// countries without a sort order, are ordered by name using ordinal (code point)
/// comparison.
pub fn compare_countries(a: &Country, b: &Country) -> Ordering {
    a.sort_order
        .is_none()
        .cmp(&b.sort_order.is_none())
        .then(a.sort_order.cmp(&b.sort_order))
        .then_with(|| a.name.cmp(&b.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ResolvedConfig {
        ResolvedConfig::default()
    }

    fn entry(name: &str, code: &str) -> RawEntry {
        RawEntry::from_children([
            ("ISO_3166-1_Country_name", name),
            ("ISO_3166-1_Alpha-2_Code_element", code),
        ])
    }

    fn sample_entries() -> Vec<RawEntry> {
        vec![
            entry("UNITED STATES", "US"),
            entry("Germany", "DE"),
            entry("CANADA", "CA"),
            entry("France", "FR"),
            entry("Australia", "AU"),
        ]
    }

    fn names(countries: &[Country]) -> Vec<&str> {
        countries.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_convert_none_or_empty_returns_none() {
        assert_eq!(convert(None, &[], &config()).unwrap(), None);
        assert_eq!(convert(Some(&[]), &[], &config()).unwrap(), None);
    }

    #[test]
    fn test_convert_without_rules_sorts_by_name() {
        let entries = sample_entries();
        let countries = convert(Some(&entries), &[], &config()).unwrap().unwrap();

        assert_eq!(countries.len(), entries.len());
        assert_eq!(
            names(&countries),
            vec!["Australia", "CANADA", "France", "Germany", "UNITED STATES"]
        );
        assert!(countries.iter().all(|c| c.sort_order.is_none()));
    }

    #[test]
    fn test_convert_name_collation_is_ordinal() {
        // Uppercase sorts before lowercase and accented letters after ASCII.
        let entries = vec![
            entry("aruba", "AW"),
            entry("Zambia", "ZM"),
            entry("Åland Islands", "AX"),
            entry("Albania", "AL"),
        ];
        let countries = convert(Some(&entries), &[], &config()).unwrap().unwrap();
        assert_eq!(
            names(&countries),
            vec!["Albania", "Zambia", "aruba", "Åland Islands"]
        );
    }

    #[test]
    fn test_convert_overrides_move_countries_first() {
        let entries = sample_entries();
        let rules = vec![
            OverrideRule::new("US", "United States"),
            OverrideRule::new("CA", "Canada"),
        ];
        let countries = convert(Some(&entries), &rules, &config()).unwrap().unwrap();

        assert_eq!(
            names(&countries),
            vec!["United States", "Canada", "Australia", "France", "Germany"]
        );
        assert_eq!(countries[0].code, "US");
        assert_eq!(countries[0].sort_order, Some(1));
        assert_eq!(countries[1].code, "CA");
        assert_eq!(countries[1].sort_order, Some(2));
        assert_eq!(countries[2].sort_order, None);
    }

    #[test]
    fn test_convert_override_code_is_case_insensitive() {
        let entries = vec![entry("Germany", "de"), entry("Austria", "AT")];
        let rules = vec![OverrideRule::new("DE", "Deutschland")];
        let countries = convert(Some(&entries), &rules, &config()).unwrap().unwrap();

        assert_eq!(countries[0].name, "Deutschland");
        assert_eq!(countries[0].code, "de");
        assert_eq!(countries[1].name, "Austria");
    }

    #[test]
    fn test_convert_unknown_override_code_is_skipped() {
        let entries = sample_entries();
        let without = convert(Some(&entries), &[], &config()).unwrap();
        let with = convert(
            Some(&entries),
            &[OverrideRule::new("ZZ", "Nowhere")],
            &config(),
        )
        .unwrap();
        assert_eq!(without, with);
    }

    #[test]
    fn test_convert_position_counts_skipped_rules() {
        let entries = sample_entries();
        let rules = vec![
            OverrideRule::new("ZZ", "Nowhere"),
            OverrideRule::new("FR", "France"),
        ];
        let countries = convert(Some(&entries), &rules, &config()).unwrap().unwrap();
        assert_eq!(countries[0].code, "FR");
        assert_eq!(countries[0].sort_order, Some(2));
    }

    #[test]
    fn test_convert_is_deterministic() {
        let entries = sample_entries();
        let rules = vec![OverrideRule::new("FR", "France")];
        let first = convert(Some(&entries), &rules, &config()).unwrap();
        let second = convert(Some(&entries), &rules, &config()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_convert_missing_code_is_malformed() {
        let entries = vec![
            entry("France", "FR"),
            RawEntry::from_children([("ISO_3166-1_Country_name", "Nowhere")]),
        ];
        let err = convert(Some(&entries), &[], &config()).unwrap_err();
        match err {
            AppError::MalformedEntry { index, element } => {
                assert_eq!(index, 1);
                assert_eq!(element, "ISO_3166-1_Alpha-2_Code_element");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_convert_missing_name_is_malformed() {
        let entries = vec![RawEntry::from_children([(
            "ISO_3166-1_Alpha-2_Code_element",
            "FR",
        )])];
        assert!(matches!(
            convert(Some(&entries), &[], &config()),
            Err(AppError::MalformedEntry { index: 0, .. })
        ));
    }

    #[test]
    fn test_compare_countries_prioritised_before_named() {
        let mut prioritised = Country::new("Zimbabwe", "ZW");
        prioritised.sort_order = Some(5);
        let plain = Country::new("Albania", "AL");
        assert_eq!(compare_countries(&prioritised, &plain), Ordering::Less);
        assert_eq!(compare_countries(&plain, &prioritised), Ordering::Greater);
    }
}
