//! Grouping and derivations over converted records
//!
//! Every derivation ignores records whose converted value is missing.

use bigdecimal::BigDecimal;
use std::collections::BTreeMap;

use crate::types::*;

/// Records carrying a converted value, paired with that value
fn convertible(records: &[ConvertedRecord]) -> impl Iterator<Item = (&CleanedRecord, &BigDecimal)> {
    records
        .iter()
        .filter_map(|r| r.converted_value.as_ref().map(|value| (&r.record, value)))
}

/// Sum converted values per `(company, year)`.
///
/// Rows come out ordered by company, then year.
pub fn annual_totals(records: &[ConvertedRecord], target_currency: &str) -> Vec<AnnualAggregate> {
    let mut totals: BTreeMap<(&str, i32), BigDecimal> = BTreeMap::new();
    for (record, value) in convertible(records) {
        *totals
            .entry((record.company.as_str(), record.year()))
            .or_insert_with(|| BigDecimal::from(0)) += value;
    }

    totals
        .into_iter()
        .map(|((company, year), total)| AnnualAggregate {
            company: company.to_string(),
            year,
            value: round_money(&total),
            currency: target_currency.to_string(),
        })
        .collect()
}

/// Company with the highest converted value for each `(year, month)`.
///
/// On an exact tie the record met first in `records` wins. Rows come out
/// ordered by year, then month.
pub fn monthly_highest(records: &[ConvertedRecord]) -> Vec<MonthlyHighest> {
    let mut leaders: BTreeMap<(i32, u32), (&CleanedRecord, &BigDecimal)> = BTreeMap::new();
    for (record, value) in convertible(records) {
        leaders
            .entry((record.year(), record.month()))
            .and_modify(|leader| {
                // strictly greater: earlier records keep ties
                if value > leader.1 {
                    *leader = (record, value);
                }
            })
            .or_insert((record, value));
    }

    leaders
        .into_iter()
        .map(|((year, month), (record, _))| MonthlyHighest {
            year,
            month,
            company: record.company.clone(),
        })
        .collect()
}

/// Rounded sum of converted values for one company, `0.00` if it has none
pub fn company_total(records: &[ConvertedRecord], company: &str) -> BigDecimal {
    let total: BigDecimal = convertible(records)
        .filter(|(record, _)| record.company == company)
        .map(|(_, value)| value)
        .sum();
    round_money(&total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn converted(company: &str, date: (i32, u32, u32), value: Option<&str>) -> ConvertedRecord {
        ConvertedRecord {
            record: CleanedRecord {
                company: company.to_string(),
                date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
                value: dec("1"),
                currency: "SEK".to_string(),
            },
            converted_value: value.map(dec),
        }
    }

    #[test]
    fn test_annual_totals_group_by_company_and_year() {
        let records = vec![
            converted("B", (2024, 3, 1), Some("10.10")),
            converted("A", (2024, 1, 1), Some("50.00")),
            converted("A", (2023, 12, 1), Some("1.00")),
            converted("A", (2024, 1, 2), Some("3.00")),
            converted("A", (2024, 5, 1), None),
        ];

        let totals = annual_totals(&records, "SEK");

        assert_eq!(
            totals,
            vec![
                AnnualAggregate {
                    company: "A".to_string(),
                    year: 2023,
                    value: dec("1.00"),
                    currency: "SEK".to_string(),
                },
                AnnualAggregate {
                    company: "A".to_string(),
                    year: 2024,
                    value: dec("53.00"),
                    currency: "SEK".to_string(),
                },
                AnnualAggregate {
                    company: "B".to_string(),
                    year: 2024,
                    value: dec("10.10"),
                    currency: "SEK".to_string(),
                },
            ]
        );
        assert_eq!(totals[1].value.to_string(), "53.00");
    }

    #[test]
    fn test_annual_totals_skip_groups_with_only_missing_values() {
        let records = vec![converted("A", (2024, 1, 1), None)];
        assert!(annual_totals(&records, "SEK").is_empty());
    }

    #[test]
    fn test_annual_totals_independent_of_input_order() {
        let mut records = vec![
            converted("A", (2024, 1, 1), Some("0.10")),
            converted("A", (2024, 2, 1), Some("0.20")),
            converted("B", (2024, 2, 1), Some("9.99")),
        ];
        let forward = annual_totals(&records, "SEK");
        records.reverse();
        assert_eq!(annual_totals(&records, "SEK"), forward);
        assert_eq!(forward[0].value, dec("0.30"));
    }

    #[test]
    fn test_monthly_highest_picks_maximum() {
        let records = vec![
            converted("A", (2024, 1, 1), Some("1000.00")),
            converted("B", (2024, 1, 1), Some("550.00")),
            converted("B", (2024, 2, 10), Some("20.00")),
            converted("C", (2024, 2, 11), Some("30.00")),
        ];

        assert_eq!(
            monthly_highest(&records),
            vec![
                MonthlyHighest {
                    year: 2024,
                    month: 1,
                    company: "A".to_string()
                },
                MonthlyHighest {
                    year: 2024,
                    month: 2,
                    company: "C".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_monthly_highest_tie_keeps_first_record() {
        let records = vec![
            converted("Zeta", (2024, 4, 1), Some("75.00")),
            converted("Alpha", (2024, 4, 20), Some("75.00")),
        ];
        let highest = monthly_highest(&records);
        assert_eq!(highest.len(), 1);
        assert_eq!(highest[0].company, "Zeta");

        let records = vec![
            converted("Alpha", (2024, 4, 20), Some("75.00")),
            converted("Zeta", (2024, 4, 1), Some("75.00")),
        ];
        assert_eq!(monthly_highest(&records)[0].company, "Alpha");
    }

    #[test]
    fn test_monthly_highest_ignores_missing_values() {
        let records = vec![
            converted("A", (2024, 1, 1), None),
            converted("B", (2024, 1, 5), Some("0.01")),
            converted("C", (2024, 2, 1), None),
        ];
        let highest = monthly_highest(&records);
        // February has no convertible record, so no row
        assert_eq!(highest.len(), 1);
        assert_eq!(highest[0].company, "B");
    }

    #[test]
    fn test_monthly_highest_separates_years() {
        let records = vec![
            converted("A", (2023, 1, 1), Some("5.00")),
            converted("B", (2024, 1, 1), Some("1.00")),
        ];
        let highest = monthly_highest(&records);
        assert_eq!(highest.len(), 2);
        assert_eq!((highest[0].year, highest[0].company.as_str()), (2023, "A"));
        assert_eq!((highest[1].year, highest[1].company.as_str()), (2024, "B"));
    }

    #[test]
    fn test_company_total() {
        let records = vec![
            converted("Nexara", (2022, 1, 1), Some("10.25")),
            converted("Nexara", (2024, 6, 1), Some("0.75")),
            converted("Nexara", (2024, 7, 1), None),
            converted("Other", (2024, 6, 1), Some("99.00")),
        ];
        assert_eq!(company_total(&records, "Nexara"), dec("11.00"));
    }

    #[test]
    fn test_company_total_absent_company_is_zero() {
        let records = vec![converted("A", (2024, 1, 1), Some("1.00"))];
        let total = company_total(&records, "Nobody");
        assert_eq!(total, BigDecimal::from(0));
        assert_eq!(crate::report::to_text(&total), "0.00");
    }

    #[test]
    fn test_annual_totals_sum_to_company_total() {
        let records = vec![
            converted("A", (2022, 3, 1), Some("12.34")),
            converted("A", (2023, 3, 1), Some("56.78")),
            converted("A", (2023, 4, 1), Some("0.01")),
            converted("B", (2023, 4, 1), Some("5.00")),
        ];
        let yearly: BigDecimal = annual_totals(&records, "SEK")
            .iter()
            .filter(|row| row.company == "A")
            .map(|row| &row.value)
            .sum();
        let difference = (yearly - company_total(&records, "A")).abs();
        assert!(difference <= dec("0.01"));
    }
}
