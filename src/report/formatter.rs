//! Reshaping of aggregation results into sink and artifact shapes

use bigdecimal::BigDecimal;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::types::*;

/// Body posted to the annual-data sink, one per aggregate row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualDataPayload {
    pub company: String,
    pub year: i32,
    /// Rounded to two decimals
    pub value: f64,
    pub currency: String,
}

/// One row of the monthly-highest table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyHighestRow {
    pub year: i32,
    pub month: u32,
    pub company: String,
}

pub fn to_post_payload(aggregate: &AnnualAggregate) -> AnnualDataPayload {
    AnnualDataPayload {
        company: aggregate.company.clone(),
        year: aggregate.year,
        value: round_money(&aggregate.value).to_f64().unwrap_or_default(),
        currency: aggregate.currency.clone(),
    }
}

pub fn to_post_payloads(aggregates: &[AnnualAggregate]) -> Vec<AnnualDataPayload> {
    aggregates.iter().map(to_post_payload).collect()
}

pub fn to_csv_rows(highest: &[MonthlyHighest]) -> Vec<MonthlyHighestRow> {
    highest
        .iter()
        .map(|h| MonthlyHighestRow {
            year: h.year,
            month: h.month,
            company: h.company.clone(),
        })
        .collect()
}

/// Write rows as CSV with a `year,month,company` header
pub fn write_csv<W: Write>(rows: &[MonthlyHighestRow], writer: W) -> PipelineResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        // serialize() only emits the header alongside the first record
        csv_writer.write_record(["year", "month", "company"])?;
    }
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Render rows to an in-memory CSV string
pub fn to_csv_string(rows: &[MonthlyHighestRow]) -> PipelineResult<String> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| PipelineError::Report(e.to_string()))
}

/// Text form of a total, always with two decimals
pub fn to_text(total: &BigDecimal) -> String {
    let rounded = round_money(total);
    // BigDecimal prints zero as "0" whatever its scale
    if rounded.is_zero() {
        return "0.00".to_string();
    }
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_post_payload_renames_value() {
        let aggregate = AnnualAggregate {
            company: "Nexara Technologies".to_string(),
            year: 2024,
            value: BigDecimal::from_str("1234.50").unwrap(),
            currency: "SEK".to_string(),
        };

        let payload = to_post_payload(&aggregate);
        assert_eq!(payload.value, 1234.5);
        assert_eq!(payload.year, 2024);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "company": "Nexara Technologies",
                "year": 2024,
                "value": 1234.5,
                "currency": "SEK"
            })
        );
    }

    #[test]
    fn test_csv_rows_with_header() {
        let highest = vec![
            MonthlyHighest {
                year: 2024,
                month: 1,
                company: "A".to_string(),
            },
            MonthlyHighest {
                year: 2024,
                month: 2,
                company: "Borealis, Inc".to_string(),
            },
        ];

        let csv = to_csv_string(&to_csv_rows(&highest)).unwrap();
        assert_eq!(csv, "year,month,company\n2024,1,A\n2024,2,\"Borealis, Inc\"\n");
    }

    #[test]
    fn test_empty_csv_still_has_header() {
        assert_eq!(to_csv_string(&[]).unwrap(), "year,month,company\n");
    }

    #[test]
    fn test_to_text() {
        assert_eq!(to_text(&BigDecimal::from(0)), "0.00");
        assert_eq!(to_text(&BigDecimal::from_str("0.00").unwrap()), "0.00");
        assert_eq!(to_text(&BigDecimal::from_str("0.001").unwrap()), "0.00");
        assert_eq!(to_text(&BigDecimal::from_str("-0.004").unwrap()), "0.00");
        assert_eq!(to_text(&BigDecimal::from_str("0.05").unwrap()), "0.05");
        assert_eq!(to_text(&BigDecimal::from_str("53").unwrap()), "53.00");
        assert_eq!(to_text(&BigDecimal::from_str("1999.999").unwrap()), "2000.00");
    }
}
