//! 複数公告の横並び比較
//!
//! 全公告の rate（小数5桁キー）を行キーとして外部結合する。
//! 同一公告内で同じ率の行が複数ある場合は、行順に ", " で連結する。

use crate::types::{AnnouncementResult, RateKey, UnifiedComparisonTable, UnifiedRow};
use std::collections::BTreeMap;

/// 同一公告・同一率のラベル区切り
pub const LABEL_SEPARATOR: &str = ", ";

/// 公告別テーブルを rate で外部結合する
///
/// 列順は `results` の順序に従う。
pub fn align(results: &[AnnouncementResult]) -> UnifiedComparisonTable {
    let columns = results.len();
    let mut by_rate: BTreeMap<RateKey, Vec<Option<String>>> = BTreeMap::new();

    for (col, result) in results.iter().enumerate() {
        for row in &result.rows {
            let cells = by_rate
                .entry(RateKey::from_rate(row.rate))
                .or_insert_with(|| vec![None; columns]);
            let cell = &mut cells[col];
            match cell {
                Some(existing) => {
                    existing.push_str(LABEL_SEPARATOR);
                    existing.push_str(&row.company_label);
                }
                None => *cell = Some(row.company_label.clone()),
            }
        }
    }

    UnifiedComparisonTable {
        announcement_ids: results.iter().map(|r| r.announcement_id.clone()).collect(),
        rows: by_rate
            .into_iter()
            .map(|(key, labels)| UnifiedRow {
                rate: key.rate(),
                labels,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RateRow, RateSource};

    fn result(id: &str, rows: &[(f64, &str, RateSource)]) -> AnnouncementResult {
        AnnouncementResult {
            announcement_id: id.to_string(),
            rows: rows
                .iter()
                .map(|(rate, label, source)| RateRow {
                    rate: *rate,
                    company_label: label.to_string(),
                    announcement_id: id.to_string(),
                    source: *source,
                })
                .collect(),
        }
    }

    #[test]
    fn test_shared_bidder_rate_single_row() {
        use RateSource::*;
        let a = result("A", &[(99.1, "1조합", Combination), (100.5, "甲", Bidder), (101.3, "2조합", Combination)]);
        let b = result("B", &[(98.7, "1조합", Combination), (100.5, "乙", Bidder), (102.2, "2조합", Combination)]);

        let table = align(&[a, b]);
        assert_eq!(table.announcement_ids, vec!["A", "B"]);
        assert_eq!(table.rows.len(), 5);

        let shared: Vec<&UnifiedRow> = table.rows.iter().filter(|r| r.rate == 100.5).collect();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].labels, vec![Some("甲".to_string()), Some("乙".to_string())]);

        for row in table.rows.iter().filter(|r| r.rate != 100.5) {
            assert_eq!(row.labels.iter().filter(|l| l.is_some()).count(), 1);
        }
    }

    #[test]
    fn test_rows_sorted_ascending() {
        use RateSource::*;
        let a = result("A", &[(101.0, "x", Bidder)]);
        let b = result("B", &[(95.0, "y", Bidder), (105.0, "z", Bidder)]);
        let table = align(&[a, b]);
        let rates: Vec<f64> = table.rows.iter().map(|r| r.rate).collect();
        assert_eq!(rates, vec![95.0, 101.0, 105.0]);
    }

    #[test]
    fn test_same_announcement_collision_concatenated() {
        use RateSource::*;
        let a = result("A", &[(100.0, "3조합", Combination), (100.0, "甲", Bidder)]);
        let table = align(&[a]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].labels, vec![Some("3조합, 甲".to_string())]);
    }

    #[test]
    fn test_column_order_follows_input() {
        use RateSource::*;
        let a = result("A", &[(100.0, "a", Bidder)]);
        let b = result("B", &[(100.0, "b", Bidder)]);
        let table = align(&[b, a]);
        assert_eq!(table.announcement_ids, vec!["B", "A"]);
        assert_eq!(table.rows[0].labels, vec![Some("b".to_string()), Some("a".to_string())]);
    }

    #[test]
    fn test_empty_input() {
        let table = align(&[]);
        assert!(table.rows.is_empty());
        assert!(table.announcement_ids.is_empty());
    }
}
