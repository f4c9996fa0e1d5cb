//! 複数予価の4件組合せ
//!
//! 予価ごとの率から C(n,4) 通りの平均を求め、昇順に順位を振る。
//! 列挙順は元の添字の辞書順で固定し、同値の並びを再現可能にする。

use crate::error::{Error, Result};
use crate::types::CandidateRate;

/// 1組合せあたりの件数
pub const COMBINATION_SIZE: usize = 4;

/// 元の添字の辞書順で4件組合せを列挙する
fn combination_indices(n: usize) -> Vec<[usize; COMBINATION_SIZE]> {
    let mut out = Vec::new();
    for a in 0..n {
        for b in (a + 1)..n {
            for c in (b + 1)..n {
                for d in (c + 1)..n {
                    out.push([a, b, c, d]);
                }
            }
        }
    }
    out
}

/// 組合せ数 C(n,4)
pub fn combination_count(n: usize) -> usize {
    if n < COMBINATION_SIZE {
        return 0;
    }
    n * (n - 1) * (n - 2) * (n - 3) / 24
}

/// 候補率リストを生成
///
/// # Arguments
/// * `base_rates` - 予価ごとの率（取得順）
///
/// # Returns
/// * `Ok(Vec<CandidateRate>)` - rate昇順、combination_index は 1..=C(n,4)
/// * `Err(Error::InsufficientData)` - 4件未満
pub fn generate_candidates(base_rates: &[f64]) -> Result<Vec<CandidateRate>> {
    if base_rates.len() < COMBINATION_SIZE {
        return Err(Error::InsufficientData {
            required: COMBINATION_SIZE,
            found: base_rates.len(),
        });
    }

    let mut means: Vec<f64> = combination_indices(base_rates.len())
        .iter()
        .map(|idx| idx.iter().map(|&i| base_rates[i]).sum::<f64>() / COMBINATION_SIZE as f64)
        .collect();

    // sort_by は安定ソート
    means.sort_by(|a, b| a.total_cmp(b));

    Ok(means
        .into_iter()
        .enumerate()
        .map(|(i, rate)| CandidateRate {
            rate,
            combination_index: i + 1,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rates(n: usize) -> Vec<f64> {
        (0..n).map(|i| 98.0 + (i as f64) * 0.37).collect()
    }

    #[test]
    fn test_combination_count() {
        assert_eq!(combination_count(3), 0);
        assert_eq!(combination_count(4), 1);
        assert_eq!(combination_count(15), 1365);
    }

    #[test]
    fn test_generate_exact_count_and_order() {
        for n in 4..=15 {
            let candidates = generate_candidates(&sample_rates(n)).unwrap();
            assert_eq!(candidates.len(), combination_count(n));

            for pair in candidates.windows(2) {
                assert!(pair[0].rate <= pair[1].rate);
            }
            for (i, c) in candidates.iter().enumerate() {
                assert_eq!(c.combination_index, i + 1);
            }
        }
    }

    #[test]
    fn test_four_rates_single_mean() {
        let candidates = generate_candidates(&[99.0, 100.0, 101.0, 102.0]).unwrap();
        assert_eq!(candidates.len(), 1);
        assert!((candidates[0].rate - 100.5).abs() < 1e-12);
        assert_eq!(candidates[0].label(), "1");
    }

    #[test]
    fn test_insufficient_rates() {
        let err = generate_candidates(&[99.0, 100.0, 101.0]).unwrap_err();
        assert_eq!(err, Error::InsufficientData { required: 4, found: 3 });
        assert!(generate_candidates(&[]).is_err());
    }

    #[test]
    fn test_five_rates_known_means() {
        // 各組合せは1件を除外した平均
        let rates = [100.0, 101.0, 102.0, 103.0, 104.0];
        let candidates = generate_candidates(&rates).unwrap();
        let got: Vec<f64> = candidates.iter().map(|c| c.rate).collect();
        assert_eq!(got, vec![101.5, 101.75, 102.0, 102.25, 102.5]);
    }

    #[test]
    fn test_deterministic() {
        let rates = [99.2, 100.8, 99.2, 100.8, 100.0, 99.6];
        let first = generate_candidates(&rates).unwrap();
        let second = generate_candidates(&rates).unwrap();
        assert_eq!(first, second);
    }
}
