/// Star-rating histogram and score analysis.
///
/// One bucketing rule backs every screen: `index = min(floor(stars * 2), 9)`
/// for values in `(0.0, 5.0]`. Each bin covers a half-point interval
/// `[i*0.5, (i+1)*0.5)`, with a full 5.0 clamped into the top bin. Values
/// outside the range (including a missing or zeroed `stars` field upstream)
/// are skipped rather than counted into bin 0.
use serde::Serialize;

/// Number of half-point bins spanning 0.0–5.0
pub const BIN_COUNT: usize = 10;

/// Bin index for one star value, or `None` when the value does not count
pub fn bucket_index(stars: f64) -> Option<usize> {
    if !stars.is_finite() || stars <= 0.0 || stars > 5.0 {
        return None;
    }
    Some(((stars * 2.0).floor() as usize).min(BIN_COUNT - 1))
}

/// Inclusive lower and exclusive upper bound of a bin
pub fn bin_bounds(index: usize) -> (f64, f64) {
    let low = index as f64 * 0.5;
    (low, low + 0.5)
}

/// Fixed 10-bin histogram over a sequence of star values
pub fn histogram<I>(stars: I) -> [u32; BIN_COUNT]
where
    I: IntoIterator<Item = f64>,
{
    let mut bins = [0u32; BIN_COUNT];
    for value in stars {
        if let Some(index) = bucket_index(value) {
            bins[index] += 1;
        }
    }
    bins
}

/// Summary statistics for the score-analysis view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreAnalysis {
    /// Half-point bin counts
    pub counts: [u32; BIN_COUNT],
    /// Mean of the counted values, 0.0 when nothing counted
    pub average: f64,
    /// How many values counted
    pub total: u32,
    /// The value given most often; ties break toward the higher value
    pub most_given: Option<f64>,
}

/// Buckets, averages and ranks a collection of star values.
///
/// Only values accepted by [`bucket_index`] participate; everything else is
/// ignored consistently across all three statistics.
pub fn analyze(stars: &[f64]) -> ScoreAnalysis {
    let mut counts = [0u32; BIN_COUNT];
    let mut sum = 0.0;
    let mut total = 0u32;
    // Star values come in 0.5 steps, so frequency per half-step slot. The
    // slot count intentionally matches the bins: slot i holds value (i+1)*0.5.
    let mut frequency = [0u32; BIN_COUNT];

    for &value in stars {
        let Some(index) = bucket_index(value) else {
            continue;
        };
        counts[index] += 1;
        sum += value;
        total += 1;

        let slot = ((value * 2.0).ceil() as usize).saturating_sub(1).min(BIN_COUNT - 1);
        frequency[slot] += 1;
    }

    let average = if total > 0 { sum / total as f64 } else { 0.0 };

    let most_given = frequency
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .max_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(&b.0)))
        .map(|(slot, _)| (slot + 1) as f64 * 0.5);

    ScoreAnalysis {
        counts,
        average,
        total,
        most_given,
    }
}

/// Groups items into the bin of their star value.
///
/// Items whose value does not count are dropped. Backing data for clicking a
/// histogram bar to filter the rated list.
pub fn group_by_bin<T, F>(items: Vec<T>, stars_of: F) -> Vec<Vec<T>>
where
    F: Fn(&T) -> Option<f64>,
{
    let mut groups: Vec<Vec<T>> = (0..BIN_COUNT).map(|_| Vec::new()).collect();
    for item in items {
        if let Some(index) = stars_of(&item).and_then(bucket_index) {
            groups[index].push(item);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_empty() {
        assert_eq!(histogram(Vec::new()), [0; 10]);
    }

    #[test]
    fn test_histogram_half_point_floor_semantics() {
        let bins = histogram(vec![0.5, 0.5, 4.9]);
        assert_eq!(bins[1], 2, "0.5 lands in [0.5, 1.0)");
        assert_eq!(bins[9], 1, "4.9 lands in [4.5, 5.0)");
        assert_eq!(bins.iter().sum::<u32>(), 3);
    }

    #[test]
    fn test_histogram_five_clamps_into_top_bin() {
        assert_eq!(histogram(vec![5.0])[9], 1);
    }

    #[test]
    fn test_histogram_skips_out_of_range_values() {
        let bins = histogram(vec![0.0, -1.0, 5.5, f64::NAN, f64::INFINITY]);
        assert_eq!(bins, [0; 10]);
    }

    #[test]
    fn test_histogram_sum_equals_valid_count() {
        let bins = histogram(vec![1.0, 2.5, 0.0, 3.5, 6.0, 4.0]);
        assert_eq!(bins.iter().sum::<u32>(), 4);
    }

    #[test]
    fn test_bucket_index_bounds() {
        assert_eq!(bucket_index(0.5), Some(1));
        assert_eq!(bucket_index(0.4), Some(0));
        assert_eq!(bucket_index(4.5), Some(9));
        assert_eq!(bucket_index(5.0), Some(9));
        assert_eq!(bucket_index(0.0), None);
        assert_eq!(bucket_index(5.01), None);
    }

    #[test]
    fn test_bin_bounds() {
        assert_eq!(bin_bounds(0), (0.0, 0.5));
        assert_eq!(bin_bounds(9), (4.5, 5.0));
    }

    #[test]
    fn test_analyze_average_and_total() {
        let analysis = analyze(&[1.0, 2.0, 3.0]);
        assert_eq!(analysis.total, 3);
        assert!((analysis.average - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_analyze_ignores_invalid_values_everywhere() {
        let analysis = analyze(&[4.0, 0.0, -2.0, 9.9]);
        assert_eq!(analysis.total, 1);
        assert!((analysis.average - 4.0).abs() < 1e-9);
        assert_eq!(analysis.counts.iter().sum::<u32>(), 1);
    }

    #[test]
    fn test_analyze_most_given() {
        let analysis = analyze(&[4.0, 4.0, 3.5, 0.5]);
        assert_eq!(analysis.most_given, Some(4.0));
    }

    #[test]
    fn test_analyze_most_given_tie_breaks_high() {
        let analysis = analyze(&[3.0, 3.0, 4.5, 4.5]);
        assert_eq!(analysis.most_given, Some(4.5));
    }

    #[test]
    fn test_analyze_empty() {
        let analysis = analyze(&[]);
        assert_eq!(analysis.total, 0);
        assert_eq!(analysis.average, 0.0);
        assert_eq!(analysis.most_given, None);
        assert_eq!(analysis.counts, [0; 10]);
    }

    #[test]
    fn test_group_by_bin() {
        let groups = group_by_bin(vec![("a", 0.5), ("b", 0.7), ("c", 4.8), ("d", 0.0)], |item| {
            Some(item.1)
        });
        assert_eq!(groups[1].len(), 2);
        assert_eq!(groups[9], vec![("c", 4.8)]);
        assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), 3);
    }
}
