mod types;
use log::debug;

use std::collections::{HashMap, HashSet};

pub use crate::types::*;

/// Restricts a "race" table to the top `n` rows by value within each time
/// frame, reassembled in a stable global order suitable for sequential
/// animation playback.
///
/// Frames are the distinct `time` values, ordered ascending
/// lexicographically. This ordering is also the playback order: the data
/// source is expected to provide time values whose string form sorts
/// chronologically (e.g. `YYYY-MM`). This precondition is documented, not
/// enforced.
///
/// Within a frame, rows are ranked by `value` descending; ties keep the
/// original row order (the tie-break policy is stability, not a secondary
/// key). A frame with fewer than `n` rows keeps all of them. The final
/// output is stable-sorted by `(time ascending, value descending)` so the
/// presentation order does not depend on the row order of the source file.
pub fn top_n_by_frame(rows: &[FrameRow], n: usize) -> Result<Vec<FrameRow>, TransformError> {
    if n == 0 {
        return Err(TransformError::InvalidTopN);
    }
    let mut frames: Vec<String> = rows
        .iter()
        .map(|r| r.time.clone())
        .collect::<HashSet<String>>()
        .into_iter()
        .collect();
    frames.sort();
    if frames.is_empty() {
        return Err(TransformError::EmptyDataset);
    }
    debug!("top_n_by_frame: {} frames, n={}", frames.len(), n);

    let mut selected: Vec<FrameRow> = Vec::new();
    for frame in frames.iter() {
        let mut sub: Vec<FrameRow> = rows.iter().filter(|r| r.time == *frame).cloned().collect();
        // Vec::sort_by is stable: equal values keep their source order.
        sub.sort_by(|a, b| b.value.total_cmp(&a.value));
        sub.truncate(n);
        selected.extend(sub);
    }

    selected.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| b.value.total_cmp(&a.value)));
    Ok(selected)
}

/// Builds the complete, gap-free (year x category) grid for animated pie
/// rendering. An animation frame with a missing category would make that
/// slice vanish discontinuously instead of shrinking to zero, so every
/// combination must have a cell.
///
/// Categories are ordered lexicographically ascending; this is the fixed
/// color-assignment order and is identical across repeated runs on the same
/// input. Years are sorted numerically when every distinct value parses as
/// an integer, otherwise the whole set falls back to a lexicographic sort.
/// The fallback is all-or-nothing, not per-element.
///
/// Duplicate (year, category) pairs are summed; absent pairs are filled
/// with zero.
pub fn dense_pivot(rows: &[SliceRow]) -> Result<DenseGrid, TransformError> {
    let mut categories: Vec<String> = rows
        .iter()
        .map(|r| r.category.clone())
        .collect::<HashSet<String>>()
        .into_iter()
        .collect();
    categories.sort();

    let mut years: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for r in rows.iter() {
        if seen.insert(r.year.clone()) {
            years.push(r.year.clone());
        }
    }
    let years = sort_years(years);

    if years.is_empty() || categories.is_empty() {
        return Err(TransformError::EmptyDataset);
    }
    debug!(
        "dense_pivot: {} years x {} categories from {} rows",
        years.len(),
        categories.len(),
        rows.len()
    );

    let year_index: HashMap<&String, usize> =
        years.iter().enumerate().map(|(i, y)| (y, i)).collect();
    let category_index: HashMap<&String, usize> =
        categories.iter().enumerate().map(|(i, c)| (c, i)).collect();

    let mut values = vec![vec![0.0_f64; categories.len()]; years.len()];
    for r in rows.iter() {
        values[year_index[&r.year]][category_index[&r.category]] += r.amount;
    }

    Ok(DenseGrid {
        years,
        categories,
        values,
    })
}

// Numeric sort when every year parses as an integer, lexicographic for the
// whole set otherwise.
fn sort_years(mut years: Vec<String>) -> Vec<String> {
    let parsed: Option<Vec<i64>> = years.iter().map(|y| y.parse::<i64>().ok()).collect();
    match parsed {
        Some(_) => years.sort_by_key(|y| y.parse::<i64>().unwrap_or(i64::MAX)),
        None => years.sort(),
    }
    years
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_row(time: &str, category: &str, value: f64) -> FrameRow {
        FrameRow {
            time: time.to_string(),
            category: category.to_string(),
            value,
        }
    }

    fn slice_row(year: &str, category: &str, amount: f64) -> SliceRow {
        SliceRow {
            year: year.to_string(),
            category: category.to_string(),
            amount,
        }
    }

    #[test]
    fn top_n_single_frame() {
        let rows = vec![
            frame_row("2020-01", "X", 10.0),
            frame_row("2020-01", "Y", 5.0),
            frame_row("2020-01", "Z", 20.0),
        ];
        let res = top_n_by_frame(&rows, 2).unwrap();
        assert_eq!(
            res,
            vec![frame_row("2020-01", "Z", 20.0), frame_row("2020-01", "X", 10.0)]
        );
    }

    #[test]
    fn top_n_keeps_min_of_n_and_frame_size() {
        let rows = vec![
            frame_row("2020-01", "A", 1.0),
            frame_row("2020-01", "B", 2.0),
            frame_row("2020-01", "C", 3.0),
            frame_row("2020-02", "A", 4.0),
        ];
        let res = top_n_by_frame(&rows, 2).unwrap();
        let first: Vec<&FrameRow> = res.iter().filter(|r| r.time == "2020-01").collect();
        let second: Vec<&FrameRow> = res.iter().filter(|r| r.time == "2020-02").collect();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert_eq!(res.len(), 3);
    }

    #[test]
    fn top_n_frames_are_lexicographic() {
        let rows = vec![
            frame_row("2020-10", "A", 1.0),
            frame_row("2020-02", "A", 1.0),
            frame_row("2020-01", "A", 1.0),
        ];
        let res = top_n_by_frame(&rows, 8).unwrap();
        let times: Vec<&str> = res.iter().map(|r| r.time.as_str()).collect();
        assert_eq!(times, vec!["2020-01", "2020-02", "2020-10"]);
    }

    #[test]
    fn top_n_ties_keep_source_order() {
        let rows = vec![
            frame_row("2020-01", "first", 5.0),
            frame_row("2020-01", "second", 5.0),
            frame_row("2020-01", "third", 5.0),
        ];
        let res = top_n_by_frame(&rows, 3).unwrap();
        let categories: Vec<&str> = res.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, vec!["first", "second", "third"]);
    }

    #[test]
    fn top_n_output_independent_of_source_order() {
        let rows = vec![
            frame_row("2020-02", "B", 2.0),
            frame_row("2020-01", "A", 1.0),
            frame_row("2020-02", "C", 7.0),
            frame_row("2020-01", "D", 9.0),
        ];
        let mut shuffled = rows.clone();
        shuffled.reverse();
        let a = top_n_by_frame(&rows, 8).unwrap();
        let b = top_n_by_frame(&shuffled, 8).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.first().unwrap().category, "D");
    }

    #[test]
    fn top_n_rejects_zero() {
        let rows = vec![frame_row("2020-01", "A", 1.0)];
        assert_eq!(top_n_by_frame(&rows, 0), Err(TransformError::InvalidTopN));
    }

    #[test]
    fn top_n_rejects_empty_input() {
        assert_eq!(top_n_by_frame(&[], 8), Err(TransformError::EmptyDataset));
    }

    #[test]
    fn pivot_fills_missing_combinations_with_zero() {
        let rows = vec![slice_row("2020", "A", 5.0), slice_row("2021", "B", 7.0)];
        let grid = dense_pivot(&rows).unwrap();
        assert_eq!(grid.years, vec!["2020", "2021"]);
        assert_eq!(grid.categories, vec!["A", "B"]);
        assert_eq!(grid.values, vec![vec![5.0, 0.0], vec![0.0, 7.0]]);
    }

    #[test]
    fn pivot_dimensions_match_distinct_keys() {
        let rows = vec![
            slice_row("2020", "A", 1.0),
            slice_row("2021", "A", 2.0),
            slice_row("2022", "B", 3.0),
        ];
        let grid = dense_pivot(&rows).unwrap();
        assert_eq!(grid.values.len(), 3);
        assert!(grid.values.iter().all(|row| row.len() == 2));
    }

    #[test]
    fn pivot_sums_duplicates() {
        let rows = vec![
            slice_row("2020", "A", 1.5),
            slice_row("2020", "A", 2.5),
        ];
        let grid = dense_pivot(&rows).unwrap();
        assert_eq!(grid.values, vec![vec![4.0]]);
    }

    #[test]
    fn pivot_years_sort_numerically_when_all_parse() {
        let rows = vec![
            slice_row("10", "A", 1.0),
            slice_row("2", "A", 1.0),
            slice_row("1", "A", 1.0),
        ];
        let grid = dense_pivot(&rows).unwrap();
        assert_eq!(grid.years, vec!["1", "2", "10"]);
    }

    #[test]
    fn pivot_years_fall_back_to_lexicographic_as_a_whole() {
        // One unparseable value demotes the entire set to string order.
        let rows = vec![
            slice_row("10", "A", 1.0),
            slice_row("2", "A", 1.0),
            slice_row("n/a", "A", 1.0),
        ];
        let grid = dense_pivot(&rows).unwrap();
        assert_eq!(grid.years, vec!["10", "2", "n/a"]);
    }

    #[test]
    fn pivot_category_order_is_stable_across_runs() {
        let rows = vec![
            slice_row("2020", "zeta", 1.0),
            slice_row("2020", "alpha", 2.0),
            slice_row("2021", "mid", 3.0),
        ];
        let a = dense_pivot(&rows).unwrap();
        let b = dense_pivot(&rows).unwrap();
        assert_eq!(a.categories, vec!["alpha", "mid", "zeta"]);
        assert_eq!(a, b);
    }

    #[test]
    fn pivot_rejects_empty_input() {
        assert_eq!(dense_pivot(&[]), Err(TransformError::EmptyDataset));
    }
}
