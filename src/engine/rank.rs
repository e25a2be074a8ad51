use std::cmp::Ordering;

use super::aggregate::GroupAggregate;

/// Sort order for [`top_n`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Descending,
    Ascending,
}

/// The `n` highest (or lowest) categories of an aggregate.
///
/// Ties are broken by category name ascending so the result is deterministic.
/// `n == 0` gives an empty list; `n` past the number of categories gives all of them.
pub fn top_n(aggregate: &GroupAggregate, n: usize, direction: Direction) -> Vec<(String, f64)> {
    if n == 0 {
        return Vec::new();
    }

    let mut entries: Vec<(String, f64)> = aggregate
        .iter()
        .map(|(category, value)| (category.clone(), *value))
        .collect();

    entries.sort_by(|(name_a, a), (name_b, b)| {
        let by_value = match direction {
            Direction::Descending => b.total_cmp(a),
            Direction::Ascending => a.total_cmp(b),
        };
        match by_value {
            Ordering::Equal => name_a.cmp(name_b),
            other => other,
        }
    });
    entries.truncate(n);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg() -> GroupAggregate {
        [("Indore", 16.0), ("Bhopal", 4.0), ("Gwalior", 16.0), ("Rewa", 9.0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    fn names(entries: &[(String, f64)]) -> Vec<&str> {
        entries.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn descending_with_name_tiebreak() {
        let top = top_n(&agg(), 3, Direction::Descending);
        assert_eq!(names(&top), vec!["Gwalior", "Indore", "Rewa"]);
    }

    #[test]
    fn ascending_order() {
        let top = top_n(&agg(), 2, Direction::Ascending);
        assert_eq!(names(&top), vec!["Bhopal", "Rewa"]);
    }

    #[test]
    fn zero_and_oversized_n() {
        assert!(top_n(&agg(), 0, Direction::Descending).is_empty());
        assert_eq!(top_n(&agg(), 50, Direction::Descending).len(), 4);
    }

    #[test]
    fn descending_is_non_increasing_and_nested() {
        let g = agg();
        for n in 0..5 {
            let smaller = top_n(&g, n, Direction::Descending);
            let larger = top_n(&g, n + 1, Direction::Descending);
            assert!(smaller.windows(2).all(|w| w[0].1 >= w[1].1));
            assert!(smaller.iter().all(|entry| larger.contains(entry)));
        }
    }
}
