//! Summary figures shown next to a comparison.

use crate::core::types::Pair;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultAnalytics {
    pub exact_matches: usize,
    /// `None` when there are no exact matches.
    pub mean_exact_similarity: Option<f64>,
    /// `None` when there are no cosine correspondences.
    pub mean_cosine_similarity: Option<f64>,
}

impl ResultAnalytics {
    pub fn from_pairs(pairs: &[Pair]) -> Self {
        let (exact, cosine): (Vec<&Pair>, Vec<&Pair>) =
            pairs.iter().partition(|pair| pair.is_exact_match);
        Self {
            exact_matches: exact.len(),
            mean_exact_similarity: mean(&exact),
            mean_cosine_similarity: mean(&cosine),
        }
    }
}

fn mean(pairs: &[&Pair]) -> Option<f64> {
    if pairs.is_empty() {
        return None;
    }
    let total: f64 = pairs.iter().map(|pair| pair.similarity).sum();
    Some(total / pairs.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Substring;

    fn pair(similarity: f64, exact: bool) -> Pair {
        Pair::new(Substring::new(0, 1), Substring::new(0, 1), similarity, exact)
    }

    #[test]
    fn means_are_split_by_class() {
        let pairs = vec![pair(1.0, true), pair(0.5, true), pair(0.2, false)];
        let analytics = ResultAnalytics::from_pairs(&pairs);
        assert_eq!(analytics.exact_matches, 2);
        assert_eq!(analytics.mean_exact_similarity, Some(0.75));
        assert_eq!(analytics.mean_cosine_similarity, Some(0.2));
    }

    #[test]
    fn no_pairs_gives_no_means() {
        let analytics = ResultAnalytics::from_pairs(&[]);
        assert_eq!(analytics.exact_matches, 0);
        assert_eq!(analytics.mean_exact_similarity, None);
        assert_eq!(analytics.mean_cosine_similarity, None);
    }
}
