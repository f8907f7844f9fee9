use std::cmp::Ordering;
use std::collections::HashMap;
use crate::models::CompetencyScore;

/// A scored person eligible for one competency
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub person_id: String,
    pub full_name: String,
    pub score: f64,
    pub competency_name: String,
}

/// Check whether a score row may produce a suggestion
///
/// A row is eligible when it carries an average and does not belong to the
/// excluded person.
#[inline]
pub fn is_eligible(row: &CompetencyScore, excluded_target: Option<&str>) -> bool {
    if row.safe_avg.is_none() {
        return false;
    }

    match excluded_target {
        Some(target) => row.target_id != target,
        None => true,
    }
}

/// Order candidates best first: highest score, then name ascending
#[inline]
pub fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.full_name.cmp(&b.full_name))
}

/// Group eligible rows into per-competency candidate lists, best first
///
/// Person ids missing from `names` resolve to `unknown_name`.
pub fn build_candidate_lists(
    rows: Vec<CompetencyScore>,
    names: &HashMap<&str, &str>,
    excluded_target: Option<&str>,
    unknown_name: &str,
) -> HashMap<String, Vec<Candidate>> {
    let mut lists: HashMap<String, Vec<Candidate>> = HashMap::new();

    for row in rows {
        if !is_eligible(&row, excluded_target) {
            continue;
        }
        let Some(score) = row.safe_avg else { continue };

        let full_name = names
            .get(row.target_id.as_str())
            .copied()
            .unwrap_or(unknown_name)
            .to_string();

        lists.entry(row.category_id).or_default().push(Candidate {
            person_id: row.target_id,
            full_name,
            score,
            competency_name: row.category_name,
        });
    }

    for list in lists.values_mut() {
        list.sort_by(compare_candidates);
    }

    lists
}
