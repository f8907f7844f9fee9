use std::collections::{HashMap, HashSet};
use crate::models::{Person, CompetencyScore, ColleagueSuggestion};
use crate::core::candidates::build_candidate_lists;

/// Placeholder used when a score row references a person the project does not list
///
/// Rendered as `(unknown)` rather than a bare `unknown` so it cannot be
/// mistaken for a real person's name in the suggestion list.
pub const UNKNOWN_PERSON_NAME: &str = "(unknown)";

/// Result of the assignment process
#[derive(Debug)]
pub struct MatchResult {
    pub suggestions: Vec<ColleagueSuggestion>,
    pub eligible_rows: usize,
}

/// Greedy one-colleague-per-competency assignment
///
/// # Algorithm
/// 1. Drop rows without an average and rows of the excluded person
/// 2. Build a best-first candidate list per competency
/// 3. Walk the competencies in request order; each takes the first
///    candidate nobody has claimed yet, or is skipped when none is left
///
/// The walk order is the priority: a person who tops several lists goes to
/// the earliest competency, regardless of where they score highest. This is
/// deliberately not a globally optimal assignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher;

impl Matcher {
    /// Assign at most one distinct colleague to each requested competency
    ///
    /// # Arguments
    /// * `people` - Everyone on the project; an empty slice yields no suggestions
    /// * `scores` - Score rows for the requested competencies
    /// * `competencies` - Competency ids in priority order
    /// * `excluded_target` - Person that must never be suggested
    pub fn assign(
        &self,
        people: &[Person],
        scores: Vec<CompetencyScore>,
        competencies: &[String],
        excluded_target: Option<&str>,
    ) -> MatchResult {
        if people.is_empty() {
            return MatchResult {
                suggestions: Vec::new(),
                eligible_rows: 0,
            };
        }

        let names: HashMap<&str, &str> = people
            .iter()
            .map(|p| (p.id.as_str(), p.full_name.as_str()))
            .collect();

        let candidates = build_candidate_lists(scores, &names, excluded_target, UNKNOWN_PERSON_NAME);
        let eligible_rows = candidates.values().map(Vec::len).sum();

        let mut used: HashSet<&str> = HashSet::new();
        let mut suggestions = Vec::with_capacity(competencies.len());

        for competency_id in competencies {
            let Some(list) = candidates.get(competency_id) else {
                continue;
            };

            if let Some(pick) = list.iter().find(|c| !used.contains(c.person_id.as_str())) {
                used.insert(pick.person_id.as_str());
                suggestions.push(ColleagueSuggestion {
                    full_name: pick.full_name.clone(),
                    competency: pick.competency_name.clone(),
                });
            }
        }

        MatchResult {
            suggestions,
            eligible_rows,
        }
    }
}
