use crate::models::{Category, Note};
use strum::IntoEnumIterator;

/// Sidebar/category selector state. `All` passes every note; `Only`
/// requires exact equality, so uncategorized notes only show under `All`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn accepts(&self, note: &Note) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => note.category == Some(*c),
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "All"),
            CategoryFilter::Only(c) => write!(f, "{c}"),
        }
    }
}

fn matches_query(note: &Note, q: &str) -> bool {
    note.title.to_lowercase().contains(q) || note.content.to_lowercase().contains(q)
}

/// Derive the displayed list from the cache: category + substring filters,
/// then a stable partition with pinned notes first. Input order (fetch
/// order) is preserved inside each partition. Pure; recomputed on every
/// keystroke and selection change.
pub(crate) fn view(notes: &[Note], category: CategoryFilter, query: &str) -> Vec<Note> {
    let q = query.trim().to_lowercase();

    let (pinned, unpinned): (Vec<&Note>, Vec<&Note>) = notes
        .iter()
        .filter(|n| category.accepts(n) && (q.is_empty() || matches_query(n, &q)))
        .partition(|n| n.pinned);

    pinned.into_iter().chain(unpinned).cloned().collect()
}

/// Category list with live counts for the sidebar, `All` first.
pub(crate) fn category_counts(notes: &[Note]) -> Vec<(CategoryFilter, usize)> {
    let mut out = vec![(CategoryFilter::All, notes.len())];
    for c in Category::iter() {
        let count = notes.iter().filter(|n| n.category == Some(c)).count();
        out.push((CategoryFilter::Only(c), count));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, title: &str, content: &str, category: Option<Category>, pinned: bool) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            category,
            created_at: String::new(),
            pinned,
            summary: None,
        }
    }

    fn ids(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_pinned_notes_come_first() {
        // [{1 Trip/beach unpinned}, {2 Work plan/launch pinned}], All, "" -> [2, 1]
        let notes = vec![
            note("1", "Trip", "beach", Some(Category::Personal), false),
            note("2", "Work plan", "launch", Some(Category::Work), true),
        ];
        assert_eq!(ids(&view(&notes, CategoryFilter::All, "")), ["2", "1"]);
    }

    #[test]
    fn test_query_matches_content_substring() {
        let notes = vec![
            note("1", "Trip", "beach", Some(Category::Personal), false),
            note("2", "Work plan", "launch", Some(Category::Work), true),
        ];
        assert_eq!(ids(&view(&notes, CategoryFilter::All, "beach")), ["1"]);
    }

    #[test]
    fn test_query_is_trimmed_and_case_insensitive() {
        let notes = vec![note("1", "Beach Trip", "", None, false)];
        assert_eq!(ids(&view(&notes, CategoryFilter::All, "  bEaCh ")), ["1"]);
    }

    #[test]
    fn test_category_filter_is_exact() {
        let notes = vec![
            note("1", "a", "", Some(Category::Work), false),
            note("2", "b", "", Some(Category::Personal), false),
            note("3", "c", "", None, false),
        ];
        assert_eq!(
            ids(&view(&notes, CategoryFilter::Only(Category::Work), "")),
            ["1"]
        );
        // Uncategorized only shows under All.
        assert_eq!(ids(&view(&notes, CategoryFilter::All, "")), ["1", "2", "3"]);
    }

    #[test]
    fn test_both_predicates_must_hold() {
        let notes = vec![
            note("1", "standup", "retro", Some(Category::Meeting), false),
            note("2", "standup", "retro", Some(Category::Work), false),
            note("3", "lunch", "", Some(Category::Meeting), false),
        ];
        assert_eq!(
            ids(&view(&notes, CategoryFilter::Only(Category::Meeting), "retro")),
            ["1"]
        );
    }

    #[test]
    fn test_partition_is_stable_within_groups() {
        let notes = vec![
            note("u1", "a", "", None, false),
            note("p1", "b", "", None, true),
            note("u2", "c", "", None, false),
            note("p2", "d", "", None, true),
            note("u3", "e", "", None, false),
        ];
        assert_eq!(
            ids(&view(&notes, CategoryFilter::All, "")),
            ["p1", "p2", "u1", "u2", "u3"]
        );
    }

    #[test]
    fn test_view_is_pure_and_idempotent() {
        let notes = vec![
            note("1", "Trip", "beach", Some(Category::Personal), false),
            note("2", "Work plan", "launch", Some(Category::Work), true),
        ];
        let first = view(&notes, CategoryFilter::All, "plan");
        let second = view(&notes, CategoryFilter::All, "plan");
        assert_eq!(first, second);
        // The input is untouched.
        assert_eq!(ids(&notes), ["1", "2"]);
    }

    #[test]
    fn test_empty_query_passes_everything() {
        let notes = vec![note("1", "a", "", None, false), note("2", "b", "", None, false)];
        assert_eq!(view(&notes, CategoryFilter::All, "   ").len(), 2);
    }

    #[test]
    fn test_category_counts_include_all_and_zeroes() {
        let notes = vec![
            note("1", "a", "", Some(Category::Work), false),
            note("2", "b", "", Some(Category::Work), false),
            note("3", "c", "", None, false),
        ];
        let counts = category_counts(&notes);
        assert_eq!(counts[0], (CategoryFilter::All, 3));
        assert!(counts.contains(&(CategoryFilter::Only(Category::Work), 2)));
        assert!(counts.contains(&(CategoryFilter::Only(Category::Meeting), 0)));
        // All + the five fixed categories.
        assert_eq!(counts.len(), 6);
    }
}
