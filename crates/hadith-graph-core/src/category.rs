//! Per-category annotation configuration
//!
//! Each entity category declares how its mentions are found (dictionary
//! scan, tagger spans, or verse-coordinate extraction) and which predicate
//! its graph statements use. One configuration record per category
//! replaces the near-identical per-category matching loops of the source
//! system.

use crate::corpus::Collection;
use crate::dictionary::MatchPolicy;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;

/// Predicate used for a category's statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate {
    /// Entity mention (places, people, objects)
    ContainsMentionOf,
    /// Topic discussion (concepts, crimes, afterlife destinations)
    DiscussesTopic,
    /// Scripture-coordinate mention
    ContainsMentionOfVerse,
}

impl Predicate {
    /// Turtle predicate name
    pub fn as_str(&self) -> &'static str {
        match self {
            Predicate::ContainsMentionOf => "containsMentionOf",
            Predicate::DiscussesTopic => "discussesTopic",
            Predicate::ContainsMentionOfVerse => "containsMentionOfVerse",
        }
    }
}

/// How mentions are discovered for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CategoryKind {
    /// Scan one or more reference dictionaries under a matching policy
    Dictionary {
        /// Dictionary CSV files, matched in order, identifiers unioned
        sources: Vec<PathBuf>,
        /// Matching policy for every source
        policy: MatchPolicy,
        /// Pattern-cell delimiter for every source
        delimiter: char,
        /// Identifiers suppressed for this category (e.g. a pattern too
        /// ambiguous for one collection)
        excluded_ids: Vec<String>,
    },
    /// Filter tagger spans by label, then map the span text
    Tagger {
        /// BIO label to keep (e.g. `LOC`)
        label: String,
        /// Alternative-spelling table mapping span text to identifiers;
        /// `None` keeps the surface text as the identifier
        lexicon: Option<PathBuf>,
        /// Alternatives-cell delimiter for the lexicon
        lexicon_delimiter: char,
        /// Fixed identifier emitted for every kept span (afterlife flags)
        fixed_id: Option<String>,
    },
    /// Extract verse coordinates from the English text
    Verses,
}

/// One category's annotation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySpec {
    /// Category name (also the result-table file stem)
    pub name: String,
    /// Result-table column holding the identifier set
    pub column: String,
    /// Predicate for the category's statements
    pub predicate: Predicate,
    /// Mention-discovery configuration
    pub kind: CategoryKind,
}

fn dictionary(
    name: &str,
    dir: &Path,
    files: &[&str],
    policy: MatchPolicy,
    delimiter: char,
    predicate: Predicate,
) -> CategorySpec {
    CategorySpec {
        name: name.to_string(),
        column: name.to_string(),
        predicate,
        kind: CategoryKind::Dictionary {
            sources: files.iter().map(|f| dir.join(f)).collect(),
            policy,
            delimiter,
            excluded_ids: Vec::new(),
        },
    }
}

fn tagger(name: &str, label: &str, lexicon: Option<PathBuf>, predicate: Predicate) -> CategorySpec {
    CategorySpec {
        name: name.to_string(),
        column: name.to_string(),
        predicate,
        kind: CategoryKind::Tagger {
            label: label.to_string(),
            lexicon,
            lexicon_delimiter: '-',
            fixed_id: None,
        },
    }
}

fn topic_flag(name: &str, label: &str, id: &str) -> CategorySpec {
    CategorySpec {
        name: name.to_string(),
        column: name.to_string(),
        predicate: Predicate::DiscussesTopic,
        kind: CategoryKind::Tagger {
            label: label.to_string(),
            lexicon: None,
            lexicon_delimiter: '-',
            fixed_id: Some(id.to_string()),
        },
    }
}

/// The full category registry for one collection.
///
/// `dictionaries_dir` holds the reference tables. The prophets category is
/// collection-sensitive: outside Bukhari no English translations are
/// matched, so it runs Arabic-only and suppresses the Adam row, whose
/// Arabic pattern is too common to trust on its own.
pub fn default_categories(dictionaries_dir: &Path, collection: Collection) -> Vec<CategorySpec> {
    let dir = dictionaries_dir;
    let prophets = if collection == Collection::Bukhari {
        dictionary(
            "prophets",
            dir,
            &["prophets.csv"],
            MatchPolicy::Conjunctive,
            ',',
            Predicate::ContainsMentionOf,
        )
    } else {
        let mut spec = dictionary(
            "prophets",
            dir,
            &["prophets.csv"],
            MatchPolicy::ArabicOnly,
            ',',
            Predicate::ContainsMentionOf,
        );
        if let CategoryKind::Dictionary { excluded_ids, .. } = &mut spec.kind {
            excluded_ids.push("Adam".to_string());
        }
        spec
    };

    vec![
        tagger(
            "locations",
            "LOC",
            Some(dir.join("locations.csv")),
            Predicate::ContainsMentionOf,
        ),
        tagger("persons", "PERS", None, Predicate::ContainsMentionOf),
        tagger(
            "crimes",
            "CRIME",
            Some(dir.join("crimes.csv")),
            Predicate::DiscussesTopic,
        ),
        topic_flag("heaven", "PARA", "Heaven"),
        topic_flag("hell", "HELL", "Hell"),
        dictionary(
            "concepts",
            dir,
            &["concepts.csv"],
            MatchPolicy::Disjunctive,
            ',',
            Predicate::DiscussesTopic,
        ),
        prophets,
        dictionary(
            "angels",
            dir,
            &["angels.csv"],
            MatchPolicy::Conjunctive,
            ',',
            Predicate::ContainsMentionOf,
        ),
        dictionary(
            "caliphs",
            dir,
            &["caliphs.csv"],
            MatchPolicy::Conjunctive,
            ',',
            Predicate::ContainsMentionOf,
        ),
        dictionary(
            "clans",
            dir,
            &["qo-group-of-people.csv", "new-group-of-people.csv"],
            MatchPolicy::Conjunctive,
            ',',
            Predicate::ContainsMentionOf,
        ),
        dictionary(
            "holy_books",
            dir,
            &["holybooks.csv"],
            MatchPolicy::ArabicOnly,
            ',',
            Predicate::ContainsMentionOf,
        ),
        dictionary(
            "pillars",
            dir,
            &["pillars-of-islam.csv"],
            MatchPolicy::ArabicOnly,
            ',',
            Predicate::ContainsMentionOf,
        ),
        dictionary(
            "animals",
            dir,
            &["animals.csv"],
            MatchPolicy::Disjunctive,
            '-',
            Predicate::ContainsMentionOf,
        ),
        dictionary(
            "plants",
            dir,
            &["plants.csv"],
            MatchPolicy::Disjunctive,
            '-',
            Predicate::ContainsMentionOf,
        ),
        CategorySpec {
            name: "verses".to_string(),
            column: "verses".to_string(),
            predicate: Predicate::ContainsMentionOfVerse,
            kind: CategoryKind::Verses,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_all_categories() {
        let specs = default_categories(Path::new("dictionaries"), Collection::Bukhari);
        let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "locations",
                "persons",
                "crimes",
                "heaven",
                "hell",
                "concepts",
                "prophets",
                "angels",
                "caliphs",
                "clans",
                "holy_books",
                "pillars",
                "animals",
                "plants",
                "verses",
            ]
        );
    }

    #[test]
    fn test_prophets_policy_per_collection() {
        let dir = Path::new("dictionaries");
        let sb = default_categories(dir, Collection::Bukhari);
        let tir = default_categories(dir, Collection::Tirmidhi);
        let policy_of = |specs: &[CategorySpec]| match &specs
            .iter()
            .find(|s| s.name == "prophets")
            .unwrap()
            .kind
        {
            CategoryKind::Dictionary {
                policy,
                excluded_ids,
                ..
            } => (*policy, excluded_ids.clone()),
            _ => panic!("prophets is dictionary-driven"),
        };
        assert_eq!(policy_of(&sb), (MatchPolicy::Conjunctive, vec![]));
        assert_eq!(
            policy_of(&tir),
            (MatchPolicy::ArabicOnly, vec!["Adam".to_string()])
        );
    }

    #[test]
    fn test_clans_have_two_sources() {
        let specs = default_categories(Path::new("d"), Collection::Bukhari);
        let clans = specs.iter().find(|s| s.name == "clans").unwrap();
        match &clans.kind {
            CategoryKind::Dictionary { sources, .. } => assert_eq!(sources.len(), 2),
            _ => panic!("clans is dictionary-driven"),
        }
    }

    #[test]
    fn test_predicates() {
        let specs = default_categories(Path::new("d"), Collection::Bukhari);
        let pred = |n: &str| specs.iter().find(|s| s.name == n).unwrap().predicate;
        assert_eq!(pred("concepts"), Predicate::DiscussesTopic);
        assert_eq!(pred("crimes"), Predicate::DiscussesTopic);
        assert_eq!(pred("locations"), Predicate::ContainsMentionOf);
        assert_eq!(pred("verses"), Predicate::ContainsMentionOfVerse);
        assert_eq!(Predicate::ContainsMentionOfVerse.as_str(), "containsMentionOfVerse");
    }
}
