//! Turtle graph emission
//!
//! Joins every category table and the similarity table of a collection by
//! document number and writes blank-line-separated Turtle statements
//! under a fixed namespace header. Output is append-only text; statements
//! are generated once, never updated.

use crate::annotate::MentionTable;
use crate::category::Predicate;
use crate::corpus::Collection;
use crate::corpus::Corpus;
use crate::error::Result;
use crate::numerals::eastern_to_int;
use crate::similarity::SimilarityTable;
use std::path::Path;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// Namespace-prefix declarations emitted once at the top of every graph
pub const PREFIX_HEADER: &str = "\
@base <http://semantichadith.com/ontology> .
@prefix : <http://www.semantichadith.com/ontology/> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix qur: <http://quranontology.com/Resource/> .
@prefix wiki: <https://www.wikidata.org/wiki/> .";

/// Canonical document identifier, e.g. `SB-HD0001`.
///
/// Returns `None` when the raw number cannot be read: for the collection
/// using Eastern Arabic numerals this covers no-number markers, which
/// mean the document is skipped entirely, not that the run failed.
pub fn document_id(collection: Collection, raw_number: &str) -> Option<String> {
    let num = if collection.uses_eastern_numerals() {
        eastern_to_int(raw_number)?
    } else {
        raw_number.trim().parse().ok()?
    };
    Some(format!("{}-HD{num:04}", collection.label()))
}

fn statement<'a>(hid: &str, predicate: &str, objects: impl IntoIterator<Item = &'a str>) -> String {
    let list = objects
        .into_iter()
        .map(|o| format!(":{o}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(":{hid} :{predicate} {list} .")
}

/// One category's mention table bound to its statement predicate
pub struct CategoryTable {
    /// Predicate for this category's statements
    pub predicate: Predicate,
    /// Per-document mention sets
    pub table: MentionTable,
}

/// Emits the knowledge graph for one collection.
///
/// Tables are joined by document number with keyed lookups; a document
/// absent from a table contributes no statement for that category.
pub struct TurtleExporter {
    collection: Collection,
    categories: Vec<CategoryTable>,
    similarity: Option<SimilarityTable>,
}

impl TurtleExporter {
    /// Create an exporter over category tables in declaration order
    pub fn new(
        collection: Collection,
        categories: Vec<CategoryTable>,
        similarity: Option<SimilarityTable>,
    ) -> Self {
        Self {
            collection,
            categories,
            similarity,
        }
    }

    /// Render the full graph: header, then per-document statement groups
    /// in corpus order.
    pub fn export(&self, corpus: &Corpus) -> Result<String> {
        let mut blocks = vec![PREFIX_HEADER.to_string()];
        let mut skipped = 0usize;

        for doc in corpus.documents() {
            let Some(hid) = document_id(self.collection, &doc.number) else {
                skipped += 1;
                if self.collection.uses_eastern_numerals() {
                    // No-number markers are expected corpus annotations.
                    debug!(number = %doc.number, "unnumbered document skipped");
                } else {
                    warn!(number = %doc.number, "unparsable document number, skipped");
                }
                continue;
            };

            for category in &self.categories {
                let Some(mentions) = category.table.get(&doc.number) else {
                    warn!(
                        number = %doc.number,
                        category = %category.table.category,
                        "document absent from category table"
                    );
                    continue;
                };
                if mentions.is_empty() {
                    continue;
                }
                blocks.push(statement(
                    &hid,
                    category.predicate.as_str(),
                    mentions.iter().map(String::as_str),
                ));
            }

            if let Some(similarity) = &self.similarity {
                if let Some(row) = similarity.get(&doc.number) {
                    self.append_similarity(&hid, row, &mut blocks);
                }
            }
        }

        info!(
            collection = self.collection.short_name(),
            statements = blocks.len() - 1,
            skipped,
            "graph rendered"
        );
        Ok(blocks.join("\n\n"))
    }

    /// Render and write the graph to a UTF-8 text file
    pub fn export_to_file(&self, corpus: &Corpus, path: &Path) -> Result<()> {
        let graph = self.export(corpus)?;
        std::fs::write(path, graph)?;
        info!(path = %path.display(), "graph written");
        Ok(())
    }

    fn append_similarity(
        &self,
        hid: &str,
        row: &crate::similarity::SimilarityRow,
        blocks: &mut Vec<String>,
    ) {
        let to_ids = |numbers: &std::collections::BTreeSet<String>| -> Vec<String> {
            numbers
                .iter()
                .filter_map(|n| document_id(self.collection, n))
                .filter(|id| id != hid)
                .collect()
        };

        let strong = to_ids(&row.strong);
        if !strong.is_empty() {
            blocks.push(statement(
                hid,
                "isStronglySimilar",
                strong.iter().map(String::as_str),
            ));
        }

        // Declared duplicates stay similar even when their scores fall
        // below every boundary, so the weak tier is included.
        let mut similar = to_ids(&row.high);
        similar.extend(to_ids(&row.moderate));
        similar.extend(to_ids(&row.weak));
        if !similar.is_empty() {
            blocks.push(statement(hid, "isSimilar", similar.iter().map(String::as_str)));
        }
    }
}
