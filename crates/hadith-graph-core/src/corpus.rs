//! Collections, documents and corpus loading
//!
//! A corpus is one hadith collection: ordered documents, each with a
//! collection-scoped number and two immutable text fields (Arabic and
//! English). Documents are read once per batch run and never mutated.

use crate::error::Error;
use crate::error::Result;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Column name for the document number
pub const COL_NUMBER: &str = "hadith_number";
/// Column name for the Arabic text
pub const COL_ARABIC: &str = "arabic";
/// Column name for the English translation
pub const COL_ENGLISH: &str = "english";
/// Column name for the optional declared-duplicates list
pub const COL_MUKARRAT: &str = "mukarrat";

/// The six hadith collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    /// Sahih al-Bukhari (`sb`)
    Bukhari,
    /// Sahih Muslim (`ms`)
    Muslim,
    /// Sunan Ibn Majah (`maj`)
    IbnMajah,
    /// Sunan an-Nasa'i (`nis`)
    Nasai,
    /// Jami at-Tirmidhi (`tir`)
    Tirmidhi,
    /// Sunan Abi Dawud (`sad`)
    AbuDawud,
}

impl Collection {
    /// All collections in processing order
    pub const ALL: [Collection; 6] = [
        Collection::Bukhari,
        Collection::Muslim,
        Collection::IbnMajah,
        Collection::Nasai,
        Collection::Tirmidhi,
        Collection::AbuDawud,
    ];

    /// Short name used for file paths and CLI selection
    pub fn short_name(&self) -> &'static str {
        match self {
            Collection::Bukhari => "sb",
            Collection::Muslim => "ms",
            Collection::IbnMajah => "maj",
            Collection::Nasai => "nis",
            Collection::Tirmidhi => "tir",
            Collection::AbuDawud => "sad",
        }
    }

    /// Label prefix used in graph identifiers
    pub fn label(&self) -> &'static str {
        match self {
            Collection::Bukhari => "SB",
            Collection::Muslim => "SM",
            Collection::IbnMajah => "IM",
            Collection::Nasai => "SN",
            Collection::Tirmidhi => "JT",
            Collection::AbuDawud => "SD",
        }
    }

    /// Whether document numbers are written in Eastern Arabic numerals
    pub fn uses_eastern_numerals(&self) -> bool {
        matches!(self, Collection::Tirmidhi)
    }
}

impl FromStr for Collection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sb" => Ok(Collection::Bukhari),
            "ms" => Ok(Collection::Muslim),
            "maj" => Ok(Collection::IbnMajah),
            "nis" => Ok(Collection::Nasai),
            "tir" => Ok(Collection::Tirmidhi),
            "sad" => Ok(Collection::AbuDawud),
            other => Err(Error::validation(format!(
                "unknown collection {other:?} (expected one of sb, ms, maj, nis, tir, sad)"
            ))),
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

/// One document of a collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document number; kept raw because one collection encodes numbers in
    /// Eastern Arabic numerals
    #[serde(rename = "hadith_number")]
    pub number: String,
    /// Arabic text
    pub arabic: String,
    /// English translation
    pub english: String,
    /// Declared duplicate partner numbers, comma-delimited (optional)
    #[serde(default)]
    pub mukarrat: Option<String>,
}

/// An ordered, immutable set of documents for one collection
#[derive(Debug, Clone)]
pub struct Corpus {
    /// The collection these documents belong to
    pub collection: Collection,
    documents: Vec<Document>,
}

impl Corpus {
    /// Build a corpus from documents (used by tests)
    pub fn new(collection: Collection, documents: Vec<Document>) -> Self {
        Self {
            collection,
            documents,
        }
    }

    /// Load a corpus from a CSV file with columns `hadith_number`,
    /// `arabic`, `english` and optional `mukarrat`. A missing file is
    /// fatal for the collection.
    pub fn from_csv(collection: Collection, path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::missing_resource(path));
        }
        let mut reader = csv::Reader::from_path(path)?;
        let mut documents = Vec::new();
        for record in reader.deserialize() {
            let doc: Document = record?;
            documents.push(doc);
        }
        info!(
            collection = collection.short_name(),
            documents = documents.len(),
            "loaded corpus"
        );
        Ok(Self {
            collection,
            documents,
        })
    }

    /// Documents in corpus order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the corpus is empty
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_round_trip() {
        for c in Collection::ALL {
            assert_eq!(c.short_name().parse::<Collection>().unwrap(), c);
        }
        assert!("xyz".parse::<Collection>().is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(Collection::Bukhari.label(), "SB");
        assert_eq!(Collection::Tirmidhi.label(), "JT");
        assert!(Collection::Tirmidhi.uses_eastern_numerals());
        assert!(!Collection::Bukhari.uses_eastern_numerals());
    }

    #[test]
    fn test_corpus_csv_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sb.csv");
        std::fs::write(
            &path,
            "hadith_number,arabic,english,mukarrat\n1,قال,he said,\"2,3\"\n2,نعم,yes,\n",
        )
        .unwrap();
        let corpus = Corpus::from_csv(Collection::Bukhari, &path).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.documents()[0].number, "1");
        assert_eq!(corpus.documents()[0].mukarrat.as_deref(), Some("2,3"));
        assert_eq!(corpus.documents()[1].english, "yes");
    }

    #[test]
    fn test_corpus_without_mukarrat_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ms.csv");
        std::fs::write(&path, "hadith_number,arabic,english\n1,قال,he said\n").unwrap();
        let corpus = Corpus::from_csv(Collection::Muslim, &path).unwrap();
        assert_eq!(corpus.documents()[0].mukarrat, None);
    }

    #[test]
    fn test_missing_corpus_is_fatal() {
        let err = Corpus::from_csv(Collection::Bukhari, Path::new("no/sb.csv")).unwrap_err();
        assert!(matches!(err, Error::MissingResource { .. }));
    }
}
