//! Candidate password lists

use crate::normalize::normalize_candidate;
use crate::utils::WordlistError;
use std::path::PathBuf;

/// Ordered, read-only list of candidate passwords
///
/// Entries are trimmed and never empty; order is kept as loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateList {
    passwords: Vec<String>,
}

impl CandidateList {
    /// Build from newline-delimited text, dropping blank lines
    pub fn parse(text: &str) -> Self {
        Self::from_iter(text.lines())
    }

    pub fn len(&self) -> usize {
        self.passwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passwords.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.passwords.iter()
    }
}

impl<S: AsRef<str>> FromIterator<S> for CandidateList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            passwords: iter
                .into_iter()
                .filter_map(|line| normalize_candidate(line.as_ref()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Where the candidate list comes from
///
/// A file is only read once the default credential has been refused.
#[derive(Debug, Clone)]
pub enum CandidateSource {
    File(PathBuf),
    Inline(CandidateList),
}

impl CandidateSource {
    pub async fn load(self) -> Result<CandidateList, WordlistError> {
        match self {
            CandidateSource::Inline(list) => Ok(list),
            CandidateSource::File(path) => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|source| WordlistError::Read {
                        path: path.clone(),
                        source,
                    })?;
                // Wordlists in the wild are often Latin-1; keep what decodes
                Ok(CandidateList::parse(&String::from_utf8_lossy(&bytes)))
            }
        }
    }
}

impl From<CandidateList> for CandidateSource {
    fn from(list: CandidateList) -> Self {
        CandidateSource::Inline(list)
    }
}
