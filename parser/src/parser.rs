use std::collections::HashSet;
use std::path::{Path, PathBuf};

use sift_common::QuestionBank;

use crate::raw::RawBank;
use crate::{ParseError, ParseWarning};

#[derive(Debug, Default)]
pub struct Parser {
    file_path: Option<PathBuf>,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file<T: AsRef<Path>>(file_path: T) -> Self {
        Self {
            file_path: Some(file_path.as_ref().to_path_buf()),
        }
    }

    /// Reads and parses the file this parser was created with.
    pub fn parse_file(&mut self) -> Result<(QuestionBank, Vec<ParseWarning>), ParseError> {
        let path = self.file_path.clone().unwrap_or_default();
        let source = std::fs::read_to_string(&path).map_err(|source| ParseError::Io {
            path: path.clone(),
            source,
        })?;
        self.parse(source)
    }

    /// Parses a TOML question bank.
    ///
    /// Shape errors (bad TOML, missing ids, duplicate ids) fail the whole bank.
    /// Questions that parse but break a question invariant are left out and
    /// reported as warnings.
    pub fn parse<A>(&mut self, source: A) -> Result<(QuestionBank, Vec<ParseWarning>), ParseError>
    where
        A: AsRef<str>,
    {
        let raw: RawBank = toml::from_str(source.as_ref())?;

        let mut seen = HashSet::new();
        for (index, question) in raw.questions.iter().enumerate() {
            if question.id.trim().is_empty() {
                return Err(ParseError::MissingId { index: index + 1 });
            }
            if !seen.insert(question.id.clone()) {
                return Err(ParseError::DuplicateId {
                    id: question.id.clone(),
                });
            }
        }

        let mut questions = Vec::with_capacity(raw.questions.len());
        let mut warnings = Vec::new();

        for raw_question in raw.questions {
            let id = raw_question.id.clone();
            let reason = match raw_question.into_question() {
                Ok(question) => match question.validation_error() {
                    None => {
                        questions.push(question);
                        continue;
                    }
                    Some(reason) => reason,
                },
                Err(reason) => reason,
            };

            log::warn!("skipping question `{}`: {}", id, reason);
            warnings.push(ParseWarning {
                file: self.file_path.clone(),
                question: id,
                message: reason,
            });
        }

        Ok((QuestionBank::new(questions), warnings))
    }
}
