use std::path::Path;

use sift_common::QuestionBank;
use sift_parser::{ParseWarning, Parser};

/// Loads the bank at `path`, or the built-in bank when no path is given.
///
/// A bank that cannot be read or parsed, or that has no usable questions,
/// is replaced by the fallback question.
pub fn load_bank(path: Option<&Path>) -> (QuestionBank, Vec<ParseWarning>) {
    let Some(path) = path else {
        return (QuestionBank::builtin(), Vec::new());
    };

    match Parser::with_file(path).parse_file() {
        Ok((bank, warnings)) => {
            if bank.is_empty() {
                log::warn!("{} has no usable questions, using the fallback", path.display());
                (QuestionBank::fallback(), warnings)
            } else {
                (bank, warnings)
            }
        }
        Err(err) => {
            log::error!("{}", err);
            (QuestionBank::fallback(), Vec::new())
        }
    }
}
