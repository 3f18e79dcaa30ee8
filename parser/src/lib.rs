use sift_common::QuestionBank;

mod error;
pub use error::{ParseError, ParseWarning};

mod parser;
pub use parser::Parser;

mod raw;

pub fn parse<A: AsRef<str>>(source: A) -> Result<(QuestionBank, Vec<ParseWarning>), ParseError> {
    let mut parser = Parser::new();
    parser.parse(source)
}
