use std::path::Path;
use std::path::PathBuf;

/// A compatibility case: an optional question bank, scripted input and the
/// expected CLI output, all stored as fenced blocks in a markdown file.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    /// TOML question bank; `None` plays the built-in bank.
    pub bank: Option<String>,
    pub input: String,
    pub result: String,
    pub path: PathBuf,
    pub disabled: bool,
}

fn parse_name(content: &str) -> String {
    content
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("# "))
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn parse_markdown_block(content: &str, language: &str) -> Option<String> {
    let (_, rest) = content.split_once(&format!("```{}\n", language))?;
    let (block, _) = rest.split_once("```")?;
    Some(block.trim().to_string())
}

impl TestCase {
    pub fn from_string<A, B>(content: A, path: B) -> Self
    where
        A: AsRef<str>,
        B: AsRef<Path>,
    {
        let content = content.as_ref();
        let name = parse_name(content);
        let bank = parse_markdown_block(content, "toml");
        let input = parse_markdown_block(content, "input").unwrap_or_default();
        let result = parse_markdown_block(content, "result").unwrap_or_default();
        let disabled = content.trim().ends_with("!!! disabled");

        TestCase {
            name,
            bank,
            input,
            result,
            path: path.as_ref().into(),
            disabled,
        }
    }

    /// Input lines joined the way the CLI expects them.
    pub fn input_commands(&self) -> String {
        self.input.lines().collect::<Vec<&str>>().join(",")
    }
}
