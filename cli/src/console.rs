use std::collections::HashMap;

use sift_runtime::{Command, Element, ProgressMark, TextField, TokenPlacement};

/// Prints orchestrator commands as plain text lines.
#[derive(Debug, Default)]
pub struct Console {
    options: HashMap<usize, String>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders one batch of commands.
    ///
    /// A text field that changes several times in the batch (typewriter
    /// frames) is printed once, at its first position, with its final text.
    pub fn render(&mut self, commands: Vec<Command>) {
        let mut final_texts: HashMap<TextField, String> = HashMap::new();
        for command in &commands {
            if let Command::SetText { field, text } = command {
                final_texts.insert(*field, text.clone());
            }
        }

        for command in commands {
            match command {
                Command::SetText { field, .. } => {
                    if let Some(text) = final_texts.remove(&field) {
                        print_text(field, &text);
                    }
                }
                other => self.print_command(other),
            }
        }
    }

    fn print_command(&mut self, command: Command) {
        match command {
            Command::ShowPanel(panel) => println!("-> {}", panel),
            Command::ShowOption { index, text } => {
                println!("  {}. {}", index + 1, text);
                self.options.insert(index, text);
            }
            Command::HighlightOption(index) => {
                if let Some(text) = self.options.get(&index) {
                    println!("Selected: {}", text);
                }
            }
            Command::ShowScenario { token, text, .. } => println!("  [{}] {}", token, text),
            Command::ShowCategory { zone, name, .. } => println!("  <{}> {}", zone, name),
            Command::MoveToken {
                token, placement, ..
            } => match placement {
                TokenPlacement::Zone(zone) => println!("{} -> {}", token, zone),
                TokenPlacement::Origin => println!("{} returns", token),
                TokenPlacement::Free => {}
            },
            Command::SetProgress { index, mark } => match mark {
                ProgressMark::Correct => println!("Progress {}: correct", index + 1),
                ProgressMark::Incorrect => println!("Progress {}: incorrect", index + 1),
                ProgressMark::Pending => {}
            },
            Command::ResetProgress { .. } => self.options.clear(),
            Command::SetElementVisible {
                element: Element::QuitButton,
                visible: true,
            } => println!("[Quit]"),
            Command::SetElementVisible {
                element: Element::RestartButton,
                visible: true,
            } => println!("[Restart]"),
            Command::Quit => println!("QUIT"),
            Command::PlayCue { cue, volume } => log::trace!("cue {:?} at {:.2}", cue, volume),
            Command::PlayMusic { track, volume } => {
                log::trace!("music {:?} at {:.2}", track, volume)
            }
            Command::SetMusicVolume(volume) => log::trace!("music volume {:.2}", volume),
            _ => {}
        }
    }
}

fn print_text(field: TextField, text: &str) {
    if text.is_empty() {
        return;
    }
    match field {
        TextField::CharacterName => println!("{}:", text),
        TextField::NextButton => println!("[{}]", text),
        _ => println!("{}", text),
    }
}
