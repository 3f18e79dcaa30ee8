use std::fmt;
use std::time::Duration;

use sift_common::{CategoryId, ScenarioId};

use crate::audio::{AudioCue, MusicTrack};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Input delivered by the host front end.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SelectOption(usize),
    Submit,
    DragBegin(ScenarioId),
    DragMove(ScenarioId, Position),
    /// `zone` is the drop zone under the pointer when the drag was released.
    DragEnd {
        token: ScenarioId,
        zone: Option<CategoryId>,
    },
    Next,
    Restart,
    Quit,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::SelectOption(_) => "select option",
            Event::Submit => "submit",
            Event::DragBegin(_) => "drag begin",
            Event::DragMove(..) => "drag move",
            Event::DragEnd { .. } => "drag end",
            Event::Next => "next",
            Event::Restart => "restart",
            Event::Quit => "quit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Dialog,
    Instruction,
    Minigame,
    Feedback,
    Result,
    Completion,
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Panel::Dialog => "DIALOG",
            Panel::Instruction => "INSTRUCTION",
            Panel::Minigame => "MINIGAME",
            Panel::Feedback => "FEEDBACK",
            Panel::Result => "RESULT",
            Panel::Completion => "COMPLETION",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    CharacterName,
    Dialog,
    Question,
    FeedbackHeader,
    Explanation,
    NextButton,
    Result,
    CompletionHeader,
    IpAddress,
    Location,
}

/// Elements that are toggled on and off inside a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    MultipleChoice,
    DragAndDrop,
    GlitchScreen,
    IpAddress,
    Location,
    QuitButton,
    RestartButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMark {
    Pending,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenPlacement {
    Origin,
    Zone(CategoryId),
    Free,
}

/// Output for the host front end, drained with
/// [`Orchestrator::drain_commands`](crate::Orchestrator::drain_commands).
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ShowPanel(Panel),
    SetText {
        field: TextField,
        text: String,
    },
    SetElementVisible {
        element: Element,
        visible: bool,
    },
    ShowOption {
        index: usize,
        text: String,
    },
    SetOptionVisible {
        index: usize,
        visible: bool,
    },
    HighlightOption(usize),
    SetSubmitEnabled(bool),
    ShowScenario {
        slot: usize,
        token: ScenarioId,
        text: String,
        position: Position,
    },
    ShowCategory {
        slot: usize,
        zone: CategoryId,
        name: String,
        position: Position,
    },
    MoveToken {
        token: ScenarioId,
        placement: TokenPlacement,
        position: Position,
    },
    ResetProgress {
        total: usize,
    },
    SetProgress {
        index: usize,
        mark: ProgressMark,
    },
    GlitchFrame {
        offset: Position,
        scale: f32,
    },
    PlayCue {
        cue: AudioCue,
        volume: f32,
    },
    StartLoop {
        cue: AudioCue,
        volume: f32,
        interval: Duration,
    },
    StopLoop(AudioCue),
    PlayMusic {
        track: MusicTrack,
        volume: f32,
    },
    /// Volume of the track already playing.
    SetMusicVolume(f32),
    PauseMusic,
    ResumeMusic,
    StopMusic,
    Quit,
}
