use std::fmt;
use std::time::Duration;

use rand::Rng;
use rand_pcg::Pcg32;
use sift_common::validator::{validate_drag_and_drop, validate_multiple_choice};
use sift_common::{Mapping, Question, QuestionBank, QuestionPayload, Session};

use crate::{
    AudioCue, AudioCueManager, Board, BoardEvent, Command, Effect, EffectContext, EffectScheduler,
    Element, Event, Glitch, Panel, PlayArea, ProgressMark, RuntimeError, TextField,
    TokenPlacement, Typewriter,
};

pub const CHARACTER_NAME: &str = "Gavi";
pub const INTRO_DIALOG: &str = "Baiklah tim, saatnya untuk investigasi digital tingkat lanjut! Kita akan trace bukti digital dan pahami cara kerja scam impersonation secara sistematis.";
pub const CORRECT_FEEDBACK: &str = "Benar!";
pub const INCORRECT_FEEDBACK: &str = "Salah!";
pub const SUCCESS_RESULT: &str = "SYSTEM HACKED SUCCESSFULLY! INITIALIZING ...";
pub const FAILURE_RESULT: &str = "404 Not Found, Failed to Patch!";
pub const SUCCESS_HEADER: &str = "Target Secured!";
pub const FAILURE_HEADER: &str = "RESTART THE PROCESS ...";
pub const IP_ADDRESS: &str = "IP Address: 192.168.1.100";
pub const LOCATION: &str = "Location: Jakarta, Indonesia";

/// Option buttons available on the minigame panel.
pub const OPTION_SLOTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    Dialog,
    Instruction,
    Minigame(usize),
    Feedback(usize),
    Result,
    Completion(Outcome),
}

impl fmt::Display for QuizState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizState::Dialog => write!(f, "dialog"),
            QuizState::Instruction => write!(f, "instruction"),
            QuizState::Minigame(index) => write!(f, "question {}", index + 1),
            QuizState::Feedback(index) => write!(f, "feedback {}", index + 1),
            QuizState::Result => write!(f, "result"),
            QuizState::Completion(_) => write!(f, "completion"),
        }
    }
}

/// What the player has entered for the question on screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerState {
    pub selected: Option<usize>,
    pub mapping: Mapping,
}

impl AnswerState {
    pub fn clear(&mut self) {
        self.selected = None;
        self.mapping.clear();
    }
}

/// Drives the quiz from the opening dialog to the completion screen.
///
/// Input arrives through [`handle`](Orchestrator::handle), time through
/// [`tick`](Orchestrator::tick). Everything the front end has to render or
/// play is queued as [`Command`]s.
pub struct Orchestrator<R: Rng = Pcg32> {
    questions: Vec<Question>,
    state: QuizState,
    session: Session,
    answer: AnswerState,
    displayed: Option<Question>,
    board: Board,
    audio: AudioCueManager,
    effects: EffectScheduler,
    rng: R,
    commands: Vec<Command>,
    submit_enabled: bool,
    running: bool,
    ended: bool,
}

impl<R: Rng> Orchestrator<R> {
    pub fn new(bank: QuestionBank, audio: AudioCueManager, rng: R) -> Self {
        Self {
            questions: bank.sanitized().into_questions(),
            state: QuizState::Dialog,
            session: Session::new(),
            answer: AnswerState::default(),
            displayed: None,
            board: Board::default(),
            audio,
            effects: EffectScheduler::new(),
            rng,
            commands: Vec::new(),
            submit_enabled: false,
            running: false,
            ended: false,
        }
    }

    pub fn with_play_area(mut self, area: PlayArea) -> Self {
        self.board = Board::new(area);
        self
    }

    pub fn start(&mut self) {
        log::debug!("starting quiz with {} questions", self.questions.len());
        self.running = true;
        self.ended = false;
        self.session.reset();
        self.answer.clear();
        self.board.clear();
        self.displayed = None;

        self.emit(Command::ResetProgress {
            total: self.questions.len(),
        });
        let fade = self.audio.on_menu_return();
        self.start_effect(Box::new(fade));
        self.show_dialog();
    }

    pub fn stop(&mut self) {
        self.cancel_effects();
        self.running = false;
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn has_ended(&self) -> bool {
        self.ended
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question on screen, with options in the order they are shown.
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            QuizState::Minigame(_) | QuizState::Feedback(_) => self.displayed.as_ref(),
            _ => None,
        }
    }

    pub fn answer(&self) -> &AnswerState {
        &self.answer
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn audio(&self) -> &AudioCueManager {
        &self.audio
    }

    /// Settings changes go through here so their commands are queued.
    pub fn audio_mut(&mut self) -> &mut AudioCueManager {
        &mut self.audio
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn drain_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn tick(&mut self, elapsed: Duration) {
        let mut ctx = EffectContext {
            commands: &mut self.commands,
            audio: &mut self.audio,
        };
        self.effects.tick(elapsed, &mut ctx);
    }

    /// Completes every running effect immediately.
    pub fn finish_effects(&mut self) {
        let mut ctx = EffectContext {
            commands: &mut self.commands,
            audio: &mut self.audio,
        };
        self.effects.finish_all(&mut ctx);
    }

    pub fn handle(&mut self, event: Event) -> Result<(), RuntimeError> {
        if !self.running {
            return Err(RuntimeError::NotRunning);
        }

        match (self.state, event) {
            (QuizState::Dialog, Event::Next) => {
                self.click();
                self.show_instruction();
            }
            (QuizState::Instruction, Event::Next) => {
                self.click();
                self.start_minigame();
            }
            (QuizState::Minigame(_), Event::SelectOption(index)) => {
                self.select_option(index)?;
            }
            (QuizState::Minigame(index), Event::Submit) => {
                self.submit(index)?;
            }
            (QuizState::Minigame(_), Event::DragBegin(token)) => {
                self.require_drag_and_drop("drag begin")?;
                let events = self.board.begin_drag(&token)?;
                self.apply_board_events(events);
            }
            (QuizState::Minigame(_), Event::DragMove(token, position)) => {
                self.require_drag_and_drop("drag move")?;
                if let Some(position) = self.board.move_drag(&token, position)? {
                    self.emit(Command::MoveToken {
                        token,
                        placement: TokenPlacement::Free,
                        position,
                    });
                }
            }
            (QuizState::Minigame(_), Event::DragEnd { token, zone }) => {
                self.require_drag_and_drop("drag end")?;
                let events = self.board.end_drag(&token, zone.as_deref())?;
                self.apply_board_events(events);
            }
            (QuizState::Feedback(index), Event::Next) => {
                self.click();
                if index + 1 < self.questions.len() {
                    self.display_question(index + 1);
                } else {
                    self.show_result();
                }
            }
            (QuizState::Result, Event::Next) => {
                self.click();
                self.show_completion();
            }
            (QuizState::Completion(Outcome::Success), Event::Quit) => {
                self.click();
                self.quit();
            }
            (QuizState::Completion(Outcome::Failure), Event::Restart) => {
                self.click();
                self.restart();
            }
            (_, event) => return Err(self.unexpected(event.name())),
        }

        Ok(())
    }

    fn show_dialog(&mut self) {
        self.enter(QuizState::Dialog, Panel::Dialog);
        self.set_text(TextField::CharacterName, CHARACTER_NAME);
        self.start_effect(Box::new(Typewriter::new(TextField::Dialog, INTRO_DIALOG)));
    }

    fn show_instruction(&mut self) {
        self.enter(QuizState::Instruction, Panel::Instruction);
        let seed = self.rng.gen();
        self.start_effect(Box::new(Glitch::new(seed)));
    }

    fn start_minigame(&mut self) {
        let fade = self.audio.on_game_start();
        self.start_effect(Box::new(fade));
        self.display_question(0);
    }

    fn display_question(&mut self, index: usize) {
        self.enter(QuizState::Minigame(index), Panel::Minigame);
        self.session.current_question_index = index;
        self.answer.clear();
        self.set_submit_enabled(false);

        let question = self.questions[index].clone();
        log::debug!("showing question `{}`", question.id);
        self.set_text(TextField::Question, &question.prompt);

        match &question.payload {
            QuestionPayload::MultipleChoice(_) => {
                self.set_visible(Element::MultipleChoice, true);
                self.set_visible(Element::DragAndDrop, false);
                self.board.clear();

                let shown = match question.with_shuffled_options(&mut self.rng) {
                    Some(shuffled) => shuffled,
                    None => question.clone(),
                };
                let options = shown
                    .as_multiple_choice()
                    .map(|data| data.options.clone())
                    .unwrap_or_default();

                for slot in 0..OPTION_SLOTS.max(options.len()) {
                    match options.get(slot) {
                        Some(text) => {
                            self.emit(Command::ShowOption {
                                index: slot,
                                text: text.clone(),
                            });
                            self.emit(Command::SetOptionVisible {
                                index: slot,
                                visible: true,
                            });
                        }
                        None => self.emit(Command::SetOptionVisible {
                            index: slot,
                            visible: false,
                        }),
                    }
                }
                self.displayed = Some(shown);
            }
            QuestionPayload::DragAndDrop(data) => {
                self.set_visible(Element::MultipleChoice, false);
                self.set_visible(Element::DragAndDrop, true);

                let scenarios = question.shuffled_scenarios(&mut self.rng);
                self.board.setup(&scenarios, &data.categories);

                for (slot, (scenario, token)) in scenarios.iter().zip(self.board.tokens()).enumerate() {
                    self.commands.push(Command::ShowScenario {
                        slot,
                        token: scenario.id.clone(),
                        text: scenario.description.clone(),
                        position: token.original_position,
                    });
                }
                for (slot, (category, zone)) in data.categories.iter().zip(self.board.zones()).enumerate() {
                    self.commands.push(Command::ShowCategory {
                        slot,
                        zone: category.id.clone(),
                        name: category.name.clone(),
                        position: zone.position,
                    });
                }
                self.displayed = Some(question.clone());
            }
        }
    }

    fn select_option(&mut self, index: usize) -> Result<(), RuntimeError> {
        let total = match self.displayed.as_ref().and_then(Question::as_multiple_choice) {
            Some(data) => data.options.len(),
            None => return Err(self.unexpected("select option")),
        };
        if index >= total {
            return Err(RuntimeError::InvalidOption { index, total });
        }

        self.click();
        self.answer.selected = Some(index);
        self.emit(Command::HighlightOption(index));
        self.set_submit_enabled(true);
        Ok(())
    }

    fn submit(&mut self, index: usize) -> Result<(), RuntimeError> {
        if !self.submit_enabled {
            return Err(RuntimeError::SubmitDisabled);
        }
        let question = match self.displayed.clone() {
            Some(question) => question,
            None => return Err(RuntimeError::SubmitDisabled),
        };

        self.click();
        let correct = match question.payload {
            QuestionPayload::MultipleChoice(_) => {
                let selected = self.answer.selected.unwrap_or_default();
                let correct = validate_multiple_choice(&question, selected);
                self.session
                    .record_multiple_choice(&question.id, selected, correct);
                correct
            }
            QuestionPayload::DragAndDrop(_) => {
                let mapping = self.answer.mapping.clone();
                let correct = validate_drag_and_drop(&question, &mapping);
                self.session
                    .record_drag_and_drop(&question.id, mapping, correct);
                correct
            }
        };
        log::debug!("question `{}` answered, correct: {}", question.id, correct);

        self.emit(Command::SetProgress {
            index,
            mark: if correct {
                ProgressMark::Correct
            } else {
                ProgressMark::Incorrect
            },
        });
        if let Some(cue) = self.audio.on_question_result(correct) {
            self.emit(cue);
        }

        self.show_feedback(index, correct, &question.explanation);
        Ok(())
    }

    fn show_feedback(&mut self, index: usize, correct: bool, explanation: &str) {
        self.enter(QuizState::Feedback(index), Panel::Feedback);
        self.set_text(
            TextField::FeedbackHeader,
            if correct {
                CORRECT_FEEDBACK
            } else {
                INCORRECT_FEEDBACK
            },
        );
        self.start_effect(Box::new(Typewriter::new(TextField::Explanation, explanation)));

        let last = index + 1 >= self.questions.len();
        self.set_text(TextField::NextButton, if last { "Result" } else { "Next" });
    }

    fn show_result(&mut self) {
        self.enter(QuizState::Result, Panel::Result);
        let success = self.session.all_correct();
        log::debug!(
            "quiz finished with {}/{} correct",
            self.session.correct_count(),
            self.session.answered()
        );

        let cues = self.audio.on_game_end(success);
        self.commands.extend(cues);
        let message = if success {
            SUCCESS_RESULT
        } else {
            FAILURE_RESULT
        };
        self.start_effect(Box::new(Typewriter::new(TextField::Result, message)));
    }

    fn show_completion(&mut self) {
        let outcome = if self.session.all_correct() {
            Outcome::Success
        } else {
            Outcome::Failure
        };
        self.enter(QuizState::Completion(outcome), Panel::Completion);

        match outcome {
            Outcome::Success => {
                self.set_text(TextField::CompletionHeader, SUCCESS_HEADER);
                self.set_text(TextField::IpAddress, IP_ADDRESS);
                self.set_visible(Element::IpAddress, true);
                self.set_text(TextField::Location, LOCATION);
                self.set_visible(Element::Location, true);
                self.set_visible(Element::QuitButton, true);
                self.set_visible(Element::RestartButton, false);
            }
            Outcome::Failure => {
                self.set_text(TextField::CompletionHeader, FAILURE_HEADER);
                self.set_visible(Element::IpAddress, false);
                self.set_visible(Element::Location, false);
                self.set_visible(Element::QuitButton, false);
                self.set_visible(Element::RestartButton, true);
            }
        }
    }

    fn restart(&mut self) {
        log::debug!("restarting quiz");
        self.session.reset();
        self.answer.clear();
        self.board.reset();
        self.displayed = None;
        self.set_submit_enabled(false);
        self.emit(Command::ResetProgress {
            total: self.questions.len(),
        });
        self.show_instruction();
    }

    fn quit(&mut self) {
        self.cancel_effects();
        let fade = self.audio.on_menu_return();
        self.start_effect(Box::new(fade));
        self.emit(Command::Quit);
        self.running = false;
        self.ended = true;
    }

    fn apply_board_events(&mut self, events: Vec<BoardEvent>) {
        for event in events {
            match event {
                BoardEvent::Paired { token, zone } => {
                    self.answer.mapping.insert(token, zone);
                    if let Some(cue) = self.audio.play(AudioCue::DragDrop) {
                        self.emit(cue);
                    }
                }
                BoardEvent::Unpaired { token, zone } => {
                    if self.answer.mapping.get(&token) == Some(&zone) {
                        self.answer.mapping.remove(&token);
                    }
                }
                BoardEvent::Moved {
                    token,
                    placement,
                    position,
                } => self.emit(Command::MoveToken {
                    token,
                    placement,
                    position,
                }),
            }
        }

        let all_paired = match self.displayed.as_ref().and_then(Question::as_drag_and_drop) {
            Some(data) => data
                .scenarios
                .iter()
                .all(|scenario| self.answer.mapping.contains_key(&scenario.id)),
            None => false,
        };
        self.set_submit_enabled(all_paired);
    }

    fn require_drag_and_drop(&self, event: &'static str) -> Result<(), RuntimeError> {
        match self.displayed.as_ref().and_then(Question::as_drag_and_drop) {
            Some(_) => Ok(()),
            None => Err(self.unexpected(event)),
        }
    }

    fn unexpected(&self, event: &'static str) -> RuntimeError {
        log::warn!("ignoring {} during {}", event, self.state);
        RuntimeError::UnexpectedEvent {
            event,
            state: self.state.to_string(),
        }
    }

    fn enter(&mut self, state: QuizState, panel: Panel) {
        log::debug!("{} -> {}", self.state, state);
        let mut ctx = EffectContext {
            commands: &mut self.commands,
            audio: &mut self.audio,
        };
        self.effects.cancel_panel_effects(&mut ctx);
        self.state = state;
        self.emit(Command::ShowPanel(panel));
    }

    fn start_effect(&mut self, effect: Box<dyn Effect>) {
        let mut ctx = EffectContext {
            commands: &mut self.commands,
            audio: &mut self.audio,
        };
        self.effects.start(effect, &mut ctx);
    }

    fn cancel_effects(&mut self) {
        let mut ctx = EffectContext {
            commands: &mut self.commands,
            audio: &mut self.audio,
        };
        self.effects.cancel_all(&mut ctx);
    }

    fn click(&mut self) {
        if let Some(cue) = self.audio.play(AudioCue::ButtonClick) {
            self.emit(cue);
        }
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
        self.emit(Command::SetSubmitEnabled(enabled));
    }

    fn set_text(&mut self, field: TextField, text: &str) {
        self.emit(Command::SetText {
            field,
            text: text.to_string(),
        });
    }

    fn set_visible(&mut self, element: Element, visible: bool) {
        self.emit(Command::SetElementVisible { element, visible });
    }

    fn emit(&mut self, command: Command) {
        self.commands.push(command);
    }
}

impl<R: Rng> fmt::Debug for Orchestrator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("state", &self.state)
            .field("session", &self.session)
            .field("answer", &self.answer)
            .field("running", &self.running)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{MusicTrack, Position, TokenState};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use sift_common::test_case::TestCase;
    use sift_common::MemorySettingsStore;

    fn orchestrator(bank: QuestionBank) -> Orchestrator<StepRng> {
        let audio = AudioCueManager::new(Box::new(MemorySettingsStore::default()));
        let mut orchestrator = Orchestrator::new(bank, audio, StepRng::new(0, 0));
        orchestrator.start();
        orchestrator
    }

    fn texts(commands: &[Command], wanted: TextField) -> Vec<String> {
        commands
            .iter()
            .filter_map(|command| match command {
                Command::SetText { field, text } if *field == wanted => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn to_first_question<R: Rng>(orchestrator: &mut Orchestrator<R>) {
        orchestrator.handle(Event::Next).unwrap();
        orchestrator.handle(Event::Next).unwrap();
    }

    fn drag(orchestrator: &mut Orchestrator<impl Rng>, token: &str, zone: &str) {
        orchestrator
            .handle(Event::DragBegin(token.to_string()))
            .unwrap();
        orchestrator
            .handle(Event::DragEnd {
                token: token.to_string(),
                zone: Some(zone.to_string()),
            })
            .unwrap();
    }

    fn answer<R: Rng>(orchestrator: &mut Orchestrator<R>, correctly: bool) {
        let question = orchestrator.current_question().unwrap().clone();
        match &question.payload {
            QuestionPayload::MultipleChoice(data) => {
                let choice = if correctly {
                    data.correct_index
                } else {
                    (data.correct_index + 1) % data.options.len()
                };
                orchestrator.handle(Event::SelectOption(choice)).unwrap();
            }
            QuestionPayload::DragAndDrop(data) => {
                let total = data.correct_pairs.len();
                for (index, pair) in data.correct_pairs.iter().enumerate() {
                    let target = if correctly {
                        &pair.category_id
                    } else {
                        &data.correct_pairs[(index + 1) % total].category_id
                    };
                    drag(orchestrator, &pair.scenario_id, target);
                }
            }
        }
        orchestrator.handle(Event::Submit).unwrap();
        orchestrator.handle(Event::Next).unwrap();
    }

    #[test]
    fn start_shows_the_dialog() {
        let mut orchestrator = orchestrator(QuestionBank::builtin());
        orchestrator.finish_effects();
        let commands = orchestrator.drain_commands();

        assert_eq!(orchestrator.state(), QuizState::Dialog);
        assert_eq!(commands[0], Command::ResetProgress { total: 6 });
        assert!(commands.contains(&Command::PlayMusic {
            track: MusicTrack::Menu,
            volume: 0.7
        }));
        assert!(commands.contains(&Command::ShowPanel(Panel::Dialog)));
        assert_eq!(texts(&commands, TextField::CharacterName), vec!["Gavi"]);
        assert_eq!(
            texts(&commands, TextField::Dialog).last().unwrap(),
            INTRO_DIALOG
        );
    }

    #[test]
    fn events_before_start_are_rejected() {
        let audio = AudioCueManager::new(Box::new(MemorySettingsStore::default()));
        let mut orchestrator = Orchestrator::new(QuestionBank::builtin(), audio, StepRng::new(0, 0));

        assert_eq!(orchestrator.handle(Event::Next), Err(RuntimeError::NotRunning));
    }

    #[test]
    fn unexpected_events_leave_the_state_alone() {
        let mut orchestrator = orchestrator(QuestionBank::builtin());

        let err = orchestrator.handle(Event::Submit).unwrap_err();

        assert_eq!(
            err,
            RuntimeError::UnexpectedEvent {
                event: "submit",
                state: "dialog".to_string()
            }
        );
        assert_eq!(err.to_string(), "ERROR: Cannot submit during dialog");
        assert_eq!(orchestrator.state(), QuizState::Dialog);
    }

    #[test]
    fn instruction_runs_the_glitch_effect() {
        let mut orchestrator = orchestrator(QuestionBank::builtin());
        orchestrator.handle(Event::Next).unwrap();
        orchestrator.tick(Duration::from_secs(3));
        let commands = orchestrator.drain_commands();

        assert_eq!(orchestrator.state(), QuizState::Instruction);
        assert!(commands.contains(&Command::ShowPanel(Panel::Instruction)));
        assert!(commands
            .iter()
            .any(|command| matches!(command, Command::PlayCue { cue: AudioCue::Glitch, .. })));
        assert_eq!(
            commands.last(),
            Some(&Command::SetElementVisible {
                element: Element::GlitchScreen,
                visible: false
            })
        );
    }

    #[test]
    fn options_are_shown_shuffled() {
        let mut orchestrator = orchestrator(QuestionBank::builtin());
        to_first_question(&mut orchestrator);
        orchestrator.finish_effects();
        let commands = orchestrator.drain_commands();

        let original = QuestionBank::builtin().all_questions()[0].clone();
        let original = original.as_multiple_choice().unwrap();
        let shown = orchestrator.current_question().unwrap().as_multiple_choice().unwrap();

        assert_eq!(orchestrator.state(), QuizState::Minigame(0));
        assert_eq!(shown.options[0], original.options[1]);
        assert_eq!(shown.options[3], original.options[0]);
        assert_eq!(shown.options[shown.correct_index], original.options[original.correct_index]);
        assert!(commands.contains(&Command::ShowOption {
            index: 0,
            text: original.options[1].clone()
        }));
        assert!(commands.contains(&Command::SetSubmitEnabled(false)));
        assert!(commands.contains(&Command::PlayMusic {
            track: MusicTrack::Gameplay,
            volume: 0.7
        }));
    }

    #[test]
    fn unused_option_slots_are_hidden() {
        let bank = QuestionBank::new(vec![Question::multiple_choice(
            "Q1",
            "Pick",
            "Because",
            vec!["yes".to_string(), "no".to_string()],
            0,
        )]);
        let mut orchestrator = orchestrator(bank);
        to_first_question(&mut orchestrator);
        let commands = orchestrator.drain_commands();

        for slot in 2..OPTION_SLOTS {
            assert!(commands.contains(&Command::SetOptionVisible {
                index: slot,
                visible: false
            }));
        }
    }

    #[test]
    fn submit_requires_a_selection() {
        let mut orchestrator = orchestrator(QuestionBank::builtin());
        to_first_question(&mut orchestrator);

        assert_eq!(orchestrator.handle(Event::Submit), Err(RuntimeError::SubmitDisabled));
        assert_eq!(
            orchestrator.handle(Event::SelectOption(7)),
            Err(RuntimeError::InvalidOption { index: 7, total: 4 })
        );
        assert!(!orchestrator.submit_enabled());

        orchestrator.handle(Event::SelectOption(2)).unwrap();
        assert!(orchestrator.submit_enabled());
        assert_eq!(orchestrator.answer().selected, Some(2));
    }

    #[test]
    fn drag_events_on_a_multiple_choice_question_are_rejected() {
        let mut orchestrator = orchestrator(QuestionBank::builtin());
        to_first_question(&mut orchestrator);

        assert!(matches!(
            orchestrator.handle(Event::DragBegin("scenario_A".to_string())),
            Err(RuntimeError::UnexpectedEvent { event: "drag begin", .. })
        ));
    }

    #[test]
    fn feedback_reports_the_answer() {
        let mut orchestrator = orchestrator(QuestionBank::builtin());
        to_first_question(&mut orchestrator);
        let correct = orchestrator
            .current_question()
            .unwrap()
            .as_multiple_choice()
            .unwrap()
            .correct_index;
        orchestrator.handle(Event::SelectOption(correct)).unwrap();
        orchestrator.drain_commands();

        orchestrator.handle(Event::Submit).unwrap();
        orchestrator.finish_effects();
        let commands = orchestrator.drain_commands();

        assert_eq!(orchestrator.state(), QuizState::Feedback(0));
        assert_eq!(orchestrator.session().results, vec![true]);
        assert_eq!(
            orchestrator.session().multiple_choice_answers.get("Q001"),
            Some(&correct)
        );
        assert!(commands.contains(&Command::SetProgress {
            index: 0,
            mark: ProgressMark::Correct
        }));
        assert!(commands
            .iter()
            .any(|command| matches!(command, Command::PlayCue { cue: AudioCue::Success, .. })));
        assert_eq!(texts(&commands, TextField::FeedbackHeader), vec!["Benar!"]);
        assert_eq!(texts(&commands, TextField::NextButton), vec!["Next"]);
        assert_eq!(
            texts(&commands, TextField::Explanation).last().unwrap(),
            &QuestionBank::builtin().all_questions()[0].explanation
        );
    }

    #[test]
    fn all_correct_answers_secure_the_target() {
        let mut orchestrator = orchestrator(QuestionBank::builtin());
        to_first_question(&mut orchestrator);
        for _ in 0..6 {
            answer(&mut orchestrator, true);
        }
        assert_eq!(orchestrator.state(), QuizState::Result);
        orchestrator.finish_effects();
        orchestrator.handle(Event::Next).unwrap();
        let commands = orchestrator.drain_commands();

        assert_eq!(orchestrator.state(), QuizState::Completion(Outcome::Success));
        assert_eq!(orchestrator.session().results, vec![true; 6]);
        assert_eq!(texts(&commands, TextField::Result).last().unwrap(), SUCCESS_RESULT);
        assert_eq!(texts(&commands, TextField::CompletionHeader), vec![SUCCESS_HEADER]);
        assert_eq!(texts(&commands, TextField::IpAddress), vec![IP_ADDRESS]);
        assert!(commands.contains(&Command::SetElementVisible {
            element: Element::RestartButton,
            visible: false
        }));

        assert!(orchestrator.handle(Event::Restart).is_err());
        orchestrator.handle(Event::Quit).unwrap();
        let commands = orchestrator.drain_commands();
        assert_eq!(commands.last(), Some(&Command::Quit));
        orchestrator.finish_effects();
        let commands = orchestrator.drain_commands();
        assert_eq!(
            commands,
            vec![
                Command::StopMusic,
                Command::PlayMusic {
                    track: MusicTrack::Menu,
                    volume: 0.7
                }
            ]
        );
        assert!(orchestrator.has_ended());
        assert_eq!(orchestrator.handle(Event::Next), Err(RuntimeError::NotRunning));
    }

    #[test]
    fn one_wrong_answer_fails_and_restart_resets() {
        let mut orchestrator = orchestrator(QuestionBank::builtin());
        to_first_question(&mut orchestrator);
        answer(&mut orchestrator, true);
        answer(&mut orchestrator, false);
        for _ in 0..4 {
            answer(&mut orchestrator, true);
        }
        orchestrator.finish_effects();
        orchestrator.handle(Event::Next).unwrap();
        let commands = orchestrator.drain_commands();

        assert_eq!(orchestrator.state(), QuizState::Completion(Outcome::Failure));
        assert_eq!(orchestrator.session().correct_count(), 5);
        assert_eq!(texts(&commands, TextField::Result).last().unwrap(), FAILURE_RESULT);
        assert_eq!(texts(&commands, TextField::CompletionHeader), vec![FAILURE_HEADER]);
        assert!(commands.contains(&Command::SetProgress {
            index: 1,
            mark: ProgressMark::Incorrect
        }));
        assert!(orchestrator.handle(Event::Quit).is_err());
        assert!(orchestrator
            .board()
            .tokens()
            .iter()
            .all(|token| token.zone().is_some()));
        assert!(orchestrator.board().zones().iter().any(|zone| !zone.is_empty()));

        orchestrator.handle(Event::Restart).unwrap();
        let commands = orchestrator.drain_commands();

        assert_eq!(orchestrator.state(), QuizState::Instruction);
        assert!(orchestrator.session().results.is_empty());
        assert!(orchestrator
            .board()
            .tokens()
            .iter()
            .all(|token| token.state == TokenState::Idle && token.position == token.original_position));
        assert!(orchestrator.board().zones().iter().all(|zone| zone.is_empty()));
        assert!(orchestrator.answer().mapping.is_empty());
        assert!(commands.contains(&Command::ResetProgress { total: 6 }));

        orchestrator.handle(Event::Next).unwrap();
        assert_eq!(orchestrator.state(), QuizState::Minigame(0));
    }

    #[test]
    fn drag_and_drop_enables_submit_once_everything_is_paired() {
        let mut orchestrator = orchestrator(QuestionBank::builtin());
        to_first_question(&mut orchestrator);
        for _ in 0..5 {
            answer(&mut orchestrator, true);
        }
        assert_eq!(orchestrator.state(), QuizState::Minigame(5));
        let commands = orchestrator.drain_commands();
        assert!(commands
            .iter()
            .any(|command| matches!(command, Command::ShowCategory { zone, .. } if zone == "cat_malinformasi")));

        drag(&mut orchestrator, "scenario_A", "cat_disinformasi");
        drag(&mut orchestrator, "scenario_B", "cat_misinformasi");
        assert!(!orchestrator.submit_enabled());
        assert_eq!(orchestrator.handle(Event::Submit), Err(RuntimeError::SubmitDisabled));

        drag(&mut orchestrator, "scenario_C", "cat_malinformasi");
        assert!(orchestrator.submit_enabled());

        orchestrator.handle(Event::Submit).unwrap();
        orchestrator.finish_effects();
        let commands = orchestrator.drain_commands();

        assert_eq!(orchestrator.session().results, vec![true; 6]);
        assert_eq!(orchestrator.session().drag_drop_answers["Q006"].len(), 3);
        assert_eq!(texts(&commands, TextField::NextButton), vec!["Result"]);
    }

    #[test]
    fn evicted_token_is_unpaired_before_the_new_pair() {
        let mut orchestrator = orchestrator(QuestionBank::builtin());
        to_first_question(&mut orchestrator);
        for _ in 0..5 {
            answer(&mut orchestrator, true);
        }
        drag(&mut orchestrator, "scenario_A", "cat_disinformasi");
        orchestrator.drain_commands();

        drag(&mut orchestrator, "scenario_B", "cat_disinformasi");
        let commands = orchestrator.drain_commands();

        let evicted = commands
            .iter()
            .position(|command| {
                matches!(command, Command::MoveToken { token, placement: TokenPlacement::Origin, .. } if token == "scenario_A")
            })
            .unwrap();
        let placed = commands
            .iter()
            .position(|command| {
                matches!(command, Command::MoveToken { token, placement: TokenPlacement::Zone(_), .. } if token == "scenario_B")
            })
            .unwrap();
        assert!(evicted < placed);
        assert_eq!(orchestrator.answer().mapping.len(), 1);
        assert_eq!(
            orchestrator.answer().mapping.get("scenario_B").map(String::as_str),
            Some("cat_disinformasi")
        );
        assert_eq!(commands.last(), Some(&Command::SetSubmitEnabled(false)));
    }

    #[test]
    fn dragging_outside_the_area_is_clamped() {
        let mut orchestrator = orchestrator(QuestionBank::builtin());
        to_first_question(&mut orchestrator);
        for _ in 0..5 {
            answer(&mut orchestrator, true);
        }
        orchestrator
            .handle(Event::DragBegin("scenario_C".to_string()))
            .unwrap();
        orchestrator.drain_commands();

        orchestrator
            .handle(Event::DragMove(
                "scenario_C".to_string(),
                Position::new(-9000.0, 9000.0),
            ))
            .unwrap();

        assert_eq!(
            orchestrator.drain_commands(),
            vec![Command::MoveToken {
                token: "scenario_C".to_string(),
                placement: TokenPlacement::Free,
                position: Position::new(-750.0, 400.0),
            }]
        );
        orchestrator
            .handle(Event::DragEnd {
                token: "scenario_C".to_string(),
                zone: Some("cat_unknown".to_string()),
            })
            .unwrap();

        let token = orchestrator.board().token("scenario_C").unwrap().clone();
        assert_eq!(token.state, TokenState::Idle);
        assert_eq!(token.position, token.original_position);
        assert_eq!(
            orchestrator.drain_commands(),
            vec![
                Command::MoveToken {
                    token: "scenario_C".to_string(),
                    placement: TokenPlacement::Origin,
                    position: token.original_position,
                },
                Command::SetSubmitEnabled(false),
            ]
        );
    }

    #[test]
    fn stopping_cancels_effects_and_rejects_events() {
        let mut orchestrator = orchestrator(QuestionBank::builtin());
        orchestrator.drain_commands();

        orchestrator.stop();

        assert!(!orchestrator.running());
        assert!(!orchestrator.has_ended());
        assert_eq!(
            orchestrator.drain_commands(),
            vec![Command::StopLoop(AudioCue::Typewriter)]
        );
        orchestrator.finish_effects();
        assert!(orchestrator.drain_commands().is_empty());
        assert_eq!(orchestrator.handle(Event::Next), Err(RuntimeError::NotRunning));
    }

    #[test]
    fn music_fade_survives_panel_changes() {
        let mut orchestrator = orchestrator(QuestionBank::builtin());
        orchestrator.handle(Event::Next).unwrap();
        orchestrator.tick(Duration::from_millis(700));
        orchestrator.handle(Event::Next).unwrap();
        orchestrator.drain_commands();

        orchestrator.tick(Duration::from_millis(700));

        assert!(orchestrator.drain_commands().contains(&Command::PlayMusic {
            track: MusicTrack::Gameplay,
            volume: 0.0
        }));
        assert_eq!(orchestrator.audio().current_track(), Some(MusicTrack::Gameplay));
    }

    #[test]
    fn dropping_a_paired_token_on_an_unknown_zone_unpairs_it() {
        let mut orchestrator = orchestrator(QuestionBank::builtin());
        to_first_question(&mut orchestrator);
        for _ in 0..5 {
            answer(&mut orchestrator, true);
        }
        drag(&mut orchestrator, "scenario_A", "cat_disinformasi");
        assert!(orchestrator.answer().mapping.contains_key("scenario_A"));

        orchestrator
            .handle(Event::DragBegin("scenario_A".to_string()))
            .unwrap();
        orchestrator
            .handle(Event::DragEnd {
                token: "scenario_A".to_string(),
                zone: Some("cat_unknown".to_string()),
            })
            .unwrap();

        let token = orchestrator.board().token("scenario_A").unwrap();
        assert_eq!(token.state, TokenState::Idle);
        assert_eq!(token.position, token.original_position);
        assert!(orchestrator.board().zone("cat_disinformasi").unwrap().is_empty());
        assert!(!orchestrator.answer().mapping.contains_key("scenario_A"));
        assert!(!orchestrator.submit_enabled());
    }

    #[test]
    fn empty_bank_plays_the_fallback_question() {
        let mut orchestrator = orchestrator(QuestionBank::default());
        assert_eq!(orchestrator.questions().len(), 1);
        assert_eq!(orchestrator.questions()[0].id, "fallback_1");

        to_first_question(&mut orchestrator);
        answer(&mut orchestrator, true);
        assert_eq!(orchestrator.state(), QuizState::Result);
    }

    #[test]
    fn plays_the_compatibility_bank_with_a_seeded_rng() {
        let test_case = TestCase::from_string(
            include_str!("../../compatibility-tests/00000000002-single-drag-and-drop.md"),
            "00000000002-single-drag-and-drop.md",
        );
        let (bank, _) = sift_parser::parse(test_case.bank.unwrap()).unwrap();
        let audio = AudioCueManager::new(Box::new(MemorySettingsStore::default()));
        let mut orchestrator = Orchestrator::new(bank, audio, Pcg32::seed_from_u64(42));
        orchestrator.start();

        to_first_question(&mut orchestrator);
        answer(&mut orchestrator, true);
        orchestrator.handle(Event::Next).unwrap();

        assert_eq!(orchestrator.state(), QuizState::Completion(Outcome::Success));
    }
}
