// Terminal front end - command parsing, screen rendering and the input loop
//
// Screens are rendered to plain strings from an AppState snapshot so they can be
// tested without a terminal; colour is only added when printing.

use crate::i18n::{self, Text};
use crate::models::{
    ApiStats, AppState, HealthStatus, Language, QuizSession, Screen, UploadSummary,
};
use crate::services::{OnboardingGuide, QuizApi, StepStatus};
use crate::ui::controller::{BackOutcome, QuizController};
use crate::ui::toast::{Toast, ToastLevel};
use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use crossterm::style::Stylize;
use std::fmt::Write as _;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::{mpsc, watch};

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Deck(Option<String>),
    Restart,
    Select(String),
    Check,
    Next,
    Prev,
    Hints,
    Language,
    Browse,
    Search(String),
    Page(PageMove),
    PerPage(usize),
    View(usize),
    Finish,
    Back,
    Upload(Utf8PathBuf),
    Stats,
    DeckStats,
    Health,
    Guide,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMove {
    Next,
    Prev,
    To(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty input")]
    Empty,

    #[error("Unknown command: {0} (type `help`)")]
    Unknown(String),

    #[error("`{command}` needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("Not a number: {0}")]
    InvalidNumber(String),
}

impl std::str::FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "start" => Command::Start,
            "deck" => Command::Deck(non_empty(rest)),
            "restart" => Command::Restart,
            "check" => Command::Check,
            "next" => Command::Next,
            "prev" => Command::Prev,
            "hints" => Command::Hints,
            "lang" => Command::Language,
            "browse" => Command::Browse,
            "search" | "/" => Command::Search(rest.to_string()),
            "page" => match rest {
                "" => {
                    return Err(CommandError::MissingArgument {
                        command: "page",
                        expected: "next, prev or a page number",
                    });
                }
                "next" | "+" => Command::Page(PageMove::Next),
                "prev" | "-" => Command::Page(PageMove::Prev),
                number => Command::Page(PageMove::To(parse_number(number)?)),
            },
            "per-page" => Command::PerPage(parse_number(require(rest, "per-page", "a count")?)?),
            "view" => {
                let position = parse_number(require(rest, "view", "a question number")?)?;
                Command::View(position.saturating_sub(1))
            }
            "finish" => Command::Finish,
            "back" => Command::Back,
            "upload" => {
                Command::Upload(Utf8PathBuf::from(require(rest, "upload", "a file path")?))
            }
            "stats" => Command::Stats,
            "decks" => Command::DeckStats,
            "health" => Command::Health,
            "guide" => Command::Guide,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ if rest.is_empty() && is_option_token(word) => Command::Select(word.to_string()),
            _ => return Err(CommandError::Unknown(word.to_string())),
        };
        Ok(command)
    }
}

fn non_empty(rest: &str) -> Option<String> {
    (!rest.is_empty()).then(|| rest.to_string())
}

fn require<'a>(
    rest: &'a str,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, expected })
    } else {
        Ok(rest)
    }
}

fn parse_number(text: &str) -> Result<usize, CommandError> {
    text.parse()
        .map_err(|_| CommandError::InvalidNumber(text.to_string()))
}

/// A single option letter or a 1-based option number
fn is_option_token(word: &str) -> bool {
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => true,
        _ => word.parse::<usize>().is_ok(),
    }
}

/// Single letters and numbers always select an option, so commands are whole words
pub const HELP: &str = "\
Commands:
  start                  start a random quiz
  deck [category]        start a shuffled deck (category `all` for everything)
  restart                start the same kind of quiz again
  <letter> | <number>    select an option
  check                  check the selected answer
  next, prev             move between questions
  hints                  show or hide study hints
  lang                   switch between English and Russian
  browse                 browse questions
  search <text>          search questions
  page next|prev|<n>     change page
  per-page <n>           questions per page
  view <n>               open question n of the current page
  finish                 show results
  back                   return to the welcome screen
  upload <file.json>     upload a Telegram export
  stats, health          server statistics and status
  decks                  question counts per deck category
  guide                  how to export a chat from Telegram
  quit                   exit";

// ----------------------------------------------------------------------
// Rendering
// ----------------------------------------------------------------------

/// Render the current screen as plain text
pub fn render(state: &AppState) -> String {
    match state.screen {
        Screen::Welcome => render_welcome(state.language),
        Screen::Quiz => match &state.session {
            Some(session) => render_quiz(state, session),
            None => render_welcome(state.language),
        },
        Screen::Browse => render_browse(state),
        Screen::Results => render_results(state),
    }
}

fn render_welcome(lang: Language) -> String {
    format!(
        "{}\n{}\n\n[start] {}   [browse] {}   [upload] {}\n",
        i18n::t(lang, Text::WelcomeTitle),
        i18n::t(lang, Text::WelcomeSubtitle),
        i18n::t(lang, Text::StartQuiz),
        i18n::t(lang, Text::BrowseQuestions),
        i18n::t(lang, Text::UploadJson),
    )
}

fn render_quiz(state: &AppState, session: &QuizSession) -> String {
    let lang = state.language;
    let mut out = String::new();
    let Some(question) = session.current() else {
        return render_welcome(lang);
    };

    let stats = session.stats();
    let _ = writeln!(
        out,
        "{} {}/{} (#{})    {}: {}/{}",
        i18n::t(lang, Text::QuestionCounter),
        session.index() + 1,
        session.len(),
        question.number,
        i18n::t(lang, Text::Score),
        stats.correct,
        stats.total
    );
    let _ = writeln!(
        out,
        "\n{}\n",
        question.display_text(&i18n::select_label(lang, question.required_count()))
    );

    let record = session.current_record();
    let correct_keys = record.map(|r| r.correct_keys(question)).unwrap_or_default();
    for (index, key) in question.option_keys().iter().enumerate() {
        let label = question.option_label(index).unwrap_or_default();
        let marker = if session.selection().contains(key) {
            "[x]"
        } else {
            "[ ]"
        };
        let verdict_mark = if record.is_some() && correct_keys.contains(key) {
            "  <"
        } else {
            ""
        };
        let _ = writeln!(out, "  {marker} {label}{verdict_mark}");
    }

    match record {
        Some(record) => {
            let headline = if record.correct {
                Text::Correct
            } else {
                Text::Incorrect
            };
            let answers_label = if correct_keys.len() > 1 {
                Text::CorrectAnswers
            } else {
                Text::CorrectAnswer
            };
            let answers: Vec<&str> = correct_keys.iter().map(|key| key.as_str()).collect();
            let _ = writeln!(out, "\n{}", i18n::t(lang, headline));
            let _ = writeln!(
                out,
                "{}: {}",
                i18n::t(lang, answers_label),
                answers.join(", ")
            );
            if !record.verdict.explanation.is_empty() {
                let _ = writeln!(
                    out,
                    "{}: {}",
                    i18n::t(lang, Text::Explanation),
                    record.verdict.explanation
                );
            }
        }
        None => {
            let selected = session.selection().len();
            let required = session.required_count();
            if question.is_multiple_choice && selected > 0 && selected < required {
                let _ = writeln!(out, "\n{}", i18n::selected_of(lang, selected, required));
            }
            if session.can_submit() {
                let _ = writeln!(out, "\n[check] {}", i18n::t(lang, Text::CheckAnswer));
            }
        }
    }

    if let Some(hints) = &state.hints {
        let _ = writeln!(out, "\n{}", i18n::t(lang, Text::AiHelper));
        let _ = writeln!(out, "  {}: {}", i18n::t(lang, Text::KeyConcepts), hints.key_concept);
        let _ = writeln!(out, "  {}: {}", i18n::t(lang, Text::ThinkAbout), hints.think_about);
        let _ = writeln!(
            out,
            "  {}: {}",
            i18n::t(lang, Text::RelatedTopics),
            hints.related_topics()
        );
        let _ = writeln!(out, "  {}", i18n::t(lang, Text::HintWarning));
    }

    if state.is_loading {
        let _ = writeln!(out, "\n...");
    }
    out
}

fn render_browse(state: &AppState) -> String {
    let lang = state.language;
    let mut out = String::new();
    let _ = writeln!(out, "{}", i18n::t(lang, Text::BrowseQuestions));
    if !state.browse.search.is_empty() {
        let _ = writeln!(out, "search: {}", state.browse.search);
    }

    let Some(page) = &state.browse.last else {
        let _ = writeln!(out, "\n...");
        return out;
    };

    if page.questions.is_empty() {
        let _ = writeln!(out, "\n{}", i18n::t(lang, Text::NoQuestions));
        return out;
    }

    let _ = writeln!(out);
    for (position, question) in page.questions.iter().enumerate() {
        let mut badges = String::new();
        if question.is_multiple_choice {
            badges.push_str(&format!(" {}", i18n::select_label(lang, question.required_count())));
        }
        if question.ai_verified.is_some() {
            badges.push_str(&format!(" [{}]", i18n::t(lang, Text::AiVerified)));
        }
        let _ = writeln!(
            out,
            "{:>3}. #{} {}{}",
            position + 1,
            question.number,
            first_line(&question.text),
            badges
        );
    }

    let window: Vec<String> = page
        .page_window()
        .into_iter()
        .map(|number| {
            if number == page.current_page {
                format!("[{number}]")
            } else {
                number.to_string()
            }
        })
        .collect();
    let _ = writeln!(
        out,
        "\n{} {}  {}  {} {}   ({} {}, {}: {})",
        if page.has_prev { "<" } else { " " },
        i18n::t(lang, Text::Prev),
        window.join(" "),
        i18n::t(lang, Text::Next),
        if page.has_next { ">" } else { " " },
        state.browse.per_page,
        i18n::t(lang, Text::PerPage),
        i18n::t(lang, Text::TotalQuestions),
        page.total
    );
    out
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

fn render_results(state: &AppState) -> String {
    let lang = state.language;
    let stats = state
        .session
        .as_ref()
        .map(QuizSession::stats)
        .unwrap_or_default();
    let percent = stats.percent();
    format!(
        "{}\n\n{}: {}/{} ({}%)\n{}\n",
        i18n::t(lang, Text::Results),
        i18n::t(lang, Text::Score),
        stats.correct,
        stats.total,
        percent,
        i18n::results_message(lang, percent)
    )
}

pub fn render_stats(lang: Language, stats: &ApiStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", i18n::t(lang, Text::Statistics));
    let _ = writeln!(out, "  {}: {}", i18n::t(lang, Text::TotalQuestions), stats.total_questions);
    let _ = writeln!(out, "  {}: {}", i18n::t(lang, Text::AiVerified), stats.cached_answers);
    let _ = writeln!(
        out,
        "  {}: {}",
        i18n::t(lang, Text::TranslationsCount),
        stats.translations_count
    );
    let _ = writeln!(out, "  {}: {:.1}%", i18n::t(lang, Text::Coverage), stats.coverage);
    for (category, count) in &stats.categories {
        let _ = writeln!(out, "    {category}: {count}");
    }
    out
}

/// Question counts of the category deck bank
pub fn render_deck_stats(lang: Language, stats: &ApiStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", i18n::t(lang, Text::Statistics));
    let _ = writeln!(out, "  all: {}", stats.total_questions);
    for (category, count) in &stats.categories {
        let _ = writeln!(out, "  {category}: {count}");
    }
    out
}

pub fn render_health(health: &HealthStatus) -> String {
    let mut out = format!("status: {}", health.status);
    if let Some(database) = &health.database {
        let _ = write!(out, ", database: {database}");
    }
    if let Some(error) = &health.error {
        let _ = write!(out, ", error: {error}");
    }
    out
}

pub fn render_upload(lang: Language, summary: &UploadSummary) -> String {
    format!(
        "{}\n  {}: {}\n  {}: {}\n  {}: {}\n",
        i18n::t(lang, Text::UploadComplete),
        i18n::t(lang, Text::NewQuestions),
        summary.new,
        i18n::t(lang, Text::Duplicates),
        summary.duplicates,
        i18n::t(lang, Text::TotalQuestions),
        summary.total
    )
}

pub fn render_guide(lang: Language, guide: &OnboardingGuide) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", i18n::t(lang, Text::StepByStep));
    for step in guide.steps() {
        let marker = match guide.status(step.number) {
            StepStatus::Completed => "[x]",
            StepStatus::Active => "[>]",
            StepStatus::Pending => "[ ]",
        };
        let _ = writeln!(
            out,
            "  {} {}. {} - {}",
            marker,
            step.number,
            i18n::t(lang, step.title),
            i18n::t(lang, step.description)
        );
    }
    out
}

/// Print the health line, green when the service reports itself healthy
pub fn print_health(health: &HealthStatus) {
    let line = render_health(health);
    if health.is_healthy() {
        println!("{}", line.green());
    } else {
        println!("{}", line.red());
    }
}

fn print_toast(toast: &Toast) {
    let line = match toast.level {
        ToastLevel::Info => toast.message.as_str().cyan(),
        ToastLevel::Success => toast.message.as_str().green(),
        ToastLevel::Warning => toast.message.as_str().yellow(),
        ToastLevel::Error => toast.message.as_str().red(),
    };
    println!("{line}");
}

// ----------------------------------------------------------------------
// Input loop
// ----------------------------------------------------------------------

/// Interactive terminal session over a [`QuizController`]
pub struct TerminalApp<A: QuizApi> {
    controller: QuizController<A>,
    toasts: mpsc::Receiver<Toast>,
    lines: Lines<BufReader<Stdin>>,
}

impl<A: QuizApi> TerminalApp<A> {
    pub fn new(controller: QuizController<A>, toasts: mpsc::Receiver<Toast>) -> Self {
        Self {
            controller,
            toasts,
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    pub fn controller(&self) -> &QuizController<A> {
        &self.controller
    }

    /// Read and execute commands until `quit` or end of input
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!("Terminal session started");
        self.redraw();

        loop {
            print!("> ");
            flush_stdout();

            let Some(line) = self
                .lines
                .next_line()
                .await
                .context("Failed to read from stdin")?
            else {
                tracing::info!("End of input - leaving");
                break;
            };

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(CommandError::Empty) => continue,
                Err(e) => {
                    println!("{}", e.to_string().yellow());
                    continue;
                }
            };

            tracing::debug!("Command: {:?}", command);
            if command == Command::Quit {
                break;
            }
            self.execute(command).await?;
            self.flush_toasts();
        }

        self.flush_toasts();
        tracing::info!("Terminal session ended");
        Ok(())
    }

    /// Run one command against the controller and redraw
    pub async fn execute(&mut self, command: Command) -> Result<()> {
        let lang = self.controller.state().read(|state| state.language);

        match command {
            Command::Start => {
                self.controller.start_quiz().await;
            }
            Command::Deck(category) => {
                self.controller.start_deck(category.as_deref()).await;
            }
            Command::Restart => {
                self.controller.restart().await;
            }
            Command::Select(input) => {
                // Errors are already reported as toasts
                let _ = self.controller.select_option(&input);
            }
            Command::Check => {
                self.controller.check_answer().await;
            }
            Command::Next => {
                self.controller.next_question().await;
            }
            Command::Prev => {
                self.controller.prev_question().await;
            }
            Command::Hints => {
                self.controller.toggle_hints().await;
            }
            Command::Language => {
                self.controller.toggle_language().await;
            }
            Command::Browse => {
                self.controller.browse().await;
            }
            Command::Search(text) => {
                self.controller.search(&text).await;
            }
            Command::Page(PageMove::Next) => {
                self.controller.next_page().await;
            }
            Command::Page(PageMove::Prev) => {
                self.controller.prev_page().await;
            }
            Command::Page(PageMove::To(page)) => {
                self.controller.goto_page(page).await;
            }
            Command::PerPage(per_page) => {
                self.controller.set_per_page(per_page).await;
            }
            Command::View(index) => {
                self.controller.view_question(index).await;
            }
            Command::Finish => {
                self.controller.finish();
            }
            Command::Back => {
                if self.controller.back(false) == BackOutcome::NeedsConfirmation
                    && self.confirm(i18n::t(lang, Text::DiscardProgress)).await?
                {
                    self.controller.back(true);
                }
            }
            Command::Upload(path) => {
                self.flush_toasts();
                if let Some(summary) = self.controller.upload(&path).await {
                    println!("{}", render_upload(lang, &summary));
                }
                return Ok(());
            }
            Command::Stats => {
                if let Some(stats) = self.controller.stats().await {
                    println!("{}", render_stats(lang, &stats));
                }
                return Ok(());
            }
            Command::DeckStats => {
                if let Some(stats) = self.controller.deck_stats().await {
                    println!("{}", render_deck_stats(lang, &stats));
                }
                return Ok(());
            }
            Command::Health => {
                if let Some(health) = self.controller.health().await {
                    print_health(&health);
                }
                return Ok(());
            }
            Command::Guide => {
                self.play_guide(lang).await?;
                return Ok(());
            }
            Command::Help => {
                println!("{HELP}");
                return Ok(());
            }
            Command::Quit => return Ok(()),
        }

        self.redraw();
        Ok(())
    }

    /// Play the onboarding guide; pressing Enter pauses it
    async fn play_guide(&mut self, lang: Language) -> Result<()> {
        let (pause_tx, pause_rx) = watch::channel(false);
        let mut guide = OnboardingGuide::new();

        let outcome = {
            let run = guide.run(pause_rx, |guide| println!("{}", render_guide(lang, guide)));
            tokio::pin!(run);

            tokio::select! {
                outcome = &mut run => outcome,
                line = self.lines.next_line() => {
                    line.context("Failed to read from stdin")?;
                    let _ = pause_tx.send(true);
                    run.await
                }
            }
        };

        tracing::debug!("Onboarding guide ended: {:?}", outcome);
        Ok(())
    }

    async fn confirm(&mut self, question: &str) -> Result<bool> {
        print!("{question} [y/N] ");
        flush_stdout();
        let answer = self
            .lines
            .next_line()
            .await
            .context("Failed to read from stdin")?
            .unwrap_or_default();
        Ok(matches!(
            answer.trim().to_lowercase().as_str(),
            "y" | "yes" | "д" | "да"
        ))
    }

    fn redraw(&mut self) {
        self.flush_toasts();
        let state = self.controller.state().snapshot();
        println!("\n{}", render(&state));
    }

    pub fn flush_toasts(&mut self) {
        while let Ok(toast) = self.toasts.try_recv() {
            print_toast(&toast);
        }
    }
}

fn flush_stdout() {
    use std::io::Write;
    if let Err(e) = std::io::stdout().flush() {
        tracing::debug!("Failed to flush stdout: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerKeys, OptionKey, Question, QuizSource, Verdict};

    fn question() -> Question {
        Question {
            id: "q1".to_string(),
            number: 7,
            text: "Which services are serverless?".to_string(),
            options: vec![
                "A) AWS Lambda".to_string(),
                "B) Amazon EC2".to_string(),
                "C) AWS Fargate".to_string(),
            ],
            is_multiple_choice: true,
            select_count: 2,
            category: None,
            correct: None,
            has_translation: false,
            ai_verified: None,
        }
    }

    #[test]
    fn test_parse_commands() {
        let parse = |line: &str| line.parse::<Command>();

        assert_eq!(parse("start"), Ok(Command::Start));
        assert_eq!(parse("deck ec2"), Ok(Command::Deck(Some("ec2".to_string()))));
        assert_eq!(parse("deck"), Ok(Command::Deck(None)));
        assert_eq!(parse("B"), Ok(Command::Select("B".to_string())));
        assert_eq!(parse("c"), Ok(Command::Select("c".to_string())));
        assert_eq!(parse(" 3 "), Ok(Command::Select("3".to_string())));
        assert_eq!(parse("page next"), Ok(Command::Page(PageMove::Next)));
        assert_eq!(parse("page 4"), Ok(Command::Page(PageMove::To(4))));
        assert_eq!(parse("view 2"), Ok(Command::View(1)));
        assert_eq!(parse("decks"), Ok(Command::DeckStats));
        assert_eq!(
            parse("search lambda functions"),
            Ok(Command::Search("lambda functions".to_string()))
        );
        assert_eq!(
            parse("upload result.json"),
            Ok(Command::Upload(Utf8PathBuf::from("result.json")))
        );
    }

    #[test]
    fn test_parse_errors() {
        let parse = |line: &str| line.parse::<Command>();

        assert_eq!(parse(""), Err(CommandError::Empty));
        assert_eq!(parse("dance"), Err(CommandError::Unknown("dance".to_string())));
        assert!(matches!(
            parse("upload"),
            Err(CommandError::MissingArgument {
                command: "upload",
                ..
            })
        ));
        assert_eq!(
            parse("page two"),
            Err(CommandError::InvalidNumber("two".to_string()))
        );
    }

    #[test]
    fn test_render_quiz_with_partial_selection() {
        let mut session = QuizSession::new(QuizSource::Random, vec![question()]);
        session.select(&OptionKey::new("A")).unwrap();
        let state = AppState {
            screen: Screen::Quiz,
            session: Some(session),
            ..Default::default()
        };

        let screen = render(&state);
        assert!(screen.contains("Question 1/1 (#7)"));
        assert!(screen.contains("Which services are serverless? (Select 2)"));
        assert!(screen.contains("[x] A) AWS Lambda"));
        assert!(screen.contains("[ ] B) Amazon EC2"));
        assert!(screen.contains("Selected 1 of 2"));
        assert!(!screen.contains("Check Answer"));
    }

    #[test]
    fn test_render_quiz_with_verdict() {
        let mut session = QuizSession::new(QuizSource::Random, vec![question()]);
        let selection = vec![OptionKey::new("A"), OptionKey::new("C")];
        let verdict = Verdict {
            correct: None,
            correct_answers: AnswerKeys::Many(vec!["A".to_string(), "C".to_string()]),
            explanation: "Both run without servers.".to_string(),
            has_translation: false,
        };
        session.record_verdict("q1", &selection, verdict).unwrap();

        let state = AppState {
            screen: Screen::Quiz,
            session: Some(session),
            ..Default::default()
        };

        let screen = render(&state);
        assert!(screen.contains("Correct!"));
        assert!(screen.contains("Correct answers: A, C"));
        assert!(screen.contains("Explanation: Both run without servers."));
        assert!(screen.contains("Score: 1/1"));
    }

    #[test]
    fn test_render_results_in_russian() {
        let state = AppState {
            screen: Screen::Results,
            language: Language::Ru,
            session: Some(QuizSession::new(QuizSource::Random, vec![question()])),
            ..Default::default()
        };

        let screen = render(&state);
        assert!(screen.contains("0/0 (0%)"));
        assert!(screen.contains("Нужно повторить материал."));
    }

    #[test]
    fn test_render_guide_marks_steps() {
        let mut guide = OnboardingGuide::new();
        guide.set_step(2);

        let text = render_guide(Language::En, &guide);
        assert!(text.contains("[x] 1. Open menu"));
        assert!(text.contains("[>] 2. Export chat"));
        assert!(text.contains("[ ] 4. Upload file"));
    }

    #[test]
    fn test_render_deck_stats_keeps_server_order() {
        let stats: ApiStats = serde_json::from_str(
            r#"{"totalQuestions": 9, "categories": {"docker": 4, "aws": 5}}"#,
        )
        .unwrap();

        let text = render_deck_stats(Language::En, &stats);
        assert!(text.contains("all: 9"));
        let docker = text.find("docker: 4").unwrap();
        let aws = text.find("aws: 5").unwrap();
        assert!(docker < aws);
    }
}
