use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Instant;

use backend::{InMemoryQuestionBank, QuestionSource, RecordingResultSink, RestBackend, ResultSink};
use quiz_core::model::{
    AnswerValue, CorrectAnswer, Difficulty, Question, QuestionFilters, QuestionId, QuestionKind,
    QuizSession, SelectionStrategy, SessionError, TickOutcome,
};
use services::{Clock, SessionConfig, SessionWorkflow, format_clock};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidStrategy { raw: String },
    InvalidDifficulty { raw: String },
    InvalidNumber { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidStrategy { raw } => write!(f, "invalid --strategy value: {raw}"),
            ArgsError::InvalidDifficulty { raw } => write!(f, "invalid --difficulty value: {raw}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --strategy <random|category|difficulty|wrong|favorites|sequential>");
    eprintln!("  --category <name>        required with --strategy category");
    eprintln!("  --difficulty <easy|medium|hard>");
    eprintln!("                           required with --strategy difficulty");
    eprintln!("  --count <n>              questions per session (default 5)");
    eprintln!("  --time-limit <minutes>   0 = practice mode (default 0)");
    eprintln!("  --pass-mark <percent>    pass threshold (default 60)");
    eprintln!("  --api <base_url>         fetch from a REST backend instead of");
    eprintln!("                           the built-in sample bank");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_COUNT, QUIZ_API_URL");
}

#[derive(Debug)]
struct Args {
    strategy: SelectionStrategy,
    filters: QuestionFilters,
    count: usize,
    time_limit_secs: u32,
    pass_mark: f64,
    api_url: Option<String>,
}

fn parse_strategy(raw: &str) -> Result<SelectionStrategy, ArgsError> {
    match raw {
        "random" => Ok(SelectionStrategy::Random),
        "category" => Ok(SelectionStrategy::ByCategory),
        "difficulty" => Ok(SelectionStrategy::ByDifficulty),
        "wrong" => Ok(SelectionStrategy::WrongRetry),
        "favorites" => Ok(SelectionStrategy::Favorites),
        "sequential" => Ok(SelectionStrategy::Sequential),
        _ => Err(ArgsError::InvalidStrategy {
            raw: raw.to_string(),
        }),
    }
}

fn parse_difficulty(raw: &str) -> Result<Difficulty, ArgsError> {
    match raw {
        "easy" => Ok(Difficulty::Easy),
        "medium" => Ok(Difficulty::Medium),
        "hard" => Ok(Difficulty::Hard),
        _ => Err(ArgsError::InvalidDifficulty {
            raw: raw.to_string(),
        }),
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            strategy: SelectionStrategy::Random,
            filters: QuestionFilters::none(),
            count: std::env::var("QUIZ_COUNT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(5),
            time_limit_secs: 0,
            pass_mark: 60.0,
            api_url: std::env::var("QUIZ_API_URL").ok(),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--strategy" => {
                    let value = require_value(args, "--strategy")?;
                    parsed.strategy = parse_strategy(&value)?;
                }
                "--category" => {
                    parsed.filters.category = Some(require_value(args, "--category")?);
                }
                "--difficulty" => {
                    let value = require_value(args, "--difficulty")?;
                    parsed.filters.difficulty = Some(parse_difficulty(&value)?);
                }
                "--count" => {
                    let value = require_value(args, "--count")?;
                    parsed.count = value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--count",
                        raw: value.clone(),
                    })?;
                }
                "--time-limit" => {
                    let value = require_value(args, "--time-limit")?;
                    let minutes: u32 = value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--time-limit",
                        raw: value.clone(),
                    })?;
                    parsed.time_limit_secs =
                        minutes.checked_mul(60).ok_or(ArgsError::InvalidNumber {
                            flag: "--time-limit",
                            raw: value,
                        })?;
                }
                "--pass-mark" => {
                    let value = require_value(args, "--pass-mark")?;
                    parsed.pass_mark = value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--pass-mark",
                        raw: value.clone(),
                    })?;
                }
                "--api" => {
                    parsed.api_url = Some(require_value(args, "--api")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    fn config(&self) -> SessionConfig {
        let config = if self.time_limit_secs > 0 {
            SessionConfig::exam(self.strategy, self.count, self.time_limit_secs, self.pass_mark)
        } else {
            SessionConfig::practice(self.strategy, self.count)
        };
        config.with_filters(self.filters.clone())
    }
}

fn sample_bank() -> InMemoryQuestionBank {
    let questions = vec![
        Question::new(
            QuestionId::new("fb-offside"),
            "Football rules",
            "A player level with the second-to-last defender is offside.",
            QuestionKind::TrueFalse,
            vec!["true".into(), "false".into()],
            CorrectAnswer::single("false"),
            Difficulty::Easy,
            "football",
        ),
        Question::new(
            QuestionId::new("bb-team"),
            "Basketball basics",
            "How many players per team are on court?",
            QuestionKind::SingleChoice,
            vec!["4".into(), "5".into(), "6".into(), "7".into()],
            CorrectAnswer::single("5"),
            Difficulty::Easy,
            "basketball",
        ),
        Question::new(
            QuestionId::new("sw-cramp"),
            "Swimming safety",
            "Which steps are appropriate when a cramp strikes mid-swim?",
            QuestionKind::MultipleChoice,
            vec![
                "Stop swimming".into(),
                "Breathe and relax".into(),
                "Massage the cramp".into(),
                "Swim faster".into(),
            ],
            CorrectAnswer::multiple(["Stop swimming", "Breathe and relax", "Massage the cramp"]),
            Difficulty::Medium,
            "swimming",
        ),
        Question::new(
            QuestionId::new("at-distance"),
            "Athletics",
            "A marathon is ____ kilometers long (one decimal).",
            QuestionKind::FillBlank,
            Vec::new(),
            CorrectAnswer::single("42.2"),
            Difficulty::Medium,
            "athletics",
        ),
        Question::new(
            QuestionId::new("vb-rotation"),
            "Volleyball",
            "Describe when a volleyball team rotates positions.",
            QuestionKind::CaseAnalysis,
            Vec::new(),
            CorrectAnswer::single("After winning a rally served by the opponent"),
            Difficulty::Hard,
            "volleyball",
        ),
    ];

    let bank = InMemoryQuestionBank::new();
    for question in questions {
        match question {
            Ok(question) => bank.extend([question]),
            Err(err) => log::warn!("skipping invalid sample question: {err}"),
        }
    }
    bank
}

fn read_line(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Letters for the first 26 options, 1-based numbers beyond that.
fn option_label(index: usize) -> String {
    if index < 26 {
        char::from(b'A' + index as u8).to_string()
    } else {
        (index + 1).to_string()
    }
}

fn parse_answer(question: &Question, input: &str) -> Option<AnswerValue> {
    match question.kind() {
        QuestionKind::SingleChoice | QuestionKind::TrueFalse => {
            lookup_option(question, input).map(AnswerValue::choice)
        }
        QuestionKind::MultipleChoice => {
            let mut picked = Vec::new();
            for part in input.split(',') {
                picked.push(lookup_option(question, part.trim())?);
            }
            Some(AnswerValue::choices(picked))
        }
        QuestionKind::FillBlank | QuestionKind::CaseAnalysis => {
            Some(AnswerValue::text(input))
        }
    }
}

/// Accepts the literal option text, the option letter ("B"), or the 1-based
/// option number shown for options past "Z". Literal text wins so options
/// that look like labels stay selectable.
fn lookup_option(question: &Question, input: &str) -> Option<String> {
    if let Some(option) = question
        .options()
        .iter()
        .find(|option| option.as_str() == input)
    {
        return Some(option.clone());
    }

    if input.len() == 1
        && let Some(letter) = input.chars().next()
        && letter.is_ascii_alphabetic()
        && let Some(option) = question
            .options()
            .get(letter.to_ascii_uppercase() as usize - 'A' as usize)
    {
        return Some(option.clone());
    }

    if let Ok(number) = input.parse::<usize>()
        && number >= 1
        && let Some(option) = question.options().get(number - 1)
    {
        return Some(option.clone());
    }

    None
}

fn print_question(session: &QuizSession) {
    let Some(question) = session.current_question() else {
        return;
    };

    println!();
    if let Some(remaining) = session.time_remaining() {
        println!("[time remaining {}]", format_clock(remaining));
    }
    println!(
        "Question {}/{} ({}, {:?})",
        session.cursor() + 1,
        session.total_questions(),
        question.category(),
        question.kind(),
    );
    println!("{}", question.content());
    for (index, option) in question.options().iter().enumerate() {
        println!("  {}. {option}", option_label(index));
    }
    if let Some(answer) = session.current_answer() {
        println!("  (current answer: {answer:?})");
    }
}

/// Feeds whole elapsed seconds into the session as tick events.
fn apply_elapsed(session: &mut QuizSession, last: &mut Instant, pending: &mut f64) -> bool {
    *pending += last.elapsed().as_secs_f64();
    *last = Instant::now();
    while *pending >= 1.0 {
        *pending -= 1.0;
        if session.tick() == TickOutcome::Expired {
            return true;
        }
    }
    false
}

fn run_session(session: &mut QuizSession) -> io::Result<()> {
    println!("Commands: answer, 'n' next, 'p' previous, 's' submit, 'q' quit");

    let mut last = Instant::now();
    let mut pending = 0.0_f64;

    loop {
        print_question(session);
        let input = read_line("> ")?;

        if apply_elapsed(session, &mut last, &mut pending) {
            println!("\nTime is up, the exam was submitted automatically.");
            return Ok(());
        }

        match input.as_str() {
            "q" => {
                println!("Session abandoned.");
                std::process::exit(0);
            }
            "n" => {
                if let Err(err) = session.next() {
                    println!("{err}");
                }
            }
            "p" => {
                if let Err(err) = session.previous() {
                    println!("{err}");
                }
            }
            "s" => match session.submit() {
                Ok(_) => return Ok(()),
                Err(SessionError::QuestionsRemaining { remaining }) => {
                    println!("{remaining} question(s) left, move to the last one first.");
                }
                Err(err) => println!("{err}"),
            },
            "" => {}
            raw => {
                let Some(question) = session.current_question() else {
                    continue;
                };
                match parse_answer(question, raw) {
                    Some(answer) => {
                        if let Err(err) = session.record_answer(answer) {
                            println!("{err}");
                        }
                    }
                    None => println!("unrecognized answer, use the option letter(s)"),
                }
            }
        }

        if session.is_complete() {
            return Ok(());
        }
    }
}

fn print_report(session: &QuizSession, saved: bool) {
    let Some(report) = session.report() else {
        return;
    };

    println!();
    println!("──────────────────────────────────");
    println!(
        "Score: {}/{} correct, accuracy {:.1}% — {}",
        report.correct_count(),
        report.total_questions(),
        report.accuracy(),
        if report.passed() { "passed" } else { "not passed" },
    );
    println!("Total time {}", format_clock(report.total_time_secs()));
    for outcome in report.outcomes() {
        let mark = if outcome.is_correct { "ok " } else { "WRONG" };
        println!(
            "  [{mark}] {} ({} spent)",
            outcome.question.content(),
            format_clock(outcome.time_spent_secs),
        );
    }
    if !saved {
        println!("note: the result could not be uploaded; it is shown locally only.");
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let (source, sink): (Arc<dyn QuestionSource>, Arc<dyn ResultSink>) = match &args.api_url {
        Some(url) => {
            let rest = RestBackend::new(url.clone());
            (Arc::new(rest.clone()), Arc::new(rest))
        }
        None => {
            let bank = sample_bank();
            (Arc::new(bank), Arc::new(RecordingResultSink::new()))
        }
    };

    let workflow = SessionWorkflow::new(Clock::system(), source, sink);
    let mut session = workflow.start(&args.config()).await.map_err(|e| {
        eprintln!("could not start session: {e}");
        e
    })?;

    run_session(&mut session)?;
    let outcome = workflow.finish(&mut session).await.map_err(|e| {
        eprintln!("could not finish session: {e}");
        e
    })?;
    print_report(&session, outcome.report_saved);

    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();
    if run().await.is_err() {
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(&mut args.iter().map(|arg| (*arg).to_string()))
    }

    fn question_with_options(options: Vec<String>) -> Question {
        let correct = options[0].clone();
        Question::new(
            QuestionId::new("q1"),
            "t",
            "pick one",
            QuestionKind::SingleChoice,
            options,
            CorrectAnswer::single(correct),
            Difficulty::Easy,
            "cat",
        )
        .unwrap()
    }

    #[test]
    fn time_limit_is_given_in_minutes() {
        let args = parse(&["--time-limit", "2"]).unwrap();
        assert_eq!(args.time_limit_secs, 120);
    }

    #[test]
    fn oversized_time_limit_is_rejected() {
        // 100_000_000 minutes overflow a u32 second count
        let err = parse(&["--time-limit", "100000000"]).unwrap_err();
        assert!(matches!(
            err,
            ArgsError::InvalidNumber {
                flag: "--time-limit",
                ..
            }
        ));
    }

    #[test]
    fn option_labels_fall_back_to_numbers_past_z() {
        assert_eq!(option_label(0), "A");
        assert_eq!(option_label(25), "Z");
        assert_eq!(option_label(26), "27");
    }

    #[test]
    fn lookup_resolves_numeric_labels_on_long_option_lists() {
        let options: Vec<String> = (1..=30).map(|i| format!("opt{i}")).collect();
        let question = question_with_options(options);

        assert_eq!(lookup_option(&question, "B").as_deref(), Some("opt2"));
        assert_eq!(lookup_option(&question, "27").as_deref(), Some("opt27"));
        // punctuation after 'Z' is not a label
        assert_eq!(lookup_option(&question, "["), None);
    }

    #[test]
    fn lookup_prefers_literal_option_text_over_labels() {
        let question = question_with_options(vec!["2".into(), "1".into()]);
        assert_eq!(lookup_option(&question, "1").as_deref(), Some("1"));
    }
}
