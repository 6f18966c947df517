// src/bin/main.rs
// Terminal front end: open a project, explore it and edit synonyms.
//
//   tiler <project.tile> [--settings <settings.toml>]
//   tiler --texts <a.txt> <b.txt> [--settings <settings.toml>]

use crossterm::cursor::MoveTo;
use crossterm::style::{style, Color, PrintStyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};
use std::fs::{self, File};
use std::io::{self, stdin, stdout, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tiler_core::analytics::ResultAnalytics;
use tiler_core::compute::{clean_text, ComputeOutput, Replay};
use tiler_core::config::EngineSettings;
use tiler_core::core::highlight::{tooltip, RenderFrame};
use tiler_core::core::types::Algorithm;
use tiler_core::notify::{notify, Notification, NotificationLevel};
use tiler_core::persistence::{self, FILE_EXTENSION};
use tiler_core::selection::DirectResolver;
use tiler_core::{AnnotationEngine, ConfigurationOptions, ProjectState, TextSide};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

type Engine = AnnotationEngine<Replay>;

fn get_log_path() -> PathBuf {
    let mut path = PathBuf::from("target");
    path.push("tiler.log");
    path
}

fn init_logging() -> io::Result<()> {
    let path = get_log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(&path)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tiler_core=debug,tiler=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

enum Source {
    Project(PathBuf),
    Texts(PathBuf, PathBuf),
}

struct Args {
    source: Source,
    settings: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = std::env::args().skip(1);
    let mut source = None;
    let mut settings = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => {
                settings = Some(PathBuf::from(args.next().ok_or("--settings needs a path")?));
            }
            "--texts" => {
                let a = args.next().ok_or("--texts needs two paths")?;
                let b = args.next().ok_or("--texts needs two paths")?;
                source = Some(Source::Texts(a.into(), b.into()));
            }
            path => source = Some(Source::Project(path.into())),
        }
    }
    let source = source.ok_or(format!(
        "usage: tiler <project.{FILE_EXTENSION}> | --texts <a> <b> [--settings <file>]"
    ))?;
    Ok(Args { source, settings })
}

fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("[WARN] Logging disabled: {}", e);
    }
    info!("--- Substring tiler starting ---");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Exiting with error");
            eprintln!("[ERROR] {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args()?;
    let settings = match &args.settings {
        Some(path) => EngineSettings::from_path(path)?,
        None => EngineSettings::default(),
    };

    let (mut engine, mut save_path) = match &args.source {
        Source::Project(path) => {
            // Replay the stored result; no matcher is linked into this binary.
            let state = persistence::load_from_disk(path)?;
            let mut engine = Engine::with_settings(Replay::new(replay_of(&state)), settings);
            engine.load(state)?;
            (engine, path.clone())
        }
        Source::Texts(a, b) => {
            let text_a = clean_text(&fs::read_to_string(a)?);
            let text_b = clean_text(&fs::read_to_string(b)?);
            let config = ConfigurationOptions {
                file_name_a: file_name(a),
                file_name_b: file_name(b),
                ..ConfigurationOptions::default()
            };
            let mut engine = Engine::with_settings(Replay::empty(), settings);
            engine.analyze(text_a, text_b, config)?;
            (engine, PathBuf::from(format!("project.{FILE_EXTENSION}")))
        }
    };

    let mut last = Notification::info("Type 'help' for commands.");
    loop {
        print_ui(&engine, &last)?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let parts: Vec<&str> = input.split_whitespace().collect();
        let command = parts.first().copied().unwrap_or("");
        info!(command, "Command received");

        last = match command {
            "exit" | "quit" => break,
            "" => continue,
            "help" => Notification::info(HELP),
            "hover" => match position(&parts) {
                Some((side, index)) => {
                    match parts.get(3) {
                        Some(color) => engine.pointer_over_with(side, index, *color),
                        None => engine.pointer_over(side, index),
                    }
                    Notification::info(describe(&engine, side, index))
                }
                None => usage("hover <a|b> <index> [color]"),
            },
            "leave" => {
                engine.pointer_leave();
                Notification::info("Pointer left the texts.")
            }
            "click" => match position(&parts) {
                Some((side, index)) => match engine.pointer_down(side, index) {
                    Some(pair) => Notification::info(format!("Toggled hold on pair {pair}.")),
                    None => Notification::info("No pair at that position."),
                },
                None => usage("click <a|b> <index>"),
            },
            "syn" => match span(&parts) {
                Some(range) => notify(engine.add_synonym(&DirectResolver, &range)),
                None => usage("syn <a|b> <first> <last>"),
            },
            "unsyn" => match span(&parts) {
                Some(range) => notify(engine.remove_synonym(&DirectResolver, &range)),
                None => usage("unsyn <a|b> <first> <last>"),
            },
            "set" => match (parts.get(1), parts.get(2), engine.project().map(|p| p.config.clone())) {
                (Some(key), Some(value), Some(mut config)) => {
                    match apply_setting(&mut config, key, value) {
                        Ok(()) => notify(engine.update_configuration(config)),
                        Err(reason) => Notification::error(reason),
                    }
                }
                _ => usage("set <minLength|ratio|maxStrikes|kernelSize|baseMatchSize|algorithm> <value>"),
            },
            "undo" => notify(engine.undo()),
            "stats" => stats(&engine),
            "save" => {
                if let Some(path) = parts.get(1) {
                    save_path = PathBuf::from(path);
                }
                notify(engine.save(&save_path))
            }
            other => Notification::error(format!("Unknown command '{other}'.")),
        };
    }

    info!("--- Substring tiler exiting ---");
    Ok(())
}

const HELP: &str = "hover <a|b> <i> [color] | leave | click <a|b> <i> | syn <a|b> <first> <last> | \
unsyn <a|b> <first> <last> | set <key> <value> | undo | stats | save [path] | exit";

fn usage(form: &str) -> Notification {
    Notification::warning(format!("Usage: {form}"))
}

fn replay_of(state: &ProjectState) -> ComputeOutput {
    ComputeOutput {
        pairs: state.pairs.clone(),
        overall_similarity_a: state.overall_similarity_a,
        overall_similarity_b: state.overall_similarity_b,
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

fn parse_side(token: &str) -> Option<TextSide> {
    match token {
        "a" | "A" => Some(TextSide::A),
        "b" | "B" => Some(TextSide::B),
        _ => None,
    }
}

fn position(parts: &[&str]) -> Option<(TextSide, usize)> {
    let side = parse_side(parts.get(1)?)?;
    let index = parts.get(2)?.parse().ok()?;
    Some((side, index))
}

fn span(parts: &[&str]) -> Option<(TextSide, usize, usize)> {
    let (side, first) = position(parts)?;
    let last = parts.get(3)?.parse().ok()?;
    Some((side, first, last))
}

fn apply_setting(config: &mut ConfigurationOptions, key: &str, value: &str) -> Result<(), String> {
    let bad = || format!("'{value}' is not a valid value for {key}.");
    match key {
        "minLength" => config.min_length = value.parse().map_err(|_| bad())?,
        "ratio" => config.ratio = value.parse().map_err(|_| bad())?,
        "maxStrikes" => config.max_strikes = value.parse().map_err(|_| bad())?,
        "kernelSize" => config.kernel_size = value.parse().map_err(|_| bad())?,
        "baseMatchSize" => config.base_match_size = value.parse().map_err(|_| bad())?,
        "algorithm" => {
            config.algorithm = match value.to_ascii_lowercase().as_str() {
                "matrix" => Algorithm::Matrix,
                "comparativus" => Algorithm::Comparativus,
                _ => return Err(bad()),
            }
        }
        _ => return Err(format!("Unknown setting '{key}'.")),
    }
    Ok(())
}

fn describe(engine: &Engine, side: TextSide, index: usize) -> String {
    match engine.containing_pair(index, side) {
        Some(pair) => format!(
            "{}: {} <-> {}",
            tooltip(pair),
            excerpt(engine, TextSide::A, pair.a.start, pair.a.end),
            excerpt(engine, TextSide::B, pair.b.start, pair.b.end)
        ),
        None => format!("No pair at {side}[{index}]."),
    }
}

fn excerpt(engine: &Engine, side: TextSide, start: usize, end: usize) -> String {
    engine
        .project()
        .map(|project| {
            project
                .text(side)
                .chars()
                .skip(start)
                .take(end.saturating_sub(start))
                .collect()
        })
        .unwrap_or_default()
}

fn stats(engine: &Engine) -> Notification {
    let (Some(project), Some(analytics)) = (engine.project(), engine.analytics()) else {
        return Notification::warning("Open or compute a project first.");
    };
    let ResultAnalytics {
        exact_matches,
        mean_exact_similarity,
        mean_cosine_similarity,
    } = analytics;
    let show = |value: Option<f64>| value.map_or("n/a".to_string(), |v| format!("{v:.4}"));
    Notification::info(format!(
        "{} pairs, {} exact (mean {}), cosine mean {}, overall A {:.4}, overall B {:.4}, undo depth {}",
        project.pairs.len(),
        exact_matches,
        show(mean_exact_similarity),
        show(mean_cosine_similarity),
        project.overall_similarity_a,
        project.overall_similarity_b,
        engine.history().len()
    ))
}

fn terminal_color(name: &str) -> Color {
    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() == 6 {
            if let Ok(rgb) = u32::from_str_radix(hex, 16) {
                return Color::Rgb {
                    r: (rgb >> 16) as u8,
                    g: (rgb >> 8) as u8,
                    b: rgb as u8,
                };
            }
        }
    }
    match name.to_ascii_lowercase().as_str() {
        "green" => Color::Green,
        "orange" => Color::Rgb { r: 255, g: 165, b: 0 },
        "red" => Color::Red,
        "blue" => Color::Blue,
        "yellow" => Color::Yellow,
        "purple" | "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "black" => Color::Black,
        "white" => Color::White,
        "grey" | "gray" => Color::Grey,
        _ => Color::DarkYellow,
    }
}

fn print_text(out: &mut impl Write, text: &str, frame: &RenderFrame, side: TextSide) -> io::Result<()> {
    let cells = frame.cells(side);
    for (ch, cell) in text.chars().zip(cells) {
        let mut styled = style(ch);
        if let Some(background) = &cell.background {
            styled = styled.on(terminal_color(background)).with(Color::Black);
        }
        if cell.underline.is_some() {
            styled = styled.underlined();
        }
        if cell.border {
            styled = styled.bold();
        }
        queue!(out, PrintStyledContent(styled))?;
    }
    writeln!(out)
}

fn print_ui(engine: &Engine, last: &Notification) -> io::Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    println!("Substring Tiler");
    println!("---------------------------------------------------------------");

    if let (Some(project), Some(frame)) = (engine.project(), engine.render()) {
        let name = |side: TextSide, fallback: &str| {
            let file = match side {
                TextSide::A => &project.config.file_name_a,
                TextSide::B => &project.config.file_name_b,
            };
            file.clone().unwrap_or_else(|| fallback.to_string())
        };
        println!("{}:", name(TextSide::A, "Text A"));
        print_text(&mut out, &project.text_a, &frame, TextSide::A)?;
        println!("\n{}:", name(TextSide::B, "Text B"));
        print_text(&mut out, &project.text_b, &frame, TextSide::B)?;
        println!(
            "\nminLength {} | ratio {} | maxStrikes {} | kernelSize {} | baseMatchSize {} | {:?}",
            project.config.min_length,
            project.config.ratio,
            project.config.max_strikes,
            project.config.kernel_size,
            project.config.base_match_size,
            project.config.algorithm
        );
    }
    if let Some(pending) = engine.selector().pending() {
        println!(
            "Synonym pending: {}[{}..={}], select a word in the other text.",
            pending.side, pending.first, pending.last
        );
    }

    let level = match last.level {
        NotificationLevel::Info => "info".blue(),
        NotificationLevel::Success => "success".green(),
        NotificationLevel::Warning => "warning".yellow(),
        NotificationLevel::Error => "error".red(),
    };
    println!("\n[{}] {}", level, last.message);
    print!("\n> ");
    out.flush()
}
