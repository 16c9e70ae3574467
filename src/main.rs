#![allow(non_snake_case)]
//! RustedMathForm - command line front end of the math form: calculator, equation solver,
//! function plotter and canvas digitizer, in Arabic or English.
use RustedMathForm::Utils::logger::{default_log_file_name, init_logger, save_samples_to_csv};
use RustedMathForm::Utils::plots::{
    ChartData, ChartRenderer, PlottersRenderer, parse_color, value_table,
};
use RustedMathForm::Utils::settings::Settings;
use RustedMathForm::error::Result;
use RustedMathForm::numerical::digitize::{PixelBuffer, ViewWindow};
use RustedMathForm::numerical::function_analysis::Domain;
use RustedMathForm::session::i18n::{Locale, Message};
use RustedMathForm::session::narration::{Narrator, ScriptNarrator};
use RustedMathForm::session::state::{Payload, Request, Response, SessionState, handle};
use RustedMathForm::symbolic::notation::{Normalizer, NormalizerOptions};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// RustedMathForm - bilingual school math toolkit
#[derive(Parser)]
#[command(
    name = "math-form",
    version,
    about = "Arithmetic, equation solving and function plotting in Arabic or English",
    long_about = r#"
Loosely typed math (2x^2+3x-5, x(x+1), (x+1)(x-1)) is normalized before it is parsed.

Examples:
  math-form calc 7 ضرب 6
  math-form solve "x^2 - 5x + 6 = 0" --explain
  math-form --locale en plot "x^3 - 3x" --output chart.png --table 40
  math-form normalize "2xsin(x)"
  math-form repl
"#
)]
#[command(propagate_version = true)]
struct Cli {
    /// Interface language: ar or en
    #[arg(long, global = true)]
    locale: Option<Locale>,

    /// Settings file (task_parser document with plot, solver and session sections)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// off, none, debug, info, warn or error
    #[arg(long, global = true)]
    loglevel: Option<String>,

    /// Also write the log to a timestamped file
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply one of the four operations: calc A OP B
    Calc {
        #[arg(allow_hyphen_values = true)]
        a: String,
        operation: String,
        #[arg(allow_hyphen_values = true)]
        b: String,
        /// Print and narrate the explanation
        #[arg(long)]
        explain: bool,
    },
    /// Solve a single-variable equation
    Solve {
        #[arg(allow_hyphen_values = true)]
        equation: String,
        #[arg(long)]
        explain: bool,
    },
    /// Sample and analyse a function of one variable
    Plot {
        #[arg(allow_hyphen_values = true)]
        function: String,
        #[arg(long, allow_hyphen_values = true)]
        x_min: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        x_max: Option<f64>,
        #[arg(long)]
        points: Option<usize>,
        /// Curve color: #rrggbb or a name
        #[arg(long)]
        color: Option<String>,
        /// Write a PNG chart
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write the samples as csv
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Print every N-th sample as a table
        #[arg(long)]
        table: Option<usize>,
        #[arg(long)]
        explain: bool,
    },
    /// Show the canonical form of loosely typed math
    Normalize {
        #[arg(allow_hyphen_values = true)]
        text: String,
        /// Keep adjacent letters together (xy stays one name)
        #[arg(long)]
        no_split: bool,
    },
    /// Digitize a curve drawn as text: one line per pixel row, ' ' and '.' are blank
    Digitize {
        canvas: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        y_min: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        y_max: Option<f64>,
        #[arg(long)]
        points: Option<usize>,
        #[arg(long)]
        table: Option<usize>,
    },
    /// Interactive session: calc, solve, plot, history, clear, lang, quit
    Repl,
}

/// ASCII canvas -> gray pixel buffer; any character but ' ' and '.' is ink
fn read_canvas(path: &Path) -> Result<PixelBuffer> {
    let content = fs::read_to_string(path)?;
    let rows: Vec<&str> = content.lines().collect();
    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let mut data = Vec::with_capacity(width * rows.len());
    for row in &rows {
        let mut chars = row.chars();
        for _ in 0..width {
            let ink = matches!(chars.next(), Some(c) if c != ' ' && c != '.');
            data.push(if ink { 0 } else { u8::MAX });
        }
    }
    PixelBuffer::new(width, rows.len(), 1, data)
}

fn print_response(response: &Response, table_every: Option<usize>) {
    println!("{}", response.banner.text());
    match &response.payload {
        Payload::Analysis(analysis) => {
            if let Some(every) = table_every {
                println!("{}", value_table(&analysis.samples, every));
            }
        }
        Payload::Samples(samples) | Payload::Digitized { samples, .. } => {
            if let Some(every) = table_every {
                println!("{}", value_table(samples, every));
            }
        }
        _ => {}
    }
}

fn explain(response: &Response) -> Result<()> {
    if response.explanation.lines.is_empty() {
        return Ok(());
    }
    print!("{}", response.explanation);
    let mut narrator = ScriptNarrator::scratch();
    let path = narrator.narrate(&response.explanation.script())?;
    println!("♪ {}", path.display());
    Ok(())
}

fn run_plot(
    state: SessionState,
    request: Request,
    color: Option<String>,
    output: Option<PathBuf>,
    csv: Option<PathBuf>,
    table: Option<usize>,
    explain_steps: bool,
) -> Result<SessionState> {
    let color = parse_color(color.as_deref().unwrap_or(&state.settings.plot.color))?;
    let renderer = PlottersRenderer {
        width: state.settings.plot.width,
        height: state.settings.plot.height,
    };
    let (state, response) = handle(state, request);
    print_response(&response, table);
    if let Payload::Analysis(analysis) = &response.payload {
        if let Some(path) = &output {
            renderer.render(&ChartData::from_analysis(analysis, color), path)?;
            println!("{}", path.display());
        }
        if let Some(path) = &csv {
            save_samples_to_csv(&analysis.samples, &analysis.variable, "y", path)?;
        }
    }
    if explain_steps {
        explain(&response)?;
    }
    Ok(state)
}

fn repl(mut state: SessionState) -> Result<()> {
    let stdin = io::stdin();
    print!(">> ");
    io::stdout().flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let request = match command {
            "" => None,
            "quit" | "exit" | "خروج" => break,
            "calc" => {
                let args: Vec<&str> = rest.split_whitespace().collect();
                if args.len() == 3 {
                    Some(Request::Arithmetic {
                        a: args[0].to_string(),
                        operation: args[1].to_string(),
                        b: args[2].to_string(),
                    })
                } else {
                    println!("calc A OP B");
                    None
                }
            }
            "solve" => Some(Request::Solve {
                equation: rest.to_string(),
            }),
            "plot" => Some(Request::Plot {
                function: rest.to_string(),
                domain: None,
                points: None,
                analyze: true,
            }),
            "clear" => Some(Request::ClearHistory),
            "lang" => match rest.parse::<Locale>() {
                Ok(locale) => Some(Request::SetLocale(locale)),
                Err(_) => {
                    println!("lang ar|en");
                    None
                }
            },
            "history" => {
                let locale = state.locale();
                println!("{}", locale.message(&Message::HistoryTitle));
                if state.history.is_empty() {
                    println!("{}", locale.message(&Message::HistoryEmpty));
                }
                for entry in state.history_newest_first() {
                    println!("  {}", entry);
                }
                None
            }
            other => {
                println!("? {} (calc, solve, plot, history, clear, lang, quit)", other);
                None
            }
        };
        if let Some(request) = request {
            let (new_state, response) = handle(state, request);
            state = new_state;
            print_response(&response, None);
            if !response.banner.is_error() {
                print!("{}", response.explanation);
            }
        }
        print!(">> ");
        io::stdout().flush()?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    if let Some(locale) = cli.locale {
        settings.session.locale = locale;
    }
    if let Some(level) = &cli.loglevel {
        settings.session.loglevel = level.clone();
    }
    let log_file = cli.log_file.then(default_log_file_name);
    init_logger(&settings.session.loglevel, log_file.as_deref())?;

    let state = SessionState::new(settings);
    match cli.command {
        Commands::Calc {
            a,
            operation,
            b,
            explain: explain_steps,
        } => {
            let (_, response) = handle(state, Request::Arithmetic { a, b, operation });
            print_response(&response, None);
            if explain_steps {
                explain(&response)?;
            }
        }
        Commands::Solve {
            equation,
            explain: explain_steps,
        } => {
            let (_, response) = handle(state, Request::Solve { equation });
            print_response(&response, None);
            if let Payload::Solution(solution) = &response.payload {
                info!("method {}, residual {}", solution.method, solution.residual);
            }
            if explain_steps {
                explain(&response)?;
            }
        }
        Commands::Plot {
            function,
            x_min,
            x_max,
            points,
            color,
            output,
            csv,
            table,
            explain: explain_steps,
        } => {
            let default = state.settings.plot.domain;
            let domain = Domain::new(x_min.unwrap_or(default.start), x_max.unwrap_or(default.end))?;
            let request = Request::Plot {
                function,
                domain: Some(domain),
                points,
                analyze: true,
            };
            run_plot(state, request, color, output, csv, table, explain_steps)?;
        }
        Commands::Normalize { text, no_split } => {
            let normalizer = Normalizer::with_options(NormalizerOptions {
                split_letters: !no_split,
            });
            println!("{}", normalizer.normalize(&text));
        }
        Commands::Digitize {
            canvas,
            y_min,
            y_max,
            points,
            table,
        } => {
            let buffer = read_canvas(&canvas)?;
            let default = ViewWindow::default();
            let view = ViewWindow::new(
                state.settings.plot.domain,
                y_min.unwrap_or(default.y_min),
                y_max.unwrap_or(default.y_max),
            )?;
            let (_, response) = handle(
                state,
                Request::Digitize {
                    buffer,
                    view,
                    points,
                },
            );
            print_response(&response, table.or(Some(10)));
        }
        Commands::Repl => repl(state)?,
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let locale = cli.locale.unwrap_or_default();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", locale.error(&e));
            ExitCode::FAILURE
        }
    }
}
