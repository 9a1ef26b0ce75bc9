//! Interactive prompt session
//!
//! Each line is one interaction: it updates the session and, when the
//! selection changed, re-evaluates the route so the output always reflects
//! the latest choices.

use std::io::Write;
use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use hospital_route::{
    export_to_file, Endpoint, OverwriteBehavior, RouteClient, Session, DEFAULT_EXPORT_FILENAME,
};

use crate::cli::{print_outcome, write_map, ProgressManager};

const HELP: &str = "\
Commands:
  key [api-key]            set the OpenRouteService API key (asked without echo if omitted)
  speed <km/h>             set the average driving speed (10-200)
  states                   list states
  hospitals <state>        list hospitals in a state
  state <a|b> <state>      choose the state for hospital A or B
  hospital <a|b> <name>    choose hospital A or B
  show                     print the current result
  export [path]            save the route summary (default hospital_route.xlsx)
  map <path>               write the map (.html or .geojson)
  reset                    clear both hospitals
  help                     show this help
  quit                     leave the session";

#[derive(Debug, PartialEq)]
pub enum PromptCommand {
    Key(String),
    ReadKey,
    Speed(u32),
    States,
    Hospitals(String),
    State(Endpoint, String),
    Hospital(Endpoint, String),
    Show,
    Export(PathBuf),
    Map(PathBuf),
    Reset,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<PromptCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    let command = match keyword.to_lowercase().as_str() {
        "key" if rest.is_empty() => PromptCommand::ReadKey,
        "key" => PromptCommand::Key(rest.to_string()),
        "speed" => PromptCommand::Speed(
            rest.parse()
                .map_err(|_| format!("speed must be a whole number of km/h, got '{rest}'"))?,
        ),
        "states" => PromptCommand::States,
        "hospitals" => PromptCommand::Hospitals(required(rest, "hospitals <state>")?),
        "state" => {
            let (endpoint, name) = endpoint_and_name(rest, "state <a|b> <state>")?;
            PromptCommand::State(endpoint, name)
        }
        "hospital" => {
            let (endpoint, name) = endpoint_and_name(rest, "hospital <a|b> <name>")?;
            PromptCommand::Hospital(endpoint, name)
        }
        "show" => PromptCommand::Show,
        "export" if rest.is_empty() => PromptCommand::Export(PathBuf::from(DEFAULT_EXPORT_FILENAME)),
        "export" => PromptCommand::Export(PathBuf::from(rest)),
        "map" => PromptCommand::Map(PathBuf::from(required(rest, "map <path>")?)),
        "reset" => PromptCommand::Reset,
        "help" | "?" => PromptCommand::Help,
        "quit" | "exit" => PromptCommand::Quit,
        other => return Err(format!("unknown command '{other}' (type `help`)")),
    };

    Ok(Some(command))
}

fn required(rest: &str, usage: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(rest.to_string())
    }
}

fn endpoint_and_name(rest: &str, usage: &str) -> Result<(Endpoint, String), String> {
    let (endpoint, name) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| format!("usage: {usage}"))?;

    let endpoint = match endpoint.to_lowercase().as_str() {
        "a" => Endpoint::A,
        "b" => Endpoint::B,
        _ => return Err(format!("usage: {usage}")),
    };

    Ok((endpoint, required(name.trim(), usage)?))
}

/// Read the API key from the terminal without echoing it
async fn read_masked_key() -> std::io::Result<String> {
    tokio::task::spawn_blocking(|| rpassword::prompt_password("🔑 OpenRouteService API key: "))
        .await
        .map_err(std::io::Error::other)?
}

/// Run the prompt loop until `quit` or end of input
pub async fn run_prompt<R, W>(
    session: &mut Session,
    client: &RouteClient,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    writeln!(out, "{HELP}")?;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                writeln!(out, "❓ {msg}")?;
                continue;
            }
        };

        // Commands that change the selection report an error or re-evaluate
        let changed = match command {
            PromptCommand::Quit => break,
            PromptCommand::Help => {
                writeln!(out, "{HELP}")?;
                Ok(false)
            }
            PromptCommand::States => {
                for state in session.dataset().states() {
                    writeln!(out, "  {state}")?;
                }
                Ok(false)
            }
            PromptCommand::Hospitals(state) => match session.dataset().resolve_state(&state) {
                Ok(state) => {
                    for hospital in session.dataset().hospitals_in(state) {
                        writeln!(out, "  {hospital}")?;
                    }
                    Ok(false)
                }
                Err(err) => Err(err),
            },
            PromptCommand::Show => {
                print_outcome(out, session.outcome())?;
                Ok(false)
            }
            PromptCommand::Export(path) => match session.summary() {
                Some(summary) => match export_to_file(summary, &path, OverwriteBehavior::Force) {
                    Ok(()) => {
                        writeln!(out, "📤 Exported route info to {}", path.display())?;
                        Ok(false)
                    }
                    Err(err) => Err(err),
                },
                None => {
                    writeln!(out, "Nothing to export yet: no successful route.")?;
                    Ok(false)
                }
            },
            PromptCommand::Map(path) => {
                match write_map(&session.view().map, &path) {
                    Ok(()) => writeln!(out, "🗺️  Map written to {}", path.display())?,
                    Err(err) => writeln!(out, "❌ Failed to write map: {err}")?,
                }
                Ok(false)
            }
            PromptCommand::Reset => {
                session.reset();
                writeln!(out, "🔄 Map reset")?;
                Ok(false)
            }
            PromptCommand::Key(key) => {
                session.set_api_key(key);
                Ok(true)
            }
            PromptCommand::ReadKey => match read_masked_key().await {
                Ok(key) => {
                    session.set_api_key(key);
                    Ok(true)
                }
                Err(err) => {
                    writeln!(out, "❌ Could not read the API key: {err}")?;
                    Ok(false)
                }
            },
            PromptCommand::Speed(speed) => session.set_speed_kmh(speed).map(|_| true),
            PromptCommand::State(endpoint, state) => match session.select_state(endpoint, &state) {
                Ok(()) => {
                    if let Some(hospital) = session.selection().hospital(endpoint) {
                        writeln!(out, "🏥 Hospital {endpoint}: {hospital}")?;
                    }
                    Ok(true)
                }
                Err(err) => Err(err),
            },
            PromptCommand::Hospital(endpoint, name) => {
                session.select_hospital(endpoint, &name).map(|_| true)
            }
        };

        match changed {
            Ok(true) => {
                let spinner = session
                    .selection()
                    .endpoints()
                    .filter(|_| session.selection().api_key().is_some())
                    .map(|(a, b)| ProgressManager::new(&format!("🌐 Routing {a} → {b}")));
                session.evaluate(client).await;
                if let Some(spinner) = spinner {
                    spinner.finish();
                }
                print_outcome(out, session.outcome())?;
            }
            Ok(false) => {}
            Err(err) => writeln!(out, "❌ {err}")?,
        }
    }

    Ok(())
}
