//! Parsing of command-shell lines.

use std::path::PathBuf;

use thiserror::Error;

use crate::controller::Command;

/// One line of user input, understood.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Transport(Command),
    Open(PathBuf),
    Add(PathBuf),
    List,
    Status,
    Info,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{command}` needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    #[error("`{0}` is not a number")]
    BadNumber(String),
    #[error("track numbers start at 1")]
    ZeroTrack,
}

pub const HELP: &str = "\
open <dir>     scan a folder and replace the playlist
add <dir>      scan a folder and append to the playlist
play <n>       play track n (see `list`)
p, toggle      pause / resume
n, next        next track
r, random      random track
s, skip        never play this file again, then next
seek <pct>     jump to a position, e.g. `seek 50`
vol <pct>      set the volume, e.g. `vol 80`
list           show the playlist
status         show what is playing
info           details about the current track
q, quit        exit";

fn percent(command: &'static str, arg: Option<&str>) -> Result<f32, InputError> {
    let raw = arg.ok_or(InputError::MissingArgument {
        command,
        what: "a percentage",
    })?;
    let value: f32 = raw
        .trim_end_matches('%')
        .parse()
        .map_err(|_| InputError::BadNumber(raw.to_string()))?;
    Ok((value / 100.0).clamp(0.0, 1.0))
}

fn folder(command: &'static str, arg: Option<&str>) -> Result<PathBuf, InputError> {
    arg.map(PathBuf::from).ok_or(InputError::MissingArgument {
        command,
        what: "a folder",
    })
}

/// Parse one line. Blank lines yield `Ok(None)`.
///
/// The argument of `open`/`add` is the rest of the line, so folder names with
/// spaces need no quoting.
pub fn parse_line(line: &str) -> Result<Option<Input>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, Some(rest.trim()).filter(|r| !r.is_empty())),
        None => (line, None),
    };

    let input = match word.to_ascii_lowercase().as_str() {
        "open" | "o" => Input::Open(folder("open", rest)?),
        "add" | "a" => Input::Add(folder("add", rest)?),
        "play" => {
            let raw = rest.ok_or(InputError::MissingArgument {
                command: "play",
                what: "a track number",
            })?;
            let n: usize = raw
                .parse()
                .map_err(|_| InputError::BadNumber(raw.to_string()))?;
            let index = n.checked_sub(1).ok_or(InputError::ZeroTrack)?;
            Input::Transport(Command::Select(index))
        }
        "p" | "toggle" | "pause" => Input::Transport(Command::TogglePlayPause),
        "n" | "next" => Input::Transport(Command::Next),
        "r" | "random" => Input::Transport(Command::Random),
        "s" | "skip" => Input::Transport(Command::Skip),
        "seek" => Input::Transport(Command::SeekTo(percent("seek", rest)?)),
        "vol" | "volume" => Input::Transport(Command::SetVolume(percent("vol", rest)?)),
        "l" | "list" | "ls" => Input::List,
        "status" => Input::Status,
        "i" | "info" => Input::Info,
        "h" | "help" | "?" => Input::Help,
        "q" | "quit" | "exit" => Input::Quit,
        _ => return Err(InputError::Unknown(word.to_string())),
    };
    Ok(Some(input))
}
