use std::path::PathBuf;

pub const USAGE: &str = "\
usage: rondo [DIR]
       rondo --print-config
       rondo --help

Scans DIR (if given) and waits for commands on stdin; type `help` for the list.";

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launch {
    /// Start the player, optionally opening a folder right away.
    Play(Option<PathBuf>),
    PrintConfig,
    Help,
}

/// Interpret the arguments after the program name.
pub fn parse_args<I>(args: I) -> Result<Launch, String>
where
    I: IntoIterator<Item = String>,
{
    let mut dir = None;
    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Launch::Help),
            "--print-config" => return Ok(Launch::PrintConfig),
            flag if flag.starts_with("--") => return Err(format!("unknown option `{flag}`")),
            _ if dir.is_some() => return Err("only one folder can be given".to_string()),
            _ => dir = Some(PathBuf::from(arg)),
        }
    }
    Ok(Launch::Play(dir))
}
