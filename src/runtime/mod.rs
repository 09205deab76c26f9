use std::env;
use std::io;
use std::sync::Arc;
use std::sync::mpsc;

use crate::controller::PlaybackController;
use crate::library::{
    FileIgnoreStore, IgnoreSet, IgnoreStore, LoftyMetadata, MetadataProvider, ScanMode,
};
use crate::player::RodioEngine;
use crate::shuffle::StdRandom;

mod event_loop;
mod input;
mod settings;
mod startup;

use startup::Launch;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let launch = startup::parse_args(env::args().skip(1)).map_err(|e| {
        eprintln!("{}", startup::USAGE);
        e
    })?;

    let (settings, config_warning) = settings::load_settings();
    let level_warning = settings::init_logging(&settings.logging);
    for warning in config_warning.iter().chain(level_warning.iter()) {
        log::warn!("{warning}");
    }

    let dir = match launch {
        Launch::Help => {
            println!("{}", startup::USAGE);
            return Ok(());
        }
        Launch::PrintConfig => {
            print!("{}", toml::to_string_pretty(&settings)?);
            return Ok(());
        }
        Launch::Play(dir) => dir,
    };

    let store = FileIgnoreStore::new(
        settings
            .ignore_list_path()
            .unwrap_or_else(|| "ignorelist.txt".into()),
    );
    let ignore = store.load().unwrap_or_else(|e| {
        log::warn!("{e}; starting with an empty ignore list");
        IgnoreSet::new()
    });
    log::info!(
        "{} names on the ignore list at {}",
        ignore.len(),
        store.path().display()
    );

    let engine = RodioEngine::new(settings.playback.volume)?;
    let rng = StdRandom::from_seed_option(settings.playback.shuffle_seed);
    let mut controller = PlaybackController::new(engine, ignore, Box::new(store), Box::new(rng));
    let provider: Arc<dyn MetadataProvider> = Arc::new(LoftyMetadata);

    let (tx, rx) = mpsc::channel();
    event_loop::spawn_stdin_reader(tx.clone());

    let result = {
        let mut shell =
            event_loop::Shell::new(&mut controller, &settings, provider, tx, io::stdout());
        if let Some(dir) = dir {
            shell.open_folder(dir, ScanMode::Replace)?;
        }
        event_loop::run(&mut shell, &rx, settings.playback.poll_interval())
    };

    controller.shutdown();
    result.map_err(Into::into)
}
