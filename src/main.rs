mod config;
mod controller;
mod error;
mod library;
mod player;
mod playlist;
mod runtime;
mod shuffle;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
