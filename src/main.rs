use anyhow::Result;
use chess_minimax::console::ConsoleHandler;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut console = ConsoleHandler::new();
    console.run()
}
