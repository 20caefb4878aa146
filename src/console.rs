use crate::board::{Board, Color, PieceKind, Square};
use crate::game::{Game, Status};
use crate::movegen::Move;
use crate::search::Search;
use crate::snapshot;
use anyhow::{bail, Context, Result};
use log::warn;
use std::fs;
use std::io::{self, BufRead, Write};

const HELP: &str = "\
commands:
  show                 print the board
  status               side to move and check state
  moves <square>       legal destinations, e.g. `moves e2`
  move <from><to>[p]   play a move, e.g. `move e2e4`, `move a7a8n`
  undo | redo | reset
  go                   let the engine move for the side to move
  depth <n>            engine search depth
  bot white|black|off  engine answers automatically for that colour
  log                  moves played so far
  marker <text>        empty-square marker used by save/load
  save <file> | load <file>
  quit
";

/// Text front end over [`Game`] and [`Search`], one command per line.
pub struct ConsoleHandler {
    game: Game,
    search: Search,
    bot: Option<Color>,
    empty_marker: String,
}

impl ConsoleHandler {
    pub fn new() -> Self {
        ConsoleHandler {
            game: Game::new(),
            search: Search::new(),
            bot: None,
            empty_marker: snapshot::EMPTY_MARKER.to_string(),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut reader = stdin.lock();
        let mut line = String::new();

        print!("{}", self.handle_command("show")?);
        stdout.flush()?;

        while reader.read_line(&mut line)? > 0 {
            let command = line.trim();
            if command == "quit" {
                break;
            }

            match self.handle_command(command) {
                Ok(response) => print!("{}", response),
                Err(err) => println!("error: {:#}", err),
            }

            stdout.flush()?;
            line.clear();
        }
        Ok(())
    }

    pub fn handle_command(&mut self, command: &str) -> Result<String> {
        let parts: Vec<&str> = command.split_whitespace().collect();
        if parts.is_empty() {
            return Ok("".to_string());
        }

        match parts[0] {
            "help" => Ok(HELP.to_string()),
            "show" => Ok(format!("{}{}\n", self.game.board(), self.status_line())),
            "status" => Ok(format!("{}\n", self.status_line())),
            "moves" => self.handle_moves(&parts[1..]),
            "move" => self.handle_move(&parts[1..]),
            "undo" => Ok(self.step(Game::undo, "nothing to undo")),
            "redo" => Ok(self.step(Game::redo, "nothing to redo")),
            "reset" => {
                self.game.reset();
                Ok(format!("{}{}\n", self.game.board(), self.status_line()))
            }
            "go" => Ok(self.handle_go()),
            "depth" => self.handle_depth(&parts[1..]),
            "bot" => self.handle_bot(&parts[1..]),
            "log" => Ok(self.handle_log()),
            "marker" => self.handle_marker(&parts[1..]),
            "save" => self.handle_save(&parts[1..]),
            "load" => self.handle_load(&parts[1..]),
            "quit" => Ok("".to_string()),
            other => Ok(format!("unknown command `{}`, try `help`\n", other)),
        }
    }

    fn status_line(&self) -> String {
        let side = self.game.side_to_move();
        match self.game.status() {
            Status::InProgress => format!("{:?} to move", side),
            Status::Check => format!("{:?} to move, in check", side),
            Status::NoLegalMoves if self.game.is_check() => {
                format!("{:?} is checkmated, {:?} wins", side, side.opposite())
            }
            Status::NoLegalMoves => format!("{:?} has no legal moves", side),
        }
    }

    fn step(&mut self, action: fn(&mut Game) -> bool, refusal: &str) -> String {
        if action(&mut self.game) {
            format!("{}{}\n", self.game.board(), self.status_line())
        } else {
            format!("{}\n", refusal)
        }
    }

    fn handle_moves(&self, parts: &[&str]) -> Result<String> {
        let square = match parts.first().and_then(|name| Square::from_algebraic(name)) {
            Some(square) => square,
            None => bail!("usage: moves <square>"),
        };
        let targets: Vec<String> = self
            .game
            .legal_destinations(square)
            .into_iter()
            .map(|to| to.to_algebraic())
            .collect();
        if targets.is_empty() {
            Ok(format!("no legal moves from {}\n", square))
        } else {
            Ok(format!("{}\n", targets.join(" ")))
        }
    }

    fn handle_move(&mut self, parts: &[&str]) -> Result<String> {
        let text = match parts.first() {
            Some(text) => *text,
            None => bail!("usage: move <from><to>[promotion]"),
        };
        let (squares, promotion) = if text.len() == 5 && text.is_ascii() {
            let kind = match PieceKind::from_letter(text.as_bytes()[4] as char) {
                Some(kind) => kind,
                None => bail!("unknown promotion piece in `{}`", text),
            };
            (&text[..4], kind)
        } else {
            (text, PieceKind::Queen)
        };
        let mv = match Move::from_algebraic(squares) {
            Some(mv) => mv,
            None => bail!("cannot read move `{}`", text),
        };

        let mut choice = |_: &Board, _: Square, _: Color| promotion;
        let record = match self.game.make_move(mv, &mut choice) {
            Some(record) => record,
            None => return Ok(format!("illegal move {}\n", text)),
        };

        let mut response = format!("{}\n", record.describe());
        if self.bot == Some(self.game.side_to_move()) {
            response.push_str(&self.handle_go());
        } else {
            response.push_str(&format!("{}{}\n", self.game.board(), self.status_line()));
        }
        Ok(response)
    }

    fn handle_go(&mut self) -> String {
        let best = match self.search.find_best_move(&mut self.game) {
            Some(mv) => mv,
            None => return format!("{}\n", self.status_line()),
        };
        match self.game.make_move_auto(best) {
            Some(record) => format!(
                "engine plays {}\n{}{}\n",
                record.describe(),
                self.game.board(),
                self.status_line()
            ),
            None => format!("engine move {} was refused\n", best),
        }
    }

    fn handle_depth(&mut self, parts: &[&str]) -> Result<String> {
        let depth: u32 = match parts.first() {
            Some(text) => text
                .parse()
                .with_context(|| format!("invalid depth `{}`", text))?,
            None => return Ok(format!("depth {}\n", self.search.max_depth())),
        };
        self.search.set_max_depth(depth);
        Ok(format!("depth {}\n", self.search.max_depth()))
    }

    fn handle_bot(&mut self, parts: &[&str]) -> Result<String> {
        self.bot = match parts.first().copied() {
            Some("white") => Some(Color::White),
            Some("black") => Some(Color::Black),
            Some("off") => None,
            _ => bail!("usage: bot white|black|off"),
        };
        let mut response = format!("bot {:?}\n", self.bot);
        if self.bot == Some(self.game.side_to_move()) {
            response.push_str(&self.handle_go());
        }
        Ok(response)
    }

    fn handle_log(&self) -> String {
        let log = self.game.move_log();
        if log.is_empty() {
            return "no moves yet\n".to_string();
        }
        log.iter()
            .enumerate()
            .map(|(ply, entry)| format!("{}. {}\n", ply + 1, entry))
            .collect()
    }

    fn handle_marker(&mut self, parts: &[&str]) -> Result<String> {
        match parts.first() {
            Some(marker) => {
                self.empty_marker = marker.to_string();
                Ok(format!("empty marker `{}`\n", self.empty_marker))
            }
            None => bail!("usage: marker <text>"),
        }
    }

    fn handle_save(&self, parts: &[&str]) -> Result<String> {
        let path = match parts.first() {
            Some(path) => *path,
            None => bail!("usage: save <file>"),
        };
        fs::write(path, self.game.to_snapshot_with(&self.empty_marker))
            .with_context(|| format!("cannot write {}", path))?;
        Ok(format!("saved to {}\n", path))
    }

    /// A snapshot that cannot be read or parsed resets the game.
    fn handle_load(&mut self, parts: &[&str]) -> Result<String> {
        let path = match parts.first() {
            Some(path) => *path,
            None => bail!("usage: load <file>"),
        };

        let loaded = fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path))
            .and_then(|text| {
                self.game
                    .load_snapshot_with(&text, &self.empty_marker)
                    .with_context(|| format!("cannot parse {}", path))
            });

        match loaded {
            Ok(()) => Ok(format!("{}{}\n", self.game.board(), self.status_line())),
            Err(err) => {
                warn!("load failed, resetting: {:#}", err);
                self.game.reset();
                Ok(format!("load failed: {:#}\ngame reset\n", err))
            }
        }
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        ConsoleHandler::new()
    }
}
