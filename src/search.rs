use crate::board::Color;
use crate::evaluation::Evaluator;
use crate::game::Game;
use crate::movegen::Move;
use log::{debug, info};

/// Outer bound for alpha-beta windows.
pub const INF: i32 = 1_000_000_000;
/// Score for a side left without legal moves, before the depth adjustment.
pub const MATE: i32 = 1_000_000;

pub const DEFAULT_DEPTH: u32 = 2;

/// Fixed-depth minimax over a shared [`Game`].
///
/// Scores are always from White's side and White maximizes. Every
/// speculative move goes through [`Game::apply`], so the game handed in is
/// back in its original state, history included, when a search returns.
///
/// Among equally scored root moves the first one found wins: a later move
/// has to be strictly better to replace it.
pub struct Search {
    evaluator: Evaluator,
    max_depth: u32,
    nodes_searched: u64,
}

impl Search {
    pub fn new() -> Self {
        Self::with_evaluator(Evaluator::new())
    }

    pub fn with_evaluator(evaluator: Evaluator) -> Self {
        Self {
            evaluator,
            max_depth: DEFAULT_DEPTH,
            nodes_searched: 0,
        }
    }

    /// Best move for the side to move at the configured depth.
    pub fn find_best_move(&mut self, game: &mut Game) -> Option<Move> {
        self.minimax_root(self.max_depth, game)
    }

    pub fn minimax_root(&mut self, depth: u32, game: &mut Game) -> Option<Move> {
        self.search_root(depth, game, true).map(|(mv, _)| mv)
    }

    /// Like [`Search::minimax_root`] but also returns the score of the move.
    pub fn best_move_with_score(&mut self, depth: u32, game: &mut Game) -> Option<(Move, i32)> {
        self.search_root(depth, game, true)
    }

    /// Same walk without pruning; slow, kept to cross-check alpha-beta.
    pub fn best_move_unpruned(&mut self, depth: u32, game: &mut Game) -> Option<(Move, i32)> {
        self.search_root(depth, game, false)
    }

    fn search_root(&mut self, depth: u32, game: &mut Game, prune: bool) -> Option<(Move, i32)> {
        self.nodes_searched = 0;
        let depth = depth.max(1);
        let maximizing = game.side_to_move() == Color::White;

        let mut best: Option<(Move, i32)> = None;
        let mut alpha = -INF;
        let mut beta = INF;

        for mv in game.legal_moves() {
            let score = match game.apply(mv) {
                Some(mut child) => {
                    if prune {
                        self.minimax(depth - 1, &mut child, alpha, beta, !maximizing)
                    } else {
                        self.minimax_unpruned(depth - 1, &mut child, !maximizing)
                    }
                }
                None => continue,
            };
            debug!("root {} scores {}", mv, score);

            let improves = match best {
                None => true,
                Some((_, best_score)) if maximizing => score > best_score,
                Some((_, best_score)) => score < best_score,
            };
            if improves {
                best = Some((mv, score));
            }

            if prune {
                if maximizing {
                    alpha = alpha.max(score);
                } else {
                    beta = beta.min(score);
                }
            }
        }

        if let Some((mv, score)) = best {
            info!(
                "{:?} plays {} (score {}, depth {}, {} nodes)",
                game.side_to_move(),
                mv,
                score,
                depth,
                self.nodes_searched
            );
        }
        best
    }

    /// Score of a position whose side to move has no legal move. Mates found
    /// with more depth left are closer to the root and weigh more.
    fn no_moves_score(game: &Game, depth: u32) -> i32 {
        let score = MATE + depth as i32;
        match game.side_to_move() {
            Color::White => -score,
            Color::Black => score,
        }
    }

    /// Depth-limited minimax with fail-hard alpha-beta pruning.
    pub fn minimax(
        &mut self,
        depth: u32,
        game: &mut Game,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.nodes_searched += 1;

        if depth == 0 {
            return self.evaluator.evaluate(game.board());
        }

        let moves = game.legal_moves();
        if moves.is_empty() {
            return Self::no_moves_score(game, depth).clamp(alpha, beta);
        }

        if maximizing {
            for mv in moves {
                let score = match game.apply(mv) {
                    Some(mut child) => self.minimax(depth - 1, &mut child, alpha, beta, false),
                    None => continue,
                };
                if score >= beta {
                    return beta;
                }
                if score > alpha {
                    alpha = score;
                }
            }
            alpha
        } else {
            for mv in moves {
                let score = match game.apply(mv) {
                    Some(mut child) => self.minimax(depth - 1, &mut child, alpha, beta, true),
                    None => continue,
                };
                if score <= alpha {
                    return alpha;
                }
                if score < beta {
                    beta = score;
                }
            }
            beta
        }
    }

    /// Plain minimax, every branch searched.
    pub fn minimax_unpruned(&mut self, depth: u32, game: &mut Game, maximizing: bool) -> i32 {
        self.nodes_searched += 1;

        if depth == 0 {
            return self.evaluator.evaluate(game.board());
        }

        let moves = game.legal_moves();
        if moves.is_empty() {
            return Self::no_moves_score(game, depth);
        }

        let mut best = if maximizing { -INF } else { INF };
        for mv in moves {
            if let Some(mut child) = game.apply(mv) {
                let score = self.minimax_unpruned(depth - 1, &mut child, !maximizing);
                best = if maximizing { best.max(score) } else { best.min(score) };
            }
        }
        best
    }

    pub fn set_max_depth(&mut self, depth: u32) {
        self.max_depth = depth.max(1);
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn get_nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}

impl Default for Search {
    fn default() -> Self {
        Search::new()
    }
}
