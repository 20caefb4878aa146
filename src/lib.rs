//! Chess rules with undo/redo history and a fixed-depth alpha-beta opponent.

pub mod board;
pub mod movegen;
pub mod history;
pub mod game;
pub mod snapshot;
pub mod evaluation;
pub mod search;
pub mod console;

#[cfg(test)]
mod tests {
    use super::*;
    use board::{Board, Color, Piece, PieceKind, Square};
    use game::Game;
    use movegen::Move;
    use search::{Search, MATE};

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn mv(text: &str) -> Move {
        Move::from_algebraic(text).unwrap()
    }

    fn place(board: &mut Board, name: &str, kind: PieceKind, color: Color) {
        board.set(sq(name), Some(Piece::new(kind, color)));
    }

    #[test]
    fn test_initial_position() {
        let game = Game::new();
        let moves = game.moves_without_check(Color::White);

        // White should have 20 legal moves in the initial position
        assert_eq!(moves.len(), 20);
        let knight_moves = moves
            .iter()
            .filter(|m| game.board().get(m.from).unwrap().kind == PieceKind::Knight)
            .count();
        assert_eq!(knight_moves, 4);

        for m in moves {
            assert!(game.can_move_piece(m.from, m.to));
            assert!(!game.move_will_cause_check(m.from, m.to));
        }
    }

    #[test]
    fn test_checkmate() {
        let mut board = Board::empty();
        place(&mut board, "h8", PieceKind::King, Color::Black);
        place(&mut board, "a8", PieceKind::Rook, Color::White);
        place(&mut board, "b7", PieceKind::Queen, Color::White);
        place(&mut board, "e1", PieceKind::King, Color::White);
        let game = Game::from_board(board, Color::Black);

        assert!(game.is_check());
        assert!(game.moves_without_check(Color::Black).is_empty());
        assert!(game.is_checkmate());
    }

    #[test]
    fn test_not_checkmate_when_king_can_capture() {
        let mut board = Board::empty();
        place(&mut board, "h8", PieceKind::King, Color::Black);
        place(&mut board, "g8", PieceKind::Rook, Color::White);
        place(&mut board, "e1", PieceKind::King, Color::White);
        let game = Game::from_board(board, Color::Black);

        assert!(game.is_check());
        assert!(!game.is_checkmate());
        assert!(game.legal_moves().contains(&mv("h8g8")));
    }

    #[test]
    fn test_sliders_never_pass_through_pieces() {
        let mut board = Board::empty();
        place(&mut board, "d4", PieceKind::Queen, Color::White);
        let blockers = ["d6", "f6", "f4", "f2", "d2", "b2", "b4", "b6"];
        for name in blockers {
            place(&mut board, name, PieceKind::Pawn, Color::Black);
        }

        let game = Game::from_board(board, Color::White);
        let reachable: Vec<String> = game
            .legal_destinations(sq("d4"))
            .into_iter()
            .map(|s| s.to_algebraic())
            .collect();
        // Each ray reaches the adjacent square and the blocker, nothing past it.
        assert_eq!(reachable.len(), 16);
        for far in ["d7", "g7", "g4", "g1", "d1", "a1", "a4", "a7"] {
            assert!(!reachable.contains(&far.to_string()));
        }
    }

    #[test]
    fn test_undo_restores_everything() {
        let mut board = Board::empty();
        place(&mut board, "e1", PieceKind::King, Color::White);
        place(&mut board, "h1", PieceKind::Rook, Color::White);
        place(&mut board, "e8", PieceKind::King, Color::Black);
        place(&mut board, "h5", PieceKind::Bishop, Color::Black);
        let mut game = Game::from_board(board, Color::White);
        let before = game.board().clone();

        // Rook takes the bishop and gets its moved flag.
        game.make_move_auto(mv("h1h5")).unwrap();
        assert!(game.board().get(sq("h5")).unwrap().has_moved);
        assert!(game.undo());
        assert_eq!(game.board(), &before);
        assert_eq!(game.side_to_move(), Color::White);
        assert!(!game.board().get(sq("h1")).unwrap().has_moved);
    }

    #[test]
    fn test_search_takes_the_hanging_rook() {
        let mut board = Board::empty();
        place(&mut board, "a1", PieceKind::King, Color::White);
        place(&mut board, "d1", PieceKind::Queen, Color::White);
        place(&mut board, "h8", PieceKind::King, Color::Black);
        place(&mut board, "d5", PieceKind::Rook, Color::Black);
        let mut game = Game::from_board(board, Color::White);

        let mut search = Search::new();
        let best = search.minimax_root(1, &mut game);
        assert_eq!(best, Some(mv("d1d5")));
        assert_eq!(best.map(|m| m.as_tuple()), Some((0, 4, 4, 4)));
    }

    #[test]
    fn test_search_finds_back_rank_mate() {
        let mut board = Board::empty();
        place(&mut board, "h8", PieceKind::King, Color::Black);
        place(&mut board, "g7", PieceKind::Pawn, Color::Black);
        place(&mut board, "h7", PieceKind::Pawn, Color::Black);
        place(&mut board, "a1", PieceKind::Rook, Color::White);
        place(&mut board, "c1", PieceKind::King, Color::White);
        let mut game = Game::from_board(board, Color::White);

        let mut search = Search::new();
        let (best, score) = search.best_move_with_score(2, &mut game).unwrap();
        assert_eq!(best, mv("a1a8"));
        assert!(score >= MATE);
    }

    #[test]
    fn test_black_minimizes() {
        let mut board = Board::empty();
        place(&mut board, "a1", PieceKind::King, Color::White);
        place(&mut board, "d4", PieceKind::Queen, Color::White);
        place(&mut board, "h8", PieceKind::King, Color::Black);
        place(&mut board, "g7", PieceKind::Knight, Color::Black);
        place(&mut board, "d8", PieceKind::Rook, Color::Black);
        let mut game = Game::from_board(board, Color::Black);

        let mut search = Search::new();
        assert_eq!(search.minimax_root(1, &mut game), Some(mv("d8d4")));
    }

    #[test]
    fn test_search_leaves_the_game_untouched() {
        let mut game = Game::new();
        game.make_move_auto(mv("e2e4")).unwrap();
        game.make_move_auto(mv("e7e5")).unwrap();
        game.undo();
        let before = game.clone();

        let mut search = Search::new();
        assert!(search.find_best_move(&mut game).is_some());
        assert!(search.get_nodes_searched() > 0);
        assert_eq!(game, before);
        assert!(game.redo());
    }

    #[test]
    fn test_no_move_when_mated() {
        let mut board = Board::empty();
        place(&mut board, "h8", PieceKind::King, Color::Black);
        place(&mut board, "a8", PieceKind::Rook, Color::White);
        place(&mut board, "b7", PieceKind::Queen, Color::White);
        place(&mut board, "e1", PieceKind::King, Color::White);
        let mut game = Game::from_board(board, Color::Black);
        assert_eq!(Search::new().minimax_root(2, &mut game), None);
    }

    #[test]
    fn test_pruning_does_not_change_the_result() {
        let mut positions = vec![(Game::new(), 2)];

        let mut board = Board::empty();
        place(&mut board, "e1", PieceKind::King, Color::White);
        place(&mut board, "d1", PieceKind::Queen, Color::White);
        place(&mut board, "c3", PieceKind::Knight, Color::White);
        place(&mut board, "e8", PieceKind::King, Color::Black);
        place(&mut board, "d5", PieceKind::Rook, Color::Black);
        place(&mut board, "b4", PieceKind::Bishop, Color::Black);
        positions.push((Game::from_board(board.clone(), Color::White), 3));
        positions.push((Game::from_board(board, Color::Black), 3));

        let mut board = Board::empty();
        place(&mut board, "h8", PieceKind::King, Color::Black);
        place(&mut board, "g7", PieceKind::Pawn, Color::Black);
        place(&mut board, "h7", PieceKind::Pawn, Color::Black);
        place(&mut board, "a1", PieceKind::Rook, Color::White);
        place(&mut board, "c1", PieceKind::King, Color::White);
        positions.push((Game::from_board(board, Color::White), 3));

        let mut search = Search::new();
        for (mut game, depth) in positions {
            let pruned = search.best_move_with_score(depth, &mut game);
            let pruned_nodes = search.get_nodes_searched();
            let plain = search.best_move_unpruned(depth, &mut game);
            let plain_nodes = search.get_nodes_searched();
            assert_eq!(pruned, plain);
            assert!(pruned_nodes <= plain_nodes);
        }
    }

    #[test]
    fn test_perft_initial_position() {
        let mut game = Game::new();

        assert_eq!(perft(&mut game, 1), 20);
        assert_eq!(perft(&mut game, 2), 400);
        assert_eq!(perft(&mut game, 3), 8902);
        assert_eq!(game, Game::new());
    }

    // Helper function to perform perft
    fn perft(game: &mut Game, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = game.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for m in moves {
            let mut child = game.apply(m).unwrap();
            nodes += perft(&mut child, depth - 1);
        }
        nodes
    }
}
