//! Per-game state machine driving the human and the agent in turn
//!
//! ```text
//! AwaitingPlayerMove ──play_human──▶ AwaitingAgentMove ──play_agent──▶ AwaitingPlayerMove
//!         │                                  │
//!         └──────────── terminal board ──────┴──────────▶ Terminal(outcome)
//! ```
//!
//! Entering `Terminal` runs the learner over the episode trace exactly once and
//! then persists the Q-table. `Terminal` is absorbing until [`Session::reset`].

use std::{path::PathBuf, sync::Arc};

use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    ports::QTableRepository,
    q_learning::{EpisodeTrace, EpsilonGreedy, QLearner, QTable, Selection, UpdateSummary},
    tictactoe::{BoardState, GameOutcome, Move, Player},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingPlayerMove,
    AwaitingAgentMove,
    Terminal(GameOutcome),
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Terminal(_))
    }
}

/// A move chosen by the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentMove {
    pub position: usize,
    pub selection: Selection,
}

/// One human-versus-agent game at a time, sharing a Q-table across games
pub struct Session {
    table: QTable,
    policy: EpsilonGreedy,
    learner: QLearner,
    repository: Arc<dyn QTableRepository + Send + Sync>,
    table_path: PathBuf,
    human: Player,
    board: BoardState,
    trace: EpisodeTrace,
    moves: Vec<Move>,
    phase: Phase,
    last_update: Option<UpdateSummary>,
    episodes: usize,
}

impl Session {
    /// Start a session on `table`; the learner's mark is the agent's mark and
    /// the human always moves first.
    pub fn new(
        table: QTable,
        policy: EpsilonGreedy,
        learner: QLearner,
        repository: Arc<dyn QTableRepository + Send + Sync>,
        table_path: PathBuf,
    ) -> Self {
        Self {
            table,
            policy,
            human: learner.agent().opponent(),
            learner,
            repository,
            table_path,
            board: BoardState::new(),
            trace: EpisodeTrace::new(),
            moves: Vec::new(),
            phase: Phase::AwaitingPlayerMove,
            last_update: None,
            episodes: 0,
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.phase {
            Phase::Terminal(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn trace(&self) -> &EpisodeTrace {
        &self.trace
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn human(&self) -> Player {
        self.human
    }

    pub fn agent(&self) -> Player {
        self.learner.agent()
    }

    /// Summary of the update applied when the last game ended
    pub fn last_update(&self) -> Option<UpdateSummary> {
        self.last_update
    }

    /// Number of games that reached a terminal board
    pub fn episodes(&self) -> usize {
        self.episodes
    }

    pub fn exploration_rate(&self) -> f64 {
        self.policy.epsilon()
    }

    /// Legal cells for whoever is to move; empty once the game is over
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.phase.is_terminal() {
            Vec::new()
        } else {
            self.board.legal_actions()
        }
    }

    /// Place the human's mark at `position`.
    ///
    /// # Errors
    ///
    /// - [`Error::GameOver`] once the game has ended
    /// - [`Error::NotHumanTurn`] while the agent is to move
    /// - [`Error::InvalidMove`] / [`Error::InvalidPosition`] for an illegal cell;
    ///   board and phase are left untouched
    pub fn play_human(&mut self, position: usize) -> Result<Phase> {
        match self.phase {
            Phase::Terminal(_) => return Err(Error::GameOver),
            Phase::AwaitingAgentMove => return Err(Error::NotHumanTurn),
            Phase::AwaitingPlayerMove => {}
        }

        self.board = self.board.apply(position, self.human)?;
        self.moves.push(Move {
            position,
            player: self.human,
        });
        debug!(position, board = %self.board.compact(), "human moved");

        self.advance(Phase::AwaitingAgentMove)?;
        Ok(self.phase)
    }

    /// Let the policy choose and play the agent's move.
    ///
    /// # Errors
    ///
    /// - [`Error::GameOver`] once the game has ended
    /// - [`Error::NotAgentTurn`] while the human is to move
    pub fn play_agent(&mut self) -> Result<AgentMove> {
        match self.phase {
            Phase::Terminal(_) => return Err(Error::GameOver),
            Phase::AwaitingPlayerMove => return Err(Error::NotAgentTurn),
            Phase::AwaitingAgentMove => {}
        }

        let state = self.board;
        let legal = state.legal_actions();
        let (position, selection) = self
            .policy
            .select_with_branch(&self.table, &state, &legal)?;

        self.board = state.apply(position, self.learner.agent())?;
        self.trace.record(state, position);
        self.moves.push(Move {
            position,
            player: self.learner.agent(),
        });
        debug!(position, ?selection, board = %self.board.compact(), "agent moved");

        self.advance(Phase::AwaitingPlayerMove)?;
        Ok(AgentMove {
            position,
            selection,
        })
    }

    /// Move to `next`, or to `Terminal` if the board is finished
    fn advance(&mut self, next: Phase) -> Result<()> {
        match self.board.outcome() {
            Some(outcome) => self.finish(outcome),
            None => {
                self.phase = next;
                Ok(())
            }
        }
    }

    fn finish(&mut self, outcome: GameOutcome) -> Result<()> {
        self.phase = Phase::Terminal(outcome);
        self.episodes += 1;

        let summary = self
            .learner
            .update(&mut self.table, &self.trace, outcome, &self.board);
        self.last_update = Some(summary);
        self.trace.clear();
        self.policy.end_episode();

        info!(
            ?outcome,
            reward = summary.reward,
            steps = summary.steps,
            entries = self.table.len(),
            "game over"
        );

        self.repository.save(&self.table, &self.table_path)
    }

    /// Start a new game, keeping everything learned so far.
    ///
    /// A game abandoned before it ended is discarded without an update.
    pub fn reset(&mut self) {
        if !self.phase.is_terminal() && !self.moves.is_empty() {
            debug!(moves = self.moves.len(), "abandoning unfinished game");
        }
        self.board = BoardState::new();
        self.trace.clear();
        self.moves.clear();
        self.phase = Phase::AwaitingPlayerMove;
    }

    /// Persist the table one last time and hand it back
    pub fn shutdown(self) -> Result<QTable> {
        self.repository.save(&self.table, &self.table_path)?;
        info!(
            path = %self.table_path.display(),
            entries = self.table.len(),
            episodes = self.episodes,
            "session closed"
        );
        Ok(self.table)
    }
}
