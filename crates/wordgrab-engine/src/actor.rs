//! Per-game actor tasks and the handles that talk to them.
//!
//! Each game is owned by exactly one task. Sessions send commands over an
//! unbounded channel and await a oneshot reply; the task applies commands
//! one at a time, so every operation sees fully settled state and the
//! first-come-first-served race for a word is decided by queue order.

use crate::EngineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};
use wordgrab_core::{
    Dictionary, EndVote, Game, GameError, GameOutcome, GameSnapshot, PlayerId, ReconnectToken,
};

/// Reply to a successful join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Joined {
    /// Secret for re-attaching a dropped session; show it to one player only
    pub token: ReconnectToken,
    pub state: GameSnapshot,
}

/// Reply to a successful flip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flipped {
    pub tile: char,
    pub state: GameSnapshot,
}

type Reply<T> = oneshot::Sender<Result<T, GameError>>;

/// Commands a session can send to a game task.
enum GameCommand {
    Join {
        player_id: PlayerId,
        name: String,
        reply: Reply<Joined>,
    },
    Reconnect {
        player_id: PlayerId,
        reply: Reply<GameSnapshot>,
    },
    Disconnect {
        player_id: PlayerId,
        reply: Reply<GameSnapshot>,
    },
    FlipTile {
        player_id: PlayerId,
        reply: Reply<Flipped>,
    },
    ClaimWord {
        player_id: PlayerId,
        word: String,
        claimed_at: DateTime<Utc>,
        reply: Reply<GameSnapshot>,
    },
    StealWord {
        player_id: PlayerId,
        word: String,
        from_players: HashMap<PlayerId, BTreeSet<usize>>,
        claimed_at: DateTime<Utc>,
        reply: Reply<GameSnapshot>,
    },
    VoteToEnd {
        player_id: PlayerId,
        reply: Reply<EndVote>,
    },
    EndGame {
        reply: oneshot::Sender<GameOutcome>,
    },
    GetState {
        reply: oneshot::Sender<GameSnapshot>,
    },
    Shutdown,
}

/// Handle to one game's actor. Cheap to clone; every clone feeds the same
/// command queue.
#[derive(Debug, Clone)]
pub struct GameHandle {
    tx: mpsc::UnboundedSender<GameCommand>,
}

/// Spawn the actor task for `game`. The task owns the state and the
/// dictionary and runs until it receives `Shutdown` or every handle is
/// dropped.
pub fn spawn(game: Game, dictionary: Arc<dyn Dictionary>) -> GameHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(run_game(game, dictionary, rx));
    GameHandle { tx }
}

async fn run_game(
    mut game: Game,
    dictionary: Arc<dyn Dictionary>,
    mut rx: mpsc::UnboundedReceiver<GameCommand>,
) {
    debug!("game {}: actor started", game.id);

    while let Some(command) = rx.recv().await {
        match command {
            GameCommand::Join {
                player_id,
                name,
                reply,
            } => {
                let result = game.join(player_id, name).map(|token| {
                    info!("game {}: player {} joined", game.id, player_id);
                    Joined {
                        token,
                        state: game.snapshot(),
                    }
                });
                let _ = reply.send(result);
            }

            GameCommand::Reconnect { player_id, reply } => {
                let result = game.reconnect(player_id).map(|()| game.snapshot());
                let _ = reply.send(result);
            }

            GameCommand::Disconnect { player_id, reply } => {
                let result = game.disconnect(player_id).map(|()| game.snapshot());
                let _ = reply.send(result);
            }

            GameCommand::FlipTile { player_id, reply } => {
                let result = game.flip_tile(player_id).map(|tile| Flipped {
                    tile,
                    state: game.snapshot(),
                });
                let _ = reply.send(result);
            }

            GameCommand::ClaimWord {
                player_id,
                word,
                claimed_at,
                reply,
            } => {
                let result = game.claim_word(player_id, &word, dictionary.as_ref(), claimed_at);
                match &result {
                    Ok(()) => debug!("game {}: {} claimed {:?}", game.id, player_id, word),
                    Err(e) => debug!("game {}: claim of {:?} rejected: {}", game.id, word, e),
                }
                let _ = reply.send(result.map(|()| game.snapshot()));
            }

            GameCommand::StealWord {
                player_id,
                word,
                from_players,
                claimed_at,
                reply,
            } => {
                let result = game.steal_word(
                    player_id,
                    &word,
                    from_players,
                    dictionary.as_ref(),
                    claimed_at,
                );
                match &result {
                    Ok(()) => debug!("game {}: {} stole {:?}", game.id, player_id, word),
                    Err(e) => debug!("game {}: steal of {:?} rejected: {}", game.id, word, e),
                }
                let _ = reply.send(result.map(|()| game.snapshot()));
            }

            GameCommand::VoteToEnd { player_id, reply } => {
                let result = game.vote_to_end(player_id);
                if let Ok(EndVote::Ended(_)) = &result {
                    info!("game {}: ended by vote", game.id);
                }
                let _ = reply.send(result);
            }

            GameCommand::EndGame { reply } => {
                let outcome = game.end_game();
                info!("game {}: ended", game.id);
                let _ = reply.send(outcome);
            }

            GameCommand::GetState { reply } => {
                let _ = reply.send(game.snapshot());
            }

            GameCommand::Shutdown => break,
        }
    }

    debug!("game {}: actor stopped", game.id);
}

impl GameHandle {
    /// Send a command and await its reply. Both a closed channel and a
    /// dropped reply mean the actor is gone.
    async fn call<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> GameCommand,
    ) -> Result<T, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .map_err(|_| EngineError::GameClosed)?;
        rx.await
            .map_err(|_| EngineError::GameClosed)?
            .map_err(EngineError::Game)
    }

    /// Join the game, receiving a reconnect token for this player
    pub async fn join(&self, player_id: PlayerId, name: String) -> Result<Joined, EngineError> {
        self.call(|reply| GameCommand::Join {
            player_id,
            name,
            reply,
        })
        .await
    }

    /// Mark the player connected again after a session re-attach
    pub async fn reconnect(&self, player_id: PlayerId) -> Result<GameSnapshot, EngineError> {
        self.call(|reply| GameCommand::Reconnect { player_id, reply })
            .await
    }

    /// Mark the player disconnected; their words stay in play
    pub async fn disconnect(&self, player_id: PlayerId) -> Result<GameSnapshot, EngineError> {
        self.call(|reply| GameCommand::Disconnect { player_id, reply })
            .await
    }

    /// Flip the next tile into the shared pool
    pub async fn flip_tile(&self, player_id: PlayerId) -> Result<Flipped, EngineError> {
        self.call(|reply| GameCommand::FlipTile { player_id, reply })
            .await
    }

    /// Claim a word from the flipped pool. `claimed_at` is the submission
    /// time the session layer vouches for.
    pub async fn claim_word(
        &self,
        player_id: PlayerId,
        word: String,
        claimed_at: DateTime<Utc>,
    ) -> Result<GameSnapshot, EngineError> {
        self.call(|reply| GameCommand::ClaimWord {
            player_id,
            word,
            claimed_at,
            reply,
        })
        .await
    }

    /// Steal words by index from their owners, combined with pool letters
    pub async fn steal_word(
        &self,
        player_id: PlayerId,
        word: String,
        from_players: HashMap<PlayerId, BTreeSet<usize>>,
        claimed_at: DateTime<Utc>,
    ) -> Result<GameSnapshot, EngineError> {
        self.call(|reply| GameCommand::StealWord {
            player_id,
            word,
            from_players,
            claimed_at,
            reply,
        })
        .await
    }

    /// Vote to end the game
    pub async fn vote_to_end(&self, player_id: PlayerId) -> Result<EndVote, EngineError> {
        self.call(|reply| GameCommand::VoteToEnd { player_id, reply })
            .await
    }

    /// End the game now, returning the final outcome
    pub async fn end_game(&self) -> Result<GameOutcome, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(GameCommand::EndGame { reply })
            .map_err(|_| EngineError::GameClosed)?;
        rx.await.map_err(|_| EngineError::GameClosed)
    }

    /// Current published state of the game
    pub async fn state(&self) -> Result<GameSnapshot, EngineError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(GameCommand::GetState { reply })
            .map_err(|_| EngineError::GameClosed)?;
        rx.await.map_err(|_| EngineError::GameClosed)
    }

    /// Ask the actor to stop. Commands already queued are still applied;
    /// anything sent afterwards observes `GameClosed`.
    pub fn shutdown(&self) {
        let _ = self.tx.send(GameCommand::Shutdown);
    }
}
