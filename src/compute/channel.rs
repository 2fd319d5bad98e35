use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use rand::Rng;
use tracing::{debug, warn};

use super::message::{AdvisorReply, AdvisorRequest};
use crate::ai::{random_legal_column, AdvisorConfig, MoveAdvisor};
use crate::error::AdvisorError;
use crate::game::Board;

/// Runs the move advisor on a dedicated worker thread per request.
///
/// Nothing is shared with the worker: the request is moved in and the ranked
/// columns come back over a channel, exactly once.
pub struct ComputeChannel {
    config: AdvisorConfig,
    requests: u64,
}

impl ComputeChannel {
    pub fn new(config: AdvisorConfig) -> Self {
        ComputeChannel {
            config,
            requests: 0,
        }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Hand `request` to a fresh worker and return immediately.
    pub fn submit(&mut self, request: AdvisorRequest) -> PendingRecommendation {
        let mut config = self.config.clone();
        // Distinct but reproducible stream per request when seeded
        config.seed = config.seed.map(|seed| seed.wrapping_add(self.requests));
        self.requests += 1;

        let (tx, rx) = mpsc::channel::<AdvisorReply>();
        let spawned = thread::Builder::new()
            .name(format!("advisor-{}", self.requests))
            .spawn(move || {
                let reply = run_request(config, &request);
                // The caller may have stopped waiting; nothing to do then
                let _ = tx.send(reply);
            });

        match spawned {
            Ok(handle) => PendingRecommendation {
                inner: Pending::Waiting { rx, handle },
            },
            Err(err) => PendingRecommendation {
                inner: Pending::Failed(AdvisorError::Spawn(err)),
            },
        }
    }
}

fn run_request(config: AdvisorConfig, request: &AdvisorRequest) -> AdvisorReply {
    let (board, player) = request.decode()?;
    let mut advisor = MoveAdvisor::new(config);
    let columns = advisor.recommend(&board, player);
    debug!(player = player.id(), ?columns, "advisor finished");
    Ok(columns)
}

enum Pending {
    Waiting {
        rx: Receiver<AdvisorReply>,
        handle: JoinHandle<()>,
    },
    Failed(AdvisorError),
    Taken,
}

/// A recommendation being computed on a worker thread.
pub struct PendingRecommendation {
    inner: Pending,
}

impl PendingRecommendation {
    /// Block until the worker replies. A worker that dies without replying
    /// yields [`AdvisorError::WorkerLost`].
    pub fn wait(self) -> AdvisorReply {
        match self.inner {
            Pending::Waiting { rx, handle } => {
                let reply = rx.recv().unwrap_or(Err(AdvisorError::WorkerLost));
                let _ = handle.join();
                reply
            }
            Pending::Failed(err) => Err(err),
            Pending::Taken => Err(AdvisorError::WorkerLost),
        }
    }

    /// Poll without blocking. Returns the reply once; `None` while the worker
    /// is still busy and after the reply was taken.
    pub fn try_take(&mut self) -> Option<AdvisorReply> {
        match std::mem::replace(&mut self.inner, Pending::Taken) {
            Pending::Waiting { rx, handle } => match rx.try_recv() {
                Ok(reply) => Some(reply),
                Err(TryRecvError::Empty) => {
                    self.inner = Pending::Waiting { rx, handle };
                    None
                }
                Err(TryRecvError::Disconnected) => Some(Err(AdvisorError::WorkerLost)),
            },
            Pending::Failed(err) => Some(Err(err)),
            Pending::Taken => None,
        }
    }
}

/// Turn an advisor reply into the column to play on `board`.
///
/// Takes the first recommended column that is still legal. If the advisor
/// failed or recommended nothing usable, falls back to a uniformly random
/// legal column. `None` only when the board is full.
pub fn resolve_column<R: Rng + ?Sized>(
    board: &Board,
    reply: AdvisorReply,
    rng: &mut R,
) -> Option<usize> {
    match reply {
        Ok(columns) => {
            if let Some(col) = columns.into_iter().find(|&col| !board.is_column_full(col)) {
                return Some(col);
            }
            if !board.is_full() {
                warn!("advisor recommended no legal column, playing at random");
            }
        }
        Err(err) => warn!(error = %err, "advisor unavailable, playing at random"),
    }
    random_legal_column(board, rng)
}
