//! Owner of the authoritative quote configuration.
//!
//! Readers get an immutable `Arc` snapshot; writers hand back a whole new
//! configuration. Nothing is mutated in place, so a snapshot taken before
//! an edit stays valid after it.

use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::{ConfigError, ProjectConfig};

struct History {
    current: Arc<ProjectConfig>,
    previous: VecDeque<Arc<ProjectConfig>>,
}

pub struct QuoteSession {
    state: RwLock<History>,
    initial: Arc<ProjectConfig>,
    history_limit: usize,
    interpreting: AtomicBool,
}

/// Held while an interpreter request is outstanding.
pub struct InterpretationGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InterpretationGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl QuoteSession {
    pub fn new(initial: ProjectConfig, history_limit: usize) -> Result<Self, ConfigError> {
        initial.validate()?;
        let initial = Arc::new(initial);
        Ok(Self {
            state: RwLock::new(History {
                current: Arc::clone(&initial),
                previous: VecDeque::new(),
            }),
            initial,
            history_limit,
            interpreting: AtomicBool::new(false),
        })
    }

    pub fn snapshot(&self) -> Arc<ProjectConfig> {
        Arc::clone(&self.state.read().current)
    }

    fn install(&self, history: &mut History, next: Arc<ProjectConfig>) {
        let previous = std::mem::replace(&mut history.current, next);
        if self.history_limit == 0 {
            return;
        }
        if history.previous.len() == self.history_limit {
            history.previous.pop_front();
        }
        history.previous.push_back(previous);
    }

    /// Derives the next configuration from the latest one and installs it.
    ///
    /// `f` runs under the write lock, so edits made while an interpreter
    /// call was in flight are not lost.
    pub fn update<F>(&self, f: F) -> Result<Arc<ProjectConfig>, ConfigError>
    where
        F: FnOnce(&ProjectConfig) -> ProjectConfig,
    {
        self.update_if(|current| Some(f(current)))
            .map(|next| next.unwrap_or_else(|| self.snapshot()))
    }

    /// Like [`update`](Self::update), but `f` may return `None` to leave
    /// the configuration and history untouched. A result equal to the
    /// current configuration is treated the same way.
    pub fn update_if<F>(&self, f: F) -> Result<Option<Arc<ProjectConfig>>, ConfigError>
    where
        F: FnOnce(&ProjectConfig) -> Option<ProjectConfig>,
    {
        let mut history = self.state.write();
        let Some(next) = f(&history.current) else {
            return Ok(None);
        };
        if next == *history.current {
            return Ok(None);
        }
        next.validate()?;
        let next = Arc::new(next);
        self.install(&mut history, Arc::clone(&next));
        tracing::debug!(depth = history.previous.len(), "Configuration updated");
        Ok(Some(next))
    }

    pub fn reset(&self) -> Arc<ProjectConfig> {
        let mut history = self.state.write();
        if *history.current != *self.initial {
            self.install(&mut history, Arc::clone(&self.initial));
        }
        Arc::clone(&history.current)
    }

    /// Restores the previous snapshot, if any.
    pub fn undo(&self) -> Option<Arc<ProjectConfig>> {
        let mut history = self.state.write();
        let previous = history.previous.pop_back()?;
        history.current = Arc::clone(&previous);
        Some(previous)
    }

    /// Claims the single interpreter slot. `None` if a call is already
    /// outstanding.
    pub fn begin_interpretation(&self) -> Option<InterpretationGuard<'_>> {
        self.interpreting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InterpretationGuard {
                flag: &self.interpreting,
            })
    }

    pub fn is_interpreting(&self) -> bool {
        self.interpreting.load(Ordering::Acquire)
    }
}
