use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::Solver;

/// A scripted solver for tests. Returns pre-defined answers in order.
pub struct MockSolver {
    answers: Vec<String>,
    index: AtomicUsize,
}

impl MockSolver {
    pub fn new<S: Into<String>>(answers: Vec<S>) -> Self {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            index: AtomicUsize::new(0),
        }
    }

    /// How many times [`Solver::solve`] has been called.
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Solver for MockSolver {
    async fn solve(&self, _challenge_text: &str) -> Result<String> {
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        self.answers
            .get(i)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("MockSolver: no more answers (called {} times)", i + 1))
    }
}
