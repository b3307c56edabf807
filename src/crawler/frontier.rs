//! Per-worker URL frontier
//!
//! Each fetcher worker owns exactly one frontier, so nothing here is shared
//! or locked. The frontier is an ordered worklist plus the set of URLs this
//! worker has already crawled. When the worklist runs dry it is reset to the
//! seed list, which makes the crawl a never-ending cyclic walk that only an
//! external stop ends.

use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone)]
pub struct Frontier {
    seeds: Vec<String>,
    pending: VecDeque<String>,
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier whose worklist starts as the seed list
    pub fn new(seeds: Vec<String>) -> Self {
        let pending = seeds.iter().cloned().collect();
        Self {
            seeds,
            pending,
            visited: HashSet::new(),
        }
    }

    /// Pops the next URL, refilling from the seeds first if the worklist is empty
    ///
    /// Returns `None` only when there are no seeds at all.
    pub fn next_url(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            self.refill();
        }
        self.pending.pop_front()
    }

    /// Resets the worklist to exactly the seed list
    pub fn refill(&mut self) {
        tracing::debug!("Frontier exhausted, refilling with {} seeds", self.seeds.len());
        self.pending = self.seeds.iter().cloned().collect();
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn mark_visited(&mut self, url: impl Into<String>) {
        self.visited.insert(url.into());
    }

    /// Appends discovered links to the worklist, skipping visited URLs
    ///
    /// Returns the number of links added.
    pub fn extend<I>(&mut self, links: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let before = self.pending.len();
        for link in links {
            if !self.visited.contains(&link) {
                self.pending.push_back(link);
            }
        }
        self.pending.len() - before
    }

    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(String::as_str)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    pub fn seeds(&self) -> &[String] {
        &self.seeds
    }
}
