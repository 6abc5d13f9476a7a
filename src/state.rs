// src/state.rs

use std::sync::Mutex;

use crate::error::SheetError;

/// What a consumer currently has to show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Failure(SheetError),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SheetError> {
        match self {
            LoadState::Failure(err) => Some(err),
            _ => None,
        }
    }
}

/// Identifies one request issued by a [`Feed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug)]
struct Inner<T> {
    state: LoadState<T>,
    issued: u64,
    current: Option<u64>,
}

/// Holds one consumer's [`LoadState`] and only accepts results for the most
/// recently issued request. Anything older, or anything arriving after
/// [`Feed::teardown`], is dropped.
#[derive(Debug)]
pub struct Feed<T> {
    inner: Mutex<Inner<T>>,
}

impl<T> Default for Feed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Feed<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: LoadState::Idle,
                issued: 0,
                current: None,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Starts a request: bumps the sequence, enters `Loading`.
    pub fn begin(&self) -> Ticket {
        let mut inner = self.lock();
        inner.issued += 1;
        let seq = inner.issued;
        inner.current = Some(seq);
        inner.state = LoadState::Loading;
        Ticket(seq)
    }

    /// Applies `result` if `ticket` is still the current request.
    /// Returns whether it was applied.
    pub fn complete(&self, ticket: Ticket, result: Result<T, SheetError>) -> bool {
        let mut inner = self.lock();
        if inner.current != Some(ticket.0) {
            return false;
        }
        inner.current = None;
        inner.state = match result {
            Ok(data) => LoadState::Success(data),
            Err(err) => LoadState::Failure(err),
        };
        true
    }

    /// Invalidates any outstanding request and goes back to `Idle`.
    pub fn teardown(&self) {
        let mut inner = self.lock();
        inner.current = None;
        inner.state = LoadState::Idle;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.lock().current == Some(ticket.0)
    }
}

impl<T: Clone> Feed<T> {
    pub fn snapshot(&self) -> LoadState<T> {
        self.lock().state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_then_complete() {
        let feed = Feed::<Vec<u8>>::new();
        assert_eq!(feed.snapshot(), LoadState::Idle);

        let t = feed.begin();
        assert!(feed.snapshot().is_loading());
        assert!(feed.complete(t, Ok(vec![1, 2])));
        assert_eq!(feed.snapshot().data(), Some(&vec![1, 2]));
    }

    #[test]
    fn stale_result_is_ignored_even_if_it_lands_last() {
        let feed = Feed::<&str>::new();
        let first = feed.begin();
        let second = feed.begin();

        assert!(feed.complete(second, Ok("fresh")));
        assert!(!feed.complete(first, Ok("stale")));
        assert_eq!(feed.snapshot(), LoadState::Success("fresh"));
    }

    #[test]
    fn stale_result_cannot_replace_loading() {
        let feed = Feed::<&str>::new();
        let first = feed.begin();
        let _second = feed.begin();

        assert!(!feed.complete(first, Err(SheetError::transport("timeout"))));
        assert!(feed.snapshot().is_loading());
    }

    #[test]
    fn teardown_drops_in_flight_results() {
        let feed = Feed::<&str>::new();
        let t = feed.begin();
        feed.teardown();

        assert!(!feed.is_current(t));
        assert!(!feed.complete(t, Ok("late")));
        assert_eq!(feed.snapshot(), LoadState::Idle);
    }

    #[test]
    fn failure_is_kept_as_state() {
        let feed = Feed::<()>::new();
        let t = feed.begin();
        feed.complete(t, Err(SheetError::status(404, "Requested entity was not found.")));
        assert_eq!(
            feed.snapshot().error(),
            Some(&SheetError::status(404, "Requested entity was not found."))
        );
    }
}
