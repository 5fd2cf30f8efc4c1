//! Optimistic local mutations with rollback.
//!
//! Local state is updated before the backend confirms the change so the
//! operator sees it immediately. If the backend call fails, the state is
//! restored to the exact snapshot taken before the mutation.

use std::future::Future;

/// A mutation applied to `state` that is not yet confirmed.
///
/// Dropping the guard without calling [`Optimistic::commit`] restores the
/// snapshot, so an abandoned mutation never leaks into local state.
#[must_use = "an uncommitted optimistic mutation is reverted on drop"]
pub struct Optimistic<'a, T: Clone> {
    state: &'a mut T,
    snapshot: Option<T>,
}

impl<'a, T: Clone> Optimistic<'a, T> {
    /// Snapshots `state`, then applies `mutate` to it.
    pub fn begin<M>(state: &'a mut T, mutate: M) -> Self
    where
        M: FnOnce(&mut T),
    {
        let snapshot = state.clone();
        mutate(&mut *state);
        Self {
            state,
            snapshot: Some(snapshot),
        }
    }

    /// The mutated state as it will look once committed.
    pub fn candidate(&self) -> &T {
        &*self.state
    }

    /// Keeps the mutation.
    pub fn commit(mut self) {
        self.snapshot = None;
    }

    /// Restores the pre-mutation snapshot.
    pub fn revert(self) {
        drop(self);
    }
}

impl<T: Clone> Drop for Optimistic<'_, T> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.state = snapshot;
        }
    }
}

/// Applies `mutate` to `state`, then runs `commit` with a copy of the mutated
/// value. On `Err` the snapshot is restored before the error is returned.
///
/// # Errors
///
/// Returns whatever error `commit` produced; `state` is unchanged in that case.
pub async fn commit_or_revert<T, R, E, M, C, Fut>(
    state: &mut T,
    mutate: M,
    commit: C,
) -> Result<R, E>
where
    T: Clone,
    M: FnOnce(&mut T),
    C: FnOnce(T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let pending = Optimistic::begin(state, mutate);
    let candidate = pending.candidate().clone();
    match commit(candidate).await {
        Ok(value) => {
            pending.commit();
            Ok(value)
        }
        Err(err) => {
            pending.revert();
            Err(err)
        }
    }
}
