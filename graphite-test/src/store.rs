use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use graphite_data::{DataError, Execution, Row, StoreConnection};

/// Scripted in-memory store.
///
/// Clones share state, so keep one handle for assertions and give another
/// to the provider. Responses are consumed in order per kind: `query`
/// pops from the row queue (empty result when exhausted) and `execute`
/// pops from the execution queue (one affected row, no identity, when
/// exhausted). A pending failure set with [`fail_next`](Self::fail_next)
/// or [`fail_next_execute`](Self::fail_next_execute) takes precedence over
/// either queue.
#[derive(Debug, Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    statements: Vec<String>,
    rows: VecDeque<Vec<Row>>,
    executions: VecDeque<Execution>,
    failures: VecDeque<String>,
    execute_failures: VecDeque<String>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue the result of the next unanswered `query`.
    pub fn push_rows(&self, rows: Vec<Row>) -> &Self {
        self.lock().rows.push_back(rows);
        self
    }

    /// Queue the outcome of the next unanswered `execute`.
    pub fn push_execution(&self, rows_affected: u64, last_insert_id: u64) -> &Self {
        self.lock().executions.push_back(Execution {
            rows_affected,
            last_insert_id,
        });
        self
    }

    /// Make the next statement of either kind fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) -> &Self {
        self.lock().failures.push_back(message.into());
        self
    }

    /// Make the next `execute` fail with `message`; queries still succeed.
    pub fn fail_next_execute(&self, message: impl Into<String>) -> &Self {
        self.lock().execute_failures.push_back(message.into());
        self
    }

    /// Every statement received so far, in order.
    pub fn statements(&self) -> Vec<String> {
        self.lock().statements.clone()
    }

    pub fn last_statement(&self) -> Option<String> {
        self.lock().statements.last().cloned()
    }

    pub fn statement_count(&self) -> usize {
        self.lock().statements.len()
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.statements.clear();
        state.rows.clear();
        state.executions.clear();
        state.failures.clear();
        state.execute_failures.clear();
    }

    fn record(&self, sql: &str) -> Result<MutexGuard<'_, State>, DataError> {
        let mut state = self.lock();
        state.statements.push(sql.to_string());
        tracing::trace!(statement = %sql, "fake store received statement");
        match state.failures.pop_front() {
            Some(message) => Err(DataError::store_msg(message)),
            None => Ok(state),
        }
    }
}

impl StoreConnection for FakeStore {
    async fn query(&self, sql: &str) -> Result<Vec<Row>, DataError> {
        let mut state = self.record(sql)?;
        Ok(state.rows.pop_front().unwrap_or_default())
    }

    async fn execute(&self, sql: &str) -> Result<Execution, DataError> {
        let mut state = self.record(sql)?;
        if let Some(message) = state.execute_failures.pop_front() {
            return Err(DataError::store_msg(message));
        }
        Ok(state.executions.pop_front().unwrap_or(Execution {
            rows_affected: 1,
            last_insert_id: 0,
        }))
    }
}
