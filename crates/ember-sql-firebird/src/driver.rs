//! The native client driver seam.
//!
//! The wire protocol is an external collaborator: this module defines the
//! narrow traits the backend drives it through, the error shape it reports,
//! and a scripted mock implementation for tests. A real binding wraps the
//! vendor client library behind these traits.

use crate::convert::{DriverValue, NativeTag};

/// Vendor error code for unique/primary key violations.
pub const ISC_UNIQUE_VIOLATION: i32 = -803;

/// An error reported by the native driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverError {
    /// Vendor error code (negative for engine errors).
    pub code: i32,
    /// Driver-supplied message.
    pub message: String,
}

impl DriverError {
    /// Creates a driver error.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "driver error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for DriverError {}

/// Parameters handed to the driver when opening a connection.
#[derive(Debug, Clone)]
pub struct ConnectParams {
    /// `host:database` connection string.
    pub dsn: String,
    /// User name.
    pub user: String,
    /// Password.
    pub password: String,
    /// Negotiated character set name.
    pub charset: &'static str,
}

/// One result cell: the native tag the driver attached (if any) and the
/// wire value. Values without a registered tag (plain integers, doubles)
/// pass through conversion untouched.
pub type DriverCell = (Option<NativeTag>, DriverValue);

/// One result row.
pub type DriverRow = Vec<DriverCell>;

/// A client driver capable of opening connections.
pub trait Driver: Send + Sync {
    /// Opens a native connection.
    fn connect(&self, params: &ConnectParams) -> Result<Box<dyn DriverConnection>, DriverError>;
}

/// An open native connection.
pub trait DriverConnection: Send {
    /// Opens a statement cursor on this connection.
    fn open_cursor(&mut self) -> Box<dyn DriverCursor>;

    /// The server version string.
    fn server_version(&self) -> String;

    /// Closes the connection.
    fn close(&mut self) -> Result<(), DriverError> {
        Ok(())
    }
}

/// A statement cursor. Not safe for concurrent use; callers serialize
/// access per connection.
pub trait DriverCursor: Send {
    /// Executes a statement with `?` placeholders.
    fn execute(&mut self, sql: &str, params: &[DriverValue]) -> Result<(), DriverError>;

    /// Executes a statement once per parameter tuple.
    fn execute_many(
        &mut self,
        sql: &str,
        param_lists: &[Vec<DriverValue>],
    ) -> Result<(), DriverError>;

    /// Fetches the next result row, `None` when exhausted.
    fn fetch_row(&mut self) -> Result<Option<DriverRow>, DriverError>;

    /// Rows affected by the last statement.
    fn rows_affected(&self) -> u64 {
        0
    }
}

/// Scripted in-memory driver for tests.
pub mod testing {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::{
        ConnectParams, Driver, DriverConnection, DriverCursor, DriverError, DriverRow, DriverValue,
    };

    /// One scripted reaction to an `execute` call.
    #[derive(Debug, Clone)]
    enum Response {
        Rows(Vec<DriverRow>),
        Error(DriverError),
    }

    #[derive(Debug, Default)]
    struct State {
        responses: VecDeque<Response>,
        pending_rows: VecDeque<DriverRow>,
        executed: Vec<(String, Vec<Vec<DriverValue>>)>,
        connect_params: Option<ConnectParams>,
    }

    /// A driver whose responses are scripted up front and whose executed
    /// statements are recorded for assertions.
    ///
    /// Clones share state, so a test can keep a handle while the backend
    /// owns the connection.
    #[derive(Debug, Clone, Default)]
    pub struct MockDriver {
        state: Arc<Mutex<State>>,
    }

    impl MockDriver {
        /// Creates an empty mock. Unscripted statements succeed with no rows.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Scripts a result set for the next executed statement.
        pub fn push_rows(&self, rows: Vec<DriverRow>) {
            self.state.lock().responses.push_back(Response::Rows(rows));
        }

        /// Scripts a driver error for the next executed statement.
        pub fn push_error(&self, code: i32, message: &str) {
            self.state
                .lock()
                .responses
                .push_back(Response::Error(DriverError::new(code, message)));
        }

        /// Statements executed so far, with their parameter tuples.
        #[must_use]
        pub fn executed(&self) -> Vec<(String, Vec<Vec<DriverValue>>)> {
            self.state.lock().executed.clone()
        }

        /// The parameters the last connection was opened with.
        #[must_use]
        pub fn connect_params(&self) -> Option<ConnectParams> {
            self.state.lock().connect_params.clone()
        }
    }

    impl Driver for MockDriver {
        fn connect(
            &self,
            params: &ConnectParams,
        ) -> Result<Box<dyn DriverConnection>, DriverError> {
            self.state.lock().connect_params = Some(params.clone());
            Ok(Box::new(MockConnection {
                state: Arc::clone(&self.state),
            }))
        }
    }

    #[derive(Debug)]
    struct MockConnection {
        state: Arc<Mutex<State>>,
    }

    impl DriverConnection for MockConnection {
        fn open_cursor(&mut self) -> Box<dyn DriverCursor> {
            Box::new(MockCursor {
                state: Arc::clone(&self.state),
            })
        }

        fn server_version(&self) -> String {
            String::from("LI-V2.5.9 Firebird 2.5 (mock)")
        }
    }

    #[derive(Debug)]
    struct MockCursor {
        state: Arc<Mutex<State>>,
    }

    impl MockCursor {
        fn run(&self, sql: &str, param_lists: Vec<Vec<DriverValue>>) -> Result<(), DriverError> {
            let mut state = self.state.lock();
            state.executed.push((String::from(sql), param_lists));
            match state.responses.pop_front() {
                Some(Response::Rows(rows)) => {
                    state.pending_rows = rows.into();
                    Ok(())
                }
                Some(Response::Error(err)) => Err(err),
                None => {
                    state.pending_rows.clear();
                    Ok(())
                }
            }
        }
    }

    impl DriverCursor for MockCursor {
        fn execute(&mut self, sql: &str, params: &[DriverValue]) -> Result<(), DriverError> {
            self.run(sql, vec![params.to_vec()])
        }

        fn execute_many(
            &mut self,
            sql: &str,
            param_lists: &[Vec<DriverValue>],
        ) -> Result<(), DriverError> {
            self.run(sql, param_lists.to_vec())
        }

        fn fetch_row(&mut self) -> Result<Option<DriverRow>, DriverError> {
            Ok(self.state.lock().pending_rows.pop_front())
        }
    }
}
