//! Per-run session transport between sandboxed test code and the host.
//!
//! Each grading run gets one Unix domain socket named after the run's secret,
//! `<socket_root>/<secret>.sock`, so only a process that knows the secret can
//! find the channel. The host listens with [`SessionListener`]; code inside
//! the sandbox emits records through a [`ScoreSink`], falling back to plain
//! stdout when the socket cannot be reached (the console extractor picks
//! those lines up instead).
//!
//! The socket path existing at all reveals an active secret, so the file is
//! removed as soon as the session ends, on either path: last client gone or
//! external cancellation.

use crate::error::ScoreError;
use crate::record::ScoreRecord;
use common::config::AppConfig;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;
use tokio::sync::{Mutex, Notify, mpsc};

/// How long cancellation waits for in-flight connections to drain.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Returns the session socket path for the given secret.
pub fn socket_path(secret: &str) -> PathBuf {
    let root = AppConfig::global().socket_root.clone();
    Path::new(&root).join(format!("{}.sock", secret))
}

/// Creates the root socket directory, readable by the owner only.
fn ensure_socket_root() -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    let root = AppConfig::global().socket_root.clone();
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(root)
}

/// Host side of the session transport: owns the listening socket for one run.
pub struct SessionListener {
    path: PathBuf,
    listener: UnixListener,
    secret: String,
}

impl SessionListener {
    /// Binds the session socket for the given secret, removing any stale
    /// socket file left behind by an earlier run.
    pub fn bind(secret: &str) -> Result<Self, ScoreError> {
        ensure_socket_root()?;
        let path = socket_path(secret);
        let _ = std::fs::remove_file(&path);
        let listener = UnixListener::bind(&path)?;
        Ok(Self {
            path,
            listener,
            secret: secret.to_string(),
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.path
    }

    /// Serves the session until the last connected client disconnects or
    /// `cancel` fires, then removes the socket file.
    ///
    /// Any number of clients may connect concurrently; each connection is
    /// read line by line and every line must be a valid, authenticated score
    /// record. The first bad line closes that one connection without
    /// disturbing the others. Valid records are logged and forwarded to
    /// `forward` when attached.
    ///
    /// Note the close-on-idle semantics: once at least one client has
    /// connected and all of them are gone, the session is over. A run whose
    /// sandbox never connects is ended by `cancel` (the run timeout).
    /// Cancellation stops accepting immediately but gives connections
    /// already being read a short grace to reach EOF.
    pub async fn serve(
        self,
        cancel: Arc<Notify>,
        forward: Option<mpsc::UnboundedSender<ScoreRecord>>,
    ) -> Result<(), ScoreError> {
        let active = Arc::new(Mutex::new(0usize));
        let idle = Arc::new(Notify::new());
        let mut connections: Vec<tokio::task::JoinHandle<()>> = Vec::new();

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, _addr) = match accepted {
                        Ok(pair) => pair,
                        Err(err) => {
                            tracing::warn!(%err, "session accept failed; shutting down listener");
                            break;
                        }
                    };
                    *active.lock().await += 1;

                    let secret = self.secret.clone();
                    let forward = forward.clone();
                    let active = Arc::clone(&active);
                    let idle = Arc::clone(&idle);
                    connections.push(tokio::spawn(async move {
                        let mut lines = BufReader::new(stream).lines();
                        while let Ok(Some(line)) = lines.next_line().await {
                            match ScoreRecord::parse(&line, &secret) {
                                Some(record) => {
                                    tracing::debug!(test_name = %record.test_name, score = record.score, "valid score received");
                                    if let Some(tx) = &forward {
                                        let _ = tx.send(record);
                                    }
                                }
                                None => {
                                    // Invalid message; close this connection only.
                                    tracing::debug!("closing session connection after invalid message");
                                    break;
                                }
                            }
                        }
                        let mut count = active.lock().await;
                        *count -= 1;
                        if *count == 0 {
                            idle.notify_one();
                        }
                    }));
                }
                _ = idle.notified() => break,
                _ = cancel.notified() => break,
            }
        }

        // Stop accepting before unwinding so no new client can slip in.
        drop(self.listener);
        // In-flight connections end on client EOF; records they already
        // carry must not be lost to cancellation.
        let drain = async {
            for connection in &mut connections {
                let _ = connection.await;
            }
        };
        if tokio::time::timeout(SHUTDOWN_GRACE, drain).await.is_err() {
            tracing::warn!("session connections still open at shutdown; aborting them");
            for connection in &connections {
                connection.abort();
            }
        }
        let _ = std::fs::remove_file(&self.path);
        Ok(())
    }
}

/// Client side of the session transport.
///
/// The strategy is chosen once at startup: try the session socket, fall back
/// to stdout when it cannot be established. Records written to stdout are
/// recovered by the console extractor instead.
pub enum ScoreSink {
    Socket(std::os::unix::net::UnixStream),
    Stdout,
}

impl ScoreSink {
    /// Connects to the session socket for the given secret, falling back to
    /// stdout when the socket is absent or refuses the connection.
    pub fn connect(secret: &str) -> ScoreSink {
        let path = socket_path(secret);
        match std::os::unix::net::UnixStream::connect(&path) {
            Ok(stream) => ScoreSink::Socket(stream),
            Err(err) => {
                tracing::debug!(%err, "session socket unavailable; reporting to stdout");
                ScoreSink::Stdout
            }
        }
    }

    /// Emits one record as a single JSON line.
    pub fn report(&mut self, record: &ScoreRecord) -> Result<(), ScoreError> {
        let line = record.json();
        match self {
            ScoreSink::Socket(stream) => {
                writeln!(stream, "{}", line)?;
                stream.flush()?;
            }
            ScoreSink::Stdout => println!("{}", line),
        }
        Ok(())
    }
}
