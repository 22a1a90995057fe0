//! Interactive shell sessions to switches.
//!
//! A switch CLI has no framing: a command is a line of text and its output is
//! everything up to the next shell prompt. [`ShellSession`] implements that read
//! loop over any byte stream; [`SshConnector`] opens the streams over SSH.

use std::io::{self, ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use macwalk_common::credentials::Credentials;
use ssh2::{Channel, DisconnectCode, Session};
use tracing::{debug, trace};

use crate::error::SessionError;

const MORE_MARKER: &[u8] = b"--More--";
const PROMPT_SUFFIXES: [u8; 2] = [b'#', b'>'];
const READ_CHUNK: usize = 4096;

/// How long a single blocking read may wait before the loop re-checks its deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// One open command channel to one switch.
pub trait SwitchShell: Send {
    fn host(&self) -> &str;

    /// Sends `command` and returns everything printed up to the next prompt.
    fn send(&mut self, command: &str) -> Result<String, SessionError>;

    /// Releases the channel. Safe to call more than once.
    fn close(&mut self);
}

/// Opens sessions; the walker never knows which transport is behind them.
pub trait SwitchConnector: Send + Sync {
    fn open(
        &self,
        host: &str,
        credentials: &Credentials,
    ) -> Result<Box<dyn SwitchShell>, SessionError>;
}

/// A byte stream carrying an interactive shell.
pub trait ShellStream: Read + Write + Send {
    /// Tears the transport down after the shell has been told to exit.
    fn shutdown(&mut self) {}
}

/// Drives a switch shell over `S`, pagination included.
pub struct ShellSession<S: ShellStream> {
    host: String,
    stream: Option<S>,
    timeout: Duration,
    stop: Arc<AtomicBool>,
}

impl<S: ShellStream> ShellSession<S> {
    pub fn new(host: impl Into<String>, stream: S, timeout: Duration, stop: Arc<AtomicBool>) -> Self {
        Self {
            host: host.into(),
            stream: Some(stream),
            timeout,
            stop,
        }
    }

    /// Reads the login banner up to the first prompt.
    pub fn drain_banner(&mut self) -> Result<String, SessionError> {
        self.read_until_prompt()
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    fn io_error(&self, source: io::Error) -> SessionError {
        SessionError::Io {
            host: self.host.clone(),
            source,
        }
    }

    fn write_line(&mut self, line: &str) -> Result<(), SessionError> {
        let host = self.host.clone();
        let stream = self
            .stream
            .as_mut()
            .ok_or(SessionError::Closed { host: host.clone() })?;
        stream
            .write_all(line.as_bytes())
            .and_then(|_| stream.write_all(b"\n"))
            .and_then(|_| stream.flush())
            .map_err(|source| SessionError::Io { host, source })
    }

    fn read_until_prompt(&mut self) -> Result<String, SessionError> {
        let deadline = Instant::now() + self.timeout;
        let mut output: Vec<u8> = Vec::new();
        let mut buf = [0u8; READ_CHUNK];

        loop {
            if self.stop.load(Ordering::Relaxed) {
                return Err(SessionError::Cancelled);
            }
            if Instant::now() >= deadline {
                return Err(SessionError::Stalled {
                    host: self.host.clone(),
                    timeout: self.timeout,
                });
            }

            let Some(stream) = self.stream.as_mut() else {
                return Err(SessionError::Closed {
                    host: self.host.clone(),
                });
            };

            let n = match stream.read(&mut buf) {
                Ok(0) => {
                    return Err(SessionError::Closed {
                        host: self.host.clone(),
                    });
                }
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(POLL_INTERVAL);
                    continue;
                }
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::Interrupted) => {
                    continue;
                }
                Err(e) => return Err(self.io_error(e)),
            };
            output.extend_from_slice(&buf[..n]);

            if let Some(marker_at) = pagination_marker(&output) {
                output.truncate(marker_at);
                trace!(host = %self.host, "paging");
                stream.write_all(b"\n").map_err(|e| self.io_error(e))?;
                continue;
            }

            if ends_with_prompt(&output) {
                return Ok(String::from_utf8_lossy(&output).into_owned());
            }
        }
    }
}

impl<S: ShellStream> SwitchShell for ShellSession<S> {
    fn host(&self) -> &str {
        &self.host
    }

    fn send(&mut self, command: &str) -> Result<String, SessionError> {
        self.write_line(command)?;
        let output = self.read_until_prompt()?;
        debug!(host = %self.host, command, "\n{output}");
        Ok(output)
    }

    fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.write_all(b"exit\n").and_then(|_| stream.flush());
            stream.shutdown();
            debug!(host = %self.host, "session closed");
        }
    }
}

impl<S: ShellStream> Drop for ShellSession<S> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Position of a trailing `--More--` marker, ignoring trailing whitespace.
fn pagination_marker(output: &[u8]) -> Option<usize> {
    let trimmed = trim_end(output);
    trimmed
        .ends_with(MORE_MARKER)
        .then(|| trimmed.len() - MORE_MARKER.len())
}

/// A prompt is the last thing on the current line: a `#` or `>` followed by a
/// line break is banner or command output, not a prompt.
fn ends_with_prompt(output: &[u8]) -> bool {
    let end = output
        .iter()
        .rposition(|b| !matches!(b, b' ' | b'\t'))
        .map_or(0, |i| i + 1);
    output[..end]
        .last()
        .is_some_and(|b| PROMPT_SUFFIXES.contains(b))
}

fn trim_end(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    &bytes[..end]
}

/// An interactive SSH shell channel.
pub struct SshStream {
    session: Session,
    channel: Channel,
}

impl Read for SshStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.channel.read(buf)
    }
}

impl Write for SshStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.channel.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.channel.flush()
    }
}

impl ShellStream for SshStream {
    fn shutdown(&mut self) {
        let _ = self.channel.send_eof();
        let _ = self.channel.close();
        let _ = self
            .session
            .disconnect(Some(DisconnectCode::ByApplication), "bye", None);
    }
}

/// Opens password-authenticated SSH shells.
pub struct SshConnector {
    port: u16,
    connect_timeout: Duration,
    command_timeout: Duration,
    stop: Arc<AtomicBool>,
}

impl SshConnector {
    pub fn new(
        port: u16,
        connect_timeout: Duration,
        command_timeout: Duration,
        stop: Arc<AtomicBool>,
    ) -> Self {
        Self {
            port,
            connect_timeout,
            command_timeout,
            stop,
        }
    }

    fn connect_stream(&self, host: &str, credentials: &Credentials) -> Result<SshStream, SessionError> {
        let connect_err = |reason: String| SessionError::Connect {
            host: host.to_string(),
            reason,
        };

        let addr = (host, self.port)
            .to_socket_addrs()
            .map_err(|e| connect_err(e.to_string()))?
            .next()
            .ok_or_else(|| connect_err("no address".to_string()))?;
        let tcp = TcpStream::connect_timeout(&addr, self.connect_timeout)
            .map_err(|e| connect_err(e.to_string()))?;

        let mut session = Session::new()?;
        session.set_tcp_stream(tcp);
        session.set_timeout(millis(self.connect_timeout));
        session
            .handshake()
            .map_err(|e| connect_err(e.to_string()))?;

        if session
            .userauth_password(&credentials.username, credentials.password())
            .is_err()
            || !session.authenticated()
        {
            return Err(SessionError::Auth {
                host: host.to_string(),
            });
        }

        let mut channel = session.channel_session()?;
        channel.request_pty("vt100", None, None)?;
        channel.shell()?;
        session.set_timeout(millis(POLL_INTERVAL));

        Ok(SshStream { session, channel })
    }
}

fn millis(d: Duration) -> u32 {
    u32::try_from(d.as_millis()).unwrap_or(u32::MAX)
}

impl SwitchConnector for SshConnector {
    fn open(
        &self,
        host: &str,
        credentials: &Credentials,
    ) -> Result<Box<dyn SwitchShell>, SessionError> {
        debug!(host, port = self.port, "opening SSH session");
        let stream = self.connect_stream(host, credentials)?;
        let mut shell = ShellSession::new(host, stream, self.command_timeout, self.stop.clone());
        shell.drain_banner()?;
        Ok(Box::new(shell))
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
