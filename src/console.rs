//! Host-facing stdin/terminal glue: the non-blocking keyboard probe and the
//! raw-mode guard the debugger and the run loop share.

use std::io::{self, Read};
use std::os::unix::io::AsRawFd;

use termion::raw::{IntoRawMode, RawTerminal};

use crate::memory::KeySource;

/// Real `KeySource` backed by a zero-timeout `poll(2)` on stdin's fd.
pub struct StdinKeySource;

impl KeySource for StdinKeySource {
    fn key_pending(&mut self) -> bool {
        key_pending_on(io::stdin().as_raw_fd())
    }

    fn read_byte(&mut self) -> u8 {
        let mut buf = [0u8; 1];
        // blocking: only called once key_pending() has confirmed a byte is there.
        io::stdin()
            .read_exact(&mut buf)
            .expect("stdin closed after reporting a byte ready");
        buf[0]
    }
}

fn key_pending_on(fd: std::os::unix::io::RawFd) -> bool {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    // timeout == 0: poll once, return immediately, never block or consume input.
    let ready = unsafe { libc::poll(&mut fds, 1, 0) };
    ready > 0 && (fds.revents & libc::POLLIN) != 0
}

/// RAII wrapper that puts the terminal in raw mode and restores it on drop.
/// Acquired once at startup; released on every exit path including
/// illegal-opcode termination, HALT, and operator EOF.
pub struct RawModeGuard {
    _raw: RawTerminal<io::Stdout>,
}

impl RawModeGuard {
    pub fn acquire() -> io::Result<Self> {
        Ok(RawModeGuard {
            _raw: io::stdout().into_raw_mode()?,
        })
    }
}
