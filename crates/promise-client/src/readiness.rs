//! A plain TCP-dial readiness probe, kept as its own small testable unit
//! rather than inlined into the test runner (see the supplemented-features
//! note on `is_ready` in the design notes).

use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use thiserror::Error;

#[derive(Debug, Error)]
#[error("server at {addr} did not become ready within {waited:?}")]
pub struct SetupError {
    pub addr: String,
    pub waited: Duration,
}

fn strip_scheme(addr: &str) -> &str {
    addr.trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
}

/// A single TCP connect attempt against `addr` (accepts a bare `host:port`
/// or an `http(s)://host:port/` URL), bounded by `timeout`.
pub fn is_ready(addr: &str, timeout: Duration) -> bool {
    let host_port = strip_scheme(addr);
    let Ok(mut candidates) = host_port.to_socket_addrs() else {
        return false;
    };
    let Some(socket_addr) = candidates.next() else {
        return false;
    };
    TcpStream::connect_timeout(&socket_addr, timeout).is_ok()
}

/// Polls `is_ready` until it succeeds or `window` elapses. The default
/// setup window is 10 seconds, polled every 1 second (see the test
/// runner's setup contract); both are left as parameters so tests can drive
/// this deterministically.
pub fn wait_until_ready(addr: &str, window: Duration, poll_interval: Duration) -> Result<(), SetupError> {
    let start = Instant::now();
    loop {
        if is_ready(addr, poll_interval) {
            return Ok(());
        }
        if start.elapsed() >= window {
            return Err(SetupError {
                addr: addr.to_string(),
                waited: start.elapsed(),
            });
        }
        std::thread::sleep(poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn is_ready_true_for_a_listening_port() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = format!("http://{}/", listener.local_addr().unwrap());
        assert!(is_ready(&addr, Duration::from_millis(200)));
    }

    #[test]
    fn is_ready_false_for_an_address_nothing_listens_on() {
        // Port 1 is reserved and essentially never has a listener in test envs.
        assert!(!is_ready("127.0.0.1:1", Duration::from_millis(50)));
    }

    #[test]
    fn wait_until_ready_times_out_with_setup_error() {
        let err = wait_until_ready("127.0.0.1:1", Duration::from_millis(100), Duration::from_millis(20)).unwrap_err();
        assert_eq!(err.addr, "127.0.0.1:1");
    }
}
