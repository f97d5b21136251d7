//! Shared HTTP client construction for backend adapters.
//!
//! Every adapter gets its pooled [`reqwest::Client`] through [`build_client`]
//! so the connect/overall timeouts, connection pool caps, and user-agent
//! format (spec.md §6) stay identical across all five backends. [`Connection`]
//! models the lazy-reopen lifecycle (§4.6): `Uninitialized -> Open -> Closed`,
//! with any subsequent call reopening transparently.

use std::time::Duration;

use tokio::sync::Mutex;

/// Connect timeout applied to every adapter's client.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default overall request timeout; adapters may override per spec.md §5.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Keep-alive cap (spec.md §5: "10 total connections / 5 keep-alive").
/// reqwest pools per-host, so this is applied as `pool_max_idle_per_host`.
const MAX_IDLE_PER_HOST: usize = 5;

/// Builds a pooled client honoring spec.md §5's connection caps and
/// cancellation-friendly timeouts, with the given `user_agent` header.
pub fn build_client(user_agent: &str, timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(timeout)
        .pool_max_idle_per_host(MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Duration::from_secs(90))
        .user_agent(user_agent)
        .build()
        .expect("static client configuration is always valid")
}

/// Builds the `"{app}/{version} (mailto:{email})"` user-agent spec.md §6
/// requires, degrading to `"{app}/{version} (…)"` with no email configured.
pub fn user_agent(app: &str, version: &str, email: Option<&str>) -> String {
    match email {
        Some(email) if !email.trim().is_empty() => {
            format!("{app}/{version} (mailto:{email})")
        }
        _ => format!("{app}/{version} (…)"),
    }
}

/// Lazy-reopen connection state (§4.6): `Uninitialized -> Open -> Closed`,
/// with `Closed`/`Uninitialized` both reopening transparently on next use.
enum ConnState {
    Uninitialized,
    Open(reqwest::Client),
    Closed,
}

/// Guards a single adapter's pooled client behind the three-state machine
/// spec.md §4.6 describes, so `close()` drops the pool and the next call
/// builds a fresh one without the adapter caller needing to know which state
/// it's in.
pub struct Connection {
    state: Mutex<ConnState>,
    user_agent: String,
    timeout: Duration,
}

impl Connection {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            state: Mutex::new(ConnState::Uninitialized),
            user_agent: user_agent.into(),
            timeout,
        }
    }

    /// Returns the current pooled client, lazily constructing one if the
    /// connection is uninitialized or was previously closed.
    pub async fn client(&self) -> reqwest::Client {
        let mut state = self.state.lock().await;
        match &*state {
            ConnState::Open(client) => client.clone(),
            ConnState::Uninitialized | ConnState::Closed => {
                let client = build_client(&self.user_agent, self.timeout);
                *state = ConnState::Open(client.clone());
                client
            }
        }
    }

    /// Drops the pooled client. The next [`Connection::client`] call reopens
    /// it lazily (§4.6).
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        *state = ConnState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_with_email() {
        assert_eq!(
            user_agent("academix", "0.1.0", Some("a@b.com")),
            "academix/0.1.0 (mailto:a@b.com)"
        );
    }

    #[test]
    fn user_agent_without_email() {
        assert_eq!(user_agent("academix", "0.1.0", None), "academix/0.1.0 (…)");
        assert_eq!(user_agent("academix", "0.1.0", Some("")), "academix/0.1.0 (…)");
    }

    #[tokio::test]
    async fn connection_reopens_after_close() {
        let conn = Connection::new("academix/test", DEFAULT_TIMEOUT);
        let _c1 = conn.client().await;
        conn.close().await;
        let _c2 = conn.client().await;
    }
}
