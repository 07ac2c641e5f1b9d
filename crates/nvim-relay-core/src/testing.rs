//! Scriptable in-process editor used by unit tests.

use crate::address::ServerAddress;
use crate::error::{RelayError, Result};
use crate::process::LaunchedServer;
use crate::remote::{OpenRequest, RemoteEditor};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Ping(ServerAddress),
    Open(ServerAddress, OpenRequest),
    Listen(ServerAddress),
}

#[derive(Debug, Default)]
struct State {
    /// Live servers and how many more pings each answers (`None` = forever).
    live: HashMap<ServerAddress, Option<usize>>,
    calls: Vec<Call>,
    fail_launch: bool,
    launched_lifetime: Option<usize>,
}

#[derive(Debug, Default)]
pub struct FakeEditor {
    state: Mutex<State>,
}

impl FakeEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `address` as a running server.
    pub fn with_live(self, address: &ServerAddress) -> Self {
        self.state().live.insert(address.clone(), None);
        self
    }

    /// Make every launch fail.
    pub fn failing_launch(self) -> Self {
        self.state().fail_launch = true;
        self
    }

    /// Servers started through `listen` answer `pings` pings, then exit.
    pub fn launched_servers_answer(self, pings: usize) -> Self {
        self.state().launched_lifetime = Some(pings);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn listens(&self) -> Vec<ServerAddress> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Listen(a) => Some(a),
                _ => None,
            })
            .collect()
    }

    pub fn opens(&self) -> Vec<(ServerAddress, OpenRequest)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Open(a, r) => Some((a, r)),
                _ => None,
            })
            .collect()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn answer(state: &mut State, address: &ServerAddress) -> bool {
        match state.live.get_mut(address) {
            None => false,
            Some(None) => true,
            Some(Some(0)) => {
                state.live.remove(address);
                false
            }
            Some(Some(left)) => {
                *left -= 1;
                true
            }
        }
    }

    fn unreachable(address: &ServerAddress) -> RelayError {
        RelayError::Remote {
            address: address.to_string(),
            message: "connection refused".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl RemoteEditor for FakeEditor {
    async fn ping(&self, address: &ServerAddress) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::Ping(address.clone()));
        if Self::answer(&mut state, address) {
            Ok(())
        } else {
            Err(Self::unreachable(address))
        }
    }

    async fn open(&self, address: &ServerAddress, request: &OpenRequest) -> Result<()> {
        let mut state = self.state();
        state
            .calls
            .push(Call::Open(address.clone(), request.clone()));
        if state.live.contains_key(address) {
            Ok(())
        } else {
            Err(Self::unreachable(address))
        }
    }

    async fn listen(&self, address: &ServerAddress) -> Result<LaunchedServer> {
        let mut state = self.state();
        state.calls.push(Call::Listen(address.clone()));
        if state.fail_launch {
            return Err(RelayError::Launch {
                editor: "fake-nvim".to_string(),
                message: "executable not found".to_string(),
                source: None,
            });
        }
        let lifetime = state.launched_lifetime;
        state.live.insert(address.clone(), lifetime);
        Ok(LaunchedServer::detached(None))
    }
}
