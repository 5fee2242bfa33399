use std::sync::mpsc;
use std::time::Duration;

use jobhunt_core::{update, AppState, AppViewModel, Msg};
use jobhunt_engine::{EngineError, WorkerSettings};

use super::console::ConsoleCommand;
use super::effects::EffectRunner;

/// Everything that can wake the session loop.
#[derive(Debug, Clone, PartialEq)]
pub enum AppInput {
    Core(Msg),
    Console(ConsoleCommand),
    /// Standard input reached end of file.
    ConsoleClosed,
}

/// Owns the session state. All inputs arrive on one channel and are applied
/// one at a time, so engine events, timers and user commands never race.
pub struct SessionApp {
    state: AppState,
    runner: EffectRunner,
    inbox_tx: mpsc::Sender<AppInput>,
    inbox_rx: mpsc::Receiver<AppInput>,
}

impl SessionApp {
    pub fn new(settings: WorkerSettings) -> Result<Self, EngineError> {
        let (inbox_tx, inbox_rx) = mpsc::channel();
        let runner = EffectRunner::new(settings, inbox_tx.clone())?;
        Ok(Self {
            state: AppState::new(),
            runner,
            inbox_tx,
            inbox_rx,
        })
    }

    pub fn sender(&self) -> mpsc::Sender<AppInput> {
        self.inbox_tx.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// Applies one message and hands its effects to the engine.
    /// Returns the view when the message changed something.
    pub fn dispatch(&mut self, msg: Msg) -> Option<AppViewModel> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = was_dirty.then(|| state.view());
        self.state = state;
        self.runner.enqueue(effects);
        view
    }

    /// Waits up to `timeout` for the next input.
    pub fn next_input(&self, timeout: Duration) -> Option<AppInput> {
        self.inbox_rx.recv_timeout(timeout).ok()
    }

    /// Applies queued engine messages until `done` holds or `limit` elapses.
    /// Console inputs met on the way are returned in arrival order.
    pub fn pump_until(
        &mut self,
        limit: Duration,
        done: impl Fn(&AppState) -> bool,
    ) -> Vec<ConsoleCommand> {
        let deadline = std::time::Instant::now() + limit;
        let mut console = Vec::new();
        while !done(&self.state) {
            let now = std::time::Instant::now();
            if now >= deadline {
                break;
            }
            match self.next_input(deadline - now) {
                Some(AppInput::Core(msg)) => {
                    self.dispatch(msg);
                }
                Some(AppInput::Console(command)) => console.push(command),
                Some(AppInput::ConsoleClosed) | None => {}
            }
        }
        console
    }
}

impl Drop for SessionApp {
    fn drop(&mut self) {
        let state = std::mem::take(&mut self.state);
        let (_, effects) = update(state, Msg::SessionClosed);
        self.runner.enqueue(effects);
    }
}
