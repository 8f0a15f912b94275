//! UI actions by name.
//!
//! Buttons and sliders only know an action name and its payload; the table maps
//! the name onto the state machine, so the presentation layer never calls the
//! session directly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{catalog::RouteCatalog, error::SessionError, playback::MediaBackend, session::SessionLifecycle};

pub const START_ROUTE: &str = "start-route";
pub const SET_SPEED: &str = "set-speed";
pub const END_ROUTE: &str = "end-route";
pub const REPEAT_ROUTE: &str = "repeat-route";
pub const LEAVE_FINISH: &str = "leave-finish";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    StartRoute { region: String, key: String },
    SetSpeed(f64),
    EndRoute,
    RepeatRoute,
    LeaveFinish,
}

impl Command {
    pub fn action(&self) -> &'static str {
        match self {
            Command::StartRoute { .. } => START_ROUTE,
            Command::SetSpeed(_) => SET_SPEED,
            Command::EndRoute => END_ROUTE,
            Command::RepeatRoute => REPEAT_ROUTE,
            Command::LeaveFinish => LEAVE_FINISH,
        }
    }
}

pub type Handler<M> = fn(&mut SessionLifecycle<M>, &RouteCatalog, &Command) -> Result<(), SessionError>;

pub struct CommandTable<M: MediaBackend> {
    handlers: HashMap<&'static str, Handler<M>>,
}

impl<M: MediaBackend> CommandTable<M> {
    pub fn empty() -> Self {
        Self { handlers: HashMap::new() }
    }

    /// Every action the walk screens use.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        table.register(START_ROUTE, start_route);
        table.register(SET_SPEED, set_speed);
        table.register(END_ROUTE, end_route);
        table.register(REPEAT_ROUTE, repeat_route);
        table.register(LEAVE_FINISH, leave_finish);
        table
    }

    pub fn register(&mut self, action: &'static str, handler: Handler<M>) -> Option<Handler<M>> {
        self.handlers.insert(action, handler)
    }

    pub fn contains(&self, action: &str) -> bool {
        self.handlers.contains_key(action)
    }

    pub fn dispatch(&self, session: &mut SessionLifecycle<M>, catalog: &RouteCatalog, command: &Command) -> Result<(), SessionError> {
        let Some(handler) = self.handlers.get(command.action()) else {
            tracing::warn!("No handler for action {}", command.action());
            return Err(SessionError::UnknownAction(command.action().to_string()));
        };

        handler(session, catalog, command)
    }
}

impl<M: MediaBackend> Default for CommandTable<M> {
    fn default() -> Self {
        Self::standard()
    }
}

fn mismatch(command: &Command) -> SessionError {
    tracing::warn!("Handler does not take {:?}", command);
    SessionError::UnknownAction(command.action().to_string())
}

fn start_route<M: MediaBackend>(session: &mut SessionLifecycle<M>, catalog: &RouteCatalog, command: &Command) -> Result<(), SessionError> {
    let Command::StartRoute { region, key } = command else {
        return Err(mismatch(command));
    };
    session.start_from_catalog(catalog, region, key).map(|_| ())
}

fn set_speed<M: MediaBackend>(session: &mut SessionLifecycle<M>, _: &RouteCatalog, command: &Command) -> Result<(), SessionError> {
    let Command::SetSpeed(speed) = command else {
        return Err(mismatch(command));
    };
    session.set_speed(*speed);
    Ok(())
}

fn end_route<M: MediaBackend>(session: &mut SessionLifecycle<M>, _: &RouteCatalog, _: &Command) -> Result<(), SessionError> {
    session.end_route().map(|_| ())
}

fn repeat_route<M: MediaBackend>(session: &mut SessionLifecycle<M>, _: &RouteCatalog, _: &Command) -> Result<(), SessionError> {
    session.repeat_route().map(|_| ())
}

fn leave_finish<M: MediaBackend>(session: &mut SessionLifecycle<M>, _: &RouteCatalog, _: &Command) -> Result<(), SessionError> {
    session.leave();
    Ok(())
}
