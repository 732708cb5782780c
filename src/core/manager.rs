//! Strategy-choice management.
//!
//! Commands arrive on the internal face as
//! `<management-prefix>/strategy-choice/<verb>/<ControlParameters>/<signature...>`
//! and always get exactly one response Data named like the command, carrying a
//! [`ControlResponse`]. Processing runs through these states:
//!
//! 1. structural check of the name (400 "Malformed command")
//! 2. presence of the signature envelope (401 "Signature required")
//! 3. asynchronous authorization by the [`CommandVerifier`] (403 "Unauthorized command")
//! 4. parameter decode and per-verb parameter check (400 "Malformed command")
//! 5. verb dispatch: `set` / `unset` (501 "Unsupported command" otherwise)
//!
//! The table is only touched in step 5, so a rejected command leaves no state.

use crate::core::control::{ControlParameters, ControlResponse};
use crate::core::error::NfdError;
use crate::core::face::{Face, InternalFace};
use crate::core::name::{Component, Name};
use crate::core::packet::{Data, Interest};
use crate::core::security::SIGNED_COMMAND_EXTRA_COMPONENTS;
use crate::core::strategy_choice::StrategyChoice;
use crate::core::validator::CommandVerifier;
use std::cell::RefCell;
use std::rc::Rc;

pub const DEFAULT_MANAGEMENT_PREFIX: &str = "/localhost/nfd";
pub const MODULE_COMPONENT: &str = "strategy-choice";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Set,
    Unset,
}

impl Verb {
    pub fn parse(component: &Component) -> Option<Self> {
        match component.as_bytes() {
            b"set" => Some(Self::Set),
            b"unset" => Some(Self::Unset),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Unset => "unset",
        }
    }

    /// Checks that `params` carries exactly the fields this verb takes.
    fn accepts(&self, params: &ControlParameters) -> bool {
        match self {
            Self::Set => params.name.is_some() && params.strategy.is_some(),
            Self::Unset => params.name.is_some() && params.strategy.is_none(),
        }
    }
}

fn malformed() -> ControlResponse {
    ControlResponse::new(400, "Malformed command")
}

/// State shared between the manager and its pending authorization continuations.
struct ManagerCore {
    table: Rc<RefCell<StrategyChoice>>,
    face: Rc<dyn Face>,
    command_prefix: Name,
}

impl ManagerCore {
    fn send_response(&self, name: &Name, response: ControlResponse) {
        log::debug!("{} -> {} {}", name, response.code, response.text);
        self.face.put(Data::new(name.clone(), response.wire_encode()));
    }

    fn on_validated_request(&self, command: &Interest) {
        let response = self.process_validated(command);
        self.send_response(&command.name, response);
    }

    fn process_validated(&self, command: &Interest) -> ControlResponse {
        let at = self.command_prefix.len();
        let (Some(verb), Some(raw)) = (command.name.get(at), command.name.get(at + 1)) else {
            return malformed();
        };
        let params = match ControlParameters::wire_decode(raw.as_bytes()) {
            Ok(params) => params,
            Err(e) => {
                log::warn!("{}: bad parameters: {}", command.name, e);
                return malformed();
            }
        };
        let Some(verb) = Verb::parse(verb) else {
            return ControlResponse::new(501, "Unsupported command");
        };
        if !verb.accepts(&params) {
            log::warn!("{}: parameters do not fit '{}'", command.name, verb.as_str());
            return malformed();
        }
        match verb {
            Verb::Set => self.set_strategy(&params, raw.as_bytes()),
            Verb::Unset => self.unset_strategy(&params, raw.as_bytes()),
        }
    }

    fn set_strategy(&self, params: &ControlParameters, raw: &[u8]) -> ControlResponse {
        let (Some(prefix), Some(strategy)) = (&params.name, &params.strategy) else {
            return malformed();
        };
        match self.table.borrow_mut().insert(prefix, strategy) {
            Ok(()) => ControlResponse::new(200, "Success").with_body(raw.to_vec()),
            Err(e) => {
                log::warn!("set {} -> {} rejected: {}", prefix, strategy, e);
                ControlResponse::new(504, "Unsupported strategy")
            }
        }
    }

    fn unset_strategy(&self, params: &ControlParameters, raw: &[u8]) -> ControlResponse {
        let Some(prefix) = &params.name else {
            return malformed();
        };
        match self.table.borrow_mut().erase(prefix) {
            Ok(_) => ControlResponse::new(200, "Success").with_body(raw.to_vec()),
            Err(NfdError::CannotUnsetRoot) => {
                ControlResponse::new(403, "Cannot unset root prefix strategy")
            }
            Err(e) => {
                log::warn!("unset {} rejected: {}", prefix, e);
                malformed()
            }
        }
    }
}

pub struct StrategyChoiceManager {
    core: Rc<ManagerCore>,
    verifier: Rc<dyn CommandVerifier>,
}

impl StrategyChoiceManager {
    pub fn new(
        table: Rc<RefCell<StrategyChoice>>,
        face: Rc<dyn Face>,
        verifier: Rc<dyn CommandVerifier>,
        management_prefix: &Name,
    ) -> Self {
        let command_prefix = management_prefix.clone().append(MODULE_COMPONENT);
        Self {
            core: Rc::new(ManagerCore {
                table,
                face,
                command_prefix,
            }),
            verifier,
        }
    }

    pub fn command_prefix(&self) -> &Name {
        &self.core.command_prefix
    }

    /// Routes commands under the command prefix on `face` to this manager.
    pub fn listen(self: &Rc<Self>, face: &InternalFace) {
        let manager = Rc::downgrade(self);
        face.set_interest_filter(self.core.command_prefix.clone(), move |interest| {
            if let Some(manager) = manager.upgrade() {
                manager.on_strategy_choice_request(interest);
            }
        });
    }

    /// Entry point for a received command: structural and signature-presence
    /// checks, then hands off to the verifier.
    pub fn on_strategy_choice_request(&self, command: Interest) {
        let unsigned_len = self.core.command_prefix.len() + 2;
        let signed_len = unsigned_len + SIGNED_COMMAND_EXTRA_COMPONENTS;
        let len = command.name.len();

        if !self.core.command_prefix.is_prefix_of(&command.name) || len < unsigned_len {
            self.core.send_response(&command.name, malformed());
            return;
        }
        if len < signed_len {
            self.core
                .send_response(&command.name, ControlResponse::new(401, "Signature required"));
            return;
        }

        let accepted = self.core.clone();
        let rejected = self.core.clone();
        self.verifier.validate(
            Rc::new(command),
            Box::new(move |command: Rc<Interest>| {
                accepted.on_validated_request(&command)
            }),
            Box::new(move |command: Rc<Interest>, reason: String| {
                log::warn!("{}: unauthorized: {}", command.name, reason);
                rejected.send_response(
                    &command.name,
                    ControlResponse::new(403, "Unauthorized command"),
                );
            }),
        );
    }

    /// Processes a command that already passed authorization.
    pub fn on_validated_strategy_choice_request(&self, command: &Interest) {
        self.core.on_validated_request(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_parse() {
        assert_eq!(Verb::parse(&Component::from("set")), Some(Verb::Set));
        assert_eq!(Verb::parse(&Component::from("unset")), Some(Verb::Unset));
        assert_eq!(Verb::parse(&Component::from("SET")), None);
        assert_eq!(Verb::Unset.as_str(), "unset");
    }

    #[test]
    fn test_verb_parameter_shapes() {
        let named = ControlParameters::new().with_name("/test".parse().unwrap());
        let full = named.clone().with_strategy("/s".parse().unwrap());
        assert!(Verb::Set.accepts(&full));
        assert!(!Verb::Set.accepts(&named));
        assert!(Verb::Unset.accepts(&named));
        assert!(!Verb::Unset.accepts(&full));
        assert!(!Verb::Unset.accepts(&ControlParameters::new()));
    }
}
