//! Wires the strategy-choice control plane together.

use crate::core::config::Config;
use crate::core::error::NfdError;
use crate::core::face::{Face, InternalFace};
use crate::core::manager::StrategyChoiceManager;
use crate::core::name::Name;
use crate::core::packet::{Data, Interest};
use crate::core::scheduler::Scheduler;
use crate::core::strategy_choice::StrategyChoice;
use crate::core::validator::{CommandValidator, CommandVerifier};
use crate::subsystems;
use std::cell::RefCell;
use std::rc::Rc;

pub struct Forwarder {
    scheduler: Rc<Scheduler>,
    face: Rc<InternalFace>,
    table: Rc<RefCell<StrategyChoice>>,
    manager: Rc<StrategyChoiceManager>,
    responses: Rc<RefCell<Vec<Data>>>,
}

impl Forwarder {
    /// Built-in strategies, configured default, and a validator loaded with the
    /// configured rules.
    pub fn from_config(config: &Config) -> Result<Self, NfdError> {
        let scheduler = Rc::new(Scheduler::new());
        let table = subsystems::builtin_table(&config.default_strategy()?)?;
        let mut validator = CommandValidator::new(scheduler.clone())
            .with_grace_interval(config.validator.grace_interval_ms);
        for rule in &config.validator.rules {
            validator.add_interest_rule(&rule.regex, rule.to_certificate()?)?;
        }
        Ok(Self::with_parts(
            scheduler,
            table,
            Rc::new(validator),
            &config.management_prefix()?,
        ))
    }

    pub fn with_parts(
        scheduler: Rc<Scheduler>,
        table: StrategyChoice,
        verifier: Rc<dyn CommandVerifier>,
        management_prefix: &Name,
    ) -> Self {
        let face = Rc::new(InternalFace::new());
        let table = Rc::new(RefCell::new(table));
        let manager = Rc::new(StrategyChoiceManager::new(
            table.clone(),
            face.clone() as Rc<dyn Face>,
            verifier,
            management_prefix,
        ));
        manager.listen(&face);

        let responses = Rc::new(RefCell::new(Vec::new()));
        let sink = responses.clone();
        face.on_receive_data(move |data| sink.borrow_mut().push(data.clone()));

        Self {
            scheduler,
            face,
            table,
            manager,
            responses,
        }
    }

    pub fn scheduler(&self) -> &Rc<Scheduler> {
        &self.scheduler
    }

    pub fn face(&self) -> &Rc<InternalFace> {
        &self.face
    }

    pub fn table(&self) -> &Rc<RefCell<StrategyChoice>> {
        &self.table
    }

    pub fn manager(&self) -> &Rc<StrategyChoiceManager> {
        &self.manager
    }

    /// Submits a command without running the scheduler.
    pub fn submit(&self, interest: Interest) -> bool {
        self.face.send_interest(interest)
    }

    /// Runs pending events and returns the responses produced so far.
    pub fn drain(&self) -> Vec<Data> {
        self.scheduler.run();
        std::mem::take(&mut *self.responses.borrow_mut())
    }

    /// Submits a command, runs the scheduler to quiescence and returns every
    /// response produced.
    pub fn process(&self, interest: Interest) -> Vec<Data> {
        self.submit(interest);
        self.drain()
    }

    /// Name of the strategy effective for `name`.
    pub fn effective_strategy(&self, name: &Name) -> Name {
        self.table
            .borrow()
            .find_effective_strategy(name)
            .name()
            .clone()
    }
}
