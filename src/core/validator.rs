//! Command authorization.
//!
//! A [`CommandVerifier`] checks a signed command and reports the outcome through
//! one of two continuations. The contract is asynchronous: callbacks never run
//! inside `validate` itself, so the caller may hold state across the call and
//! other commands may interleave before the outcome arrives.

use crate::core::error::NfdError;
use crate::core::name::Name;
use crate::core::packet::Interest;
use crate::core::scheduler::Scheduler;
use crate::core::security::{
    IdentityCertificate, NameRegex, SIGNATURE_TYPE_DIGEST_SHA256, SIGNATURE_TYPE_ED25519,
    SignedEnvelope,
};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

pub const DEFAULT_GRACE_INTERVAL_MS: u64 = 60_000;

pub type OnValidated = Box<dyn FnOnce(Rc<Interest>)>;
pub type OnValidationFailed = Box<dyn FnOnce(Rc<Interest>, String)>;

pub trait CommandVerifier {
    fn validate(
        &self,
        interest: Rc<Interest>,
        on_validated: OnValidated,
        on_failed: OnValidationFailed,
    );
}

struct InterestRule {
    regex: NameRegex,
    certificate: IdentityCertificate,
}

/// Ed25519 command-interest validator with per-rule trusted certificates.
///
/// A command is accepted when some rule's regex matches its name and that rule's
/// certificate is the one named by the KeyLocator and verifies the signature.
/// Timestamps must fall within the grace interval of the local clock and be
/// newer than the last accepted timestamp for the same key.
pub struct CommandValidator {
    scheduler: Rc<Scheduler>,
    rules: Vec<InterestRule>,
    grace_interval_ms: u64,
    last_timestamps: RefCell<FxHashMap<Name, u64>>,
}

impl CommandValidator {
    pub fn new(scheduler: Rc<Scheduler>) -> Self {
        Self {
            scheduler,
            rules: Vec::new(),
            grace_interval_ms: DEFAULT_GRACE_INTERVAL_MS,
            last_timestamps: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn with_grace_interval(mut self, grace_interval_ms: u64) -> Self {
        self.grace_interval_ms = grace_interval_ms;
        self
    }

    pub fn add_interest_rule(
        &mut self,
        regex: &str,
        certificate: IdentityCertificate,
    ) -> Result<(), NfdError> {
        log::info!(
            "command rule {} trusts {} ({})",
            regex,
            certificate.name,
            certificate.fingerprint()
        );
        self.rules.push(InterestRule {
            regex: NameRegex::new(regex)?,
            certificate,
        });
        Ok(())
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Synchronous part of validation. Returns the signer's certificate name.
    pub fn check(&self, interest: &Interest) -> Result<Name, NfdError> {
        let envelope = SignedEnvelope::from_name(&interest.name)?;
        match envelope.info.signature_type {
            SIGNATURE_TYPE_ED25519 => {}
            SIGNATURE_TYPE_DIGEST_SHA256 => {
                return Err(NfdError::ValidationError(
                    "digest signature carries no identity".into(),
                ));
            }
            other => {
                return Err(NfdError::ValidationError(format!(
                    "unsupported signature type {}",
                    other
                )));
            }
        }
        let key = envelope
            .info
            .key_locator
            .as_ref()
            .ok_or_else(|| NfdError::ValidationError("missing KeyLocator".into()))?;

        let rule = self
            .rules
            .iter()
            .find(|rule| rule.certificate.name == *key && rule.regex.is_match(&interest.name))
            .ok_or_else(|| {
                NfdError::ValidationError(format!("no rule allows {} to issue this command", key))
            })?;
        rule.certificate.verify(&envelope)?;

        let now = crate::core::time::now_millis();
        if envelope.timestamp_ms.abs_diff(now) > self.grace_interval_ms {
            return Err(NfdError::ValidationError(format!(
                "timestamp {} outside grace interval",
                envelope.timestamp_ms
            )));
        }
        let mut last = self.last_timestamps.borrow_mut();
        if let Some(previous) = last.get(key) {
            if envelope.timestamp_ms <= *previous {
                return Err(NfdError::ValidationError(format!(
                    "timestamp {} not newer than {}",
                    envelope.timestamp_ms, previous
                )));
            }
        }
        last.insert(key.clone(), envelope.timestamp_ms);
        Ok(key.clone())
    }
}

impl CommandVerifier for CommandValidator {
    fn validate(
        &self,
        interest: Rc<Interest>,
        on_validated: OnValidated,
        on_failed: OnValidationFailed,
    ) {
        let outcome = self.check(&interest);
        self.scheduler.schedule(move || match outcome {
            Ok(signer) => {
                log::debug!("{} authorized by {}", interest.name, signer);
                on_validated(interest);
            }
            Err(e) => on_failed(interest, e.to_string()),
        });
    }
}
