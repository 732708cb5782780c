//! In-process face between the forwarder and its management modules.

use crate::core::name::Name;
use crate::core::packet::{Data, Interest};
use std::cell::RefCell;

/// Delivery of response Data toward the requester.
pub trait Face {
    fn put(&self, data: Data);
}

type InterestHandler = Box<dyn Fn(Interest)>;
type DataListener = Box<dyn Fn(&Data)>;

#[derive(Default)]
pub struct InternalFace {
    filters: RefCell<Vec<(Name, InterestHandler)>>,
    listeners: RefCell<Vec<DataListener>>,
}

impl InternalFace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes Interests under `prefix` to `handler`.
    pub fn set_interest_filter<F>(&self, prefix: Name, handler: F)
    where
        F: Fn(Interest) + 'static,
    {
        log::debug!("interest filter registered for {}", prefix);
        self.filters.borrow_mut().push((prefix, Box::new(handler)));
    }

    /// Hands `interest` to the filter with the longest matching prefix.
    ///
    /// Returns false when no filter matched and the Interest was dropped.
    pub fn send_interest(&self, interest: Interest) -> bool {
        let filters = self.filters.borrow();
        let handler = filters
            .iter()
            .filter(|(prefix, _)| prefix.is_prefix_of(&interest.name))
            .max_by_key(|(prefix, _)| prefix.len());
        match handler {
            Some((_, handler)) => {
                handler(interest);
                true
            }
            None => {
                log::debug!("no interest filter for {}, dropped", interest.name);
                false
            }
        }
    }

    pub fn on_receive_data<F>(&self, listener: F)
    where
        F: Fn(&Data) + 'static,
    {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn clear_data_listeners(&self) {
        self.listeners.borrow_mut().clear();
    }
}

impl Face for InternalFace {
    fn put(&self, data: Data) {
        log::trace!("internal face delivering {}", data.name);
        for listener in self.listeners.borrow().iter() {
            listener(&data);
        }
    }
}
