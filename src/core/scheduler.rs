//! Single-threaded cooperative event queue.
//!
//! Work scheduled here runs in FIFO order on the calling thread when the owner
//! drives the queue with [`Scheduler::run`]. Events may schedule further events.

use std::cell::RefCell;
use std::collections::VecDeque;

type Event = Box<dyn FnOnce()>;

#[derive(Default)]
pub struct Scheduler {
    queue: RefCell<VecDeque<Event>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule<F>(&self, event: F)
    where
        F: FnOnce() + 'static,
    {
        self.queue.borrow_mut().push_back(Box::new(event));
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Runs the oldest pending event. Returns false when the queue was empty.
    pub fn run_one(&self) -> bool {
        // The borrow must end before the event runs; events schedule more events.
        let next = self.queue.borrow_mut().pop_front();
        match next {
            Some(event) => {
                event();
                true
            }
            None => false,
        }
    }

    /// Runs events until the queue is empty, returning how many ran.
    pub fn run(&self) -> usize {
        let mut count = 0;
        while self.run_one() {
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_fifo_order_and_nested_scheduling() {
        let scheduler = Rc::new(Scheduler::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let (s, l) = (scheduler.clone(), log.clone());
        scheduler.schedule(move || {
            l.borrow_mut().push(1);
            let l2 = l.clone();
            s.schedule(move || l2.borrow_mut().push(3));
        });
        let l = log.clone();
        scheduler.schedule(move || l.borrow_mut().push(2));

        assert_eq!(scheduler.pending(), 2);
        assert_eq!(scheduler.run(), 3);
        assert_eq!(*log.borrow(), vec![1, 2, 3]);
        assert!(!scheduler.run_one());
    }
}
