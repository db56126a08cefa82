//! AND-join combinator over a set of `Settlable`s.
//!
//! `join` composes N placeholders into one derived placeholder that
//! resolves only when every input has resolved and rejects on the first
//! rejection, whichever input it comes from.

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use crate::settlable::Settlable;

/// Join a set of inputs into one derived instance (an AND-join).
///
/// The derived instance resolves once **every** input has resolved,
/// carrying the input values index-aligned with `inputs` regardless of the
/// order in which they settled. It rejects as soon as **any** input
/// rejects, with that input's reason; the first rejection wins and later
/// settlements of the remaining inputs have no further effect.
///
/// Zero inputs resolve immediately with an empty `Vec`: an empty AND-join
/// is vacuously satisfied. Already-settled inputs participate through the
/// registration-after-settlement rule, so a slice of all-resolved inputs
/// yields an immediately-resolved join.
pub fn join<T, E>(inputs: &[Settlable<T, E>]) -> Settlable<Vec<T>, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    let derived = Settlable::new();
    if inputs.is_empty() {
        derived.resolve(Vec::new());
        return derived;
    }

    // One slot per input, filled as resolutions arrive.
    let slots: Rc<RefCell<Vec<Option<T>>>> =
        Rc::new(RefCell::new(inputs.iter().map(|_| None).collect()));

    for (index, input) in inputs.iter().enumerate() {
        let down = derived.clone();
        let slots = Rc::clone(&slots);
        input.subscribe_resolve(Box::new(move |value| {
            let mut filled = slots.borrow_mut();
            filled[index] = Some(value);
            if filled.iter().all(Option::is_some) {
                let values: Vec<T> = mem::take(&mut *filled).into_iter().flatten().collect();
                drop(filled);
                down.resolve(values);
            }
        }));

        let down = derived.clone();
        input.subscribe_reject(Box::new(move |reason| down.reject(reason)));
    }

    derived
}
