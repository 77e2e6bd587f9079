//! The stack.
//!
//! Cast cards, activated abilities and fired triggers wait here as
//! [`AbilityInstance`](crate::effects::AbilityInstance)s until every player
//! has passed priority, then resolve last-in first-out.

mod priority;

pub use priority::PriorityStack;
