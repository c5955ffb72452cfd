// Live tournament feed
//
// Score and schedule changes are published per tournament. Publishing is fire-and-forget:
// a missing or lagging subscriber never fails the request that produced the event.

pub use bus::EventBus;
pub use events::TournamentEvent;

mod bus;
mod events;
