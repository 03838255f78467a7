// Coaching sessions: employer communications logged by a user, and the
// negotiation strategies produced for them.

pub mod handlers;
pub mod repository;
pub mod validation;
