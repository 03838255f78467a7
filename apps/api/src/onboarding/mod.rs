// Onboarding: the user's profile, negotiation goals, and completion flag.

pub mod handlers;
pub mod repository;
pub mod validation;
