pub mod assessment;
pub mod coaching;
pub mod onboarding;
