pub mod catalog;
pub mod core;
pub mod marks;
pub mod onboarding;
pub mod view;
