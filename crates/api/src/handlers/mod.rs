pub mod builder;
pub mod onboarding;
pub mod portfolios;
pub mod templates;
pub mod widget_types;
