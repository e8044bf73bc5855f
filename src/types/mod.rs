pub mod activity;
pub mod reference;
