pub mod steps;
pub mod view;
