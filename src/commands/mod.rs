pub mod common;
pub mod history;
pub mod identity;
pub mod run;
