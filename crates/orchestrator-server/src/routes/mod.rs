pub mod health;
pub mod ready;
pub mod run;
