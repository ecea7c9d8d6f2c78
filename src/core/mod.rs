pub mod controller;
pub mod filename;
pub mod progress;
pub mod validator;
