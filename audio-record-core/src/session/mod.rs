pub(crate) mod capture_loop;
pub mod controller;
pub mod dispatcher;
pub mod recorder;
