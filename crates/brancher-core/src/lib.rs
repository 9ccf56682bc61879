pub mod category;
pub mod command_runner;
pub mod config;
pub mod doctor;
pub mod git;
pub mod names;
#[cfg(test)]
pub(crate) mod test_support;
