pub mod commands;
pub mod descriptor;
pub mod import;
pub mod k8s;
pub mod output;
pub mod reference;
pub mod secrets;
pub mod store;
pub mod telemetry;
#[cfg(test)]
pub mod test_utils;
