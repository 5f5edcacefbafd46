pub mod data_loader;
pub mod database_loader;
#[cfg(test)]
pub mod memory_loader;
