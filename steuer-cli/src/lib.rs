pub mod batch;
pub mod controls;
pub mod csv_loader;
pub mod logging;
pub mod summary;
pub mod utils;
