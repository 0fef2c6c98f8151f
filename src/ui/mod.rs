pub mod viewer;
pub mod windows;
