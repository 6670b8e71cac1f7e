pub mod cuda_toolkit;
pub mod pip_package_manager;
pub mod python_probe;
