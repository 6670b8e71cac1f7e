pub mod export;
pub mod install;
pub mod media;
pub mod pipeline;
pub mod shared;
pub mod transcript;
