pub mod cli;
pub mod factory;
pub mod interface;
#[cfg(feature = "native-asr")]
pub mod native;
pub mod pipeline;
pub mod transcript;
