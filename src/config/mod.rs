#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub use self::cli::CliConfig;
