mod command_error;
mod command_handler;
mod distribution;
mod modification;
mod ping;
mod reply;
mod stats;
mod uploader;
mod viewer;

pub use command_error::CommandError;
pub use command_handler::CommandHandler;
pub use distribution::DistributionArguments;
