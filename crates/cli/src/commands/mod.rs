pub mod init;
pub mod serve;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Command {
    /// Write a phonebook configuration file
    Init(init::InitArgs),
    /// Run the HTTP service
    Serve(serve::ServeArgs),
}
