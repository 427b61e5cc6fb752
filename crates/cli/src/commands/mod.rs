use clap::Subcommand;
use std::net::SocketAddr;

pub mod demo;
pub mod serve;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open two simulated databases, query both, and show the teardown
    Demo {
        /// Make the opener of this database fail (DB1 or DB2)
        #[arg(long, value_name = "NAME")]
        fail_open: Option<String>,

        /// Fail the unit of work after both queries returned
        #[arg(long)]
        fail_body: bool,

        /// Open both databases at the same time
        #[arg(long)]
        concurrent: bool,
    },

    /// Serve the HTTP collaborator
    Serve {
        /// Address to listen on (overrides RESCOPE_BIND and the settings file)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
}
