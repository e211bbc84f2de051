mod dns_header;
mod dns_message;
mod dns_question_and_answer;
mod domain_name;
mod error;
mod resolver;
mod server;
mod wire;

use std::net::Ipv4Addr;

use anyhow::Context;
use clap::Parser;
use resolver::{StaticResolver, DEFAULT_ANSWER_ADDRESS, DEFAULT_TTL};
use server::DnsServer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dns-server")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:2053")]
    bind: String,

    /// IPv4 address returned in every answer
    #[arg(long, default_value_t = DEFAULT_ANSWER_ADDRESS)]
    answer_address: Ipv4Addr,

    /// TTL of every answer, in seconds
    #[arg(long, default_value_t = DEFAULT_TTL)]
    ttl: u32,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let resolver = StaticResolver::new(args.answer_address, args.ttl);
    let server = DnsServer::new(args.bind.as_str(), resolver)
        .with_context(|| format!("failed to bind to {}", args.bind))?;

    info!(addr = %server.local_addr()?, answer = %args.answer_address, ttl = args.ttl, "listening");

    server.run().context("receive loop stopped")
}
