use std::net::Ipv4Addr;

use crate::dns_question_and_answer::{DnsAnswer, DnsQuestion};
use crate::error::Result;

pub const DEFAULT_ANSWER_ADDRESS: Ipv4Addr = Ipv4Addr::new(8, 8, 8, 8);
pub const DEFAULT_TTL: u32 = 60;

/// Produces the answer record for one question.
///
/// Implementations report unknown names with `DnsError::NameNotFound`.
pub trait Resolver {
    fn resolve(&self, question: &DnsQuestion) -> Result<DnsAnswer>;
}

/// Answers every question with the same A record, whatever type or class
/// was asked for. No lookup takes place.
#[derive(Debug, Clone, Copy)]
pub struct StaticResolver {
    pub address: Ipv4Addr,
    pub ttl: u32,
}

impl StaticResolver {
    pub fn new(address: Ipv4Addr, ttl: u32) -> Self {
        Self { address, ttl }
    }
}

impl Default for StaticResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ANSWER_ADDRESS, DEFAULT_TTL)
    }
}

impl Resolver for StaticResolver {
    fn resolve(&self, question: &DnsQuestion) -> Result<DnsAnswer> {
        DnsAnswer::new_a_record(question.name.clone(), self.ttl, self.address)
    }
}
