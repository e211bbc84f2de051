use bytes::{Bytes, BytesMut};

use crate::dns_header::{DnsHeader, HEADER_LEN};
use crate::dns_question_and_answer::DnsQuestion;
use crate::error::{DnsError, Result};
use crate::resolver::Resolver;

/// A parsed request: its header and question section.
///
/// Answer, authority and additional sections of the request are never read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsMessage {
    pub header: DnsHeader,
    pub questions: Vec<DnsQuestion>,
}

impl DnsMessage {
    /// Parse the DNS request from the buffer
    /// Takes an immutable borrow of the buffer, returns owned structures
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let header = DnsHeader::from_bytes(buf)?;

        let mut questions = Vec::with_capacity(header.question_count as usize);
        let mut offset = HEADER_LEN; // Start after header

        for _ in 0..header.question_count {
            let (question, new_offset) = DnsQuestion::from_bytes(buf, offset)?;
            questions.push(question);
            offset = new_offset;
        }

        Ok(Self { header, questions })
    }

    /// Header of the reply: one answer per question, nothing else
    pub fn response_header(&self) -> Result<DnsHeader> {
        let question_count = u16::try_from(self.questions.len()).map_err(|_| {
            DnsError::MalformedMessage(format!("{} questions", self.questions.len()))
        })?;

        Ok(DnsHeader {
            id: self.header.id,                 // Echo request ID
            flags: self.header.flags.response(),
            question_count,
            answer_count: question_count,
            authority_count: 0,
            additional_count: 0,
        })
    }

    /// Build the complete DNS response message
    /// Questions are echoed in request order, followed by one answer each
    /// from `resolver` in the same order
    pub fn encode_response<R: Resolver + ?Sized>(&self, resolver: &R) -> Result<Bytes> {
        let mut response = BytesMut::with_capacity(512);

        self.response_header()?.write_to(&mut response);

        for question in &self.questions {
            question.write_to(&mut response)?;
        }

        for question in &self.questions {
            resolver.resolve(question)?.write_to(&mut response)?;
        }

        Ok(response.freeze())
    }
}
