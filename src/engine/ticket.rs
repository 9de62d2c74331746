use rand::Rng;

/// Random bytes per ticket; rendered as twice as many hex characters
const TICKET_BYTES: usize = 6;

/// Issues e-ticket numbers from the thread-local CSPRNG
///
/// Collisions are possible in principle and are not checked for.
#[derive(Debug, Default, Clone, Copy)]
pub struct TicketNumberGenerator;

impl TicketNumberGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn next(&self) -> String {
        let mut bytes = [0u8; TICKET_BYTES];
        rand::rng().fill(&mut bytes);
        hex::encode_upper(bytes)
    }
}

/// True for exactly twelve uppercase hex characters, the shape `next` produces
pub fn is_valid_ticket(ticket: &str) -> bool {
    ticket.len() == TICKET_BYTES * 2
        && ticket
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
}
