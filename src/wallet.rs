//! Wallet session.
//!
//! An opaque capability: an address plus connected/connecting flags. No
//! adapter negotiation or signing lives here; the only local logic is a
//! shape check on the address before it is accepted.

#[derive(Debug, Default)]
pub struct WalletSession {
    address: Option<String>,
    connecting: bool,
}

impl WalletSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connected(&self) -> bool {
        self.address.is_some()
    }

    pub fn connecting(&self) -> bool {
        self.connecting
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Mark the session as mid-handshake (address entry open).
    pub fn begin_connect(&mut self) {
        self.connecting = true;
    }

    pub fn cancel_connect(&mut self) {
        self.connecting = false;
    }

    /// Accept `address` after validating its shape.
    pub fn connect(&mut self, address: &str) -> Result<(), String> {
        let trimmed = address.trim();
        self.connecting = false;
        if !is_valid_address(trimmed) {
            return Err(format!("'{trimmed}' is not a valid Solana address"));
        }
        self.address = Some(trimmed.to_string());
        Ok(())
    }

    pub fn disconnect(&mut self) {
        self.address = None;
        self.connecting = false;
    }
}

/// Solana addresses are base58-encoded 32-byte keys: 32-44 characters from
/// the base58 alphabet (no 0, O, I, or l).
pub fn is_valid_address(s: &str) -> bool {
    (32..=44).contains(&s.len()) && s.chars().all(is_base58_char)
}

fn is_base58_char(c: char) -> bool {
    c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l')
}
