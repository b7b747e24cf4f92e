//! Stand-ins for the external collaborators: a recipient given on the command
//! line and a delivery channel that prints to stdout.

use std::io::Write;

use chrono::Utc;
use jobcast_engine::{
    DeliveryError, DeliveryId, DirectoryError, MessageSender, Recipient, RecipientDirectory,
};

pub struct CommandLineRecipient {
    recipient: Recipient,
}

impl CommandLineRecipient {
    pub const IDENTITY: &'static str = "cli";

    pub fn new(recipient: Recipient) -> Self {
        Self { recipient }
    }
}

#[async_trait::async_trait]
impl RecipientDirectory for CommandLineRecipient {
    async fn lookup(&self, identity: &str) -> Result<Recipient, DirectoryError> {
        if identity == Self::IDENTITY {
            Ok(self.recipient.clone())
        } else {
            Err(DirectoryError::NotFound(identity.to_string()))
        }
    }
}

#[derive(Debug, Default)]
pub struct ConsoleSender;

#[async_trait::async_trait]
impl MessageSender for ConsoleSender {
    async fn send(&self, address: &str, body: &str) -> Result<DeliveryId, DeliveryError> {
        let sent_at = Utc::now();
        let mut out = std::io::stdout().lock();
        writeln!(out, "To: {address}\nDate: {}\n\n{body}", sent_at.to_rfc3339())
            .map_err(|err| DeliveryError::Unavailable(err.to_string()))?;
        Ok(DeliveryId(format!("console-{}", sent_at.timestamp_millis())))
    }
}
