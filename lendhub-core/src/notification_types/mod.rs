use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, utoipa::ToSchema)]
pub struct WebhookContext {
    pub service_id: String,
}

/// Where a notification goes. `Log` needs no configuration; webhooks are
/// looked up by service id in the settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, utoipa::ToSchema)]
pub enum NotificationReceiver {
    Log,
    Webhook(WebhookContext),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum MessageType {
    LoanOpened,
    LoanReturned,
    LoanOverdue,
    ItemRetired,
    RetentionCompleted,
    Custom(String),
}

impl MessageType {
    fn get_message(&self, subject: &str) -> String {
        match self {
            MessageType::LoanOpened => format!("Loan {} opened", subject),
            MessageType::LoanReturned => format!("Loan {} returned", subject),
            MessageType::LoanOverdue => format!("Loan {} is overdue", subject),
            MessageType::ItemRetired => format!("Item {} retired", subject),
            MessageType::RetentionCompleted => {
                format!("Retention sweep completed: {}", subject)
            }
            MessageType::Custom(msg) => msg.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_type: MessageType,
    pub subject: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}

impl Message {
    pub fn new(message_type: MessageType, subject: &str, location_id: Option<String>) -> Message {
        Message {
            message_type: message_type.clone(),
            subject: subject.to_string(),
            message: message_type.get_message(subject),
            location_id,
        }
    }
}

#[async_trait]
pub trait NotificationImpl: Send {
    async fn notify(&self, msg: &Message) -> anyhow::Result<()>;
}
