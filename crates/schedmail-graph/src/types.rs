use base64::Engine;
use serde::Serialize;
use serde_json::Value;

/// Who Graph notifies about an event change (`sendUpdates` query parameter)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SendUpdates {
    /// Email every attendee. Without this Graph creates the event silently.
    #[default]
    All,
    ExternalOnly,
    None,
}

impl SendUpdates {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendUpdates::All => "all",
            SendUpdates::ExternalOnly => "externalOnly",
            SendUpdates::None => "none",
        }
    }
}

impl std::fmt::Display for SendUpdates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for POST /users/{id}/sendMail
#[derive(Debug, Serialize)]
pub struct SendMailRequest {
    pub message: MailMessage,
    #[serde(rename = "saveToSentItems")]
    pub save_to_sent_items: bool,
}

#[derive(Debug, Serialize)]
pub struct MailMessage {
    pub subject: String,
    pub body: ItemBody,
    #[serde(rename = "toRecipients")]
    pub to_recipients: Vec<Recipient>,
    /// Passed through verbatim; omitted from the body when empty
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct ItemBody {
    #[serde(rename = "contentType")]
    pub content_type: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct Recipient {
    #[serde(rename = "emailAddress")]
    pub email_address: EmailAddress,
}

#[derive(Debug, Serialize)]
pub struct EmailAddress {
    pub address: String,
}

impl SendMailRequest {
    /// HTML message to `to`, saved to the sender's Sent Items
    pub fn html<S: AsRef<str>>(
        to: &[S],
        subject: &str,
        html_body: &str,
        attachments: &[Value],
    ) -> Self {
        let to_recipients = to
            .iter()
            .map(|addr| Recipient {
                email_address: EmailAddress {
                    address: addr.as_ref().to_string(),
                },
            })
            .collect();

        Self {
            message: MailMessage {
                subject: subject.to_string(),
                body: ItemBody {
                    content_type: "HTML".to_string(),
                    content: html_body.to_string(),
                },
                to_recipients,
                attachments: attachments.to_vec(),
            },
            save_to_sent_items: true,
        }
    }
}

/// Build a `#microsoft.graph.fileAttachment` for use with `send_mail`
pub fn file_attachment(name: &str, content_type: &str, data: &[u8]) -> Value {
    let engine = base64::engine::general_purpose::STANDARD;
    serde_json::json!({
        "@odata.type": "#microsoft.graph.fileAttachment",
        "name": name,
        "contentType": content_type,
        "contentBytes": engine.encode(data),
    })
}
