use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct NotificationServiceSettings {
    services: HashMap<String, NotificationServiceType>,
}

impl<'de> Deserialize<'de> for NotificationServiceSettings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let map: HashMap<String, serde_json::Value> = Deserialize::deserialize(deserializer)?;
        let mut services: HashMap<String, NotificationServiceType> = HashMap::new();

        for (key, mut value) in map {
            let service_type = value
                .as_object_mut()
                .and_then(|obj| obj.remove("type"))
                .ok_or_else(|| serde::de::Error::missing_field("type"))?;
            let service = match service_type.as_str() {
                Some("webhook") => match WebhookSettings::deserialize(value) {
                    Ok(settings) => NotificationServiceType::Webhook(settings),
                    Err(e) => return Err(serde::de::Error::custom(e.to_string())),
                },
                _ => {
                    return Err(serde::de::Error::custom(format!(
                        "Unknown service type: {}",
                        service_type
                    )))
                }
            };
            services.insert(key, service);
        }

        Ok(NotificationServiceSettings { services })
    }
}

impl NotificationServiceSettings {
    pub fn get_webhook(&self, service_id: &str) -> Option<&WebhookSettings> {
        match self.services.get(service_id) {
            Some(NotificationServiceType::Webhook(settings)) => Some(settings),
            None => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub enum NotificationServiceType {
    Webhook(WebhookSettings),
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookSettings {
    pub url: String,
    #[serde(default = "default_webhook_method")]
    pub method: String,
}

fn default_webhook_method() -> String {
    "post".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_webhook_service() {
        let json = serde_json::json!({
            "ops": { "type": "webhook", "url": "https://hooks.example.org/lendhub" }
        });
        let settings: NotificationServiceSettings = serde_json::from_value(json).unwrap();
        let webhook = settings.get_webhook("ops").unwrap();
        assert_eq!(webhook.url, "https://hooks.example.org/lendhub");
        assert_eq!(webhook.method, "post");
        assert!(settings.get_webhook("missing").is_none());
    }

    #[test]
    fn test_unknown_service_type_is_an_error() {
        let json = serde_json::json!({
            "chat": { "type": "irc", "url": "irc://example" }
        });
        let result: Result<NotificationServiceSettings, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }
}
