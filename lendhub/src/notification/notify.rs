use tracing::{error, instrument};

use crate::app_state::AppState;

use super::{log::NotifyLog, webhook::NotifyWebhook};
use lendhub_core::notification_types::{Message, NotificationImpl, NotificationReceiver};

#[instrument(skip(state))]
async fn get_notification_receiver_impl(
    state: &AppState,
    to: &NotificationReceiver,
) -> anyhow::Result<Box<dyn NotificationImpl>> {
    let ns = &state.settings.notification_services;
    match to {
        NotificationReceiver::Log => Ok(Box::new(NotifyLog::new())),
        NotificationReceiver::Webhook(context) => Ok(Box::new(NotifyWebhook::new(
            ns.get_webhook(&context.service_id).ok_or(anyhow::anyhow!(
                "webhook service {} not found in settings",
                context.service_id
            ))?,
            context,
        ))),
    }
}

pub async fn notify<'a, I>(app_state: &AppState, receivers: I, msg: &Message) -> anyhow::Result<()>
where
    I: IntoIterator<Item = &'a NotificationReceiver>,
{
    let results: Vec<anyhow::Result<()>> =
        futures_util::future::join_all(receivers.into_iter().map(|to| async {
            match get_notification_receiver_impl(app_state, to).await {
                Ok(helper) => helper.notify(msg).await,
                Err(err) => Err(err),
            }
        }))
        .await;

    for result in results {
        if let Err(err) = result {
            error!("Error notifying: {:?}", err);
        }
    }
    Ok(())
}

/// Dispatch a message to all receivers configured in the settings
pub async fn notify_all(app_state: &AppState, msg: &Message) {
    if let Err(err) = notify(app_state, &app_state.settings.notification_receivers, msg).await {
        error!("Error dispatching notification: {:?}", err);
    }
}
