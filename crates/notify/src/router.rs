use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tracing::{debug, info, warn};

use crate::bus::ListingEvent;
use crate::email::Mailer;

/// Consumes listing events and dispatches the corresponding emails.
///
/// Every failure path logs and moves on. Losing a courtesy email must never
/// wedge the consumer loop or affect the request that produced the event.
pub struct NotificationRouter {
    mailer: Option<Mailer>,
    admin_email: Option<String>,
    public_url: String,
}

impl NotificationRouter {
    pub fn new(mailer: Option<Mailer>, admin_email: Option<String>, public_url: String) -> Self {
        Self {
            mailer,
            admin_email,
            public_url,
        }
    }

    /// Run until the bus has no more publishers.
    pub async fn run(self, mut rx: Receiver<ListingEvent>) {
        loop {
            match rx.recv().await {
                Ok(event) => self.handle_event(event).await,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "notification consumer lagged, events dropped");
                }
                Err(RecvError::Closed) => {
                    info!("event bus closed, notification router stopping");
                    break;
                }
            }
        }
    }

    async fn handle_event(&self, event: ListingEvent) {
        let Some(mailer) = &self.mailer else {
            debug!(?event, "email disabled, skipping notification");
            return;
        };
        match event {
            ListingEvent::Submitted { id, name } => {
                let Some(admin_email) = &self.admin_email else {
                    debug!(listing_id = id, "no admin email configured, skipping");
                    return;
                };
                let subject = "Nuevo negocio pendiente de aprobación";
                let body = format!(
                    "El negocio \"{name}\" está pendiente de revisión.\n\n\
                     Revísalo en {}/admin",
                    self.public_url
                );
                if let Err(err) = mailer.send(admin_email, subject, &body).await {
                    warn!(listing_id = id, error = %err, "failed to send admin notification");
                }
            }
            ListingEvent::Approved {
                id,
                name,
                owner_email,
            } => {
                let subject = "Tu negocio ha sido aprobado";
                let body = format!(
                    "¡Buenas noticias! Tu negocio \"{name}\" ya es visible en el directorio.\n\n\
                     Véelo en {}",
                    self.public_url
                );
                if let Err(err) = mailer.send(&owner_email, subject, &body).await {
                    warn!(listing_id = id, error = %err, "failed to send approval notification");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_mailer_skips_without_error() {
        let router = NotificationRouter::new(None, None, "http://localhost:3000".into());
        router
            .handle_event(ListingEvent::Approved {
                id: 1,
                name: "Cevichería El Norte".into(),
                owner_email: "owner@example.com".into(),
            })
            .await;
    }

    #[tokio::test]
    async fn router_stops_when_bus_is_dropped() {
        let bus = crate::bus::EventBus::new();
        let router = NotificationRouter::new(None, None, "http://localhost:3000".into());
        let handle = tokio::spawn(router.run(bus.subscribe()));
        bus.publish(ListingEvent::Submitted {
            id: 2,
            name: "Librería Amauta".into(),
        });
        drop(bus);
        handle.await.unwrap();
    }
}
