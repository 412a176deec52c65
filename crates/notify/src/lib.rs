//! Listing lifecycle events and their delivery.
//!
//! Moderation-relevant writes publish a [`ListingEvent`] on the in-process
//! [`EventBus`]; the [`NotificationRouter`] consumes the stream and turns
//! events into emails. Delivery is strictly best-effort: the publishing
//! request has already committed by the time an event exists, and a failed
//! or unconfigured send never surfaces to the caller.

pub mod bus;
pub mod email;
pub mod router;

pub use bus::{EventBus, ListingEvent};
pub use email::{EmailConfig, EmailError, Mailer};
pub use router::NotificationRouter;
