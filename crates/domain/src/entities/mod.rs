pub mod event;
pub mod speaker;
pub mod taxonomy;

pub use event::Event;
pub use speaker::Speaker;
pub use taxonomy::{EventCategory, EventStatus, EventType, EventVenue};
