// Chat bot layer
//
// Platform-independent request handling: session state machine, result
// caching, report rendering and the outbound chat port.

pub mod handler;
pub mod last_result;
pub mod render;
pub mod state;
pub mod texts;
pub mod transport;

pub use handler::{HandlerConfig, RequestHandler};
pub use last_result::{BoundedLastResultStore, LastResultStore};
pub use state::{SessionStore, StateManager};
pub use transport::{ChatTransport, InboundEvent, Menu, MessageRef, TransportError};
