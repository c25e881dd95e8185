pub mod dispatcher;
pub mod transport;

pub use transport::TelegramTransport;
