// Session domain module
// Per-user conversation state

pub mod value_objects;

pub use value_objects::SessionState;
