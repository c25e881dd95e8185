//! Board AI Library
//!
//! A Telegram bot that runs a business idea past a board of LLM experts
//! (strategist, financier, auditor, market analyst) and a moderator who
//! writes the final verdict. Includes the agent orchestration, the chat
//! state machine, analysis storage and a read-only HTTP API.

pub mod agents;
pub mod api;
pub mod bot;
pub mod config;
pub mod domain;
pub mod infrastructure;
