//! Infrastructure Layer - Registry clients, feed extraction, export, mail

pub mod api_clients;
pub mod export;
pub mod feeds;
pub mod mailer;
