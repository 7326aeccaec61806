//! # hubmail
//!
//! `hubmail` is a service that generates and delivers the
//! AGS Activities Hub's transactional notification emails.

pub mod error;
pub mod notify;
pub mod server;
pub mod templating;
