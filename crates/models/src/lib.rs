pub mod errors;
pub mod db;
pub mod user;
pub mod user_credentials;
pub mod streaming_service;
pub mod streaming_account;
pub mod screen_subscription;

#[cfg(test)]
mod tests;
