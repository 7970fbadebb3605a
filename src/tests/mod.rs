pub mod common;

mod expiration;
