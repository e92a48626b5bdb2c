pub mod webhook_auth;
