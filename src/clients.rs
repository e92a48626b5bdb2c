pub mod calcom;
pub use calcom::{CalComClient, SchedulingProvider};
pub mod twilio;
pub use twilio::{SmsTransport, TwilioClient};
