pub mod booking;
pub mod call;
pub mod events;
pub mod lead;
pub mod patient;
pub mod practice;
pub mod telephony;
