pub mod booking_repo;
pub use booking_repo::BookingRepository;
pub mod call_repo;
pub use call_repo::CallRepository;
pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod message_repo;
pub use message_repo::MessageRepository;
pub mod patient_repo;
pub use patient_repo::PatientRepository;
pub mod phone_repo;
pub use phone_repo::PhoneNumberRepository;
pub mod practice_repo;
pub use practice_repo::PracticeRepository;
