pub mod assistant_service;
pub use assistant_service::AssistantService;
pub mod call_service;
pub use call_service::CallService;
pub mod sms_service;
pub use sms_service::SmsService;
pub mod tool_service;
pub use tool_service::ToolService;
