//! Entity records as stored and returned by the API, plus the request payloads that create and
//! change them. Payload fields are optional so validation can report every missing field at once.

mod course;
mod grade;
mod page;
mod student;

pub use course::*;
pub use grade::*;
pub use page::Page;
pub use student::*;
